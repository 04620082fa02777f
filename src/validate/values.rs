//! Scalar checks: dimension score bounds and closed-set membership.

use super::{section_locator, Checker, FindingKind, Locator};
use crate::schema::raw::{trimmed, RawContact, RawSection, RawTimelineEvent};
use crate::schema::{Influence, Polarity};

/// Check 4: relationship-dimension scores lie within the declared scale.
pub(super) fn check_dimensions(checker: &mut Checker<'_>, sections: &[RawSection]) {
    let (min, max) = (checker.options().score_min, checker.options().score_max);

    for (i, section) in sections.iter().enumerate() {
        let Some(dims) = &section.relationship_dimensions else {
            continue;
        };
        let dims_loc = section_locator(i, section).field("relationshipDimensions");

        for (j, dim) in dims.iter().enumerate() {
            let loc = dims_loc.index(j);
            checker.required(&dim.name, &loc, "name");
            checker.present(&dim.description, &loc, "description");

            match dim.value {
                None => checker.missing(&loc, "value"),
                Some(v) if !v.is_finite() || v < min || v > max => {
                    checker.error(
                        FindingKind::Range,
                        loc.field("value"),
                        format!("score {} is outside the scale {}–{}", v, min, max),
                    );
                }
                Some(_) => {}
            }
        }
    }
}

/// Check 6: timeline polarity and contact influence tags belong to their closed sets.
pub(super) fn check_tags(checker: &mut Checker<'_>, sections: &[RawSection]) {
    for (i, section) in sections.iter().enumerate() {
        let section_loc = section_locator(i, section);

        if let Some(events) = &section.timeline {
            let timeline_loc = section_loc.field("timeline");
            for (j, event) in events.iter().enumerate() {
                check_event(checker, event, &timeline_loc.index(j));
            }
        }

        for (j, tab) in section.tabs.iter().flatten().enumerate() {
            let Some(contacts) = &tab.key_contacts else {
                continue;
            };
            let contacts_loc = section_loc
                .field("tabs")
                .keyed(j, trimmed(&tab.id))
                .field("keyContacts");
            for (k, contact) in contacts.iter().enumerate() {
                check_contact(checker, contact, &contacts_loc.index(k));
            }
        }
    }
}

fn check_event(checker: &mut Checker<'_>, event: &RawTimelineEvent, loc: &Locator) {
    checker.present(&event.year, loc, "year");
    checker.required(&event.title, loc, "title");
    checker.present(&event.description, loc, "description");

    match event.polarity.as_deref().map(str::trim) {
        None => checker.missing(loc, "type"),
        Some(tag) => {
            if let Err(e) = tag.parse::<Polarity>() {
                checker.error(FindingKind::Enum, loc.field("type"), format!("timeline polarity {}", e));
            }
        }
    }
}

fn check_contact(checker: &mut Checker<'_>, contact: &RawContact, loc: &Locator) {
    checker.required(&contact.name, loc, "name");
    checker.required(&contact.title, loc, "title");
    checker.present(&contact.description, loc, "description");

    match contact.influence.as_deref().map(str::trim) {
        None => checker.missing(loc, "influence"),
        Some(tag) => {
            if let Err(e) = tag.parse::<Influence>() {
                checker.error(FindingKind::Enum, loc.field("influence"), format!("influence level {}", e));
            }
        }
    }

    match contact.image_url.as_deref() {
        None => checker.missing(loc, "imageUrl"),
        Some(url) => checker.locator(url.trim(), loc, "imageUrl"),
    }
    if let Some(pdf) = contact.pdf_link.as_deref() {
        checker.locator(pdf.trim(), loc, "pdfLink");
    }
}
