//! Structural checks: identifier uniqueness, required fields and
//! content-block kind/field consistency.

use std::collections::HashMap;

use super::{section_locator, Checker, FindingKind, Locator};
use crate::schema::raw::{trimmed, RawContentBlock, RawSection};
use crate::schema::BlockKind;

/// Check 1: section ids are unique across the dataset.
pub(super) fn check_sections(checker: &mut Checker<'_>, sections: &[RawSection]) {
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for (i, section) in sections.iter().enumerate() {
        let loc = section_locator(i, section);

        if let Some(id) = checker.required(&section.id, &loc, "id") {
            if let Some(first) = seen.get(id) {
                checker.error(
                    FindingKind::Structural,
                    loc.field("id"),
                    format!("duplicate section id '{}' (first declared at sections[{}])", id, first),
                );
            } else {
                seen.insert(id, i);
            }
        }
        checker.required(&section.title, &loc, "title");
        if section.content.is_none() {
            checker.missing(&loc, "content");
        }
    }
}

/// Check 2: tab ids are unique within their parent section.
pub(super) fn check_tabs(checker: &mut Checker<'_>, sections: &[RawSection]) {
    for (i, section) in sections.iter().enumerate() {
        let Some(tabs) = &section.tabs else {
            continue;
        };
        let tabs_loc = section_locator(i, section).field("tabs");
        let mut seen: HashMap<&str, usize> = HashMap::new();

        for (j, tab) in tabs.iter().enumerate() {
            let loc = tabs_loc.keyed(j, trimmed(&tab.id));

            if let Some(id) = checker.required(&tab.id, &loc, "id") {
                if let Some(first) = seen.get(id) {
                    checker.error(
                        FindingKind::Structural,
                        loc.field("id"),
                        format!("duplicate tab id '{}' (first declared at tabs[{}])", id, first),
                    );
                } else {
                    seen.insert(id, j);
                }
            }
            checker.required(&tab.label, &loc, "label");
            if tab.content.is_none() {
                checker.missing(&loc, "content");
            }
        }
    }
}

/// Check 3: every block has a known kind, and variant-only fields appear only on their kind.
pub(super) fn check_blocks(checker: &mut Checker<'_>, sections: &[RawSection]) {
    for (i, section) in sections.iter().enumerate() {
        let section_loc = section_locator(i, section);

        if let Some(blocks) = &section.content {
            check_block_list(checker, blocks, &section_loc.field("content"));
        }

        for (j, tab) in section.tabs.iter().flatten().enumerate() {
            if let Some(blocks) = &tab.content {
                let loc = section_loc
                    .field("tabs")
                    .keyed(j, trimmed(&tab.id))
                    .field("content");
                check_block_list(checker, blocks, &loc);
            }
        }
    }
}

fn check_block_list(checker: &mut Checker<'_>, blocks: &[RawContentBlock], list_loc: &Locator) {
    for (k, block) in blocks.iter().enumerate() {
        check_block(checker, block, &list_loc.index(k));
    }
}

fn check_block(checker: &mut Checker<'_>, block: &RawContentBlock, loc: &Locator) {
    if block.content.is_none() {
        checker.missing(loc, "content");
    }

    let Some(tag) = block.kind.as_deref().map(str::trim) else {
        checker.missing(loc, "type");
        return;
    };
    let kind = match tag.parse::<BlockKind>() {
        Ok(kind) => kind,
        Err(e) => {
            checker.error(FindingKind::Enum, loc.field("type"), format!("block type {}", e));
            return;
        }
    };

    let misplaced: [(&'static str, bool, BlockKind); 4] = [
        ("items", block.items.is_some(), BlockKind::List),
        ("imageUrl", block.image_url.is_some(), BlockKind::Image),
        ("imageCaption", block.image_caption.is_some(), BlockKind::Image),
        ("author", block.author.is_some(), BlockKind::Quote),
    ];
    for (field, populated, owner) in misplaced {
        if populated && kind != owner {
            checker.error(
                FindingKind::Structural,
                loc.field(field),
                format!("field '{}' is only valid on {} blocks, found on a {} block", field, owner, kind),
            );
        }
    }

    match kind {
        BlockKind::List if block.items.is_none() => {
            checker.warn(loc.clone(), "list block has no items");
        }
        BlockKind::Image => match block.image_url.as_deref() {
            None => checker.missing(loc, "imageUrl"),
            Some(url) => checker.locator(url.trim(), loc, "imageUrl"),
        },
        _ => {}
    }
}
