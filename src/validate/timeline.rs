//! Timeline chronology: year-label parsing and ordering warnings.

use std::sync::OnceLock;

use chrono::Month;
use regex::Regex;

use super::{section_locator, Checker};
use crate::schema::raw::RawSection;

/// Calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

/// Inclusive span covered by a year label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: YearMonth,
    pub end: YearMonth,
}

fn label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:(?P<m1>[A-Za-z]+)\.?\s+)?(?P<y1>\d{4})(?:\s*[-–—]\s*(?:(?P<m2>[A-Za-z]+)\.?\s+)?(?P<y2>\d{4}))?$",
        )
        .expect("static timeline label pattern")
    })
}

fn month_number(name: &str) -> Option<u32> {
    name.parse::<Month>().ok().map(|m| m.number_from_month())
}

/// Parse a year label such as `2023`, `June 2020`, `2019-2023` or
/// `March 2021 – May 2022`. Returns `None` for empty or free-form labels.
pub fn parse_period(label: &str) -> Option<Period> {
    let caps = label_regex().captures(label.trim())?;

    let y1: i32 = caps.name("y1")?.as_str().parse().ok()?;
    let m1 = match caps.name("m1") {
        Some(m) => Some(month_number(m.as_str())?),
        None => None,
    };
    let start = YearMonth {
        year: y1,
        month: m1.unwrap_or(1),
    };

    let end = match caps.name("y2") {
        Some(y2) => {
            let year: i32 = y2.as_str().parse().ok()?;
            let month = match caps.name("m2") {
                Some(m) => month_number(m.as_str())?,
                None => 12,
            };
            YearMonth { year, month }
        }
        None => YearMonth {
            year: y1,
            month: m1.unwrap_or(12),
        },
    };

    if end < start {
        return None;
    }
    Some(Period { start, end })
}

/// Check 7: parseable year labels within a section are in non-decreasing order.
///
/// An event is out of order when it ends before the latest start seen so far.
/// Empty and unparseable labels are exempt.
pub(super) fn check_chronology(checker: &mut Checker<'_>, sections: &[RawSection]) {
    for (i, section) in sections.iter().enumerate() {
        let Some(events) = &section.timeline else {
            continue;
        };
        let timeline_loc = section_locator(i, section).field("timeline");
        let mut latest: Option<(YearMonth, usize, &str)> = None;

        for (j, event) in events.iter().enumerate() {
            let label = event.year.as_deref().map(str::trim).unwrap_or("");
            if label.is_empty() {
                continue;
            }
            let Some(period) = parse_period(label) else {
                log::debug!("Timeline label '{}' is not a date range, skipping order check", label);
                continue;
            };

            if let Some((start, k, prev)) = latest {
                if period.end < start {
                    checker.warn(
                        timeline_loc.index(j),
                        format!("'{}' is earlier than '{}' at timeline[{}]", label, prev, k),
                    );
                    continue;
                }
                if period.start <= start {
                    continue;
                }
            }
            latest = Some((period.start, j, label));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth { year, month }
    }

    #[test]
    fn test_parse_year_only() {
        let p = parse_period("2023").unwrap();
        assert_eq!(p.start, ym(2023, 1));
        assert_eq!(p.end, ym(2023, 12));
    }

    #[test]
    fn test_parse_month_year() {
        let p = parse_period("June 2020").unwrap();
        assert_eq!(p.start, ym(2020, 6));
        assert_eq!(p.end, ym(2020, 6));
        assert_eq!(parse_period("Dec 2021").unwrap().start, ym(2021, 12));
    }

    #[test]
    fn test_parse_ranges() {
        let p = parse_period("2019-2023").unwrap();
        assert_eq!((p.start, p.end), (ym(2019, 1), ym(2023, 12)));
        let p = parse_period("2019–2024").unwrap();
        assert_eq!((p.start, p.end), (ym(2019, 1), ym(2024, 12)));
        let p = parse_period("March 2021 - May 2022").unwrap();
        assert_eq!((p.start, p.end), (ym(2021, 3), ym(2022, 5)));
    }

    #[test]
    fn test_parse_rejects_free_form() {
        assert!(parse_period("").is_none());
        assert!(parse_period("Ongoing since 2009").is_none());
        assert!(parse_period("Smarch 2020").is_none());
        assert!(parse_period("2024-2019").is_none());
    }
}
