//! Date token recognition and ISO-8601 normalization.
//!
//! Recognized shapes:
//! - `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY.MM.DD`
//! - `DD/MM/YYYY` or `MM/DD/YYYY` (`/`, `-`, `.` separators)
//! - `Month DD, YYYY`, `Mon DD YYYY`
//! - `DD Month YYYY`, `DD-Mon-YYYY`
//!
//! Numeric day/month order: a component above 12 must be the day. When both
//! are ≤ 12 the page-level evidence decides, falling back to the configured
//! default (month-first unless told otherwise).

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::types::config::DateOrder;

/// Years outside this range are not BIOS release dates.
const MIN_YEAR: i32 = 2000;
const MAX_YEAR: i32 = 2100;

lazy_static! {
    static ref YMD_REGEX: Regex =
        Regex::new(r"\b(\d{4})[./\-](\d{1,2})[./\-](\d{1,2})\b").unwrap();

    static ref NUMERIC_REGEX: Regex =
        Regex::new(r"\b(\d{1,2})([./\-])(\d{1,2})([./\-])(\d{4})\b").unwrap();

    static ref MONTH_FIRST_REGEX: Regex = Regex::new(
        r"(?i)\b([a-z]{3,9})\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b"
    ).unwrap();

    static ref DAY_FIRST_REGEX: Regex = Regex::new(
        r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?(?:\s+|-)([a-z]{3,9})\.?,?(?:\s+|-)(\d{4})\b"
    ).unwrap();
}

/// How a matched date was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateShape {
    /// Year first, unambiguous
    Iso,
    /// Numeric day/month with a component above 12
    Numeric,
    /// Numeric with both components ≤ 12; order was not observed
    AmbiguousNumeric,
    /// Month written as a word
    Textual,
}

/// A date found in a text fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    pub raw: String,
    pub date: NaiveDate,
    pub start: usize,
    pub end: usize,
    pub shape: DateShape,
}

impl DateMatch {
    pub fn is_ambiguous(&self) -> bool {
        self.shape == DateShape::AmbiguousNumeric
    }

    fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}

/// Find every date in `text`, resolving ambiguous numeric dates with `order`.
///
/// Matches are returned in text order and never overlap.
pub fn find_dates(text: &str, order: DateOrder) -> Vec<DateMatch> {
    let mut found: Vec<DateMatch> = Vec::new();
    let mut push = |m: DateMatch| {
        if !found.iter().any(|f| f.overlaps(m.start, m.end)) {
            found.push(m);
        }
    };

    for caps in YMD_REGEX.captures_iter(text) {
        let whole = caps.get(0).expect("group 0 always present");
        let (y, m, d) = (num(&caps[1]), num(&caps[2]), num(&caps[3]));
        if let Some(date) = make_date(y, m, d) {
            push(DateMatch {
                raw: whole.as_str().to_string(),
                date,
                start: whole.start(),
                end: whole.end(),
                shape: DateShape::Iso,
            });
        }
    }

    for caps in NUMERIC_REGEX.captures_iter(text) {
        let whole = caps.get(0).expect("group 0 always present");
        // Mixed separators ("1/2-2023") are not dates.
        if caps[2] != caps[4] {
            continue;
        }
        let (a, b, y) = (num(&caps[1]), num(&caps[3]), num(&caps[5]));
        if let Some((date, shape)) = resolve_numeric(a, b, y, order) {
            push(DateMatch {
                raw: whole.as_str().to_string(),
                date,
                start: whole.start(),
                end: whole.end(),
                shape,
            });
        }
    }

    for caps in MONTH_FIRST_REGEX.captures_iter(text) {
        let whole = caps.get(0).expect("group 0 always present");
        let Some(month) = month_from_name(&caps[1]) else {
            continue;
        };
        if let Some(date) = make_date(num(&caps[3]), month, num(&caps[2])) {
            push(DateMatch {
                raw: whole.as_str().to_string(),
                date,
                start: whole.start(),
                end: whole.end(),
                shape: DateShape::Textual,
            });
        }
    }

    for caps in DAY_FIRST_REGEX.captures_iter(text) {
        let whole = caps.get(0).expect("group 0 always present");
        let Some(month) = month_from_name(&caps[2]) else {
            continue;
        };
        if let Some(date) = make_date(num(&caps[3]), month, num(&caps[1])) {
            push(DateMatch {
                raw: whole.as_str().to_string(),
                date,
                start: whole.start(),
                end: whole.end(),
                shape: DateShape::Textual,
            });
        }
    }

    found.sort_by_key(|m| m.start);
    found
}

/// Inspect numeric dates across a page for day/month order evidence.
///
/// Returns the order shown by the majority of unambiguous numeric dates, or
/// `None` when there is no evidence or it is evenly split.
pub fn infer_order<'a>(texts: impl IntoIterator<Item = &'a str>) -> Option<DateOrder> {
    let (mut day_first, mut month_first) = (0usize, 0usize);
    for text in texts {
        for caps in NUMERIC_REGEX.captures_iter(text) {
            if caps[2] != caps[4] {
                continue;
            }
            let (a, b) = (num(&caps[1]), num(&caps[3]));
            match (a > 12, b > 12) {
                (true, false) if b >= 1 => day_first += 1,
                (false, true) if a >= 1 => month_first += 1,
                _ => {}
            }
        }
    }

    match day_first.cmp(&month_first) {
        std::cmp::Ordering::Greater => Some(DateOrder::DayFirst),
        std::cmp::Ordering::Less => Some(DateOrder::MonthFirst),
        std::cmp::Ordering::Equal => None,
    }
}

/// Parse a single date string, e.g. `"13/04/2023"` or `"Aug 1, 2025"`.
pub fn parse_date(text: &str, order: DateOrder) -> Option<NaiveDate> {
    find_dates(text, order).first().map(|m| m.date)
}

fn resolve_numeric(a: u32, b: u32, y: u32, order: DateOrder) -> Option<(NaiveDate, DateShape)> {
    match (a > 12, b > 12) {
        (true, true) => None,
        (true, false) => make_date(y, b, a).map(|d| (d, DateShape::Numeric)),
        (false, true) => make_date(y, a, b).map(|d| (d, DateShape::Numeric)),
        (false, false) => {
            let date = match order {
                DateOrder::MonthFirst => make_date(y, a, b),
                DateOrder::DayFirst => make_date(y, b, a),
            }?;
            // Same value either way ("04/04/2023") is not really ambiguous.
            let shape = if a == b {
                DateShape::Numeric
            } else {
                DateShape::AmbiguousNumeric
            };
            Some((date, shape))
        }
    }
}

fn make_date(year: u32, month: u32, day: u32) -> Option<NaiveDate> {
    let year = i32::try_from(year).ok()?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn num(s: &str) -> u32 {
    s.parse().unwrap_or(0)
}

/// Month number from an English name or its abbreviation.
pub fn month_from_name(name: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];
    let name = name.trim_end_matches('.').to_lowercase();
    if name == "sept" {
        return Some(9);
    }
    MONTHS
        .iter()
        .position(|full| *full == name || (name.len() == 3 && full.starts_with(&name)))
        .map(|i| i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_shapes() {
        for raw in ["2023-04-11", "2023/04/11", "2023.4.11"] {
            assert_eq!(parse_date(raw, DateOrder::MonthFirst), Some(ymd(2023, 4, 11)), "{raw}");
        }
    }

    #[test]
    fn test_ambiguous_defaults_to_month_first() {
        let found = find_dates("03/04/2023", DateOrder::MonthFirst);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].date, ymd(2023, 3, 4));
        assert!(found[0].is_ambiguous());
    }

    #[test]
    fn test_component_above_twelve_is_day() {
        let found = find_dates("13/04/2023", DateOrder::MonthFirst);
        assert_eq!(found[0].date, ymd(2023, 4, 13));
        assert!(!found[0].is_ambiguous());

        assert_eq!(parse_date("04/13/2023", DateOrder::DayFirst), Some(ymd(2023, 4, 13)));
    }

    #[test]
    fn test_day_first_order_applies_to_ambiguous() {
        assert_eq!(parse_date("03/04/2023", DateOrder::DayFirst), Some(ymd(2023, 4, 3)));
    }

    #[test]
    fn test_textual_months() {
        assert_eq!(parse_date("Aug 1, 2025", DateOrder::MonthFirst), Some(ymd(2025, 8, 1)));
        assert_eq!(
            parse_date("Released September 30th, 2024", DateOrder::MonthFirst),
            Some(ymd(2024, 9, 30))
        );
        assert_eq!(parse_date("1 Aug 2025", DateOrder::MonthFirst), Some(ymd(2025, 8, 1)));
        assert_eq!(parse_date("01-Aug-2025", DateOrder::MonthFirst), Some(ymd(2025, 8, 1)));
        assert_eq!(parse_date("Sept. 5 2024", DateOrder::MonthFirst), Some(ymd(2024, 9, 5)));
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert!(find_dates("2023-02-30", DateOrder::MonthFirst).is_empty());
        assert!(find_dates("13/13/2023", DateOrder::MonthFirst).is_empty());
        assert!(find_dates("1999-01-01", DateOrder::MonthFirst).is_empty());
        assert!(find_dates("Marching 5, 2023", DateOrder::MonthFirst).is_empty());
        assert!(find_dates("1/2-2023", DateOrder::MonthFirst).is_empty());
    }

    #[test]
    fn test_multiple_dates_in_order() {
        let found = find_dates(
            "F10 2024/01/02 F9 Dec 3, 2023 F8 01.10.2023",
            DateOrder::MonthFirst,
        );
        let dates: Vec<NaiveDate> = found.iter().map(|m| m.date).collect();
        assert_eq!(dates, vec![ymd(2024, 1, 2), ymd(2023, 12, 3), ymd(2023, 1, 10)]);
        assert!(found[0].start < found[1].start);
    }

    #[test]
    fn test_infer_order() {
        assert_eq!(infer_order(["25/12/2023", "03/04/2023"]), Some(DateOrder::DayFirst));
        assert_eq!(infer_order(["12/25/2023"]), Some(DateOrder::MonthFirst));
        assert_eq!(infer_order(["03/04/2023"]), None);
        assert_eq!(infer_order(["25/12/2023", "12/25/2023"]), None);
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_from_name("Jan"), Some(1));
        assert_eq!(month_from_name("SEPT"), Some(9));
        assert_eq!(month_from_name("december"), Some(12));
        assert_eq!(month_from_name("Decem"), None);
        assert_eq!(month_from_name("Version"), None);
    }
}
