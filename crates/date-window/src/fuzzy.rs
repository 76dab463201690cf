//! Lenient absolute date parsing.
//!
//! Accepts the loose shapes people type on a command line (`2022/01/05`,
//! `5.1.22`, `Jan 5 2022`, `20220105`, `2022-01-05T10:30`) and resolves
//! ambiguous numeric fields with the `day_first` / `year_first` conventions.
//! Missing components default to the ones of `today`.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

static TIME_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<date>.*?)(?:^|\s+|(?P<iso>t))(?P<h>\d{1,2}):(?P<m>\d{2})(?::(?P<s>\d{2})(?:\.(?P<frac>\d{1,9}))?)?\s*(?P<ampm>am|pm)?$",
    )
    .expect("valid time pattern")
});

static FIELD_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s/\-.,]+").expect("valid separator pattern"));

const MONTH_NAMES: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

const WEEKDAY_NAMES: [&str; 7] = [
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
];

const ORDINAL_SUFFIXES: [&str; 4] = ["st", "nd", "rd", "th"];

/// A date (and possibly a time of day) recognized in a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ParsedDate {
    pub at: NaiveDateTime,
    /// Whether the token carried an explicit time of day.
    pub has_time: bool,
}

/// Component order used to break ties between ambiguous numeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOrder {
    pub day_first: bool,
    pub year_first: bool,
}

/// A numeric field as written: its value and how many digits it had.
#[derive(Debug, Clone, Copy)]
struct Number {
    value: u32,
    digits: usize,
}

impl Number {
    fn looks_like_year(self) -> bool {
        self.digits > 2 || self.value > 31
    }
}

/// Parse `text` as a calendar date with an optional time of day.
///
/// Returns `None` when the text is not a date or names an impossible one
/// (`2022/02/30`).
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use date_window::fuzzy::{parse_fuzzy, FieldOrder};
///
/// let today = NaiveDate::from_ymd_opt(2022, 3, 1).unwrap();
/// let us = FieldOrder { day_first: false, year_first: false };
/// let eu = FieldOrder { day_first: true, year_first: false };
///
/// let a = parse_fuzzy("01/05/2022", us, today).unwrap();
/// let b = parse_fuzzy("01/05/2022", eu, today).unwrap();
/// assert_eq!(a.at.date(), NaiveDate::from_ymd_opt(2022, 1, 5).unwrap());
/// assert_eq!(b.at.date(), NaiveDate::from_ymd_opt(2022, 5, 1).unwrap());
/// ```
pub fn parse_fuzzy(text: &str, order: FieldOrder, today: NaiveDate) -> Option<ParsedDate> {
    let lowered = text.trim().to_ascii_lowercase();
    // A signed number is an offset, not a date.
    if lowered.is_empty() || lowered.starts_with(['-', '+']) {
        return None;
    }

    let (date_part, time) = match TIME_SUFFIX.captures(&lowered) {
        Some(caps) => {
            let date_part = caps.name("date").map_or("", |m| m.as_str()).to_string();
            // `T` only separates a numeric date from its time.
            if caps.name("iso").is_some() && !date_part.ends_with(|c: char| c.is_ascii_digit()) {
                return None;
            }
            let time = parse_time(&caps)?;
            (date_part, Some(time))
        }
        None => (lowered.clone(), None),
    };

    // A bare time of day means today.
    let date = if date_part.trim().is_empty() {
        today
    } else {
        parse_date_fields(&date_part, order, today)?
    };

    Some(ParsedDate {
        at: date.and_time(time.unwrap_or(NaiveTime::MIN)),
        has_time: time.is_some(),
    })
}

fn parse_time(caps: &regex::Captures<'_>) -> Option<NaiveTime> {
    let mut hour: u32 = caps.name("h")?.as_str().parse().ok()?;
    let minute: u32 = caps.name("m")?.as_str().parse().ok()?;
    let second: u32 = match caps.name("s") {
        Some(s) => s.as_str().parse().ok()?,
        None => 0,
    };
    let micro = match caps.name("frac") {
        Some(frac) => {
            // Pad or truncate to six digits of microseconds.
            let digits: String = frac.as_str().chars().chain("000000".chars()).take(6).collect();
            digits.parse().ok()?
        }
        None => 0,
    };

    if let Some(ampm) = caps.name("ampm") {
        if hour == 0 || hour > 12 {
            return None;
        }
        hour = match (hour, ampm.as_str()) {
            (12, "am") => 0,
            (12, _) => 12,
            (h, "pm") => h + 12,
            (h, _) => h,
        };
    }

    NaiveTime::from_hms_micro_opt(hour, minute, second, micro)
}

fn parse_date_fields(date_part: &str, order: FieldOrder, today: NaiveDate) -> Option<NaiveDate> {
    let mut numbers: Vec<Number> = Vec::new();
    let mut month_name: Option<u32> = None;

    for field in FIELD_SEPARATORS.split(date_part).filter(|f| !f.is_empty()) {
        if let Some(number) = parse_number(field) {
            numbers.push(number);
        } else if let Some(month) = parse_month_name(field) {
            if month_name.replace(month).is_some() {
                return None;
            }
        } else if !is_weekday_name(field) {
            return None;
        }
    }

    match month_name {
        Some(month) => resolve_with_month_name(month, &numbers, order, today),
        None => resolve_numeric(&numbers, order, today),
    }
}

fn parse_number(field: &str) -> Option<Number> {
    let digits = ORDINAL_SUFFIXES
        .iter()
        .find_map(|suffix| field.strip_suffix(suffix))
        .filter(|stripped| !stripped.is_empty())
        .unwrap_or(field);

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    Some(Number {
        value: digits.parse().ok()?,
        digits: digits.len(),
    })
}

/// Full or abbreviated (at least three letters) English month name.
fn parse_month_name(field: &str) -> Option<u32> {
    if field == "sept" {
        return Some(9);
    }
    if field.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|name| name.starts_with(field))
        .map(|idx| idx as u32 + 1)
}

fn is_weekday_name(field: &str) -> bool {
    field.len() >= 3 && WEEKDAY_NAMES.iter().any(|name| name.starts_with(field))
}

fn resolve_with_month_name(
    month: u32,
    numbers: &[Number],
    order: FieldOrder,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let (year, day) = match numbers {
        [] => (today.year(), today.day()),
        [n] if n.looks_like_year() => (expand_year(*n, today), today.day()),
        [n] => (today.year(), n.value),
        [a, b] if a.looks_like_year() => (expand_year(*a, today), b.value),
        [a, b] if b.looks_like_year() => (expand_year(*b, today), a.value),
        [a, b] if order.year_first => (expand_year(*a, today), b.value),
        [a, b] => (expand_year(*b, today), a.value),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn resolve_numeric(numbers: &[Number], order: FieldOrder, today: NaiveDate) -> Option<NaiveDate> {
    match numbers {
        [] => None,
        [n] => resolve_single(*n, today),
        [a, b] => {
            let (year, month, day) = if a.looks_like_year() {
                (expand_year(*a, today), b.value, today.day())
            } else if b.looks_like_year() {
                (expand_year(*b, today), a.value, today.day())
            } else if order.day_first && b.value <= 12 {
                (today.year(), b.value, a.value)
            } else {
                (today.year(), a.value, b.value)
            };
            NaiveDate::from_ymd_opt(year, month, day)
        }
        [a, b, c] => {
            let year_at_start = a.looks_like_year()
                || (order.year_first && b.value <= 12 && c.value <= 31 && c.digits <= 2);
            let (year, month, day) = if year_at_start {
                if order.day_first && c.value <= 12 {
                    (*a, c.value, b.value)
                } else {
                    (*a, b.value, c.value)
                }
            } else if a.value > 12 || (order.day_first && b.value <= 12) {
                (*c, b.value, a.value)
            } else {
                (*c, a.value, b.value)
            };
            NaiveDate::from_ymd_opt(expand_year(year, today), month, day)
        }
        _ => None,
    }
}

/// A lone number: compact `YYYYMMDD` / `YYMMDD`, a bare year, or a day of
/// the current month.
fn resolve_single(n: Number, today: NaiveDate) -> Option<NaiveDate> {
    match n.digits {
        8 => NaiveDate::from_ymd_opt(
            (n.value / 10_000) as i32,
            n.value / 100 % 100,
            n.value % 100,
        ),
        6 => {
            let year = Number {
                value: n.value / 10_000,
                digits: 2,
            };
            NaiveDate::from_ymd_opt(expand_year(year, today), n.value / 100 % 100, n.value % 100)
        }
        1 | 2 if n.value <= 31 => NaiveDate::from_ymd_opt(today.year(), today.month(), n.value),
        2..=4 => NaiveDate::from_ymd_opt(expand_year(n, today), today.month(), today.day()),
        _ => None,
    }
}

/// Two-digit years land within 50 years of `today`.
fn expand_year(n: Number, today: NaiveDate) -> i32 {
    let value = n.value as i32;
    if n.digits > 2 || value >= 100 {
        return value;
    }
    let current = today.year();
    let mut year = value + current / 100 * 100;
    if year >= current + 50 {
        year -= 100;
    } else if year < current - 50 {
        year += 100;
    }
    year
}
