//! Date-math spans: compact relative offsets such as `3d`, `2w` or `1.5h`.
//!
//! A [`DateMath`] keeps the literal the user typed so it can be handed to a
//! search backend verbatim, and also knows how to shift a concrete
//! `NaiveDateTime` when the window has to be evaluated locally.

use std::fmt;
use std::str::FromStr;

use chrono::{Months, NaiveDateTime, TimeDelta};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DateWindowError, Result};

static DATE_MATH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)([yMwdhHms])$").expect("valid date math pattern"));

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
const MILLIS_PER_WEEK: i64 = 7 * MILLIS_PER_DAY;

// ── TimeUnit ────────────────────────────────────────────────────────────────

/// Unit letter of a date-math expression.
///
/// `h` and `H` both mean hours; the backend distinguishes them only when
/// rounding, so both are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    #[serde(rename = "y")]
    Years,
    #[serde(rename = "M")]
    Months,
    #[serde(rename = "w")]
    Weeks,
    #[serde(rename = "d")]
    Days,
    #[serde(rename = "h")]
    Hours12,
    #[serde(rename = "H")]
    Hours,
    #[serde(rename = "m")]
    Minutes,
    #[serde(rename = "s")]
    Seconds,
}

impl TimeUnit {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'y' => Some(TimeUnit::Years),
            'M' => Some(TimeUnit::Months),
            'w' => Some(TimeUnit::Weeks),
            'd' => Some(TimeUnit::Days),
            'h' => Some(TimeUnit::Hours12),
            'H' => Some(TimeUnit::Hours),
            'm' => Some(TimeUnit::Minutes),
            's' => Some(TimeUnit::Seconds),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            TimeUnit::Years => 'y',
            TimeUnit::Months => 'M',
            TimeUnit::Weeks => 'w',
            TimeUnit::Days => 'd',
            TimeUnit::Hours12 => 'h',
            TimeUnit::Hours => 'H',
            TimeUnit::Minutes => 'm',
            TimeUnit::Seconds => 's',
        }
    }

    /// Fixed length in milliseconds, `None` for calendar units (years, months).
    fn millis(self) -> Option<i64> {
        match self {
            TimeUnit::Years | TimeUnit::Months => None,
            TimeUnit::Weeks => Some(MILLIS_PER_WEEK),
            TimeUnit::Days => Some(MILLIS_PER_DAY),
            TimeUnit::Hours12 | TimeUnit::Hours => Some(MILLIS_PER_HOUR),
            TimeUnit::Minutes => Some(MILLIS_PER_MINUTE),
            TimeUnit::Seconds => Some(MILLIS_PER_SECOND),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

// ── Sign ────────────────────────────────────────────────────────────────────

/// Direction in which a span is applied to an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn symbol(self) -> char {
        match self {
            Sign::Plus => '+',
            Sign::Minus => '-',
        }
    }
}

// ── DateMath ────────────────────────────────────────────────────────────────

/// A relative span in the backend's date-math notation: `<number>[.<number>]<unit>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateMath {
    literal: String,
    amount: f64,
    unit: TimeUnit,
}

impl DateMath {
    /// The span a bare day count (`"5"`) stands for.
    pub fn days(count: u32) -> Self {
        Self {
            literal: count.to_string(),
            amount: f64::from(count),
            unit: TimeUnit::Days,
        }
    }

    /// Returns `true` if `text` has the shape `<digits>[.<digits>]<unit>`.
    pub fn is_match(text: &str) -> bool {
        DATE_MATH_PATTERN.is_match(text)
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0.0
    }

    /// Move `at` by this span in the direction of `sign`.
    ///
    /// Years and months are calendar-aware (`Jan 31 + 1M` is the last day of
    /// February); fractional calendar amounts are rounded to whole months.
    /// Every other unit is applied as an exact number of milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`DateWindowError::OutOfRange`] if the result is not
    /// representable.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use date_window::datemath::{DateMath, Sign};
    ///
    /// let at = NaiveDate::from_ymd_opt(2022, 1, 10).unwrap().and_hms_opt(0, 0, 0).unwrap();
    /// let span: DateMath = "1.5d".parse().unwrap();
    /// let shifted = span.shift(at, Sign::Minus).unwrap();
    /// assert_eq!(shifted.to_string(), "2022-01-08 12:00:00");
    /// ```
    pub fn shift(&self, at: NaiveDateTime, sign: Sign) -> Result<NaiveDateTime> {
        let shifted = match self.unit.millis() {
            None => {
                let months = match self.unit {
                    TimeUnit::Years => self.amount * 12.0,
                    _ => self.amount,
                };
                let months = Months::new(months.round() as u32);
                match sign {
                    Sign::Plus => at.checked_add_months(months),
                    Sign::Minus => at.checked_sub_months(months),
                }
            }
            Some(per_unit) => {
                let millis = (self.amount * per_unit as f64).round() as i64;
                TimeDelta::try_milliseconds(millis).and_then(|delta| match sign {
                    Sign::Plus => at.checked_add_signed(delta),
                    Sign::Minus => at.checked_sub_signed(delta),
                })
            }
        };

        shifted.ok_or_else(|| {
            DateWindowError::OutOfRange(format!("{} {}{}", at, sign.symbol(), self))
        })
    }
}

impl fmt::Display for DateMath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.literal, self.unit)
    }
}

impl FromStr for DateMath {
    type Err = DateWindowError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let invalid = || {
            DateWindowError::InvalidDateMath(format!(
                "'{trimmed}' (expected <number>[.<number>]<unit>, unit one of yMwdhHms)"
            ))
        };

        let caps = DATE_MATH_PATTERN.captures(trimmed).ok_or_else(invalid)?;
        let literal = caps[1].to_string();
        let amount: f64 = literal.parse().map_err(|_| invalid())?;
        let unit = caps[2]
            .chars()
            .next()
            .and_then(TimeUnit::from_letter)
            .ok_or_else(invalid)?;

        Ok(Self {
            literal,
            amount,
            unit,
        })
    }
}

impl TryFrom<String> for DateMath {
    type Error = DateWindowError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DateMath> for String {
    fn from(value: DateMath) -> Self {
        value.to_string()
    }
}
