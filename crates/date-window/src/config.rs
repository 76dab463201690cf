//! Resolver configuration.
//!
//! A [`ResolverConfig`] is an immutable value threaded into every resolution
//! call, so different locales can be resolved side by side.

use serde::{Deserialize, Serialize};

use crate::datemath::{DateMath, TimeUnit};
use crate::error::{DateWindowError, Result};
use crate::fuzzy::FieldOrder;

/// Largest bare integer read as a number of days.
pub const DEFAULT_RANGE_LIMIT: u32 = 30;

/// Separator between the parts of a date argument (`2022/01/01:2022/01/05`).
pub const DEFAULT_DELIMITER: char = ':';

/// Characters that already mean something inside a date token.
const RESERVED_DELIMITERS: &[char] = &['-', '/', '.', ',', '+'];

/// Which representation the resolved window is produced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Concrete, day-aligned timestamps.
    #[default]
    Timestamps,
    /// Backend range expressions (`2022/01/01||+3d/d`) plus a format string.
    Expressions,
}

/// Order of the year, month and day fields in a numeric date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    YearMonthDay,
    YearDayMonth,
    DayMonthYear,
    MonthDayYear,
}

impl DateOrder {
    /// Backend pattern for a date in this order, e.g. `yyyy/MM/dd`.
    pub fn backend_pattern(self) -> &'static str {
        match self {
            DateOrder::YearMonthDay => "yyyy/MM/dd",
            DateOrder::YearDayMonth => "yyyy/dd/MM",
            DateOrder::DayMonthYear => "dd/MM/yyyy",
            DateOrder::MonthDayYear => "MM/dd/yyyy",
        }
    }

    /// `chrono` format string equivalent to [`backend_pattern`](Self::backend_pattern).
    pub fn chrono_pattern(self) -> &'static str {
        match self {
            DateOrder::YearMonthDay => "%Y/%m/%d",
            DateOrder::YearDayMonth => "%Y/%d/%m",
            DateOrder::DayMonthYear => "%d/%m/%Y",
            DateOrder::MonthDayYear => "%m/%d/%Y",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Read `01/05` as 1 May rather than 5 January.
    pub day_first: bool,
    /// Read a leading two-digit field as the year.
    pub year_first: bool,
    /// Largest bare integer accepted as a day count.
    pub range_limit: u32,
    /// Window used when the argument gives neither dates nor a range.
    pub default_range: DateMath,
    pub mode: OutputMode,
    pub delimiter: char,
    /// Rounding applied to `now`-anchored expressions; `None` leaves them unrounded.
    pub now_rounding: Option<TimeUnit>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            day_first: false,
            year_first: false,
            range_limit: DEFAULT_RANGE_LIMIT,
            default_range: DateMath::days(0),
            mode: OutputMode::Timestamps,
            delimiter: DEFAULT_DELIMITER,
            now_rounding: Some(TimeUnit::Seconds),
        }
    }
}

impl ResolverConfig {
    /// Check that the delimiter cannot be confused with part of a date.
    ///
    /// # Errors
    ///
    /// Returns [`DateWindowError::InvalidConfig`] for alphanumeric, whitespace
    /// or date-separator delimiters.
    pub fn validate(&self) -> Result<()> {
        let d = self.delimiter;
        if d.is_alphanumeric() || d.is_whitespace() || RESERVED_DELIMITERS.contains(&d) {
            return Err(DateWindowError::InvalidConfig(format!(
                "delimiter '{d}' collides with date syntax"
            )));
        }
        Ok(())
    }

    pub fn field_order(&self) -> FieldOrder {
        FieldOrder {
            day_first: self.day_first,
            year_first: self.year_first,
        }
    }

    /// The order numeric dates are written in under this configuration.
    pub fn date_order(&self) -> DateOrder {
        match (self.year_first, self.day_first) {
            (true, true) => DateOrder::YearDayMonth,
            (true, false) => DateOrder::YearMonthDay,
            (false, true) => DateOrder::DayMonthYear,
            (false, false) => DateOrder::MonthDayYear,
        }
    }
}
