//! Renderers turning a [`WindowPlan`] into the shape a search backend consumes.
//!
//! - [`TimestampRenderer`] evaluates the plan and widens it to whole days.
//! - [`ExpressionRenderer`] leaves the arithmetic to the backend and emits
//!   date-math range expressions plus the format string for their literals.

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use serde::{Serialize, Serializer};

use crate::config::{DateOrder, OutputMode, ResolverConfig};
use crate::datemath::TimeUnit;
use crate::error::{DateWindowError, Result};
use crate::resolve::{Anchor, Bound, WindowPlan};

/// Layout of timestamps in serialized output (microsecond precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Separator between alternatives in a backend format, and between an
/// anchor date and its date math.
const ALTERNATION: &str = "||";

/// A resolved search window, ready for a range query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ResolvedWindow {
    /// Inclusive bounds spanning whole calendar days.
    Timestamps {
        #[serde(serialize_with = "serialize_timestamp")]
        from: NaiveDateTime,
        #[serde(serialize_with = "serialize_timestamp")]
        to: NaiveDateTime,
    },
    /// Backend range expressions and the format their date literals use.
    Expressions {
        from: String,
        to: String,
        format: String,
    },
}

impl ResolvedWindow {
    /// Lower and upper bound as the strings handed to the backend.
    pub fn bounds(&self) -> (String, String) {
        match self {
            ResolvedWindow::Timestamps { from, to } => (
                from.format(TIMESTAMP_FORMAT).to_string(),
                to.format(TIMESTAMP_FORMAT).to_string(),
            ),
            ResolvedWindow::Expressions { from, to, .. } => (from.clone(), to.clone()),
        }
    }

    /// The backend format string, for expression windows.
    pub fn format(&self) -> Option<&str> {
        match self {
            ResolvedWindow::Timestamps { .. } => None,
            ResolvedWindow::Expressions { format, .. } => Some(format),
        }
    }
}

fn serialize_timestamp<S: Serializer>(
    at: &NaiveDateTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&at.format(TIMESTAMP_FORMAT))
}

/// Strategy producing a [`ResolvedWindow`] from a plan.
pub trait RangeRenderer {
    fn render(&self, plan: &WindowPlan, now: NaiveDateTime) -> Result<ResolvedWindow>;
}

/// The renderer matching `config.mode`.
pub fn renderer_for(config: &ResolverConfig) -> Box<dyn RangeRenderer> {
    match config.mode {
        OutputMode::Timestamps => Box::new(TimestampRenderer),
        OutputMode::Expressions => Box::new(ExpressionRenderer {
            order: config.date_order(),
            now_rounding: config.now_rounding,
        }),
    }
}

// ── Timestamps ──────────────────────────────────────────────────────────────

/// Evaluates the plan locally; `from` snaps to the start of its day and `to`
/// to the last microsecond of its day.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampRenderer;

impl TimestampRenderer {
    fn evaluate(bound: &Bound, now: NaiveDateTime) -> Result<NaiveDateTime> {
        let base = match bound.anchor {
            Anchor::Now => now,
            Anchor::At(parsed) => parsed.at,
        };
        match &bound.shift {
            Some((sign, span)) => span.shift(base, *sign),
            None => Ok(base),
        }
    }
}

impl RangeRenderer for TimestampRenderer {
    fn render(&self, plan: &WindowPlan, now: NaiveDateTime) -> Result<ResolvedWindow> {
        let from = Self::evaluate(&plan.from, now)?.date().and_time(NaiveTime::MIN);
        let to_day = Self::evaluate(&plan.to, now)?.date();
        let to = to_day
            .and_hms_micro_opt(23, 59, 59, 999_999)
            .ok_or_else(|| DateWindowError::OutOfRange(format!("end of {to_day}")))?;

        log::info!("Searching logs from {} to {}.", from, to);
        Ok(ResolvedWindow::Timestamps { from, to })
    }
}

// ── Expressions ─────────────────────────────────────────────────────────────

/// Renders each bound as `<date>||<offset>` or `now<offset>`, rounded so
/// date-only bounds cover whole days.
#[derive(Debug, Clone, Copy)]
pub struct ExpressionRenderer {
    pub order: DateOrder,
    pub now_rounding: Option<TimeUnit>,
}

impl ExpressionRenderer {
    /// Date, date with time, and date with millisecond time, e.g.
    /// `yyyy/MM/dd||yyyy/MM/dd HH:mm:ss||yyyy/MM/dd HH:mm:ss.SSS`.
    pub fn format_string(&self) -> String {
        let date = self.order.backend_pattern();
        format!("{date}{ALTERNATION}{date} HH:mm:ss{ALTERNATION}{date} HH:mm:ss.SSS")
    }

    fn render_bound(&self, bound: &Bound) -> String {
        let mut rendered = match bound.anchor {
            Anchor::Now => String::from("now"),
            Anchor::At(parsed) => {
                // Sub-millisecond digits are dropped.
                let pattern = if parsed.at.nanosecond() != 0 {
                    format!("{} %H:%M:%S%.3f", self.order.chrono_pattern())
                } else if parsed.has_time {
                    format!("{} %H:%M:%S", self.order.chrono_pattern())
                } else {
                    self.order.chrono_pattern().to_string()
                };
                format!("{}{ALTERNATION}", parsed.at.format(&pattern))
            }
        };

        if let Some((sign, span)) = &bound.shift {
            if !span.is_zero() {
                rendered.push(sign.symbol());
                rendered.push_str(&span.to_string());
            }
        }

        if rendered.contains("now") {
            if let Some(unit) = self.now_rounding {
                rendered.push('/');
                rendered.push(unit.letter());
            }
        } else if !rendered.contains(':') {
            rendered.push_str("/d");
        }

        rendered
    }
}

impl RangeRenderer for ExpressionRenderer {
    fn render(&self, plan: &WindowPlan, _now: NaiveDateTime) -> Result<ResolvedWindow> {
        let from = self.render_bound(&plan.from);
        let to = self.render_bound(&plan.to);

        log::info!("Searching logs from {} to {}.", from, to);
        Ok(ResolvedWindow::Expressions {
            from,
            to,
            format: self.format_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datemath::{DateMath, Sign};
    use crate::fuzzy::ParsedDate;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 3, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn at(y: i32, m: u32, d: u32, time: Option<(u32, u32)>) -> Anchor {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let (h, min) = time.unwrap_or((0, 0));
        Anchor::At(ParsedDate {
            at: date.and_hms_opt(h, min, 0).unwrap(),
            has_time: time.is_some(),
        })
    }

    fn bound(anchor: Anchor, shift: Option<(Sign, &str)>) -> Bound {
        Bound {
            anchor,
            shift: shift.map(|(sign, span)| (sign, span.parse::<DateMath>().unwrap())),
        }
    }

    fn ymd_expressions() -> ExpressionRenderer {
        ExpressionRenderer {
            order: DateOrder::YearMonthDay,
            now_rounding: Some(TimeUnit::Seconds),
        }
    }

    #[test]
    fn test_timestamps_snap_to_whole_days() {
        let plan = WindowPlan {
            from: bound(at(2022, 1, 1, Some((10, 15))), None),
            to: bound(at(2022, 1, 1, Some((10, 15))), Some((Sign::Plus, "2d"))),
        };
        let window = TimestampRenderer.render(&plan, now()).unwrap();
        let (from, to) = window.bounds();
        assert_eq!(from, "2022-01-01T00:00:00.000000");
        assert_eq!(to, "2022-01-03T23:59:59.999999");
        assert_eq!(window.format(), None);
    }

    #[test]
    fn test_timestamps_now_anchor() {
        let plan = WindowPlan {
            from: bound(Anchor::Now, Some((Sign::Minus, "3d"))),
            to: bound(Anchor::Now, None),
        };
        let (from, to) = TimestampRenderer.render(&plan, now()).unwrap().bounds();
        assert_eq!(from, "2022-03-12T00:00:00.000000");
        assert_eq!(to, "2022-03-15T23:59:59.999999");
    }

    #[test]
    fn test_timestamps_overflow_is_an_error() {
        let plan = WindowPlan {
            from: bound(at(2022, 1, 1, None), None),
            to: bound(at(2022, 1, 1, None), Some((Sign::Plus, "999999999y"))),
        };
        assert!(TimestampRenderer.render(&plan, now()).is_err());
    }

    #[test]
    fn test_expression_date_bounds_round_to_day() {
        let plan = WindowPlan {
            from: bound(at(2022, 1, 1, None), None),
            to: bound(at(2022, 1, 1, None), Some((Sign::Plus, "3d"))),
        };
        let window = ymd_expressions().render(&plan, now()).unwrap();
        assert_eq!(
            window,
            ResolvedWindow::Expressions {
                from: "2022/01/01||/d".to_string(),
                to: "2022/01/01||+3d/d".to_string(),
                format: "yyyy/MM/dd||yyyy/MM/dd HH:mm:ss||yyyy/MM/dd HH:mm:ss.SSS".to_string(),
            }
        );
    }

    #[test]
    fn test_expression_with_time_is_not_rounded() {
        let plan = WindowPlan {
            from: bound(at(2022, 1, 1, Some((8, 0))), Some((Sign::Minus, "1.5h"))),
            to: bound(at(2022, 1, 1, Some((8, 0))), None),
        };
        let (from, to) = ymd_expressions().render(&plan, now()).unwrap().bounds();
        assert_eq!(from, "2022/01/01 08:00:00||-1.5h");
        assert_eq!(to, "2022/01/01 08:00:00||");
    }

    #[test]
    fn test_expression_keeps_fractional_seconds() {
        let at = NaiveDate::from_ymd_opt(2022, 1, 1)
            .unwrap()
            .and_hms_milli_opt(10, 0, 0, 500)
            .unwrap();
        let base = Anchor::At(ParsedDate { at, has_time: true });
        let plan = WindowPlan {
            from: bound(base, None),
            to: bound(base, Some((Sign::Plus, "1h"))),
        };
        let window = ymd_expressions().render(&plan, now()).unwrap();
        let (from, to) = window.bounds();
        assert_eq!(from, "2022/01/01 10:00:00.500||");
        assert_eq!(to, "2022/01/01 10:00:00.500||+1h");
        assert!(window.format().unwrap().ends_with("||yyyy/MM/dd HH:mm:ss.SSS"));
    }

    #[test]
    fn test_expression_now_bounds() {
        let plan = WindowPlan {
            from: bound(Anchor::Now, Some((Sign::Minus, "5d"))),
            to: bound(Anchor::Now, None),
        };
        let (from, to) = ymd_expressions().render(&plan, now()).unwrap().bounds();
        assert_eq!(from, "now-5d/s");
        assert_eq!(to, "now/s");

        let unrounded = ExpressionRenderer {
            now_rounding: None,
            ..ymd_expressions()
        };
        let (from, to) = unrounded.render(&plan, now()).unwrap().bounds();
        assert_eq!(from, "now-5d");
        assert_eq!(to, "now");
    }

    #[test]
    fn test_expression_zero_span_has_no_offset() {
        let plan = WindowPlan {
            from: bound(Anchor::Now, Some((Sign::Minus, "0d"))),
            to: bound(Anchor::Now, None),
        };
        let (from, _) = ymd_expressions().render(&plan, now()).unwrap().bounds();
        assert_eq!(from, "now/s");
    }

    #[test]
    fn test_expression_literals_follow_date_order() {
        let plan = WindowPlan {
            from: bound(at(2022, 1, 5, None), None),
            to: bound(at(2022, 1, 5, None), None),
        };
        let cases = [
            (DateOrder::DayMonthYear, "05/01/2022||/d", "dd/MM/yyyy||dd/MM/yyyy HH:mm:ss||dd/MM/yyyy HH:mm:ss.SSS"),
            (DateOrder::MonthDayYear, "01/05/2022||/d", "MM/dd/yyyy||MM/dd/yyyy HH:mm:ss||MM/dd/yyyy HH:mm:ss.SSS"),
            (DateOrder::YearDayMonth, "2022/05/01||/d", "yyyy/dd/MM||yyyy/dd/MM HH:mm:ss||yyyy/dd/MM HH:mm:ss.SSS"),
        ];
        for (order, expected_from, expected_format) in cases {
            let renderer = ExpressionRenderer {
                order,
                now_rounding: None,
            };
            let window = renderer.render(&plan, now()).unwrap();
            assert_eq!(window.bounds().0, expected_from);
            assert_eq!(window.format(), Some(expected_format));
        }
    }

    #[test]
    fn test_serialized_timestamps_use_microseconds() {
        let window = ResolvedWindow::Timestamps {
            from: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            to: NaiveDate::from_ymd_opt(2022, 1, 1)
                .unwrap()
                .and_hms_micro_opt(23, 59, 59, 999_999)
                .unwrap(),
        };
        let json = serde_json::to_value(&window).unwrap();
        assert_eq!(json["mode"], "timestamps");
        assert_eq!(json["from"], "2022-01-01T00:00:00.000000");
        assert_eq!(json["to"], "2022-01-01T23:59:59.999999");
    }

    #[test]
    fn test_renderer_for_follows_mode() {
        let plan = WindowPlan {
            from: bound(Anchor::Now, None),
            to: bound(Anchor::Now, None),
        };
        let config = ResolverConfig {
            mode: OutputMode::Expressions,
            ..Default::default()
        };
        let window = renderer_for(&config).render(&plan, now()).unwrap();
        assert!(window.format().is_some());

        let window = renderer_for(&ResolverConfig::default()).render(&plan, now()).unwrap();
        assert!(matches!(window, ResolvedWindow::Timestamps { .. }));
    }
}
