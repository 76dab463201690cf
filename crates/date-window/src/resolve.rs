//! The defaulting engine: turns filled roles into a window plan, then hands
//! the plan to the configured renderer.

use chrono::{Local, NaiveDateTime};

use crate::classify::Classifier;
use crate::config::ResolverConfig;
use crate::datemath::{DateMath, Sign};
use crate::error::Result;
use crate::fuzzy::ParsedDate;
use crate::render::{renderer_for, ResolvedWindow};
use crate::roles::{assign_roles, RawArgument, Roles};

// ── Window plan ─────────────────────────────────────────────────────────────

/// What a bound is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Now,
    At(ParsedDate),
}

/// One side of the window: an anchor, optionally moved by a span.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub anchor: Anchor,
    pub shift: Option<(Sign, DateMath)>,
}

impl Bound {
    fn at(anchor: Anchor) -> Self {
        Self {
            anchor,
            shift: None,
        }
    }

    fn shifted(anchor: Anchor, sign: Sign, span: &DateMath) -> Self {
        Self {
            anchor,
            shift: Some((sign, span.clone())),
        }
    }
}

/// Both sides of the window before rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowPlan {
    pub from: Bound,
    pub to: Bound,
}

// ── Defaulting ──────────────────────────────────────────────────────────────

/// Apply the defaulting rules to `roles`, most information first:
///
/// | from | to | range | window |
/// |---|---|---|---|
/// | set | set | any | `from`, `to` |
/// | set | - | set | `from`, `from + range` |
/// | - | set | set | `to - range`, `to` |
/// | set | - | - | `from`, `from` |
/// | - | set | - | `to`, `to` |
/// | - | - | set | `now - range`, `now` |
/// | - | - | - | `now - default_range`, `now` |
///
/// Two dates given in reverse order are swapped.
pub fn plan(roles: &Roles, config: &ResolverConfig) -> WindowPlan {
    match (roles.date_from, roles.date_to, roles.date_range.as_ref()) {
        (Some(from), Some(to), _) => {
            if roles.date_range.is_some() {
                log::debug!("Both dates given, ignoring date_range");
            }
            let (from, to) = if from.at > to.at {
                log::warn!(
                    "date_from {} is after date_to {}, swapping them",
                    from.at,
                    to.at
                );
                (to, from)
            } else {
                (from, to)
            };
            WindowPlan {
                from: Bound::at(Anchor::At(from)),
                to: Bound::at(Anchor::At(to)),
            }
        }
        (Some(from), None, Some(range)) => WindowPlan {
            from: Bound::at(Anchor::At(from)),
            to: Bound::shifted(Anchor::At(from), Sign::Plus, range),
        },
        (None, Some(to), Some(range)) => WindowPlan {
            from: Bound::shifted(Anchor::At(to), Sign::Minus, range),
            to: Bound::at(Anchor::At(to)),
        },
        (Some(from), None, None) => WindowPlan {
            from: Bound::at(Anchor::At(from)),
            to: Bound::at(Anchor::At(from)),
        },
        (None, Some(to), None) => WindowPlan {
            from: Bound::at(Anchor::At(to)),
            to: Bound::at(Anchor::At(to)),
        },
        (None, None, Some(range)) => WindowPlan {
            from: Bound::shifted(Anchor::Now, Sign::Minus, range),
            to: Bound::at(Anchor::Now),
        },
        (None, None, None) => WindowPlan {
            from: Bound::shifted(Anchor::Now, Sign::Minus, &config.default_range),
            to: Bound::at(Anchor::Now),
        },
    }
}

// ── Entry points ────────────────────────────────────────────────────────────

/// Resolve a date argument into a window, measuring relative parts from `now`.
///
/// Tokens that cannot be understood are logged and ignored; the window falls
/// back to the defaults for whatever roles stay empty.
///
/// # Errors
///
/// Returns [`DateWindowError::InvalidConfig`](crate::DateWindowError::InvalidConfig)
/// if `config` fails [`ResolverConfig::validate`], and
/// [`DateWindowError::OutOfRange`](crate::DateWindowError::OutOfRange)
/// if evaluating the window leaves the representable calendar.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use date_window::{resolve, RawArgument, ResolvedWindow, ResolverConfig};
///
/// let now = NaiveDate::from_ymd_opt(2022, 3, 15).unwrap().and_hms_opt(9, 30, 0).unwrap();
/// let raw = RawArgument::from("2022/01/01:2022/01/05");
///
/// match resolve(&raw, &ResolverConfig::default(), now).unwrap() {
///     ResolvedWindow::Timestamps { from, to } => {
///         assert_eq!(from.to_string(), "2022-01-01 00:00:00");
///         assert_eq!(to.to_string(), "2022-01-05 23:59:59.999999");
///     }
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub fn resolve(
    raw: &RawArgument,
    config: &ResolverConfig,
    now: NaiveDateTime,
) -> Result<ResolvedWindow> {
    config.validate()?;
    let classifier = Classifier::new(config, now.date());
    let roles = assign_roles(raw, &classifier, config.delimiter);
    let window_plan = plan(&roles, config);
    renderer_for(config).render(&window_plan, now)
}

/// [`resolve`] against the local wall clock.
pub fn resolve_now(raw: &RawArgument, config: &ResolverConfig) -> Result<ResolvedWindow> {
    resolve(raw, config, Local::now().naive_local())
}
