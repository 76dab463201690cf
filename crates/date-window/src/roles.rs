//! Splitting a date argument into tokens and assigning each token a role.

use crate::classify::{Classifier, TokenKind};
use crate::datemath::DateMath;
use crate::fuzzy::ParsedDate;

/// The date argument exactly as the caller received it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RawArgument {
    /// No date argument given; resolves to the default window.
    #[default]
    Absent,
    /// A single string still to be split on the configured delimiter.
    Text(String),
    /// Tokens the caller already split.
    Tokens(Vec<String>),
}

impl From<Option<String>> for RawArgument {
    fn from(value: Option<String>) -> Self {
        value.map_or(RawArgument::Absent, RawArgument::Text)
    }
}

impl From<&str> for RawArgument {
    fn from(value: &str) -> Self {
        RawArgument::Text(value.to_string())
    }
}

impl From<Vec<String>> for RawArgument {
    fn from(value: Vec<String>) -> Self {
        RawArgument::Tokens(value)
    }
}

/// Tokens of `raw`, trimmed. Absent or blank text yields no tokens.
pub fn tokenize(raw: &RawArgument, delimiter: char) -> Vec<String> {
    match raw {
        RawArgument::Absent => Vec::new(),
        RawArgument::Text(text) if text.trim().is_empty() => Vec::new(),
        RawArgument::Text(text) => text.split(delimiter).map(|t| t.trim().to_string()).collect(),
        RawArgument::Tokens(tokens) => tokens.iter().map(|t| t.trim().to_string()).collect(),
    }
}

/// Roles filled from a date argument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roles {
    pub date_from: Option<ParsedDate>,
    pub date_to: Option<ParsedDate>,
    pub date_range: Option<DateMath>,
    /// Tokens that matched no rule, in input order.
    pub unrecognized: Vec<String>,
}

impl Roles {
    pub fn is_empty(&self) -> bool {
        self.date_from.is_none() && self.date_to.is_none() && self.date_range.is_none()
    }
}

/// Classify every token of `raw` and assign it a role.
///
/// A range (day count or date math) wins over position; otherwise a date in
/// first position is the lower bound and any later date the upper bound. When
/// two tokens compete for the same role, the later one wins.
pub fn assign_roles(raw: &RawArgument, classifier: &Classifier, delimiter: char) -> Roles {
    let mut roles = Roles::default();

    if let RawArgument::Text(text) = raw {
        log::debug!("Parsing date arguments from '{}'", text);
    }

    let tokens = tokenize(raw, delimiter);
    if tokens.is_empty() {
        log::info!("No date argument given");
        return roles;
    }

    for (idx, token) in tokens.iter().enumerate() {
        match classifier.classify(token) {
            TokenKind::RelativeCount(count) => {
                log::info!("Found date_range: '{}'", count);
                roles.date_range = Some(DateMath::days(count));
            }
            TokenKind::DateMath(span) => {
                log::info!("Found date_range: '{}'", span);
                roles.date_range = Some(span);
            }
            TokenKind::AbsoluteDate(parsed) if idx == 0 => {
                log::info!("Found date_from: '{}'", token);
                roles.date_from = Some(parsed);
            }
            TokenKind::AbsoluteDate(parsed) => {
                log::info!("Found date_to: '{}'", token);
                roles.date_to = Some(parsed);
            }
            TokenKind::Unrecognized => {
                log::error!("Could not parse '{}'.", token);
                roles.unrecognized.push(token.clone());
            }
        }
    }

    roles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutputMode, ResolverConfig};
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 3, 15).unwrap()
    }

    fn roles_for(raw: impl Into<RawArgument>, mode: OutputMode) -> Roles {
        let config = ResolverConfig {
            mode,
            year_first: true,
            ..Default::default()
        };
        let classifier = Classifier::new(&config, today());
        assign_roles(&raw.into(), &classifier, config.delimiter)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_tokenize_variants() {
        assert!(tokenize(&RawArgument::Absent, ':').is_empty());
        assert!(tokenize(&"   ".into(), ':').is_empty());
        assert_eq!(tokenize(&"a: b :c".into(), ':'), vec!["a", "b", "c"]);
        assert_eq!(tokenize(&"a|b".into(), '|'), vec!["a", "b"]);
        let pre: RawArgument = vec!["2022/01/01 10:00".to_string()].into();
        assert_eq!(tokenize(&pre, ':'), vec!["2022/01/01 10:00"]);
    }

    #[test]
    fn test_absent_argument_fills_nothing() {
        let roles = roles_for(None::<String>, OutputMode::Timestamps);
        assert!(roles.is_empty());
        assert!(roles.unrecognized.is_empty());
    }

    #[test]
    fn test_first_date_is_from_later_date_is_to() {
        let roles = roles_for("2022/01/01:2022/01/05", OutputMode::Timestamps);
        assert_eq!(roles.date_from.unwrap().at.date(), day(2022, 1, 1));
        assert_eq!(roles.date_to.unwrap().at.date(), day(2022, 1, 5));
        assert!(roles.date_range.is_none());
    }

    #[test]
    fn test_range_in_first_position_makes_date_an_upper_bound() {
        let roles = roles_for("5:2022/01/05", OutputMode::Timestamps);
        assert!(roles.date_from.is_none());
        assert_eq!(roles.date_to.unwrap().at.date(), day(2022, 1, 5));
        assert_eq!(roles.date_range, Some(DateMath::days(5)));
    }

    #[test]
    fn test_date_math_range_in_expression_mode() {
        let roles = roles_for("2022/01/01:2w", OutputMode::Expressions);
        assert_eq!(roles.date_from.unwrap().at.date(), day(2022, 1, 1));
        assert_eq!(roles.date_range.unwrap().to_string(), "2w");
    }

    #[test]
    fn test_unrecognized_tokens_are_collected_and_skipped() {
        let roles = roles_for("notadate:3", OutputMode::Timestamps);
        assert_eq!(roles.unrecognized, vec!["notadate"]);
        assert_eq!(roles.date_range, Some(DateMath::days(3)));
        // The lone date after a junk first token is still an upper bound.
        let roles = roles_for("junk:2022/01/05", OutputMode::Timestamps);
        assert!(roles.date_from.is_none());
        assert_eq!(roles.date_to.unwrap().at.date(), day(2022, 1, 5));
    }

    #[test]
    fn test_empty_token_between_delimiters_is_unrecognized() {
        let roles = roles_for("2022/01/01::3", OutputMode::Timestamps);
        assert_eq!(roles.unrecognized, vec![""]);
        assert!(roles.date_from.is_some());
    }

    // Last-wins is kept for compatibility; whether it is intended is unclear.
    #[test]
    fn test_competing_tokens_last_one_wins() {
        let roles = roles_for("2022/01/01:2022/01/05:2022/01/09", OutputMode::Timestamps);
        assert_eq!(roles.date_to.unwrap().at.date(), day(2022, 1, 9));

        let roles = roles_for("3:2w:1d", OutputMode::Expressions);
        assert_eq!(roles.date_range.unwrap().to_string(), "1d");
    }
}
