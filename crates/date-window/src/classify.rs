//! Token classification.
//!
//! Each token of a date argument is tested against an ordered list of rules;
//! the first rule that recognizes it decides its [`TokenKind`]. The list is
//! built once per resolution from the configuration: the date-math rule only
//! exists when the output is backend expressions.

use chrono::NaiveDate;

use crate::config::{OutputMode, ResolverConfig};
use crate::datemath::DateMath;
use crate::fuzzy::{parse_fuzzy, FieldOrder, ParsedDate};

/// What a single token was recognized as.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A bare day count no larger than the range limit.
    RelativeCount(u32),
    /// A backend date-math span such as `2w` or `1.5h`.
    DateMath(DateMath),
    /// A calendar date, possibly with a time of day.
    AbsoluteDate(ParsedDate),
    Unrecognized,
}

type Rule = fn(&Classifier, &str) -> Option<TokenKind>;

pub struct Classifier {
    range_limit: u32,
    order: FieldOrder,
    today: NaiveDate,
    rules: Vec<Rule>,
}

impl Classifier {
    /// Build the rule list for `config`. `today` fills in date components a
    /// token leaves out.
    pub fn new(config: &ResolverConfig, today: NaiveDate) -> Self {
        let mut rules: Vec<Rule> = vec![relative_count];
        if config.mode == OutputMode::Expressions {
            rules.push(date_math);
        }
        rules.push(absolute_date);

        Self {
            range_limit: config.range_limit,
            order: config.field_order(),
            today,
            rules,
        }
    }

    /// Classify one token.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use date_window::classify::{Classifier, TokenKind};
    /// use date_window::ResolverConfig;
    ///
    /// let today = NaiveDate::from_ymd_opt(2022, 3, 15).unwrap();
    /// let classifier = Classifier::new(&ResolverConfig::default(), today);
    ///
    /// assert_eq!(classifier.classify("7"), TokenKind::RelativeCount(7));
    /// assert!(matches!(classifier.classify("2022/01/01"), TokenKind::AbsoluteDate(_)));
    /// assert_eq!(classifier.classify("bogus"), TokenKind::Unrecognized);
    /// ```
    pub fn classify(&self, token: &str) -> TokenKind {
        self.rules
            .iter()
            .find_map(|rule| rule(self, token))
            .unwrap_or(TokenKind::Unrecognized)
    }
}

fn relative_count(classifier: &Classifier, token: &str) -> Option<TokenKind> {
    let count: u32 = token.parse().ok()?;
    if count <= classifier.range_limit {
        Some(TokenKind::RelativeCount(count))
    } else {
        log::debug!(
            "'{}' exceeds the range limit of {} days, trying it as a date",
            token,
            classifier.range_limit
        );
        None
    }
}

fn date_math(_: &Classifier, token: &str) -> Option<TokenKind> {
    token.parse().ok().map(TokenKind::DateMath)
}

fn absolute_date(classifier: &Classifier, token: &str) -> Option<TokenKind> {
    parse_fuzzy(token, classifier.order, classifier.today).map(TokenKind::AbsoluteDate)
}
