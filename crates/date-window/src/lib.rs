//! # date-window
//!
//! Turns the compact date argument of a log search (`-d 2022/01/01:5`) into
//! a concrete, inclusive search window.
//!
//! An argument is split on a delimiter (`:` by default) and each token is
//! classified as a bare day count, a date-math span (`2w`, `1.5h`) or an
//! absolute date parsed with the configured day-first / year-first
//! conventions. Tokens are assigned the roles *from*, *to* and *range*,
//! missing roles are filled by a fixed defaulting table, and the resulting
//! plan is rendered either as whole-day timestamps or as backend date-math
//! expressions.
//!
//! Nothing in this crate reads the clock except [`resolve_now`]; every other
//! entry point takes `now` explicitly.
//!
//! ## Modules
//!
//! - [`classify`] — Ordered rules deciding what each token is
//! - [`config`] — Locale flags, range limit, default range, output mode
//! - [`datemath`] — `<number><unit>` spans and calendar arithmetic
//! - [`fuzzy`] — Lenient absolute date parsing
//! - [`roles`] — Tokenizing and role assignment
//! - [`resolve`] — Defaulting table and entry points
//! - [`render`] — Timestamp and expression renderers
//! - [`error`] — Error types

pub mod classify;
pub mod config;
pub mod datemath;
pub mod error;
pub mod fuzzy;
pub mod render;
pub mod resolve;
pub mod roles;

pub use classify::{Classifier, TokenKind};
pub use config::{DateOrder, OutputMode, ResolverConfig};
pub use datemath::{DateMath, Sign, TimeUnit};
pub use error::DateWindowError;
pub use fuzzy::{parse_fuzzy, FieldOrder, ParsedDate};
pub use render::{
    renderer_for, ExpressionRenderer, RangeRenderer, ResolvedWindow, TimestampRenderer,
};
pub use resolve::{plan, resolve, resolve_now, Anchor, Bound, WindowPlan};
pub use roles::{assign_roles, tokenize, RawArgument, Roles};
