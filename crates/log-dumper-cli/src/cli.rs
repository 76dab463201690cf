use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Parser, ValueEnum};
use date_window::OutputMode;
use serde::Serialize;

/// Search syslog entries in a time window
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Index to search; a trailing `*` is added.
    pub index: String,

    /// Date argument: `FROM`, `FROM:TO`, `FROM:DAYS`, `DAYS:TO` or `DAYS`
    /// (e.g. `-d 2022/01/01:5`). Without it, today's entries are searched.
    #[arg(short = 'd', value_name = "DATE_ARG", allow_hyphen_values = true)]
    pub date: Option<String>,

    /// Hostnames to match; each gets a trailing `*`.
    #[arg(short = 'n', value_name = "HOSTNAME", num_args(1..))]
    pub hosts: Vec<String>,

    /// Only entries logged by this program.
    #[arg(short = 'p', value_name = "PROGRAM")]
    pub program: Option<String>,

    /// Log file the entries were shipped from.
    #[arg(short = 's', value_name = "PATH/TO/LOG", default_value = "/var/log/messages")]
    pub source: String,

    /// Only entries from servers of this tier.
    #[arg(short = 't', value_enum, value_name = "SERVER TIER")]
    pub tier: Option<Tier>,

    /// Configuration file (TOML, `[dates]` table).
    #[arg(long, env = "LOG_DUMPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read `01/02` as 1 February.
    #[arg(long, overrides_with = "no_day_first")]
    pub day_first: bool,

    /// Read `01/02` as 2 January, whatever the config file says.
    #[arg(long, overrides_with = "day_first")]
    pub no_day_first: bool,

    /// Read a leading two-digit field as the year.
    #[arg(long, overrides_with = "no_year_first")]
    pub year_first: bool,

    /// Do not read a leading two-digit field as the year.
    #[arg(long, overrides_with = "year_first")]
    pub no_year_first: bool,

    /// Largest bare number accepted as a count of days.
    #[arg(long, value_name = "DAYS")]
    pub range_limit: Option<u32>,

    /// Emit backend date-math expressions instead of timestamps.
    #[arg(long, overrides_with = "timestamps")]
    pub expressions: bool,

    /// Emit whole-day timestamps, whatever the config file says.
    #[arg(long, overrides_with = "expressions")]
    pub timestamps: bool,

    /// Resolve relative dates against this instant (`YYYY-MM-DDTHH:MM:SS`) instead of the clock.
    #[arg(long, value_name = "DATETIME", value_parser = parse_now)]
    pub now: Option<NaiveDateTime>,

    /// Log debug output to the terminal.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// `Some(true)` for `--day-first`, `Some(false)` for `--no-day-first`.
    pub fn day_first(&self) -> Option<bool> {
        switch(self.day_first, self.no_day_first)
    }

    pub fn year_first(&self) -> Option<bool> {
        switch(self.year_first, self.no_year_first)
    }

    pub fn mode(&self) -> Option<OutputMode> {
        match switch(self.expressions, self.timestamps)? {
            true => Some(OutputMode::Expressions),
            false => Some(OutputMode::Timestamps),
        }
    }
}

/// Later flag of an on/off pair wins; clap clears the other one.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[derive(ValueEnum, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Live,
    Dev,
    Test,
}

fn parse_now(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").map_err(|e| format!("'{s}': {e}"))
}
