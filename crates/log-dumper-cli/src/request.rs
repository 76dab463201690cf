//! The search request printed for the backend.

use std::collections::BTreeMap;

use date_window::ResolvedWindow;
use serde::Serialize;

use crate::cli::{Cli, Tier};

/// Field the time window is applied to.
pub const TIMESTAMP_FIELD: &str = "system.syslog.timestamp";

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RangeQuery {
    pub gte: String,
    pub lte: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl From<&ResolvedWindow> for RangeQuery {
    fn from(window: &ResolvedWindow) -> Self {
        let (gte, lte) = window.bounds();
        Self {
            gte,
            lte,
            format: window.format().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchRequest {
    pub index: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    pub range: BTreeMap<&'static str, RangeQuery>,
}

impl SearchRequest {
    pub fn new(cli: &Cli, window: &ResolvedWindow) -> Self {
        Self {
            index: wildcard(&cli.index),
            hosts: cli.hosts.iter().map(|h| wildcard(h)).collect(),
            source: cli.source.clone(),
            program: cli.program.clone(),
            tier: cli.tier,
            range: BTreeMap::from([(TIMESTAMP_FIELD, RangeQuery::from(window))]),
        }
    }
}

fn wildcard(pattern: &str) -> String {
    if pattern.ends_with('*') {
        pattern.to_string()
    } else {
        format!("{pattern}*")
    }
}
