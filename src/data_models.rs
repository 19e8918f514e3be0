use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_KEYWORDS: &str = "AI,ChatGPT";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_COUNTRY: &str = "US";

/// Padding term for the upstream call, which rejects single-keyword comparisons.
pub const FILLER_KEYWORD: &str = "news";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    LastHour,
    LastFourHours,
    LastDay,
    #[default]
    LastWeek,
    LastMonth,
    LastThreeMonths,
    LastYear,
    LastFiveYears,
    All,
}

impl Timeframe {
    pub const ALL: [Timeframe; 9] = [
        Timeframe::LastHour,
        Timeframe::LastFourHours,
        Timeframe::LastDay,
        Timeframe::LastWeek,
        Timeframe::LastMonth,
        Timeframe::LastThreeMonths,
        Timeframe::LastYear,
        Timeframe::LastFiveYears,
        Timeframe::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::LastHour => "now 1-H",
            Timeframe::LastFourHours => "now 4-H",
            Timeframe::LastDay => "now 1-d",
            Timeframe::LastWeek => "now 7-d",
            Timeframe::LastMonth => "today 1-m",
            Timeframe::LastThreeMonths => "today 3-m",
            Timeframe::LastYear => "today 12-m",
            Timeframe::LastFiveYears => "today 5-y",
            Timeframe::All => "all",
        }
    }

    pub fn valid_options() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTimeframe(pub String);

impl FromStr for Timeframe {
    type Err = InvalidTimeframe;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| InvalidTimeframe(s.to_string()))
    }
}

/// Split a comma-separated keyword list, trimming and dropping empties.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|kw| kw.trim())
        .filter(|kw| !kw.is_empty())
        .map(|kw| kw.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedQueryEntry {
    pub query: String,
    pub value: i64,
}

impl RelatedQueryEntry {
    pub fn new(query: impl Into<String>, value: i64) -> Self {
        RelatedQueryEntry {
            query: query.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedQueryResult {
    pub top: Vec<RelatedQueryEntry>,
    pub rising: Vec<RelatedQueryEntry>,
}

impl RelatedQueryResult {
    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.rising.is_empty()
    }
}

pub type TrendsResponse = BTreeMap<String, RelatedQueryResult>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendRequest {
    pub keywords: Vec<String>,
    pub timeframe: Timeframe,
    pub language: String,
    pub country: String,
}

impl TrendRequest {
    /// Keywords as sent upstream, padded with [`FILLER_KEYWORD`] when fewer than two.
    pub fn upstream_keywords(&self) -> Vec<String> {
        let mut keywords = self.keywords.clone();
        while keywords.len() < 2 {
            keywords.push(FILLER_KEYWORD.to_string());
        }
        keywords
    }

    pub fn locale(&self) -> String {
        format!("{}-{}", self.language, self.country)
    }
}
