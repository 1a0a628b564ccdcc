use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Headline totals for the whole project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsOverview {
    #[serde(default)]
    pub users: u64,
    #[serde(default)]
    pub sessions: u64,
    #[serde(default)]
    pub events: u64,
}

/// Daily counts for a single resource family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub total: u64,
    #[serde(default)]
    pub timeline: Vec<AnalyticsPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsPoint {
    pub date: NaiveDate,
    pub count: u64,
}
