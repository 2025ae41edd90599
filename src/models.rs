use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub roll_number: String,
    pub cgpa: Option<f64>,
    pub backlog_count: u32,
    pub leetcode_url: Option<String>,
    pub hackerrank_url: Option<String>,
    /// Every cell of the source row, in roster column order, with the
    /// numeric columns already normalized.
    pub source_fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeStats {
    pub total_solved: Option<f64>,
    pub easy_solved: Option<f64>,
    pub medium_solved: Option<f64>,
    pub hard_solved: Option<f64>,
    pub acceptance_rate: Option<f64>,
    pub ranking: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatsResult {
    Ok(LeetCodeStats),
    Err { message: String },
}

impl StatsResult {
    pub fn err(message: impl Into<String>) -> Self {
        Self::Err {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    #[serde(rename = "Badge Name")]
    pub name: String,
    #[serde(rename = "Stars")]
    pub stars: u8,
}

/// Outcome of looking up one external profile for a student.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileFetch<T> {
    /// The roster link is blank, points elsewhere, or names a placeholder page.
    NoUrl,
    Fetched { username: String, result: T },
}

#[derive(Debug, Clone)]
pub struct EnrichedRecord {
    pub student: StudentRecord,
    pub leetcode: ProfileFetch<StatsResult>,
    pub hackerrank: ProfileFetch<Option<Vec<Badge>>>,
    pub fetched_at: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Success,
    Failed,
    Error,
    NoBadgesFound,
    NoUrl,
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FetchStatus::Success => "Success",
            FetchStatus::Failed => "Failed",
            FetchStatus::Error => "Error",
            FetchStatus::NoBadgesFound => "No Badges Found",
            FetchStatus::NoUrl => "No URL",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
pub struct BulkRow {
    pub student: StudentRecord,
    pub stats: Option<LeetCodeStats>,
    pub leetcode_status: FetchStatus,
    pub badges: Vec<Badge>,
    pub hackerrank_status: FetchStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkSummary {
    pub total_students: usize,
    pub leetcode_success: usize,
    pub hackerrank_success: usize,
    pub avg_cgpa: f64,
    pub students_with_backlogs: usize,
}

#[derive(Debug, Clone)]
pub struct BulkReport {
    pub columns: Vec<String>,
    pub rows: Vec<BulkRow>,
    pub summary: BulkSummary,
    pub generated_at: DateTime<Local>,
}
