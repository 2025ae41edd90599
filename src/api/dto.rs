use serde::Serialize;

use crate::models::{
    Badge, BulkSummary, EnrichedRecord, LeetCodeStats, ProfileFetch, StatsResult, StudentRecord,
};
use crate::profile::has_profile_link;
use crate::report;
use crate::settings::{Settings, HACKERRANK_HOST, LEETCODE_HOST};

#[derive(Debug, Serialize)]
pub struct StudentInfo {
    pub roll_number: String,
    pub cgpa: Option<f64>,
    pub total_backlogs: u32,
    pub leetcode_url: String,
    pub hackerrank_url: String,
}

impl From<&StudentRecord> for StudentInfo {
    fn from(student: &StudentRecord) -> Self {
        Self {
            roll_number: student.roll_number.clone(),
            cgpa: student.cgpa,
            total_backlogs: student.backlog_count,
            leetcode_url: student.leetcode_url.clone().unwrap_or_default(),
            hackerrank_url: student.hackerrank_url.clone().unwrap_or_default(),
        }
    }
}

/// `{"success": ..., "data"?: ..., "error"?: ...}` envelope for one source.
#[derive(Debug, Serialize)]
pub struct SourceView<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> SourceView<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn unavailable() -> Self {
        Self {
            success: false,
            data: None,
            error: None,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HackerRankData {
    pub badges: Vec<Badge>,
    pub total_badges: usize,
    pub total_stars: u32,
    pub badge_image_url: String,
}

/// GET /api/student/{roll} response
#[derive(Debug, Serialize)]
pub struct StudentResponse {
    pub student_info: StudentInfo,
    pub leetcode: SourceView<LeetCodeStats>,
    pub hackerrank: SourceView<HackerRankData>,
    pub timestamp: String,
}

impl StudentResponse {
    pub fn from_record(record: EnrichedRecord, settings: &Settings) -> Self {
        let leetcode = match record.leetcode {
            ProfileFetch::Fetched {
                result: StatsResult::Ok(stats),
                ..
            } => SourceView::ok(stats),
            ProfileFetch::Fetched {
                result: StatsResult::Err { message },
                ..
            } => SourceView::failed(message),
            ProfileFetch::NoUrl => SourceView::unavailable(),
        };

        let hackerrank = match record.hackerrank {
            ProfileFetch::Fetched {
                username,
                result: Some(badges),
            } if !badges.is_empty() => SourceView::ok(HackerRankData {
                total_badges: badges.len(),
                total_stars: report::total_stars(&badges),
                badge_image_url: settings.badge_image_url(&username),
                badges,
            }),
            _ => SourceView::unavailable(),
        };

        Self {
            student_info: StudentInfo::from(&record.student),
            leetcode,
            hackerrank,
            timestamp: record.fetched_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StudentListing {
    pub roll_number: String,
    pub cgpa: Option<f64>,
    pub total_backlogs: u32,
    pub has_leetcode: bool,
    pub has_hackerrank: bool,
}

impl From<&StudentRecord> for StudentListing {
    fn from(student: &StudentRecord) -> Self {
        Self {
            roll_number: student.roll_number.clone(),
            cgpa: student.cgpa,
            total_backlogs: student.backlog_count,
            has_leetcode: has_profile_link(student.leetcode_url.as_deref(), LEETCODE_HOST),
            has_hackerrank: has_profile_link(student.hackerrank_url.as_deref(), HACKERRANK_HOST),
        }
    }
}

/// GET /api/students response
#[derive(Debug, Serialize)]
pub struct StudentsResponse {
    pub students: Vec<StudentListing>,
    pub total: usize,
}

/// GET /api/badges/bulk-download response
#[derive(Debug, Serialize)]
pub struct BulkResponse {
    pub success: bool,
    pub data: String,
    pub stats: BulkSummary,
}

/// GET / and GET /health response
#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub status: &'static str,
}
