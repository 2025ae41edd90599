use anyhow::Context;
use chrono::{DateTime, Local};

use crate::models::{
    Badge, BulkReport, BulkRow, BulkSummary, EnrichedRecord, FetchStatus, ProfileFetch,
    StatsResult, StudentRecord,
};

pub const ENRICHMENT_COLUMNS: [&str; 10] = [
    "LeetCode_Total_Solved",
    "LeetCode_Easy_Solved",
    "LeetCode_Medium_Solved",
    "LeetCode_Hard_Solved",
    "LeetCode_Status",
    "HackerRank_Total_Badges",
    "HackerRank_Total_Stars",
    "HackerRank_Badge_Details",
    "HackerRank_Status",
    "Data_Fetch_Timestamp",
];

impl BulkRow {
    pub fn from_enriched(record: EnrichedRecord) -> Self {
        let (stats, leetcode_status) = match record.leetcode {
            ProfileFetch::NoUrl => (None, FetchStatus::NoUrl),
            ProfileFetch::Fetched {
                result: StatsResult::Ok(stats),
                ..
            } => (Some(stats), FetchStatus::Success),
            ProfileFetch::Fetched {
                result: StatsResult::Err { .. },
                ..
            } => (None, FetchStatus::Failed),
        };

        let (badges, hackerrank_status) = match record.hackerrank {
            ProfileFetch::NoUrl => (Vec::new(), FetchStatus::NoUrl),
            ProfileFetch::Fetched {
                result: Some(badges),
                ..
            } if !badges.is_empty() => (badges, FetchStatus::Success),
            ProfileFetch::Fetched { .. } => (Vec::new(), FetchStatus::NoBadgesFound),
        };

        Self {
            student: record.student,
            stats,
            leetcode_status,
            badges,
            hackerrank_status,
        }
    }

    /// Row for a record whose enrichment did not complete.
    pub fn errored(student: StudentRecord) -> Self {
        Self {
            student,
            stats: None,
            leetcode_status: FetchStatus::Error,
            badges: Vec::new(),
            hackerrank_status: FetchStatus::Error,
        }
    }
}

pub fn total_stars(badges: &[Badge]) -> u32 {
    badges.iter().map(|b| u32::from(b.stars)).sum()
}

/// `Python(3★); Sql(2★)`
pub fn badge_details(badges: &[Badge]) -> String {
    badges
        .iter()
        .map(|b| format!("{}({}★)", b.name, b.stars))
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn summarize(rows: &[BulkRow]) -> BulkSummary {
    let total_students = rows.len();
    let count = |status: fn(&BulkRow) -> bool| rows.iter().filter(|r| status(r)).count();

    let avg_cgpa = if total_students == 0 {
        0.0
    } else {
        let sum: f64 = rows.iter().map(|r| r.student.cgpa.unwrap_or(0.0)).sum();
        round2(sum / total_students as f64)
    };

    BulkSummary {
        total_students,
        leetcode_success: count(|r| r.leetcode_status == FetchStatus::Success),
        hackerrank_success: count(|r| r.hackerrank_status == FetchStatus::Success),
        avg_cgpa,
        students_with_backlogs: count(|r| r.student.backlog_count > 0),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Renders the roster columns followed by the enrichment columns.
pub fn render_csv(report: &BulkReport) -> anyhow::Result<String> {
    let timestamp = report
        .generated_at
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(
            report
                .columns
                .iter()
                .map(String::as_str)
                .chain(ENRICHMENT_COLUMNS),
        )
        .context("failed to write export header")?;

    for row in &report.rows {
        let mut fields = row.student.source_fields.clone();
        fields.resize(report.columns.len(), String::new());
        fields.extend(enrichment_cells(row, &timestamp));
        writer
            .write_record(&fields)
            .with_context(|| format!("failed to write export row {}", row.student.roll_number))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("failed to flush export")?;
    String::from_utf8(bytes).context("export is not valid UTF-8")
}

fn enrichment_cells(row: &BulkRow, timestamp: &str) -> [String; 10] {
    let number = |value: Option<f64>| value.unwrap_or(0.0).to_string();

    let [total, easy, medium, hard] = match &row.stats {
        Some(stats) if row.leetcode_status == FetchStatus::Success => [
            number(stats.total_solved),
            number(stats.easy_solved),
            number(stats.medium_solved),
            number(stats.hard_solved),
        ],
        _ => Default::default(),
    };

    let [badge_count, star_count, details] = if row.hackerrank_status == FetchStatus::Success {
        [
            row.badges.len().to_string(),
            total_stars(&row.badges).to_string(),
            badge_details(&row.badges),
        ]
    } else {
        Default::default()
    };

    [
        total,
        easy,
        medium,
        hard,
        row.leetcode_status.to_string(),
        badge_count,
        star_count,
        details,
        row.hackerrank_status.to_string(),
        timestamp.to_string(),
    ]
}

pub fn export_filename(at: DateTime<Local>) -> String {
    format!("student_data_enhanced_{}.csv", at.format("%Y%m%d_%H%M%S"))
}
