use std::future::Future;
use std::sync::Arc;

use chrono::Local;

use crate::badges::BadgeClient;
use crate::models::{
    Badge, BulkReport, BulkRow, EnrichedRecord, ProfileFetch, StatsResult, StudentRecord,
};
use crate::profile::profile_username;
use crate::report;
use crate::roster::{Roster, RosterError};
use crate::settings::{Settings, HACKERRANK_HOST, LEETCODE_HOST};
use crate::stats::StatsClient;

/// Where solved-problem statistics come from.
pub trait StatsSource: Send + Sync + 'static {
    fn fetch_stats(&self, username: &str) -> impl Future<Output = StatsResult> + Send;
}

/// Where badge sets come from.
pub trait BadgeSource: Send + Sync + 'static {
    fn fetch_badges(&self, username: &str) -> impl Future<Output = Option<Vec<Badge>>> + Send;
}

impl StatsSource for StatsClient {
    fn fetch_stats(&self, username: &str) -> impl Future<Output = StatsResult> + Send {
        StatsClient::fetch_stats(self, username)
    }
}

impl BadgeSource for BadgeClient {
    fn fetch_badges(&self, username: &str) -> impl Future<Output = Option<Vec<Badge>>> + Send {
        BadgeClient::fetch_badges(self, username)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error(transparent)]
    DataUnavailable(#[from] RosterError),

    #[error("Student not found: {0}")]
    NotFound(String),
}

/// Joins roster records with their external profile data.
pub struct Enricher<S, B> {
    stats: Arc<S>,
    badges: Arc<B>,
    settings: Settings,
}

impl<S, B> Clone for Enricher<S, B> {
    fn clone(&self) -> Self {
        Self {
            stats: Arc::clone(&self.stats),
            badges: Arc::clone(&self.badges),
            settings: self.settings.clone(),
        }
    }
}

impl<S: StatsSource, B: BadgeSource> Enricher<S, B> {
    pub fn new(stats: S, badges: B, settings: Settings) -> Self {
        Self {
            stats: Arc::new(stats),
            badges: Arc::new(badges),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub async fn get_student(
        &self,
        roster: &Roster,
        roll: &str,
    ) -> Result<EnrichedRecord, LookupError> {
        let student = roster
            .find_by_roll(roll)
            .ok_or_else(|| LookupError::NotFound(roll.to_string()))?;
        Ok(self.enrich(student).await)
    }

    pub async fn enrich(&self, student: &StudentRecord) -> EnrichedRecord {
        let (leetcode, hackerrank) =
            tokio::join!(self.leetcode_for(student), self.hackerrank_for(student));

        EnrichedRecord {
            student: student.clone(),
            leetcode,
            hackerrank,
            fetched_at: Local::now(),
        }
    }

    /// Enriches every record in roster order, pausing between records.
    ///
    /// Each record runs in its own task so a panic only marks that row.
    pub async fn bulk_enrich(&self, roster: &Roster) -> BulkReport {
        let generated_at = Local::now();
        let mut rows = Vec::with_capacity(roster.len());

        for (idx, student) in roster.all().iter().enumerate() {
            if idx > 0 {
                tokio::time::sleep(self.settings.bulk_delay).await;
            }

            let task = {
                let this = self.clone();
                let student = student.clone();
                tokio::spawn(async move { this.enrich(&student).await })
            };

            let row = match task.await {
                Ok(record) => BulkRow::from_enriched(record),
                Err(e) => {
                    tracing::error!(roll = %student.roll_number, error = %e, "record enrichment aborted");
                    BulkRow::errored(student.clone())
                }
            };
            tracing::debug!(
                roll = %row.student.roll_number,
                leetcode = %row.leetcode_status,
                hackerrank = %row.hackerrank_status,
                "record enriched"
            );
            rows.push(row);
        }

        let summary = report::summarize(&rows);
        tracing::info!(
            students = summary.total_students,
            leetcode_success = summary.leetcode_success,
            hackerrank_success = summary.hackerrank_success,
            "bulk enrichment finished"
        );

        BulkReport {
            columns: roster.columns().to_vec(),
            rows,
            summary,
            generated_at,
        }
    }

    async fn leetcode_for(&self, student: &StudentRecord) -> ProfileFetch<StatsResult> {
        let Some(username) = profile_username(student.leetcode_url.as_deref(), LEETCODE_HOST)
        else {
            return ProfileFetch::NoUrl;
        };
        let result = self.stats.fetch_stats(&username).await;
        ProfileFetch::Fetched { username, result }
    }

    async fn hackerrank_for(&self, student: &StudentRecord) -> ProfileFetch<Option<Vec<Badge>>> {
        let Some(username) =
            profile_username(student.hackerrank_url.as_deref(), HACKERRANK_HOST)
        else {
            return ProfileFetch::NoUrl;
        };
        let result = self.badges.fetch_badges(&username).await;
        ProfileFetch::Fetched { username, result }
    }
}
