//! LeetCode statistics client.

use std::time::Instant;

use serde_json::{Map, Value};

use crate::models::{LeetCodeStats, StatsResult};
use crate::sanitize::sanitize_float;
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct StatsClient {
    client: reqwest::Client,
    settings: Settings,
}

impl StatsClient {
    pub fn new(client: reqwest::Client, settings: Settings) -> Self {
        Self { client, settings }
    }

    /// Fetches solved-problem counts for one user. Every failure is folded
    /// into [`StatsResult::Err`].
    pub async fn fetch_stats(&self, username: &str) -> StatsResult {
        let url = self.settings.stats_url(username);
        let started = Instant::now();

        let response = match self
            .client
            .get(&url)
            .timeout(self.settings.stats_timeout)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(username, error = %e, "stats request failed");
                return StatsResult::err(format!("Network error: {e}"));
            }
        };

        let status = response.status();
        tracing::debug!(
            username,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "stats response"
        );

        if status != reqwest::StatusCode::OK {
            return StatsResult::err(format!("API returned status code {}", status.as_u16()));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return StatsResult::err(format!("Network error: {e}")),
        };

        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(fields)) => StatsResult::Ok(stats_from_fields(&fields)),
            Ok(other) => StatsResult::err(format!(
                "Unexpected error: expected a JSON object, got {}",
                json_kind(&other)
            )),
            Err(e) => StatsResult::err(format!("Unexpected error: {e}")),
        }
    }
}

/// Missing fields count as 0, `null` and non-numeric values as absent.
fn stats_from_fields(fields: &Map<String, Value>) -> LeetCodeStats {
    let field = |name: &str| {
        let value = match fields.get(name) {
            None => Some(0.0),
            Some(v) => v.as_f64(),
        };
        sanitize_float(value)
    };

    LeetCodeStats {
        total_solved: field("totalSolved"),
        easy_solved: field("easySolved"),
        medium_solved: field("mediumSolved"),
        hard_solved: field("hardSolved"),
        acceptance_rate: field("acceptanceRate"),
        ranking: field("ranking"),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
