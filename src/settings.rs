use std::time::Duration;

pub const LEETCODE_HOST: &str = "leetcode.com";
pub const HACKERRANK_HOST: &str = "hackerrank.com";

/// Tunables for the outbound clients and the bulk pass.
#[derive(Debug, Clone)]
pub struct Settings {
    pub leetcode_stats_url: String,
    pub hackerrank_badges_url: String,
    pub stats_timeout: Duration,
    pub badge_timeout: Duration,
    /// Pause between records during a bulk pass.
    pub bulk_delay: Duration,
    pub cors_origins: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            leetcode_stats_url: "https://leetcode-stats-api.herokuapp.com".into(),
            hackerrank_badges_url: "https://hackerrank-badges.vercel.app".into(),
            stats_timeout: Duration::from_secs(10),
            badge_timeout: Duration::from_secs(15),
            bulk_delay: Duration::from_millis(200),
            cors_origins: vec![
                "http://localhost:3000".into(),
                "http://127.0.0.1:3000".into(),
            ],
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(url) = std::env::var("LEETCODE_STATS_URL") {
            settings.leetcode_stats_url = url;
        }
        if let Ok(url) = std::env::var("HACKERRANK_BADGES_URL") {
            settings.hackerrank_badges_url = url;
        }
        if let Some(ms) = std::env::var("BULK_DELAY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            settings.bulk_delay = Duration::from_millis(ms);
        }
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            settings.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }

        settings
    }

    pub fn badge_image_url(&self, username: &str) -> String {
        format!(
            "{}/{}",
            self.hackerrank_badges_url.trim_end_matches('/'),
            username
        )
    }

    pub fn stats_url(&self, username: &str) -> String {
        format!(
            "{}/{}",
            self.leetcode_stats_url.trim_end_matches('/'),
            username
        )
    }
}
