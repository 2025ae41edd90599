use std::path::Path;
use std::sync::Arc;

use crate::badges::BadgeClient;
use crate::enrich::Enricher;
use crate::roster::RosterSource;
use crate::settings::Settings;
use crate::stats::StatsClient;

/// Shared state for all handlers
pub struct AppState<S = StatsClient, B = BadgeClient> {
    pub roster: RosterSource,
    pub enricher: Enricher<S, B>,
}

impl AppState {
    pub fn from_settings(roster_path: &Path, settings: Settings) -> anyhow::Result<Arc<Self>> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("badge-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let enricher = Enricher::new(
            StatsClient::new(client.clone(), settings.clone()),
            BadgeClient::new(client, settings.clone()),
            settings,
        );

        Ok(Arc::new(Self {
            roster: RosterSource::from_path(roster_path),
            enricher,
        }))
    }
}
