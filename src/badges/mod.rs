//! HackerRank badges, recovered from the rendered badge image.

pub mod catalog;
pub mod document;
pub mod extract;

use std::borrow::Cow;
use std::time::Instant;

use crate::models::Badge;
use crate::settings::Settings;
use document::SvgDocument;
use extract::extract_badges;

#[derive(Debug, Clone)]
pub struct BadgeClient {
    client: reqwest::Client,
    settings: Settings,
}

impl BadgeClient {
    pub fn new(client: reqwest::Client, settings: Settings) -> Self {
        Self { client, settings }
    }

    /// Downloads and parses a user's badge image. Any failure yields `None`.
    pub async fn fetch_badges(&self, username: &str) -> Option<Vec<Badge>> {
        let url = self.settings.badge_image_url(username);
        let started = Instant::now();

        let response = self
            .client
            .get(&url)
            .timeout(self.settings.badge_timeout)
            .send()
            .await
            .inspect_err(|e| tracing::warn!(username, error = %e, "badge request failed"))
            .ok()?;

        let status = response.status();
        tracing::debug!(
            username,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "badge response"
        );
        if status != reqwest::StatusCode::OK {
            return None;
        }

        let body = response
            .text()
            .await
            .inspect_err(|e| tracing::warn!(username, error = %e, "badge body unreadable"))
            .ok()?;
        extract_from_svg(&body)
    }
}

/// Parses badge markup; unparseable documents count as "no badges".
pub fn extract_from_svg(svg: &str) -> Option<Vec<Badge>> {
    let svg = xml_entities(svg);
    let doc = SvgDocument::parse(&svg)
        .inspect_err(|e| tracing::warn!(error = %e, "badge image is not well-formed markup"))
        .ok()?;
    extract_badges(&doc)
}

/// Rewrites the HTML-only `&nbsp;` entity, which XML parsers reject, as a
/// numeric reference. Other undefined named entities still fail to parse.
fn xml_entities(svg: &str) -> Cow<'_, str> {
    if svg.contains("&nbsp;") {
        Cow::Owned(svg.replace("&nbsp;", "&#160;"))
    } else {
        Cow::Borrowed(svg)
    }
}
