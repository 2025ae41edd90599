mod dto;
mod error;
mod handlers;
mod state;

pub use dto::{StudentListing, StudentResponse, StudentsResponse};
pub use state::AppState;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::enrich::{BadgeSource, StatsSource};

/// Build the application router
pub fn router<S: StatsSource, B: BadgeSource>(state: Arc<AppState<S, B>>) -> Router {
    let cors = cors_layer(&state.enricher.settings().cors_origins);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/student/{roll}", get(handlers::get_student::<S, B>))
        .route("/api/students", get(handlers::list_students::<S, B>))
        .route(
            "/api/badges/bulk-download",
            get(handlers::bulk_download::<S, B>),
        )
        .route(
            "/api/badges/bulk-download-csv",
            get(handlers::bulk_download_csv::<S, B>),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Configured origins plus any Vercel preview deployment.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            allowed.contains(origin)
                || origin
                    .to_str()
                    .is_ok_and(|o| o.starts_with("https://") && o.ends_with(".vercel.app"))
        }))
        .allow_methods(Any)
        .allow_headers(Any)
}
