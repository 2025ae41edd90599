use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::enrich::LookupError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 404
    #[error("{0}")]
    NotFound(String),

    /// 500
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = axum::Json(json!({
            "detail": detail,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound(_) => ApiError::NotFound("Student not found".into()),
            LookupError::DataUnavailable(e) => {
                tracing::error!(error = %e, "roster unavailable");
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<crate::roster::RosterError> for ApiError {
    fn from(err: crate::roster::RosterError) -> Self {
        LookupError::from(err).into()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!(error = %err, "request failed");
        ApiError::Internal(format!("{err:#}"))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
