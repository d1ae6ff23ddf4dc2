use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use crate::validation::ValidationError;
use thiserror::Error;

/// Failure of a single upstream attempt. Never leaves the failover loop.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to read body: {0}")]
    Body(#[source] reqwest::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("all upstreams failed ({attempts} attempted)")]
    AllUpstreamsExhausted { attempts: usize },
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    InvalidParameter(#[from] ValidationError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Fetch(FetchError::AllUpstreamsExhausted { .. }) => StatusCode::BAD_GATEWAY,
            ApiError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(serde_json::json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
