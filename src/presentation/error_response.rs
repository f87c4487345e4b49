// Mapping of query errors to OGC exception responses
use crate::domain::error::QueryError;
use crate::infrastructure::http_response::json_response;
use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
};
use serde::Serialize;

/// OGC API exception body.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExceptionResponse {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
}

impl ExceptionResponse {
    pub fn from_error(err: &QueryError) -> Self {
        let status = err.status_code();
        let title = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Error")
            .to_string();
        Self {
            type_: format!("https://example.org/edr/errors/{}", err.kind()),
            title,
            status,
            detail: err.to_string(),
        }
    }
}

pub async fn error_response(err: QueryError, compress: bool) -> Response<Body> {
    if err.is_client_error() {
        tracing::warn!("Rejected query: {}", err);
    } else {
        tracing::error!("Query failed: {}", err);
    }

    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ExceptionResponse::from_error(&err);
    match json_response(status, "application/json", &body, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
