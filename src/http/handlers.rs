/// HTTP request handlers

use crate::core::{Query, StoreHealth};
use crate::db::Record;
use crate::error::FinderError;
use crate::http::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

/// Body of `POST /records/search`
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub records: Vec<Record>,
    pub count: usize,
    pub search_time_seconds: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BrowseResponse {
    pub records: Vec<Record>,
    pub count: i64,
    pub total: i64,
}

/// Body of every 500 from the search route
pub const SEARCH_FAILED: &str = "Failed to search records. Please try again.";
/// Body of every 500 from the browse route
pub const BROWSE_FAILED: &str = "Failed to load records. Please check database connection.";

/// Error body returned to clients
///
/// Validation errors become a structured 400; anything else is logged and
/// answered with the route's own failure message.
pub struct ApiError {
    error: FinderError,
    failure: &'static str,
}

impl ApiError {
    pub fn search(error: FinderError) -> Self {
        Self {
            error,
            failure: SEARCH_FAILED,
        }
    }

    pub fn browse(error: FinderError) -> Self {
        Self {
            error,
            failure: BROWSE_FAILED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.error;
        if err.is_validation() {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "message": "Invalid search query",
                    "errors": [err.to_string()],
                })),
            )
                .into_response();
        }

        if let FinderError::RecordNotFound(_) = err {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": err.user_message() })),
            )
                .into_response();
        }

        error!(error = %err, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": self.failure })),
        )
            .into_response()
    }
}

/// `GET /records`: first page of the catalog plus its total size
pub async fn handle_browse(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BrowseResponse>, ApiError> {
    let page = state.searcher.browse().await.map_err(ApiError::browse)?;

    Ok(Json(BrowseResponse {
        records: page.records,
        count: page.total,
        total: page.total,
    }))
}

/// `POST /records/search`
pub async fn handle_search(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    // Malformed bodies get the same 400 shape as a bad query
    let Json(request) = payload.map_err(|rejection| {
        ApiError::search(FinderError::InvalidRequest(rejection.body_text()))
    })?;
    let query = Query::parse(&request.query).map_err(ApiError::search)?;
    let result = state
        .searcher
        .search_all(&query)
        .await
        .map_err(ApiError::search)?;

    Ok(Json(SearchResponse {
        count: result.count,
        search_time_seconds: result.search_time.as_secs_f64(),
        records: result.records,
    }))
}

/// `GET /health`
pub async fn handle_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.searcher.health().await {
        StoreHealth::Connected => (
            StatusCode::OK,
            Json(json!({ "status": "connected", "database": "SQLite" })),
        ),
        StoreHealth::Disconnected(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "disconnected",
                "error": "Database connection failed",
            })),
        ),
    }
}
