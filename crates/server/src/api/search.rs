//! External catalog search API handlers.
//!
//! Provider failures and timeouts come back as `200` with no results and an
//! error notice. Only a missing provider configuration is an HTTP error.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use myshelf_core::{CatalogHit, MediaKind, Notice, SearchRequest};

use super::responses::{api_error, parse_kind, ApiError};
use crate::state::AppState;

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    /// Defaults to `book`
    pub kind: Option<String>,
}

/// Query parameters for trending
#[derive(Debug, Deserialize)]
pub struct TrendingParams {
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResultItem {
    #[serde(flatten)]
    pub hit: CatalogHit,
    /// Already on the signed-in user's shelf
    pub in_library: bool,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub ticket: u64,
    pub request: SearchRequest,
    /// A newer search was issued while this one ran
    pub stale: bool,
    pub results: Vec<SearchResultItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let kind = parse_kind(params.kind.as_deref())?.unwrap_or(MediaKind::Book);
    let query = params.q.trim();
    if query.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Enter a title to search for",
        ));
    }

    run(&state, SearchRequest::query(query, kind)).await
}

/// Default list shown before the user searches.
pub async fn trending(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendingParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let kind = parse_kind(params.kind.as_deref())?.unwrap_or(MediaKind::Book);
    run(&state, SearchRequest::trending(kind)).await
}

async fn run(state: &AppState, request: SearchRequest) -> Result<Json<SearchResponse>, ApiError> {
    let Some(provider) = state.catalog() else {
        return Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "External catalogs not configured",
        ));
    };

    let outcome = state.search_session().run(provider, request).await;
    debug!(
        ticket = outcome.ticket,
        results = outcome.results.len(),
        stale = outcome.stale,
        "Search completed"
    );

    // Locked only after the provider call has finished.
    let shelf = state.shelf();
    let results = outcome
        .results
        .into_iter()
        .map(|hit| SearchResultItem {
            in_library: shelf.contains_external(&hit.external_id, hit.kind),
            hit,
        })
        .collect();

    Ok(Json(SearchResponse {
        ticket: outcome.ticket,
        request: outcome.request,
        stale: outcome.stale,
        results,
        notice: outcome.notice,
    }))
}
