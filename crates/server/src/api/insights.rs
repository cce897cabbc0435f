use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use myshelf_core::{LibraryStats, Suggestion};

use super::responses::{shelf_error, ApiError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AffinitiesResponse {
    pub suggestions: Vec<Suggestion>,
    /// Liked works the ranking was based on. Zero means all works were used.
    pub liked_count: usize,
    pub total_works: usize,
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<LibraryStats>, ApiError> {
    let stats = state.shelf().stats().map_err(shelf_error)?;
    Ok(Json(stats))
}

/// Other users ranked by how closely their shelf matches this one.
pub async fn get_affinities(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AffinitiesResponse>, ApiError> {
    let shelf = state.shelf();
    let suggestions = shelf.affinities().map_err(shelf_error)?;
    let works = shelf.works().map_err(shelf_error)?;

    Ok(Json(AffinitiesResponse {
        suggestions,
        liked_count: works.iter().filter(|w| w.liked).count(),
        total_works: works.len(),
    }))
}
