//! Shelf API handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use myshelf_core::{
    AddOutcome, CatalogHit, Genre, LibraryQuery, NewWork, Notice, ShelfView, Work, WorkPatch,
};

use super::responses::{api_error, parse_kind, shelf_error, work_not_found, ApiError};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing works
#[derive(Debug, Default, Deserialize)]
pub struct ListWorksParams {
    /// Text matched against title and description
    pub q: Option<String>,
    pub kind: Option<String>,
    pub genre: Option<String>,
    /// `all`, `liked` or `wishlist`
    #[serde(default)]
    pub shelf: ShelfView,
}

#[derive(Debug, Serialize)]
pub struct ListWorksResponse {
    pub works: Vec<Work>,
    /// Works matching the filter
    pub count: usize,
    /// Works on the whole shelf
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct WorkResponse {
    pub work: Work,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub work_id: String,
    pub notice: Notice,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub removed: usize,
    pub notice: Notice,
}

impl ListWorksParams {
    fn into_query(self) -> Result<LibraryQuery, ApiError> {
        let genre = match self.genre.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
            Some(g) => Some(
                g.parse::<Genre>()
                    .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?,
            ),
            None => None,
        };
        Ok(LibraryQuery {
            text: self.q,
            kind: parse_kind(self.kind.as_deref())?,
            genre,
            view: self.shelf,
        })
    }
}

fn added_response(outcome: AddOutcome) -> (StatusCode, Json<WorkResponse>) {
    match outcome {
        AddOutcome::Added(work) => {
            let notice = Notice::success(format!("Added \"{}\" to your shelf", work.title));
            (
                StatusCode::CREATED,
                Json(WorkResponse {
                    work,
                    notice: Some(notice),
                }),
            )
        }
        AddOutcome::Duplicate(work) => {
            let notice = Notice::info(format!("\"{}\" is already in library", work.title));
            (
                StatusCode::OK,
                Json(WorkResponse {
                    work,
                    notice: Some(notice),
                }),
            )
        }
    }
}

fn toggle_notice(work: &Work, flag: bool, shelf: &str) -> Notice {
    if flag {
        Notice::success(format!("Added \"{}\" to {}", work.title, shelf))
    } else {
        Notice::info(format!("Removed \"{}\" from {}", work.title, shelf))
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// List works with optional filters
pub async fn list_works(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListWorksParams>,
) -> Result<Json<ListWorksResponse>, ApiError> {
    let query = params.into_query()?;

    let shelf = state.shelf();
    let works = shelf.filter(&query).map_err(shelf_error)?;
    let total = shelf.works().map_err(shelf_error)?.len();

    Ok(Json(ListWorksResponse {
        count: works.len(),
        works,
        total,
    }))
}

/// Add a manually entered work
pub async fn create_work(
    State(state): State<Arc<AppState>>,
    Json(mut body): Json<NewWork>,
) -> Result<(StatusCode, Json<WorkResponse>), ApiError> {
    body.title = body.title.trim().to_string();
    if body.title.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "title is required"));
    }

    let outcome = state.shelf().add_work(body).map_err(shelf_error)?;
    Ok(added_response(outcome))
}

/// Save a search result to the shelf. Saved results start on the wishlist.
pub async fn add_from_search(
    State(state): State<Arc<AppState>>,
    Json(hit): Json<CatalogHit>,
) -> Result<(StatusCode, Json<WorkResponse>), ApiError> {
    if hit.external_id.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "external_id is required"));
    }
    if hit.title.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "title is required"));
    }

    let outcome = state
        .shelf()
        .add_work(hit.into_new_work())
        .map_err(shelf_error)?;
    Ok(added_response(outcome))
}

pub async fn get_work(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WorkResponse>, ApiError> {
    let shelf = state.shelf();
    match shelf.find_work(&id).map_err(shelf_error)? {
        Some(work) => Ok(Json(WorkResponse {
            work: work.clone(),
            notice: None,
        })),
        None => Err(work_not_found(&id)),
    }
}

/// Apply a partial update to a work
pub async fn update_work(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(mut patch): Json<WorkPatch>,
) -> Result<Json<WorkResponse>, ApiError> {
    if let Some(title) = patch.title.as_mut() {
        *title = title.trim().to_string();
        if title.is_empty() {
            return Err(api_error(StatusCode::BAD_REQUEST, "title is required"));
        }
    }

    let updated = state.shelf().edit_work(&id, patch).map_err(shelf_error)?;
    match updated {
        Some(work) => Ok(Json(WorkResponse {
            work,
            notice: Some(Notice::success("Changes saved")),
        })),
        None => Err(work_not_found(&id)),
    }
}

pub async fn delete_work(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RemovedResponse>, ApiError> {
    let removed = state.shelf().remove_work(&id).map_err(shelf_error)?;
    match removed {
        Some(work) => Ok(Json(RemovedResponse {
            notice: Notice::success(format!("Removed \"{}\"", work.title)),
            work_id: work.id,
        })),
        None => Err(work_not_found(&id)),
    }
}

pub async fn toggle_liked(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WorkResponse>, ApiError> {
    let toggled = state.shelf().toggle_liked(&id).map_err(shelf_error)?;
    match toggled {
        Some(work) => Ok(Json(WorkResponse {
            notice: Some(toggle_notice(&work, work.liked, "liked")),
            work,
        })),
        None => Err(work_not_found(&id)),
    }
}

pub async fn toggle_wishlisted(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WorkResponse>, ApiError> {
    let toggled = state.shelf().toggle_wishlisted(&id).map_err(shelf_error)?;
    match toggled {
        Some(work) => Ok(Json(WorkResponse {
            notice: Some(toggle_notice(&work, work.wishlisted, "wishlist")),
            work,
        })),
        None => Err(work_not_found(&id)),
    }
}

/// Remove every work from the signed-in user's shelf
pub async fn clear_works(State(state): State<Arc<AppState>>) -> Result<Json<ClearResponse>, ApiError> {
    let removed = state.shelf().clear_all().map_err(shelf_error)?;
    let notice = match removed {
        0 => Notice::info("Your library is already empty"),
        1 => Notice::success("Removed 1 work"),
        n => Notice::success(format!("Removed {} works", n)),
    };
    Ok(Json(ClearResponse { removed, notice }))
}
