use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use myshelf_core::{Notice, ProfilePatch, ShelfError, User};

use super::responses::{shelf_error, ApiError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
    pub initials: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl ProfileResponse {
    fn new(user: User, notice: Option<Notice>) -> Self {
        Self {
            initials: user.initials(),
            user,
            notice,
        }
    }
}

pub async fn get_profile(State(state): State<Arc<AppState>>) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state.shelf().current_user().cloned();
    let user = user.ok_or_else(|| shelf_error(ShelfError::NotAuthenticated))?;
    Ok(Json(ProfileResponse::new(user, None)))
}

/// Update name, bio or avatar. Email is not editable.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state.shelf().update_profile(patch).map_err(shelf_error)?;
    Ok(Json(ProfileResponse::new(
        user,
        Some(Notice::success("Profile updated")),
    )))
}
