//! Registration, login and session endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use myshelf_core::{AccountError, Notice, Registration, ShelfError, User};

use super::responses::{shelf_error, ApiError, NoticeResponse};
use crate::metrics::AUTH_FAILURES_TOTAL;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Returned when a session starts.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub initials: String,
    pub notice: Notice,
}

impl SessionResponse {
    fn new(user: User, notice: Notice) -> Self {
        Self {
            initials: user.initials(),
            user,
            notice,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initials: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create an account and sign it in.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let registration = Registration::new(body.name.trim(), body.email.trim(), body.password);

    let result = state.shelf().register(&registration);
    match result {
        Ok(user) => {
            let notice = Notice::success(format!("Welcome to MyShelf, {}!", user.name));
            Ok((StatusCode::CREATED, Json(SessionResponse::new(user, notice))))
        }
        Err(e) => {
            if matches!(e, ShelfError::Account(AccountError::EmailTaken)) {
                AUTH_FAILURES_TOTAL.with_label_values(&["email_taken"]).inc();
            }
            Err(shelf_error(e))
        }
    }
}

/// Sign in with email and password.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginBody>,
) -> Result<Json<SessionResponse>, ApiError> {
    // Exact match: registration stores the trimmed email, login does not trim.
    let result = state.shelf().login(&body.email, &body.password);
    match result {
        Ok(user) => {
            let notice = Notice::success(format!("Welcome back, {}!", user.name));
            Ok(Json(SessionResponse::new(user, notice)))
        }
        Err(e) => {
            if matches!(e, ShelfError::Account(AccountError::InvalidCredentials)) {
                AUTH_FAILURES_TOTAL
                    .with_label_values(&["invalid_credentials"])
                    .inc();
            }
            Err(shelf_error(e))
        }
    }
}

pub async fn logout(State(state): State<Arc<AppState>>) -> Result<Json<NoticeResponse>, ApiError> {
    state.shelf().logout().map_err(shelf_error)?;
    Ok(Json(NoticeResponse {
        notice: Notice::info("You have been signed out"),
    }))
}

pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionStatus> {
    let user = state.shelf().current_user().cloned();
    Json(SessionStatus {
        authenticated: user.is_some(),
        initials: user.as_ref().map(User::initials),
        user,
    })
}
