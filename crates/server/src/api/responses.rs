//! Error bodies and shared response helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use tracing::error;

use myshelf_core::{AccountError, MediaKind, Notice, ShelfError, StorageError};

/// Error body. `notice` carries the same message for the front-end toast.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub notice: Notice,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Body for endpoints whose only payload is a notice.
#[derive(Debug, Serialize)]
pub struct NoticeResponse {
    pub notice: Notice,
}

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    let message = message.into();
    (
        status,
        Json(ErrorResponse {
            notice: Notice::error(message.clone()),
            error: message,
        }),
    )
}

pub fn work_not_found(id: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, format!("Work not found: {}", id))
}

pub fn shelf_error(err: ShelfError) -> ApiError {
    match err {
        ShelfError::NotAuthenticated => api_error(StatusCode::UNAUTHORIZED, "Sign in to continue"),
        ShelfError::AlreadyInLibrary(_) => api_error(StatusCode::CONFLICT, err.to_string()),
        ShelfError::Account(e) => account_error(e),
        ShelfError::Storage(e) => storage_error(e),
    }
}

pub fn account_error(err: AccountError) -> ApiError {
    match err {
        AccountError::EmailTaken => api_error(StatusCode::CONFLICT, err.to_string()),
        AccountError::InvalidCredentials => api_error(StatusCode::UNAUTHORIZED, err.to_string()),
        AccountError::Validation(message) => api_error(StatusCode::BAD_REQUEST, message),
        AccountError::Storage(e) => storage_error(e),
    }
}

fn storage_error(err: StorageError) -> ApiError {
    error!(error = %err, "Storage failure");
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Could not save your changes: {}", err),
    )
}

/// Parse an optional `kind` query parameter.
pub fn parse_kind(raw: Option<&str>) -> Result<Option<MediaKind>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|e: String| api_error(StatusCode::BAD_REQUEST, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_errors_map_to_status() {
        assert_eq!(account_error(AccountError::EmailTaken).0, StatusCode::CONFLICT);
        assert_eq!(
            account_error(AccountError::InvalidCredentials).0,
            StatusCode::UNAUTHORIZED
        );
        let (status, Json(body)) =
            account_error(AccountError::Validation("email is required".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "email is required");
        assert_eq!(body.notice, Notice::error("email is required"));
    }

    #[test]
    fn test_not_authenticated_is_unauthorized() {
        assert_eq!(
            shelf_error(ShelfError::NotAuthenticated).0,
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind(None).unwrap(), None);
        assert_eq!(parse_kind(Some("  ")).unwrap(), None);
        assert_eq!(parse_kind(Some("tv")).unwrap(), Some(MediaKind::Series));
        assert_eq!(
            parse_kind(Some("podcast")).unwrap_err().0,
            StatusCode::BAD_REQUEST
        );
    }
}
