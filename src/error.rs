//! Application error taxonomy.
//!
//! Every failure a handler or the authorization hook can produce is an
//! [`AppError`]; the [`IntoResponse`] impl is the single place where errors
//! become HTTP statuses. Redirects are control flow, not errors, and never
//! pass through here.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;

/// Field-keyed validation messages, serialized as the `errors` object of a
/// 400 response.
pub type FieldErrors = BTreeMap<&'static str, String>;

#[derive(Debug, Error)]
pub enum AppError {
    /// No database backend configured. Fatal per request, never retried.
    #[error("no database configuration found")]
    MissingDatabase,

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Session absent where one is required.
    #[error("authentication required")]
    Unauthorized,

    /// Recoverable input failure; the caller can fix the form and resubmit.
    #[error("validation failed")]
    Validation(FieldErrors),

    /// The upstream image API failed or is unreachable. Surfaced directly,
    /// no retry.
    #[error("error uploading image: {0}")]
    ImageUpstream(String),

    /// A protected prefix reached the branch policy without a rule. This is
    /// a defect in the prefix list, surfaced loudly rather than allowed
    /// through.
    #[error("no authorization rule for protected prefix {0}")]
    UnhandledPrefix(String),
}

impl AppError {
    /// Single-field validation failure.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field, message.into());
        Self::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            AppError::Auth(AuthError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, "Invalid email or password").into_response()
            }
            // Detail goes to the log only; driver and upstream error text
            // never reaches the client.
            other => {
                error!("request failed: {other}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
