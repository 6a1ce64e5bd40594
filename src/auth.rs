//! Session resolution and credential handlers.
//!
//! The authorization hook only ever talks to the [`SessionProvider`]
//! capability: one operation, resolve the inbound session into
//! present-with-identity or absent. The production implementation
//! ([`SessionAuth`]) reads the identity the credential handlers wrote into
//! the tower-sessions record at sign-in; tests substitute a fake provider.
//!
//! Sign-up, sign-in, and sign-out are thin handlers over the `user` table
//! and the session layer. Passwords are stored as bcrypt hashes only.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::State;
use axum::response::Redirect;
use axum::Form;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_sessions::Session;
use tracing::info;
use uuid::Uuid;

use crate::entity::user;
use crate::error::AppError;
use crate::guestbook::now_timestamp;
use crate::state::AppState;

/// Session key under which the authenticated identity is stored.
pub const SESSION_USER_KEY: &str = "auth.user";

/// Identity carried in the session record and attached to protected
/// requests by the authorization hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("session backend error: {0}")]
    Store(String),

    #[error("password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Capability interface the authorization hook depends on.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Resolves the inbound session: `Some` identity when a valid session is
    /// present, `None` when absent. Never guesses; a store failure is an
    /// error, not an absent session.
    async fn resolve(&self, session: &Session) -> Result<Option<AuthenticatedUser>, AuthError>;
}

/// Shared handle to the session provider.
pub type AuthProvider = Arc<dyn SessionProvider>;

/// Production provider backed by the tower-sessions record.
#[derive(Debug, Clone, Default)]
pub struct SessionAuth;

#[async_trait]
impl SessionProvider for SessionAuth {
    async fn resolve(&self, session: &Session) -> Result<Option<AuthenticatedUser>, AuthError> {
        session
            .get::<AuthenticatedUser>(SESSION_USER_KEY)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /register`: create an account and sign it in.
///
/// The authorization hook guarantees no session is present here; a signed-in
/// user was already redirected to `/app`.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, AppError> {
    let db = state.db()?;

    if form.email.is_empty() {
        return Err(AppError::validation("email", "Email is required"));
    }
    if form.password.is_empty() {
        return Err(AppError::validation("password", "Password is required"));
    }

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&form.email))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(AppError::validation("email", "Email is already registered"));
    }

    let password_hash = bcrypt::hash(&form.password, bcrypt::DEFAULT_COST).map_err(AuthError::from)?;
    let name = if form.name.is_empty() {
        form.email.clone()
    } else {
        form.name
    };

    let row = user::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(name),
        email: Set(form.email),
        password_hash: Set(password_hash),
        created_at: Set(now_timestamp()),
    }
    .insert(db)
    .await?;

    info!(user = %row.id, "registered new account");
    sign_in(&session, &row).await?;

    Ok(Redirect::to("/app"))
}

/// `POST /login`: verify credentials and sign in.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    let db = state.db()?;

    let row = user::Entity::find()
        .filter(user::Column::Email.eq(&form.email))
        .one(db)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let verified =
        bcrypt::verify(&form.password, &row.password_hash).map_err(AuthError::from)?;
    if !verified {
        return Err(AuthError::InvalidCredentials.into());
    }

    sign_in(&session, &row).await?;

    Ok(Redirect::to("/app"))
}

/// `POST /logout`: destroy the session and return to the public feed.
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    session
        .flush()
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

    Ok(Redirect::to("/"))
}

async fn sign_in(session: &Session, row: &user::Model) -> Result<(), AuthError> {
    // Rotate the session ID so a pre-login session cannot be fixated onto
    // the authenticated identity.
    session
        .cycle_id()
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

    let identity = AuthenticatedUser {
        id: row.id.clone(),
        name: row.name.clone(),
        email: row.email.clone(),
    };
    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))
}
