//! Shared fixtures: an in-memory database with the real migrations, a fake
//! session provider, and a router wired the way `main` wires it.

// Not every test binary uses every fixture.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use guestbook::auth::{AuthError, AuthenticatedUser, SessionProvider};
use guestbook::handlers::images::ImagesClient;
use guestbook::migration::{Migrator, MigratorTrait};
use guestbook::routes;
use guestbook::state::AppState;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};

/// Session provider returning a fixed answer, regardless of cookies.
pub struct FixedSession(pub Option<AuthenticatedUser>);

#[async_trait]
impl SessionProvider for FixedSession {
    async fn resolve(&self, _session: &Session) -> Result<Option<AuthenticatedUser>, AuthError> {
        Ok(self.0.clone())
    }
}

pub fn test_user(id: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        id: id.to_string(),
        name: format!("user {id}"),
        email: format!("{id}@example.com"),
    }
}

/// Fresh in-memory SQLite database with all migrations applied. A single
/// connection, so every query sees the same database.
pub async fn memory_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
    opt.max_connections(1);

    let db = Database::connect(opt).await.expect("connect to sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub async fn insert_user(db: &DatabaseConnection, id: &str) -> guestbook::entity::user::Model {
    guestbook::entity::user::ActiveModel {
        id: Set(id.to_string()),
        name: Set(format!("user {id}")),
        email: Set(format!("{id}@example.com")),
        password_hash: Set("unused".to_string()),
        created_at: Set("2024-01-01 00:00:00".to_string()),
    }
    .insert(db)
    .await
    .expect("insert user")
}

/// Router with a memory-backed session layer and the given state parts.
pub fn app_with(
    db: Option<DatabaseConnection>,
    auth: Arc<dyn SessionProvider>,
    images: Option<ImagesClient>,
) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);
    routes::app(AppState::new(db, auth, images), session_layer)
}
