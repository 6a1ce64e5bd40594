//! Shared application state.

use sea_orm::DatabaseConnection;

use crate::auth::AuthProvider;
use crate::error::AppError;
use crate::handlers::images::ImagesClient;

/// Handles shared by every request: the database connection, the session
/// provider, and the image-hosting client. All three are stateless dispatch
/// objects; cloning the state is cheap and clones are safe to use from
/// concurrently in-flight requests.
#[derive(Clone)]
pub struct AppState {
    db: Option<DatabaseConnection>,
    pub auth: AuthProvider,
    pub images: Option<ImagesClient>,
}

impl AppState {
    pub fn new(
        db: Option<DatabaseConnection>,
        auth: AuthProvider,
        images: Option<ImagesClient>,
    ) -> Self {
        Self { db, auth, images }
    }

    /// The configured database handle, or the fatal configuration error
    /// when the deployment has none.
    pub fn db(&self) -> Result<&DatabaseConnection, AppError> {
        self.db.as_ref().ok_or(AppError::MissingDatabase)
    }
}
