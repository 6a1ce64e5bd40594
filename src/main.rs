use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use guestbook::auth::SessionAuth;
use guestbook::config::AppConfig;
use guestbook::handlers::images::ImagesClient;
use guestbook::migration::{Migrator, MigratorTrait};
use guestbook::routes;
use guestbook::session_store::SeaOrmStore;
use guestbook::state::AppState;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use time::Duration as TimeDuration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    dotenv().ok();

    let config = AppConfig::from_env();

    let db = match &config.database_url {
        Some(url) => {
            info!("connecting to database");

            let mut opt = ConnectOptions::new(url.clone());
            opt.max_connections(10)
                .min_connections(2)
                .connect_timeout(Duration::from_secs(10))
                .acquire_timeout(Duration::from_secs(10))
                .idle_timeout(Duration::from_secs(10))
                .max_lifetime(Duration::from_secs(10 * 60));

            let db = Database::connect(opt).await?;
            Migrator::up(&db, None).await?;

            info!("database ready");
            Some(db)
        }
        None => {
            // The server still comes up; every request fails with a
            // configuration error until DATABASE_URL is set.
            warn!("no database configuration found; all requests will fail");
            None
        }
    };

    let store = SeaOrmStore::new(db.clone().unwrap_or_else(DatabaseConnection::default));
    let session_layer = SessionManagerLayer::new(store)
        .with_secure(false) // Allow non-HTTPS for development
        .with_expiry(Expiry::OnInactivity(TimeDuration::days(7)));

    let images = match &config.images {
        Some(images_config) => Some(ImagesClient::new(images_config)?),
        None => {
            warn!("image hosting credentials not set; /api/images will fail");
            None
        }
    };

    if config.oauth.is_none() {
        warn!("Google OAuth credentials not set; social login unavailable");
    }

    let state = AppState::new(db, Arc::new(SessionAuth), images);
    let app = routes::app(state, session_layer);

    info!("server starting on http://{}", config.listen_addr);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
