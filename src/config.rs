//! Process configuration.
//!
//! All environment reads happen in [`AppConfig::from_env`], once at startup.
//! The rest of the application receives the constructed value (or handles
//! built from it), so tests can substitute fakes without touching the
//! process environment.

use std::env;
use std::net::SocketAddr;

use tracing::warn;

/// Credentials for the upstream image-hosting direct-upload API.
#[derive(Debug, Clone)]
pub struct ImagesConfig {
    pub account_id: String,
    pub api_token: String,
}

/// OAuth client credentials. Carried for the social-login provider; the
/// handshake itself happens outside this application.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub google_client_id: String,
    pub google_client_secret: String,
}

/// Everything the process reads from its environment.
///
/// A missing `DATABASE_URL` is deliberately not fatal at startup: the server
/// comes up and every request fails with a configuration error until the
/// deployment is fixed.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub database_url: Option<String>,
    pub oauth: Option<OAuthConfig>,
    pub images: Option<ImagesConfig>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let listen_addr = env::var("LISTEN_ADDR")
            .ok()
            .and_then(|raw| {
                raw.parse()
                    .map_err(|e| warn!("invalid LISTEN_ADDR value: {e}"))
                    .ok()
            })
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

        let database_url = var("DATABASE_URL");

        let oauth = match (var("GOOGLE_CLIENT_ID"), var("GOOGLE_CLIENT_SECRET")) {
            (Some(google_client_id), Some(google_client_secret)) => Some(OAuthConfig {
                google_client_id,
                google_client_secret,
            }),
            _ => None,
        };

        let images = match (var("CF_ACCOUNT_ID"), var("CF_API_TOKEN")) {
            (Some(account_id), Some(api_token)) => Some(ImagesConfig {
                account_id,
                api_token,
            }),
            _ => None,
        };

        Self {
            listen_addr,
            database_url,
            oauth,
            images,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key)
        .map_err(|_| warn!("environment variable {key} not set"))
        .ok()
        .filter(|v| !v.is_empty())
}
