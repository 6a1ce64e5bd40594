//! Router assembly.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::auth;
use crate::authorize::authorize;
use crate::handlers::{guestbook, images, pages};
use crate::state::AppState;

/// Builds the application router.
///
/// Layer order matters: the session layer wraps the authorization hook so
/// the hook can extract the session, and the hook wraps every route so no
/// handler runs without passing the branch policy.
pub fn app<Store>(state: AppState, session_layer: SessionManagerLayer<Store>) -> Router
where
    Store: SessionStore + Clone,
{
    Router::new()
        .route(
            "/",
            get(guestbook::public_feed).post(guestbook::submit_public),
        )
        .route(
            "/app",
            get(guestbook::private_feed).post(guestbook::submit_private),
        )
        .route("/login", get(pages::login_page).post(auth::login))
        .route("/register", get(pages::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/api/images", post(images::create_upload_url))
        .layer(middleware::from_fn_with_state(state.clone(), authorize))
        .layer(session_layer)
        .with_state(state)
}
