//! Feed pages and message-submission actions.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, Redirect};
use axum::{Extension, Form};
use tower_sessions::Session;

use crate::authorize::CurrentUser;
use crate::error::AppError;
use crate::guestbook::{self, MessageForm};
use crate::handlers::pages;
use crate::state::AppState;

/// `GET /`: the public feed, all users, newest first.
pub async fn public_feed(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let db = state.db()?;
    let messages = guestbook::recent_messages(db).await?;

    let entries: Vec<(String, String)> = messages
        .into_iter()
        .map(|(message, author)| (pages::format_entry(&message), author.name))
        .collect();

    Ok(Html(pages::public_feed_page(&entries)))
}

/// `POST /`: submit a message from the public page.
///
/// The path is unprotected, so the hook attaches no identity; the handler
/// resolves the session itself and denies unauthenticated submissions.
pub async fn submit_public(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<MessageForm>,
) -> Result<Redirect, AppError> {
    let db = state.db()?;
    let user = state
        .auth
        .resolve(&session)
        .await?
        .ok_or(AppError::Unauthorized)?;

    guestbook::create_message(db, &user.id, &form, country_from_headers(&headers)).await?;

    Ok(Redirect::to("/"))
}

/// `GET /app`: the signed-in user's own messages.
pub async fn private_feed(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Html<String>, AppError> {
    let db = state.db()?;
    let messages = guestbook::messages_for_user(db, &user.id).await?;

    let entries: Vec<String> = messages.iter().map(pages::format_entry).collect();

    Ok(Html(pages::private_feed_page(&user.name, &entries)))
}

/// `POST /app`: submit a message as the signed-in user.
///
/// `CurrentUser` is always present here; the hook redirected any
/// unauthenticated request to `/login` before this handler could run.
pub async fn submit_private(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    headers: HeaderMap,
    Form(form): Form<MessageForm>,
) -> Result<Redirect, AppError> {
    let db = state.db()?;

    guestbook::create_message(db, &user.id, &form, country_from_headers(&headers)).await?;

    Ok(Redirect::to("/app"))
}

// Country of origin comes from the edge-provided header when present.
fn country_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("cf-ipcountry")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}
