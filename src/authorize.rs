//! Route classification and the per-request authorization hook.
//!
//! Every inbound request passes through [`authorize`] before any handler
//! runs. The hook resolves the database handle (failing fast when the
//! deployment has none), attaches the database and auth-provider handles to
//! the request extensions, classifies the path against the ordered
//! protected-prefix list, and - for protected paths only - resolves the
//! session and applies the per-prefix policy: redirect, deny, or continue
//! with the identity attached.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Protected path prefixes, in declaration order.
///
/// First match wins; the order is the tie-break if a future addition makes
/// one prefix shadow another, so this stays an ordered slice rather than a
/// set.
pub const PROTECTED_PREFIXES: &[&str] = &["/app", "/login", "/register", "/api/images"];

/// Protection decision for one request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub protected: bool,
    /// The first matching prefix, or the original path when unprotected.
    pub matched_prefix: String,
}

/// Classifies a request path against [`PROTECTED_PREFIXES`].
///
/// Pure and total: every input produces a result, no side effects.
pub fn classify(path: &str) -> Classification {
    for prefix in PROTECTED_PREFIXES {
        if path.starts_with(prefix) {
            return Classification {
                protected: true,
                matched_prefix: (*prefix).to_string(),
            };
        }
    }

    Classification {
        protected: false,
        matched_prefix: path.to_string(),
    }
}

/// Identity attached to the request by the hook.
///
/// Present in the extensions if and only if the path was protected and the
/// session provider returned a present session. Handlers on unprotected
/// paths must not assume it.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedUser);

/// The per-request authorization hook.
pub async fn authorize(
    State(state): State<AppState>,
    session: Session,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Fail-fast precondition: nothing works without a datastore.
    let db = state.db()?.clone();

    // Downstream handlers always get both handles, protected or not.
    req.extensions_mut().insert(db);
    req.extensions_mut().insert(state.auth.clone());

    let class = classify(req.uri().path());
    if class.protected {
        // Resolved before any branching; the branch policy needs the answer.
        let user = state.auth.resolve(&session).await?;

        match (class.matched_prefix.as_str(), user) {
            // A signed-in user never sees the login or register forms.
            ("/login" | "/register", Some(_)) => {
                return Ok(Redirect::to("/app").into_response());
            }
            ("/login" | "/register", None) => {}
            ("/app", None) => {
                return Ok(Redirect::to("/login").into_response());
            }
            ("/api/images", None) => {
                return Err(AppError::Unauthorized);
            }
            ("/app" | "/api/images", Some(user)) => {
                req.extensions_mut().insert(CurrentUser(user));
            }
            // A prefix in PROTECTED_PREFIXES without a rule here is a
            // defect; refuse rather than silently allowing it through.
            (prefix, _) => {
                return Err(AppError::UnhandledPrefix(prefix.to_string()));
            }
        }
    }

    Ok(next.run(req).await)
}
