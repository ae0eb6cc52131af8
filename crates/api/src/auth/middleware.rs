//! Authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use super::session::{authenticate, session_id_from_cookies, AuthState};
use crate::error::ApiError;

/// Require a logged-in session for the wrapped routes
///
/// On success the resolved [`super::AuthUser`] is available to handlers as
/// `Extension<AuthUser>`.
pub async fn require_auth(
    State(auth_state): State<AuthState>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session_id = session_id_from_cookies(&cookies, &auth_state.cookie_name);
    let auth_user = authenticate(&auth_state, session_id.as_deref()).await?;

    tracing::debug!(
        user_id = %auth_user.id(),
        role = %auth_user.role(),
        path = %request.uri().path(),
        "Request authenticated"
    );

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}
