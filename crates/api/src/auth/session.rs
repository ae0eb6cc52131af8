//! Session cookie authentication
//!
//! The login flow (outside this service) writes session documents to Redis
//! and hands the browser a cookie holding the session id. Both the HTTP
//! middleware and the WebSocket upgrade resolve that cookie here.

use std::sync::Arc;

use helpdesk_shared::{Role, User, UserId};
use tower_cookies::Cookies;

use crate::error::ApiError;
use crate::store::{SessionStore, UserStore};

/// Authentication state shared across middleware and the WebSocket upgrade
#[derive(Clone)]
pub struct AuthState {
    pub sessions: Arc<dyn SessionStore>,
    pub users: Arc<dyn UserStore>,
    pub cookie_name: String,
}

/// Authenticated user context
///
/// Inserted into request extensions by [`super::require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl AuthUser {
    pub fn id(&self) -> UserId {
        self.user.id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn is_staff(&self) -> bool {
        self.user.is_staff()
    }

    /// Reject non-staff callers
    pub fn require_staff(&self) -> Result<(), ApiError> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

/// Session id carried by the configured cookie, if any
pub fn session_id_from_cookies(cookies: &Cookies, cookie_name: &str) -> Option<String> {
    cookies
        .get(cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve a session id to a user
///
/// Missing session, unknown session and deleted user are all `Unauthorized`;
/// store failures surface as server errors.
pub async fn authenticate(
    state: &AuthState,
    session_id: Option<&str>,
) -> Result<AuthUser, ApiError> {
    let Some(session_id) = session_id else {
        tracing::debug!("Authentication failed: no session cookie");
        return Err(ApiError::Unauthorized);
    };

    let Some(user_id) = state.sessions.resolve(session_id).await? else {
        tracing::debug!("Authentication failed: session not found or not logged in");
        return Err(ApiError::Unauthorized);
    };

    let Some(user) = state.users.find_by_id(user_id).await? else {
        tracing::warn!(user_id = %user_id, "Authentication failed: session user no longer exists");
        return Err(ApiError::Unauthorized);
    };

    Ok(AuthUser { user })
}
