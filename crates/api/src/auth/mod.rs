//! Session authentication for HTTP routes and WebSocket upgrades

pub mod middleware;
pub mod session;

pub use middleware::require_auth;
pub use session::{authenticate, session_id_from_cookies, AuthState, AuthUser};
