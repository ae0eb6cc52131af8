//! API routes

pub mod health;
pub mod realtime;
pub mod tickets;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{auth::require_auth, state::AppState, websocket::ws_handler};

/// Request bodies above this are rejected before reaching handlers
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// CORS for the single frontend origin; credentials are required for the
/// session cookie to travel with requests
fn cors_layer(public_url: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true);

    match public_url.trim_end_matches('/').parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            tracing::warn!(error = %e, public_url = %public_url, "Invalid PUBLIC_URL, cross-origin requests disabled");
            cors
        }
    }
}

/// Create all API routes
pub fn create_router(state: AppState) -> Router {
    let auth_state = state.auth_state();

    // Health check routes (at root level for infrastructure monitoring)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    // Session-authenticated API routes
    let protected_api_routes = Router::new()
        .route("/tickets", get(tickets::list_tickets).post(tickets::create_ticket))
        .route("/tickets/:id", get(tickets::get_ticket))
        .route("/tickets/:id/status", patch(tickets::update_status))
        .route("/tickets/:id/assignee", patch(tickets::update_assignee))
        .route("/tickets/:id/messages", post(tickets::post_message))
        .route("/tickets/:id/history", get(tickets::get_history))
        .route("/realtime/stats", get(realtime::stats))
        .layer(middleware::from_fn_with_state(auth_state, require_auth));

    // WebSocket upgrade authenticates in the handler so failures are a plain 401
    let websocket_routes = Router::new().route("/ws", get(ws_handler));

    Router::new()
        .merge(health_routes)
        .merge(websocket_routes)
        .nest("/api/v1", protected_api_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(&state.config.public_url))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
