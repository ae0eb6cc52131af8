//! Real-time connection statistics

use axum::{
    extract::{Extension, State},
    Json,
};

use crate::{
    auth::AuthUser,
    error::ApiResult,
    state::AppState,
    websocket::WebSocketStats,
};

/// Active WebSocket connections and ticket rooms (staff only)
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<WebSocketStats>> {
    auth_user.require_staff()?;
    Ok(Json(state.ws_state.get_stats().await))
}
