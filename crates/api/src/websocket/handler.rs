//! WebSocket handler for Axum
//!
//! Authenticates the session cookie before upgrading, then routes client
//! events to the broadcaster.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{stream::StreamExt, SinkExt};
use helpdesk_shared::User;
use tokio::sync::mpsc;
use tower_cookies::Cookies;

use crate::{
    auth::{authenticate, session_id_from_cookies},
    error::ApiError,
    state::AppState,
};

use super::{
    connection::Connection,
    events::{ClientEvent, ServerEvent},
};

/// WebSocket handler - upgrades HTTP connection to WebSocket
///
/// Unauthenticated requests get a 401 and the socket never opens.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
    cookies: Cookies,
) -> Result<Response, ApiError> {
    let auth_state = app_state.auth_state();
    let session_id = session_id_from_cookies(&cookies, &auth_state.cookie_name);

    let auth_user = authenticate(&auth_state, session_id.as_deref())
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "WebSocket auth failed"))?;

    tracing::info!(
        user_id = %auth_user.id(),
        role = %auth_user.role(),
        "WebSocket connection upgrade requested"
    );

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, auth_user.user, app_state)))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, user: User, app_state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Create channel for sending events to this connection
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let ws_state = app_state.ws_state.clone();
    let conn = ws_state.add_connection(Connection::new(&user, tx)).await;
    let connection_id = conn.connection_id;

    // Spawn task to send messages to client
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(Message::Text(json)).await.is_err() {
                        break; // Connection closed
                    }
                }
                Err(e) => {
                    tracing::error!(error = ?e, "Failed to serialize WebSocket event");
                }
            }
        }
    });

    // Handle incoming messages
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(error = ?e, connection_id = %connection_id, "WebSocket receive error");
                break;
            }
        };

        match msg {
            Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => handle_client_event(event, &conn, &app_state).await,
                Err(e) => {
                    tracing::warn!(
                        error = ?e,
                        connection_id = %connection_id,
                        frame_len = text.len(),
                        "Failed to parse client event"
                    );
                    let _ = conn.send(ServerEvent::error("Invalid event format"));
                }
            },
            Message::Close(_) => {
                tracing::info!(connection_id = %connection_id, "WebSocket close frame received");
                break;
            }
            // Axum answers protocol pings itself; binary frames are not part of the protocol
            Message::Ping(_) | Message::Pong(_) | Message::Binary(_) => {}
        }
    }

    // Cleanup on disconnect
    tracing::info!(
        connection_id = %connection_id,
        user_id = %user.id,
        "WebSocket connection closing"
    );
    ws_state.remove_connection(&connection_id).await;
    send_task.abort();
}

/// Handle client event
async fn handle_client_event(event: ClientEvent, conn: &Arc<Connection>, app_state: &AppState) {
    match event {
        ClientEvent::JoinTicket(ticket_id) => {
            app_state
                .ws_state
                .join_ticket(conn, &ticket_id, app_state.tickets.as_ref())
                .await;
        }
        ClientEvent::LeaveTicket(ticket_id) => {
            app_state.ws_state.leave_ticket(conn, &ticket_id).await;
        }
        ClientEvent::Ping => {
            let _ = conn.send(ServerEvent::Pong);
        }
    }
}
