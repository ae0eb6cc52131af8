//! Process-wide WebSocket state
//!
//! Built once at startup and carried in `AppState`. HTTP mutation handlers
//! call [`WebSocketState::broadcast_message`] and
//! [`WebSocketState::broadcast_status_change`] after a successful write;
//! socket tasks call the join/leave operations.

use std::collections::HashMap;
use std::sync::Arc;

use helpdesk_shared::{can_access_ticket, Message, StatusChange, TicketId, User};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::connection::Connection;
use super::events::{MessageEventPayload, RoomAck, ServerEvent};
use super::room::RoomManager;
use crate::store::TicketStore;

/// Sent for unknown, malformed and foreign ticket ids alike so clients
/// cannot probe which tickets exist.
pub const JOIN_DENIED: &str = "Access denied to ticket";

/// Global WebSocket state shared across all connections
#[derive(Clone)]
pub struct WebSocketState {
    /// All active connections indexed by connection_id
    connections: Arc<RwLock<HashMap<Uuid, Arc<Connection>>>>,

    /// Room manager for ticket subscriptions
    pub rooms: Arc<RoomManager>,
}

impl WebSocketState {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
            rooms: Arc::new(RoomManager::new()),
        }
    }

    /// Register an authenticated connection
    pub async fn add_connection(&self, conn: Connection) -> Arc<Connection> {
        let conn = Arc::new(conn);
        let mut connections = self.connections.write().await;
        connections.insert(conn.connection_id, Arc::clone(&conn));

        tracing::info!(
            connection_id = %conn.connection_id,
            user_id = %conn.user_id,
            role = %conn.role,
            total_connections = connections.len(),
            "WebSocket connection added"
        );

        conn
    }

    /// Drop a connection and its membership in every room it joined
    pub async fn remove_connection(&self, connection_id: &Uuid) {
        let (conn, remaining) = {
            let mut connections = self.connections.write().await;
            (connections.remove(connection_id), connections.len())
        };
        let Some(conn) = conn else {
            return;
        };

        let subscriptions = conn.get_subscriptions().await;
        for ticket_id in &subscriptions {
            self.rooms.leave(ticket_id, connection_id).await;
        }

        tracing::info!(
            connection_id = %connection_id,
            user_id = %conn.user_id,
            rooms_left = subscriptions.len(),
            remaining_connections = remaining,
            "WebSocket connection removed"
        );
    }

    /// Handle a `join-ticket` request
    ///
    /// Students may only join tickets they own; staff may join any existing
    /// ticket. On success the requester alone receives `joined-ticket`;
    /// every failure leaves room membership untouched and answers with an
    /// `error` event.
    pub async fn join_ticket(&self, conn: &Arc<Connection>, raw_ticket_id: &str, tickets: &dyn TicketStore) {
        let Ok(ticket_id) = raw_ticket_id.parse::<TicketId>() else {
            tracing::warn!(connection_id = %conn.connection_id, "Join rejected: malformed ticket id");
            let _ = conn.send(ServerEvent::error(JOIN_DENIED));
            return;
        };

        let ticket = match tickets.find_by_id(ticket_id).await {
            Ok(ticket) => ticket,
            Err(e) => {
                tracing::error!(error = ?e, ticket_id = %ticket_id, "Failed to verify ticket access");
                let _ = conn.send(ServerEvent::error("Failed to verify access"));
                return;
            }
        };

        let requester = User {
            id: conn.user_id,
            role: conn.role,
            display_name: String::new(),
        };
        let allowed = ticket
            .as_ref()
            .is_some_and(|ticket| can_access_ticket(&requester, ticket));

        if !allowed {
            tracing::warn!(
                connection_id = %conn.connection_id,
                user_id = %conn.user_id,
                ticket_id = %ticket_id,
                ticket_exists = ticket.is_some(),
                "Join rejected"
            );
            let _ = conn.send(ServerEvent::error(JOIN_DENIED));
            return;
        }

        conn.subscribe(ticket_id).await;
        self.rooms.join(ticket_id, Arc::clone(conn)).await;
        let _ = conn.send(ServerEvent::JoinedTicket(RoomAck::for_ticket(&ticket_id)));
    }

    /// Handle a `leave-ticket` request; always acknowledged
    pub async fn leave_ticket(&self, conn: &Arc<Connection>, raw_ticket_id: &str) {
        let ack = match raw_ticket_id.parse::<TicketId>() {
            Ok(ticket_id) => {
                conn.unsubscribe(&ticket_id).await;
                self.rooms.leave(&ticket_id, &conn.connection_id).await;
                RoomAck::for_ticket(&ticket_id)
            }
            Err(_) => RoomAck {
                ticket_id: raw_ticket_id.to_string(),
                room: format!("ticket:{}", raw_ticket_id),
            },
        };
        let _ = conn.send(ServerEvent::LeftTicket(ack));
    }

    /// Fan out a newly created message to its ticket's room
    ///
    /// Internal notes only reach staff connections; the check runs per
    /// recipient so a shared room never leaks them to students.
    pub async fn broadcast_message(&self, message: &Message) -> usize {
        let event = ServerEvent::NewMessage(MessageEventPayload::from(message));
        if message.is_internal_note {
            self.rooms
                .broadcast_filtered(&message.ticket_id, event, Connection::is_staff)
                .await
        } else {
            self.rooms.broadcast(&message.ticket_id, event).await
        }
    }

    /// Fan out an accepted status change to everyone in the ticket's room
    pub async fn broadcast_status_change(&self, change: StatusChange) -> usize {
        let ticket_id = change.ticket_id;
        self.rooms
            .broadcast(&ticket_id, ServerEvent::StatusChanged(change))
            .await
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn get_stats(&self) -> WebSocketStats {
        WebSocketStats {
            active_connections: self.connection_count().await,
            active_rooms: self.rooms.get_room_count().await,
        }
    }
}

impl Default for WebSocketState {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about WebSocket connections
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSocketStats {
    pub active_connections: usize,
    pub active_rooms: usize,
}
