//! Ticket room management for pub/sub
//!
//! Manages ticket "rooms" for broadcasting events to all subscribers. Rooms
//! hold students and staff side by side; confidentiality is enforced per
//! recipient at send time through [`RoomManager::broadcast_filtered`].

use std::collections::HashMap;
use std::sync::Arc;

use helpdesk_shared::TicketId;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::connection::Connection;
use super::events::ServerEvent;

/// Manages ticket "rooms" for broadcasting events
pub struct RoomManager {
    /// Map of ticket_id -> connections in that ticket's room
    rooms: Arc<RwLock<HashMap<TicketId, Vec<Arc<Connection>>>>>,
}

impl RoomManager {
    /// Create a new room manager
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Add a connection to a ticket room; joining twice is a no-op
    pub async fn join(&self, ticket_id: TicketId, conn: Arc<Connection>) {
        let mut rooms = self.rooms.write().await;
        let members = rooms.entry(ticket_id).or_default();
        if !members.iter().any(|c| c.connection_id == conn.connection_id) {
            members.push(Arc::clone(&conn));
        }

        tracing::debug!(
            ticket_id = %ticket_id,
            connection_id = %conn.connection_id,
            room_size = members.len(),
            "Connection joined ticket room"
        );
    }

    /// Remove a connection from a ticket room
    pub async fn leave(&self, ticket_id: &TicketId, connection_id: &Uuid) {
        let mut rooms = self.rooms.write().await;
        if let Some(conns) = rooms.get_mut(ticket_id) {
            conns.retain(|c| c.connection_id != *connection_id);

            // Clean up empty rooms
            if conns.is_empty() {
                rooms.remove(ticket_id);
                tracing::debug!(ticket_id = %ticket_id, "Removed empty ticket room");
            } else {
                tracing::debug!(
                    ticket_id = %ticket_id,
                    connection_id = %connection_id,
                    room_size = conns.len(),
                    "Connection left ticket room"
                );
            }
        }
    }

    /// Broadcast an event to all connections in a ticket room
    ///
    /// Returns the number of connections the event was handed to.
    pub async fn broadcast(&self, ticket_id: &TicketId, event: ServerEvent) -> usize {
        self.broadcast_filtered(ticket_id, event, |_| true).await
    }

    /// Broadcast an event to the connections in a ticket room that pass `filter`
    ///
    /// Send errors are logged and skipped; closed connections are cleaned up
    /// by their own socket task.
    pub async fn broadcast_filtered<F>(
        &self,
        ticket_id: &TicketId,
        event: ServerEvent,
        filter: F,
    ) -> usize
    where
        F: Fn(&Connection) -> bool,
    {
        let rooms = self.rooms.read().await;
        let Some(conns) = rooms.get(ticket_id) else {
            tracing::debug!(
                ticket_id = %ticket_id,
                event = event.name(),
                "No subscribers for ticket"
            );
            return 0;
        };

        let mut success_count = 0;
        let mut failed_count = 0;
        let mut skipped_count = 0;

        for conn in conns {
            if !filter(conn) {
                skipped_count += 1;
                continue;
            }
            match conn.send(event.clone()) {
                Ok(()) => success_count += 1,
                Err(_) => {
                    failed_count += 1;
                    tracing::warn!(
                        connection_id = %conn.connection_id,
                        "Failed to send event to connection (likely closed)"
                    );
                }
            }
        }

        tracing::debug!(
            ticket_id = %ticket_id,
            event = event.name(),
            recipients = success_count,
            skipped = skipped_count,
            failed = failed_count,
            "Broadcast event to ticket room"
        );

        success_count
    }

    /// Get room size (number of connections) for a ticket
    pub async fn get_room_size(&self, ticket_id: &TicketId) -> usize {
        let rooms = self.rooms.read().await;
        rooms.get(ticket_id).map(|v| v.len()).unwrap_or(0)
    }

    /// Get total number of active rooms
    pub async fn get_room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_shared::{Role, User, UserId};
    use tokio::sync::mpsc;

    fn connection(role: Role) -> (Arc<Connection>, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let user = User {
            id: UserId::new(),
            role,
            display_name: "Test".to_string(),
        };
        (Arc::new(Connection::new(&user, tx)), rx)
    }

    #[tokio::test]
    async fn test_room_join_and_leave() {
        let room_manager = RoomManager::new();
        let ticket_id = TicketId::new();
        let (conn, _rx) = connection(Role::Student);

        assert_eq!(room_manager.get_room_size(&ticket_id).await, 0);

        room_manager.join(ticket_id, Arc::clone(&conn)).await;
        room_manager.join(ticket_id, Arc::clone(&conn)).await;
        assert_eq!(room_manager.get_room_size(&ticket_id).await, 1);

        room_manager.leave(&ticket_id, &conn.connection_id).await;
        assert_eq!(room_manager.get_room_size(&ticket_id).await, 0);
        assert_eq!(room_manager.get_room_count().await, 0);
    }

    #[tokio::test]
    async fn test_broadcast_to_room() {
        let room_manager = RoomManager::new();
        let ticket_id = TicketId::new();
        let (conn1, mut rx1) = connection(Role::Student);
        let (conn2, mut rx2) = connection(Role::Staff);

        room_manager.join(ticket_id, conn1).await;
        room_manager.join(ticket_id, conn2).await;

        let delivered = room_manager.broadcast(&ticket_id, ServerEvent::Pong).await;
        assert_eq!(delivered, 2);
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_filtered_broadcast_skips_rejected_recipients() {
        let room_manager = RoomManager::new();
        let ticket_id = TicketId::new();
        let (student, mut student_rx) = connection(Role::Student);
        let (staff, mut staff_rx) = connection(Role::Staff);

        room_manager.join(ticket_id, staff).await;
        room_manager.join(ticket_id, student).await;

        let delivered = room_manager
            .broadcast_filtered(&ticket_id, ServerEvent::Pong, |c| c.is_staff())
            .await;
        assert_eq!(delivered, 1);
        assert!(staff_rx.try_recv().is_ok());
        assert!(student_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_connection_does_not_block_others() {
        let room_manager = RoomManager::new();
        let ticket_id = TicketId::new();
        let (closed, closed_rx) = connection(Role::Student);
        let (open, mut open_rx) = connection(Role::Staff);
        drop(closed_rx);

        room_manager.join(ticket_id, closed).await;
        room_manager.join(ticket_id, open).await;

        assert_eq!(room_manager.broadcast(&ticket_id, ServerEvent::Pong).await, 1);
        assert!(open_rx.try_recv().is_ok());
    }
}
