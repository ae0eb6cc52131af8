//! WebSocket connection management
//!
//! Represents an authenticated WebSocket connection with subscription tracking.

use std::collections::HashSet;
use std::sync::Arc;

use helpdesk_shared::{Role, TicketId, User, UserId};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use super::events::ServerEvent;

/// Represents an active WebSocket connection
///
/// The user id and role are fixed when the socket is authenticated. A role
/// change elsewhere only takes effect once the client reconnects.
#[derive(Debug)]
pub struct Connection {
    /// Unique ID for this connection
    pub connection_id: Uuid,

    /// Authenticated user ID
    pub user_id: UserId,

    /// Role at authentication time; decides internal note delivery
    pub role: Role,

    /// Channel to send events to this connection
    sender: mpsc::UnboundedSender<ServerEvent>,

    /// Tickets this connection has joined; drives room cleanup on disconnect
    subscriptions: Arc<RwLock<HashSet<TicketId>>>,
}

impl Connection {
    /// Create a new connection for an authenticated user
    pub fn new(user: &User, sender: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self {
            connection_id: Uuid::new_v4(),
            user_id: user.id,
            role: user.role,
            sender,
            subscriptions: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }

    /// Send an event to this connection
    ///
    /// Returns Err if the connection's writer has gone away
    #[allow(clippy::result_large_err)] // Error type is from tokio mpsc, containing the failed event
    pub fn send(&self, event: ServerEvent) -> Result<(), mpsc::error::SendError<ServerEvent>> {
        self.sender.send(event)
    }

    pub async fn subscribe(&self, ticket_id: TicketId) {
        self.subscriptions.write().await.insert(ticket_id);
    }

    pub async fn unsubscribe(&self, ticket_id: &TicketId) {
        self.subscriptions.write().await.remove(ticket_id);
    }

    pub async fn get_subscriptions(&self) -> HashSet<TicketId> {
        self.subscriptions.read().await.clone()
    }
}
