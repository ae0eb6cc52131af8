//! WebSocket event types and serialization
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}` with
//! kebab-case event names and camelCase payload fields.

use helpdesk_shared::{Message, SenderRole, StatusChange, TicketId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// Client-to-Server Events
// =============================================================================

/// Events sent from client to server
///
/// Ticket ids arrive as raw strings; malformed ids are answered with an
/// `error` event rather than failing the whole frame.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Subscribe to a ticket's room
    JoinTicket(String),

    /// Unsubscribe from a ticket's room
    LeaveTicket(String),

    /// Heartbeat ping to keep connection alive
    Ping,
}

// =============================================================================
// Server-to-Client Events
// =============================================================================

/// Events sent from server to client
#[derive(Debug, Serialize, Clone)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Join acknowledged (sent to the joining connection only)
    JoinedTicket(RoomAck),

    /// Leave acknowledged (sent to the leaving connection only)
    LeftTicket(RoomAck),

    /// Request failed for this connection
    Error { message: String },

    /// New message posted to the ticket
    NewMessage(MessageEventPayload),

    /// Ticket status changed
    StatusChanged(StatusChange),

    /// Heartbeat response
    Pong,
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error {
            message: message.into(),
        }
    }

    /// Event name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::JoinedTicket(_) => "joined-ticket",
            ServerEvent::LeftTicket(_) => "left-ticket",
            ServerEvent::Error { .. } => "error",
            ServerEvent::NewMessage(_) => "new-message",
            ServerEvent::StatusChanged(_) => "status-changed",
            ServerEvent::Pong => "pong",
        }
    }
}

// =============================================================================
// Event Data Structures
// =============================================================================

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomAck {
    pub ticket_id: String,
    pub room: String,
}

impl RoomAck {
    pub fn for_ticket(ticket_id: &TicketId) -> Self {
        Self {
            ticket_id: ticket_id.to_string(),
            room: ticket_id.room_name(),
        }
    }
}

/// Message event data
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MessageEventPayload {
    pub id: Uuid,
    pub ticket_id: TicketId,
    pub sender_role: SenderRole,
    pub sender_name: String,
    pub body: String,
    pub is_internal_note: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&Message> for MessageEventPayload {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            ticket_id: message.ticket_id,
            sender_role: message.sender_role,
            sender_name: message.sender_name.clone(),
            body: message.body.clone(),
            is_internal_note: message.is_internal_note,
            created_at: message.created_at,
        }
    }
}
