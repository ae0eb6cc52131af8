//! WebSocket support for real-time ticket updates
//!
//! Delivers new messages and status changes to every client currently
//! watching a ticket, keeping internal notes away from students.
//!
//! # Architecture
//!
//! - **Connection**: An authenticated WebSocket connection tagged with its user's role
//! - **Room**: Ticket-based pub/sub with per-recipient filtering
//! - **State**: The process-wide broadcaster shared by HTTP handlers and sockets
//! - **Handler**: Axum upgrade route; authenticates before the socket opens
//! - **Events**: Type-safe event definitions for client/server communication

pub mod connection;
pub mod events;
pub mod handler;
pub mod room;
pub mod state;

pub use handler::ws_handler;
pub use state::{WebSocketState, WebSocketStats};
