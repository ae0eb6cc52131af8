//! Persistence collaborators
//!
//! The ticket lifecycle and the broadcaster only talk to these traits. The
//! production adapters live in [`postgres`] (tickets, messages, users) and
//! [`redis`] (sessions written by the login flow); [`memory`] implements every
//! trait in-process for tests and local development.

use async_trait::async_trait;
use helpdesk_shared::{
    Message, NewMessage, NewTicket, SharedError, StatusHistoryEntry, Ticket, TicketId,
    TicketStatus, User, UserId,
};
use thiserror::Error;

pub mod memory;
pub mod postgres;
pub mod redis;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use redis::RedisSessionStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session store error: {0}")]
    Session(#[from] ::redis::RedisError),

    /// A stored value no longer matches the domain model
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl From<SharedError> for StoreError {
    fn from(err: SharedError) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Ticket listing filter
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    /// Restrict to tickets owned by this student
    pub student_id: Option<UserId>,
    pub status: Option<TicketStatus>,
    pub limit: i64,
}

/// A status change that has already passed the transition policy
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub to: TicketStatus,
    pub actor_id: UserId,
    pub reason: Option<String>,
}

#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn create(&self, ticket: NewTicket) -> StoreResult<Ticket>;

    async fn find_by_id(&self, id: TicketId) -> StoreResult<Option<Ticket>>;

    /// Newest first
    async fn list(&self, filter: TicketFilter) -> StoreResult<Vec<Ticket>>;

    /// Move the ticket from `expected` to `update.to` and append the history
    /// row as one atomic unit.
    ///
    /// Returns `None` when the ticket does not exist or its status is no
    /// longer `expected`.
    async fn update_status(
        &self,
        id: TicketId,
        expected: TicketStatus,
        update: StatusUpdate,
    ) -> StoreResult<Option<(Ticket, StatusHistoryEntry)>>;

    async fn assign(&self, id: TicketId, assignee: Option<UserId>) -> StoreResult<Option<Ticket>>;

    /// Chronological
    async fn history(&self, id: TicketId) -> StoreResult<Vec<StatusHistoryEntry>>;

    async fn health_check(&self) -> StoreResult<()>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert(&self, message: NewMessage) -> StoreResult<Message>;

    /// Chronological
    async fn find_by_ticket(&self, ticket_id: TicketId) -> StoreResult<Vec<Message>>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// User bound to a session, if the session exists and is logged in
    async fn resolve(&self, session_id: &str) -> StoreResult<Option<UserId>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>>;
}
