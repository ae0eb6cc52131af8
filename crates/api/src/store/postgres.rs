//! PostgreSQL adapter for tickets, messages, status history and users

use async_trait::async_trait;
use helpdesk_shared::{
    Message, NewMessage, NewTicket, Role, SenderRole, StatusHistoryEntry, Ticket, TicketCategory,
    TicketId, TicketPriority, TicketStatus, User, UserId,
};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    MessageStore, StatusUpdate, StoreError, StoreResult, TicketFilter, TicketStore, UserStore,
};

const TICKET_COLUMNS: &str = "id, student_id, category, service, priority, status, summary, \
                              description, assignee_id, created_at, updated_at";

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(Debug, FromRow)]
struct TicketRow {
    id: Uuid,
    student_id: Uuid,
    category: String,
    service: Option<String>,
    priority: String,
    status: String,
    summary: String,
    description: String,
    assignee_id: Option<Uuid>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = StoreError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        Ok(Ticket {
            id: row.id.into(),
            student_id: row.student_id.into(),
            category: row.category.parse::<TicketCategory>()?,
            service: row.service,
            priority: row.priority.parse::<TicketPriority>()?,
            status: row.status.parse::<TicketStatus>()?,
            summary: row.summary,
            description: row.description,
            assignee_id: row.assignee_id.map(UserId::from),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct MessageRow {
    id: Uuid,
    ticket_id: Uuid,
    sender_role: String,
    sender_name: String,
    body: String,
    is_internal_note: bool,
    created_at: OffsetDateTime,
}

impl TryFrom<MessageRow> for Message {
    type Error = StoreError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(Message {
            id: row.id,
            ticket_id: row.ticket_id.into(),
            sender_role: row.sender_role.parse::<SenderRole>()?,
            sender_name: row.sender_name,
            body: row.body,
            is_internal_note: row.is_internal_note,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct HistoryRow {
    id: Uuid,
    ticket_id: Uuid,
    from_status: String,
    to_status: String,
    actor_id: Uuid,
    reason: Option<String>,
    created_at: OffsetDateTime,
}

impl TryFrom<HistoryRow> for StatusHistoryEntry {
    type Error = StoreError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        Ok(StatusHistoryEntry {
            id: row.id,
            ticket_id: row.ticket_id.into(),
            from_status: row.from_status.parse::<TicketStatus>()?,
            to_status: row.to_status.parse::<TicketStatus>()?,
            actor_id: row.actor_id.into(),
            reason: row.reason,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    role: String,
    display_name: String,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id.into(),
            role: row.role.parse::<Role>()?,
            display_name: row.display_name,
        })
    }
}

// =============================================================================
// Store
// =============================================================================

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketStore for PgStore {
    async fn create(&self, ticket: NewTicket) -> StoreResult<Ticket> {
        let row: TicketRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO tickets (student_id, category, service, priority, status, summary, description)
            VALUES ($1, $2, $3, $4, 'NEW', $5, $6)
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(ticket.student_id.0)
        .bind(ticket.category.as_str())
        .bind(&ticket.service)
        .bind(ticket.priority.as_str())
        .bind(&ticket.summary)
        .bind(&ticket.description)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: TicketId) -> StoreResult<Option<Ticket>> {
        let row: Option<TicketRow> =
            sqlx::query_as(&format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1"))
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Ticket::try_from).transpose()
    }

    async fn list(&self, filter: TicketFilter) -> StoreResult<Vec<Ticket>> {
        let rows: Vec<TicketRow> = sqlx::query_as(&format!(
            r#"
            SELECT {TICKET_COLUMNS}
            FROM tickets
            WHERE ($1::uuid IS NULL OR student_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#
        ))
        .bind(filter.student_id.map(|id| id.0))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Ticket::try_from).collect()
    }

    async fn update_status(
        &self,
        id: TicketId,
        expected: TicketStatus,
        update: StatusUpdate,
    ) -> StoreResult<Option<(Ticket, StatusHistoryEntry)>> {
        let mut tx = self.pool.begin().await?;

        let row: Option<TicketRow> = sqlx::query_as(&format!(
            r#"
            UPDATE tickets
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(id.0)
        .bind(expected.as_str())
        .bind(update.to.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        let history: HistoryRow = sqlx::query_as(
            r#"
            INSERT INTO ticket_status_history (ticket_id, from_status, to_status, actor_id, reason)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, ticket_id, from_status, to_status, actor_id, reason, created_at
            "#,
        )
        .bind(id.0)
        .bind(expected.as_str())
        .bind(update.to.as_str())
        .bind(update.actor_id.0)
        .bind(&update.reason)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some((row.try_into()?, history.try_into()?)))
    }

    async fn assign(&self, id: TicketId, assignee: Option<UserId>) -> StoreResult<Option<Ticket>> {
        let row: Option<TicketRow> = sqlx::query_as(&format!(
            r#"
            UPDATE tickets
            SET assignee_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(id.0)
        .bind(assignee.map(|a| a.0))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Ticket::try_from).transpose()
    }

    async fn history(&self, id: TicketId) -> StoreResult<Vec<StatusHistoryEntry>> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            r#"
            SELECT id, ticket_id, from_status, to_status, actor_id, reason, created_at
            FROM ticket_status_history
            WHERE ticket_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(StatusHistoryEntry::try_from).collect()
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl MessageStore for PgStore {
    async fn insert(&self, message: NewMessage) -> StoreResult<Message> {
        let row: MessageRow = sqlx::query_as(
            r#"
            INSERT INTO ticket_messages (ticket_id, sender_role, sender_name, body, is_internal_note)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, ticket_id, sender_role, sender_name, body, is_internal_note, created_at
            "#,
        )
        .bind(message.ticket_id.0)
        .bind(message.sender_role.as_str())
        .bind(&message.sender_name)
        .bind(&message.body)
        .bind(message.is_internal_note)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_by_ticket(&self, ticket_id: TicketId) -> StoreResult<Vec<Message>> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            r#"
            SELECT id, ticket_id, sender_role, sender_name, body, is_internal_note, created_at
            FROM ticket_messages
            WHERE ticket_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(ticket_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Message::try_from).collect()
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, role, display_name FROM users WHERE id = $1")
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await?;

        row.map(User::try_from).transpose()
    }
}
