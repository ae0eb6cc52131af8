//! In-process implementation of every store trait
//!
//! Backs handler tests and local runs without Postgres or Redis. All state
//! sits behind a single lock so a status update and its history row are
//! applied together.

use std::collections::HashMap;

use async_trait::async_trait;
use helpdesk_shared::{
    Message, NewMessage, NewTicket, StatusHistoryEntry, Ticket, TicketId, TicketStatus, User,
    UserId,
};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    MessageStore, SessionStore, StatusUpdate, StoreResult, TicketFilter, TicketStore, UserStore,
};

#[derive(Default)]
struct Inner {
    tickets: HashMap<TicketId, Ticket>,
    messages: Vec<Message>,
    history: Vec<StatusHistoryEntry>,
    users: HashMap<UserId, User>,
    sessions: HashMap<String, UserId>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) {
        self.inner.write().await.users.insert(user.id, user);
    }

    pub async fn remove_user(&self, id: &UserId) {
        self.inner.write().await.users.remove(id);
    }

    /// Bind a session id to a user, as the login flow would
    pub async fn insert_session(&self, session_id: &str, user_id: UserId) {
        self.inner
            .write()
            .await
            .sessions
            .insert(session_id.to_string(), user_id);
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn create(&self, ticket: NewTicket) -> StoreResult<Ticket> {
        let now = OffsetDateTime::now_utc();
        let ticket = Ticket {
            id: TicketId::new(),
            student_id: ticket.student_id,
            category: ticket.category,
            service: ticket.service,
            priority: ticket.priority,
            status: TicketStatus::New,
            summary: ticket.summary,
            description: ticket.description,
            assignee_id: None,
            created_at: now,
            updated_at: now,
        };
        self.inner
            .write()
            .await
            .tickets
            .insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    async fn find_by_id(&self, id: TicketId) -> StoreResult<Option<Ticket>> {
        Ok(self.inner.read().await.tickets.get(&id).cloned())
    }

    async fn list(&self, filter: TicketFilter) -> StoreResult<Vec<Ticket>> {
        let inner = self.inner.read().await;
        let mut tickets: Vec<Ticket> = inner
            .tickets
            .values()
            .filter(|t| filter.student_id.map_or(true, |id| t.student_id == id))
            .filter(|t| filter.status.map_or(true, |s| t.status == s))
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tickets.truncate(usize::try_from(filter.limit).unwrap_or(0));
        Ok(tickets)
    }

    async fn update_status(
        &self,
        id: TicketId,
        expected: TicketStatus,
        update: StatusUpdate,
    ) -> StoreResult<Option<(Ticket, StatusHistoryEntry)>> {
        let mut inner = self.inner.write().await;
        let now = OffsetDateTime::now_utc();

        let ticket = match inner.tickets.get_mut(&id) {
            Some(ticket) if ticket.status == expected => {
                ticket.status = update.to;
                ticket.updated_at = now;
                ticket.clone()
            }
            _ => return Ok(None),
        };

        let entry = StatusHistoryEntry {
            id: Uuid::new_v4(),
            ticket_id: id,
            from_status: expected,
            to_status: update.to,
            actor_id: update.actor_id,
            reason: update.reason,
            created_at: now,
        };
        inner.history.push(entry.clone());

        Ok(Some((ticket, entry)))
    }

    async fn assign(&self, id: TicketId, assignee: Option<UserId>) -> StoreResult<Option<Ticket>> {
        let mut inner = self.inner.write().await;
        Ok(inner.tickets.get_mut(&id).map(|ticket| {
            ticket.assignee_id = assignee;
            ticket.updated_at = OffsetDateTime::now_utc();
            ticket.clone()
        }))
    }

    async fn history(&self, id: TicketId) -> StoreResult<Vec<StatusHistoryEntry>> {
        let inner = self.inner.read().await;
        Ok(inner
            .history
            .iter()
            .filter(|e| e.ticket_id == id)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert(&self, message: NewMessage) -> StoreResult<Message> {
        let message = Message {
            id: Uuid::new_v4(),
            ticket_id: message.ticket_id,
            sender_role: message.sender_role,
            sender_name: message.sender_name,
            body: message.body,
            is_internal_note: message.is_internal_note,
            created_at: OffsetDateTime::now_utc(),
        };
        self.inner.write().await.messages.push(message.clone());
        Ok(message)
    }

    async fn find_by_ticket(&self, ticket_id: TicketId) -> StoreResult<Vec<Message>> {
        let inner = self.inner.read().await;
        Ok(inner
            .messages
            .iter()
            .filter(|m| m.ticket_id == ticket_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn resolve(&self, session_id: &str) -> StoreResult<Option<UserId>> {
        Ok(self.inner.read().await.sessions.get(session_id).copied())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_shared::{TicketCategory, TicketPriority};

    fn new_ticket(student_id: UserId) -> NewTicket {
        NewTicket {
            student_id,
            category: TicketCategory::InformationTechnology,
            service: Some("Wi-Fi".to_string()),
            priority: TicketPriority::Medium,
            summary: "Cannot connect".to_string(),
            description: "Campus Wi-Fi rejects my login".to_string(),
        }
    }

    #[tokio::test]
    async fn test_update_status_appends_history_once() {
        let store = MemoryStore::new();
        let ticket = store.create(new_ticket(UserId::new())).await.unwrap();
        let update = StatusUpdate {
            to: TicketStatus::Waiting,
            actor_id: UserId::new(),
            reason: Some("Need student reply".to_string()),
        };

        let (updated, entry) = store
            .update_status(ticket.id, TicketStatus::New, update.clone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, TicketStatus::Waiting);
        assert_eq!(entry.from_status, TicketStatus::New);

        // Stale expectation loses and writes nothing
        let stale = store
            .update_status(ticket.id, TicketStatus::New, update)
            .await
            .unwrap();
        assert!(stale.is_none());
        assert_eq!(store.history(ticket.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_filters_by_owner_and_status() {
        let store = MemoryStore::new();
        let alice = UserId::new();
        store.create(new_ticket(alice)).await.unwrap();
        store.create(new_ticket(alice)).await.unwrap();
        store.create(new_ticket(UserId::new())).await.unwrap();

        let own = store
            .list(TicketFilter {
                student_id: Some(alice),
                status: None,
                limit: 50,
            })
            .await
            .unwrap();
        assert_eq!(own.len(), 2);

        let resolved = store
            .list(TicketFilter {
                student_id: None,
                status: Some(TicketStatus::Resolved),
                limit: 50,
            })
            .await
            .unwrap();
        assert!(resolved.is_empty());
    }
}
