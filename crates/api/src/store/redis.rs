//! Redis-backed session lookup
//!
//! The login flow writes one JSON document per session under
//! `<prefix><session id>`. This adapter only reads them; a session without a
//! `userId` (anonymous or logged out) resolves to no user.

use ::redis::{aio::ConnectionManager, AsyncCommands, Client};
use async_trait::async_trait;
use helpdesk_shared::UserId;
use serde::Deserialize;
use uuid::Uuid;

use super::{SessionStore, StoreResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionDocument {
    #[serde(default)]
    user_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisSessionStore {
    pub async fn connect(redis_url: &str, key_prefix: &str) -> StoreResult<Self> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self {
            conn,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn key(&self, session_id: &str) -> String {
        format!("{}{}", self.key_prefix, session_id)
    }
}

/// Extract the user bound to a raw session document
fn user_from_document(raw: &str) -> Option<UserId> {
    match serde_json::from_str::<SessionDocument>(raw) {
        Ok(doc) => doc.user_id.map(UserId::from),
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable session document");
            None
        }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn resolve(&self, session_id: &str) -> StoreResult<Option<UserId>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(self.key(session_id)).await?;
        Ok(raw.as_deref().and_then(user_from_document))
    }
}
