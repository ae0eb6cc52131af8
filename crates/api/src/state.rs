//! Application state shared across handlers

use std::sync::Arc;

use crate::{
    auth::AuthState,
    config::Config,
    store::{MessageStore, SessionStore, TicketStore, UserStore},
    websocket::WebSocketState,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tickets: Arc<dyn TicketStore>,
    pub messages: Arc<dyn MessageStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub users: Arc<dyn UserStore>,
    /// Real-time broadcaster; HTTP mutations fan out through it after commit
    pub ws_state: WebSocketState,
}

impl AppState {
    /// Build state from one store backing tickets, messages and users plus a
    /// separate session store
    pub fn new<S, Sess>(config: Config, store: Arc<S>, sessions: Arc<Sess>) -> Self
    where
        S: TicketStore + MessageStore + UserStore + 'static,
        Sess: SessionStore + 'static,
    {
        Self {
            config: Arc::new(config),
            tickets: store.clone(),
            messages: store.clone(),
            users: store,
            sessions,
            ws_state: WebSocketState::new(),
        }
    }

    pub fn auth_state(&self) -> AuthState {
        AuthState {
            sessions: self.sessions.clone(),
            users: self.users.clone(),
            cookie_name: self.config.session_cookie_name.clone(),
        }
    }
}
