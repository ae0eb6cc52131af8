//! Campus Help Desk API Library
//!
//! Ticket lifecycle routes, session authentication and the real-time ticket
//! room broadcaster.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;
pub mod websocket;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
