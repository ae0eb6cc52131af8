//! Help Desk Shared Types and Utilities
//!
//! This crate contains the domain types, the ticket status transition policy,
//! the ticket access predicate and utilities shared by the help desk services.

pub mod access;
pub mod db;
pub mod error;
pub mod redact;
pub mod transitions;
pub mod types;

pub use access::can_access_ticket;
pub use db::*;
pub use error::*;
pub use transitions::{allowed_next, is_valid_transition, is_valid_transition_str};
pub use types::*;
