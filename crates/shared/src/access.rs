//! Ticket access predicate
//!
//! Shared by the HTTP handlers and the real-time join handler so both entry
//! points enforce the same rule.

use crate::types::{Role, Ticket, User};

/// Staff can access every ticket; students only the tickets they own.
pub fn can_access_ticket(user: &User, ticket: &Ticket) -> bool {
    match user.role {
        Role::Staff => true,
        Role::Student => ticket.student_id == user.id,
    }
}
