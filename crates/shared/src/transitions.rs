//! Ticket status transition policy
//!
//! Pure functions deciding whether a ticket may move from one status to
//! another. Callers are responsible for rejecting the request (and skipping
//! both the store write and the broadcast) when a transition is not allowed.

use crate::types::TicketStatus;

/// Statuses reachable in one step from `from`, excluding `from` itself.
///
/// `RESOLVED` is terminal: reopening a resolved ticket is an administrative
/// operation outside this policy.
pub fn allowed_next(from: TicketStatus) -> &'static [TicketStatus] {
    use TicketStatus::*;

    match from {
        New => &[InProgress, Waiting],
        InProgress => &[Waiting, Resolved],
        Waiting => &[InProgress, Resolved],
        Resolved => &[],
    }
}

/// Whether a ticket in `from` may be moved to `to`.
///
/// Staying in the same status is always allowed.
pub fn is_valid_transition(from: TicketStatus, to: TicketStatus) -> bool {
    from == to || allowed_next(from).contains(&to)
}

/// String-level entry point for statuses read from untyped sources.
///
/// Any value that is not a known status is rejected rather than waved through.
pub fn is_valid_transition_str(from: &str, to: &str) -> bool {
    match (from.parse::<TicketStatus>(), to.parse::<TicketStatus>()) {
        (Ok(from), Ok(to)) => is_valid_transition(from, to),
        _ => false,
    }
}
