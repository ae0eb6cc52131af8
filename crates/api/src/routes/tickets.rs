//! Help desk ticket routes
//!
//! Ticket intake, the staff kanban board, status transitions, assignment and
//! the message thread. Every successful mutation that subscribers care about
//! is fanned out through the WebSocket broadcaster after it commits.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use helpdesk_shared::{
    can_access_ticket, is_valid_transition, redact, Message, NewMessage, NewTicket, SenderRole,
    StatusChange, StatusHistoryEntry, Ticket, TicketCategory, TicketId, TicketPriority,
    TicketStatus,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
    store::{StatusUpdate, TicketFilter},
};

const MIN_SUMMARY_CHARS: usize = 5;
const MAX_SUMMARY_CHARS: usize = 200;
const MIN_DESCRIPTION_CHARS: usize = 10;
const MAX_MESSAGE_CHARS: usize = 10_000;
const MAX_REASON_CHARS: usize = 1_000;
const MAX_TRANSCRIPT_ENTRIES: usize = 100;
const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 100;

/// Sender name recorded for AI intake turns
const AI_SENDER_NAME: &str = "AI Assistant";

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub category: TicketCategory,
    pub service: Option<String>,
    #[serde(default)]
    pub priority: TicketPriority,
    pub summary: String,
    pub description: String,
    /// Intake chat confirmed by the student, stored as public messages
    #[serde(default)]
    pub transcript: Vec<TranscriptEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptEntry {
    pub sender_role: SenderRole,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct ListTicketsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TicketsListResponse {
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Serialize)]
pub struct TicketDetailResponse {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Parsed by the handler so unknown values get a validation error body
    pub status: String,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssigneeRequest {
    pub assignee_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    pub body: String,
    #[serde(default)]
    pub is_internal_note: bool,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<StatusHistoryEntry>,
}

// =============================================================================
// Helpers
// =============================================================================

fn validate_length(field: &str, value: &str, min: usize, max: Option<usize>) -> ApiResult<()> {
    let len = value.trim().chars().count();
    if len < min {
        return Err(ApiError::Validation(format!(
            "{} must be at least {} characters",
            field, min
        )));
    }
    if let Some(max) = max {
        if len > max {
            return Err(ApiError::Validation(format!(
                "{} must be at most {} characters",
                field, max
            )));
        }
    }
    Ok(())
}

/// Load a ticket the caller may see
///
/// Foreign tickets are reported as missing so students cannot probe ids.
async fn load_accessible_ticket(
    state: &AppState,
    auth_user: &AuthUser,
    ticket_id: TicketId,
) -> ApiResult<Ticket> {
    let ticket = state
        .tickets
        .find_by_id(ticket_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    if !can_access_ticket(&auth_user.user, &ticket) {
        tracing::warn!(
            ticket_id = %ticket_id,
            user_id = %auth_user.id(),
            "Ticket access denied"
        );
        return Err(ApiError::NotFound);
    }

    Ok(ticket)
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a ticket from a confirmed intake
pub async fn create_ticket(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<CreateTicketRequest>,
) -> ApiResult<(StatusCode, Json<Ticket>)> {
    if auth_user.is_staff() {
        return Err(ApiError::Forbidden);
    }

    validate_length("Summary", &req.summary, MIN_SUMMARY_CHARS, Some(MAX_SUMMARY_CHARS))?;
    validate_length("Description", &req.description, MIN_DESCRIPTION_CHARS, None)?;

    if req.transcript.len() > MAX_TRANSCRIPT_ENTRIES {
        return Err(ApiError::Validation(format!(
            "Transcript must have at most {} entries",
            MAX_TRANSCRIPT_ENTRIES
        )));
    }
    for entry in &req.transcript {
        if entry.sender_role == SenderRole::Staff {
            return Err(ApiError::Validation(
                "Transcript entries must come from STUDENT or AI".into(),
            ));
        }
        validate_length("Transcript entry", &entry.body, 1, Some(MAX_MESSAGE_CHARS))?;
    }

    let service = req
        .service
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let ticket = state
        .tickets
        .create(NewTicket {
            student_id: auth_user.id(),
            category: req.category,
            service,
            priority: req.priority,
            summary: req.summary.trim().to_string(),
            description: req.description.trim().to_string(),
        })
        .await?;

    for entry in req.transcript {
        let sender_name = match entry.sender_role {
            SenderRole::Ai => AI_SENDER_NAME.to_string(),
            _ => auth_user.user.display_name.clone(),
        };
        state
            .messages
            .insert(NewMessage {
                ticket_id: ticket.id,
                sender_role: entry.sender_role,
                sender_name,
                body: entry.body,
                is_internal_note: false,
            })
            .await?;
    }

    tracing::info!(
        ticket_id = %ticket.id,
        student_id = %ticket.student_id,
        category = %ticket.category,
        summary = %redact::preview(&ticket.summary, 80),
        "Ticket created"
    );

    Ok((StatusCode::CREATED, Json(ticket)))
}

/// List tickets; students see their own, staff see the whole board
pub async fn list_tickets(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<ListTicketsQuery>,
) -> ApiResult<Json<TicketsListResponse>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<TicketStatus>)
        .transpose()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    let student_id = (!auth_user.is_staff()).then(|| auth_user.id());

    let tickets = state
        .tickets
        .list(TicketFilter {
            student_id,
            status,
            limit,
        })
        .await?;

    Ok(Json(TicketsListResponse { tickets }))
}

/// Ticket with its message thread
pub async fn get_ticket(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(ticket_id): Path<TicketId>,
) -> ApiResult<Json<TicketDetailResponse>> {
    let ticket = load_accessible_ticket(&state, &auth_user, ticket_id).await?;

    let mut messages = state.messages.find_by_ticket(ticket_id).await?;
    if !auth_user.is_staff() {
        messages.retain(|m| !m.is_internal_note);
    }

    Ok(Json(TicketDetailResponse { ticket, messages }))
}

/// Move a ticket along its lifecycle (staff only)
pub async fn update_status(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(ticket_id): Path<TicketId>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<Ticket>> {
    auth_user.require_staff()?;

    let to: TicketStatus = req
        .status
        .parse()
        .map_err(|e: helpdesk_shared::SharedError| ApiError::Validation(e.to_string()))?;

    let reason = req
        .reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    if let Some(reason) = &reason {
        validate_length("Reason", reason, 1, Some(MAX_REASON_CHARS))?;
    }

    let ticket = state
        .tickets
        .find_by_id(ticket_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let from = ticket.status;

    // Re-sending the current status is accepted but records nothing
    if from == to {
        return Ok(Json(ticket));
    }

    if !is_valid_transition(from, to) {
        tracing::info!(
            ticket_id = %ticket_id,
            from = %from,
            to = %to,
            "Rejected status transition"
        );
        return Err(ApiError::InvalidTransition { from, to });
    }

    let (updated, entry) = state
        .tickets
        .update_status(
            ticket_id,
            from,
            StatusUpdate {
                to,
                actor_id: auth_user.id(),
                reason,
            },
        )
        .await?
        .ok_or_else(|| ApiError::Conflict("Ticket status was changed by someone else".into()))?;

    let recipients = state
        .ws_state
        .broadcast_status_change(StatusChange {
            ticket_id,
            old_status: entry.from_status,
            new_status: entry.to_status,
            changed_by: entry.actor_id,
            changed_at: entry.created_at,
        })
        .await;

    tracing::info!(
        ticket_id = %ticket_id,
        staff_id = %auth_user.id(),
        from = %from,
        to = %to,
        recipients,
        "Ticket status updated"
    );

    Ok(Json(updated))
}

/// Assign or unassign a ticket (staff only)
pub async fn update_assignee(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(ticket_id): Path<TicketId>,
    Json(req): Json<UpdateAssigneeRequest>,
) -> ApiResult<Json<Ticket>> {
    auth_user.require_staff()?;

    let assignee = match req.assignee_id {
        Some(id) => {
            let user = state
                .users
                .find_by_id(id.into())
                .await?
                .ok_or_else(|| ApiError::Validation("Assignee not found".into()))?;
            if !user.is_staff() {
                return Err(ApiError::Validation(
                    "Assignee must be a staff member".into(),
                ));
            }
            Some(user.id)
        }
        None => None,
    };

    let ticket = state
        .tickets
        .assign(ticket_id, assignee)
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(
        ticket_id = %ticket_id,
        staff_id = %auth_user.id(),
        assignee_id = ?assignee.map(|id| id.to_string()),
        "Ticket assignee updated"
    );

    Ok(Json(ticket))
}

/// Post a reply or internal note to a ticket thread
pub async fn post_message(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(ticket_id): Path<TicketId>,
    Json(req): Json<PostMessageRequest>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    let ticket = load_accessible_ticket(&state, &auth_user, ticket_id).await?;

    if req.is_internal_note && !auth_user.is_staff() {
        return Err(ApiError::Forbidden);
    }

    validate_length("Message", &req.body, 1, Some(MAX_MESSAGE_CHARS))?;

    let message = state
        .messages
        .insert(NewMessage {
            ticket_id: ticket.id,
            sender_role: auth_user.role().into(),
            sender_name: auth_user.user.display_name.clone(),
            body: req.body,
            is_internal_note: req.is_internal_note,
        })
        .await?;

    let recipients = state.ws_state.broadcast_message(&message).await;

    tracing::info!(
        ticket_id = %ticket_id,
        message_id = %message.id,
        sender_role = %message.sender_role,
        internal = message.is_internal_note,
        recipients,
        preview = %redact::preview(&message.body, 80),
        "Ticket message posted"
    );

    Ok((StatusCode::CREATED, Json(message)))
}

/// Status history, oldest first (staff only)
pub async fn get_history(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(ticket_id): Path<TicketId>,
) -> ApiResult<Json<HistoryResponse>> {
    auth_user.require_staff()?;

    state
        .tickets
        .find_by_id(ticket_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let history = state.tickets.history(ticket_id).await?;
    Ok(Json(HistoryResponse { history }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use helpdesk_shared::{Role, User, UserId};
    use tokio::sync::mpsc;

    use crate::config::Config;
    use crate::store::MemoryStore;
    use crate::websocket::connection::Connection;
    use crate::websocket::events::ServerEvent;

    struct Harness {
        state: AppState,
        student: AuthUser,
        staff: AuthUser,
    }

    async fn harness() -> Harness {
        let store = Arc::new(MemoryStore::new());
        let student = User {
            id: UserId::new(),
            role: Role::Student,
            display_name: "Jordan Lee".to_string(),
        };
        let staff = User {
            id: UserId::new(),
            role: Role::Staff,
            display_name: "Registrar Office".to_string(),
        };
        store.insert_user(student.clone()).await;
        store.insert_user(staff.clone()).await;

        Harness {
            state: AppState::new(Config::default(), store.clone(), store),
            student: AuthUser { user: student },
            staff: AuthUser { user: staff },
        }
    }

    fn intake(summary: &str) -> CreateTicketRequest {
        CreateTicketRequest {
            category: TicketCategory::Registrar,
            service: Some("Transcripts".to_string()),
            priority: TicketPriority::default(),
            summary: summary.to_string(),
            description: "I need an official transcript sent to a graduate school".to_string(),
            transcript: Vec::new(),
        }
    }

    async fn open_ticket(h: &Harness) -> Ticket {
        let (status, Json(ticket)) = create_ticket(
            State(h.state.clone()),
            Extension(h.student.clone()),
            Json(intake("Transcript request")),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        ticket
    }

    async fn set_status(h: &Harness, ticket_id: TicketId, status: &str) -> ApiResult<Ticket> {
        update_status(
            State(h.state.clone()),
            Extension(h.staff.clone()),
            Path(ticket_id),
            Json(UpdateStatusRequest {
                status: status.to_string(),
                reason: None,
            }),
        )
        .await
        .map(|Json(t)| t)
    }

    async fn watch(
        h: &Harness,
        user: &AuthUser,
        ticket_id: TicketId,
    ) -> mpsc::UnboundedReceiver<ServerEvent> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let conn = h
            .state
            .ws_state
            .add_connection(Connection::new(&user.user, tx))
            .await;
        h.state
            .ws_state
            .join_ticket(&conn, &ticket_id.to_string(), h.state.tickets.as_ref())
            .await;
        assert!(matches!(rx.try_recv(), Ok(ServerEvent::JoinedTicket(_))));
        rx
    }

    #[tokio::test]
    async fn test_create_ticket_defaults() {
        let h = harness().await;
        let ticket = open_ticket(&h).await;

        assert_eq!(ticket.status, TicketStatus::New);
        assert_eq!(ticket.priority, TicketPriority::Medium);
        assert_eq!(ticket.student_id, h.student.id());
        assert!(ticket.assignee_id.is_none());
    }

    #[tokio::test]
    async fn test_create_ticket_validation() {
        let h = harness().await;

        let result = create_ticket(
            State(h.state.clone()),
            Extension(h.student.clone()),
            Json(intake("Hi")),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));

        let result = create_ticket(
            State(h.state.clone()),
            Extension(h.staff.clone()),
            Json(intake("Transcript request")),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Forbidden)));
    }

    #[tokio::test]
    async fn test_create_ticket_stores_transcript() {
        let h = harness().await;
        let mut req = intake("Transcript request");
        req.transcript = vec![
            TranscriptEntry {
                sender_role: SenderRole::Student,
                body: "I need my transcript".to_string(),
            },
            TranscriptEntry {
                sender_role: SenderRole::Ai,
                body: "Which school should receive it?".to_string(),
            },
        ];

        let (_, Json(ticket)) = create_ticket(State(h.state.clone()), Extension(h.student.clone()), Json(req))
            .await
            .unwrap();

        let messages = h.state.messages.find_by_ticket(ticket.id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender_name, "Jordan Lee");
        assert_eq!(messages[1].sender_role, SenderRole::Ai);
        assert!(messages.iter().all(|m| !m.is_internal_note));
    }

    #[tokio::test]
    async fn test_status_lifecycle() {
        let h = harness().await;
        let ticket = open_ticket(&h).await;
        let mut student_rx = watch(&h, &h.student, ticket.id).await;
        let mut staff_rx = watch(&h, &h.staff, ticket.id).await;

        let updated = set_status(&h, ticket.id, "IN_PROGRESS").await.unwrap();
        assert_eq!(updated.status, TicketStatus::InProgress);

        for rx in [&mut student_rx, &mut staff_rx] {
            match rx.try_recv() {
                Ok(ServerEvent::StatusChanged(change)) => {
                    assert_eq!(change.old_status, TicketStatus::New);
                    assert_eq!(change.new_status, TicketStatus::InProgress);
                    assert_eq!(change.changed_by, h.staff.id());
                }
                other => panic!("Expected status-changed, got {:?}", other),
            }
        }

        let result = set_status(&h, ticket.id, "NEW").await;
        assert!(matches!(
            result,
            Err(ApiError::InvalidTransition {
                from: TicketStatus::InProgress,
                to: TicketStatus::New
            })
        ));
        assert!(student_rx.try_recv().is_err());

        let history = h.state.tickets.history(ticket.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].to_status, TicketStatus::InProgress);
    }

    #[tokio::test]
    async fn test_same_status_is_a_noop() {
        let h = harness().await;
        let ticket = open_ticket(&h).await;
        let mut rx = watch(&h, &h.staff, ticket.id).await;

        let unchanged = set_status(&h, ticket.id, "NEW").await.unwrap();
        assert_eq!(unchanged.status, TicketStatus::New);
        assert!(rx.try_recv().is_err());
        assert!(h.state.tickets.history(ticket.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolved_is_terminal_and_unknown_rejected() {
        let h = harness().await;
        let ticket = open_ticket(&h).await;

        set_status(&h, ticket.id, "WAITING").await.unwrap();
        set_status(&h, ticket.id, "RESOLVED").await.unwrap();
        for next in ["NEW", "IN_PROGRESS", "WAITING"] {
            assert!(matches!(
                set_status(&h, ticket.id, next).await,
                Err(ApiError::InvalidTransition { .. })
            ));
        }

        assert!(matches!(
            set_status(&h, ticket.id, "CLOSED").await,
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_students_cannot_change_status() {
        let h = harness().await;
        let ticket = open_ticket(&h).await;

        let result = update_status(
            State(h.state.clone()),
            Extension(h.student.clone()),
            Path(ticket.id),
            Json(UpdateStatusRequest {
                status: "IN_PROGRESS".to_string(),
                reason: None,
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Forbidden)));
    }

    #[tokio::test]
    async fn test_internal_note_visibility() {
        let h = harness().await;
        let ticket = open_ticket(&h).await;
        let mut student_rx = watch(&h, &h.student, ticket.id).await;
        let mut staff_rx = watch(&h, &h.staff, ticket.id).await;

        post_message(
            State(h.state.clone()),
            Extension(h.staff.clone()),
            Path(ticket.id),
            Json(PostMessageRequest {
                body: "Check the hold on this account".to_string(),
                is_internal_note: true,
            }),
        )
        .await
        .unwrap();

        assert!(matches!(staff_rx.try_recv(), Ok(ServerEvent::NewMessage(_))));
        assert!(student_rx.try_recv().is_err());

        let Json(detail) = get_ticket(
            State(h.state.clone()),
            Extension(h.student.clone()),
            Path(ticket.id),
        )
        .await
        .unwrap();
        assert!(detail.messages.is_empty());

        let Json(detail) = get_ticket(
            State(h.state.clone()),
            Extension(h.staff.clone()),
            Path(ticket.id),
        )
        .await
        .unwrap();
        assert_eq!(detail.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_student_reply_and_internal_note_forbidden() {
        let h = harness().await;
        let ticket = open_ticket(&h).await;
        let mut staff_rx = watch(&h, &h.staff, ticket.id).await;

        let result = post_message(
            State(h.state.clone()),
            Extension(h.student.clone()),
            Path(ticket.id),
            Json(PostMessageRequest {
                body: "Secret".to_string(),
                is_internal_note: true,
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Forbidden)));

        let (_, Json(message)) = post_message(
            State(h.state.clone()),
            Extension(h.student.clone()),
            Path(ticket.id),
            Json(PostMessageRequest {
                body: "Any update?".to_string(),
                is_internal_note: false,
            }),
        )
        .await
        .unwrap();
        assert_eq!(message.sender_role, SenderRole::Student);
        assert!(matches!(staff_rx.try_recv(), Ok(ServerEvent::NewMessage(_))));
    }

    #[tokio::test]
    async fn test_foreign_ticket_is_not_found() {
        let h = harness().await;
        let ticket = open_ticket(&h).await;
        let stranger = AuthUser {
            user: User {
                id: UserId::new(),
                role: Role::Student,
                display_name: "Sam Doe".to_string(),
            },
        };

        let result = get_ticket(State(h.state.clone()), Extension(stranger.clone()), Path(ticket.id)).await;
        assert!(matches!(result, Err(ApiError::NotFound)));

        let Json(list) = list_tickets(
            State(h.state.clone()),
            Extension(stranger),
            Query(ListTicketsQuery {
                status: None,
                limit: None,
            }),
        )
        .await
        .unwrap();
        assert!(list.tickets.is_empty());
    }

    #[tokio::test]
    async fn test_staff_board_filters_by_status() {
        let h = harness().await;
        let first = open_ticket(&h).await;
        open_ticket(&h).await;
        set_status(&h, first.id, "IN_PROGRESS").await.unwrap();

        let Json(list) = list_tickets(
            State(h.state.clone()),
            Extension(h.staff.clone()),
            Query(ListTicketsQuery {
                status: Some("IN_PROGRESS".to_string()),
                limit: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(list.tickets.len(), 1);
        assert_eq!(list.tickets[0].id, first.id);

        let result = list_tickets(
            State(h.state.clone()),
            Extension(h.staff.clone()),
            Query(ListTicketsQuery {
                status: Some("OPEN".to_string()),
                limit: None,
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_assignee_must_be_staff() {
        let h = harness().await;
        let ticket = open_ticket(&h).await;

        let result = update_assignee(
            State(h.state.clone()),
            Extension(h.staff.clone()),
            Path(ticket.id),
            Json(UpdateAssigneeRequest {
                assignee_id: Some(h.student.id().0),
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));

        let Json(assigned) = update_assignee(
            State(h.state.clone()),
            Extension(h.staff.clone()),
            Path(ticket.id),
            Json(UpdateAssigneeRequest {
                assignee_id: Some(h.staff.id().0),
            }),
        )
        .await
        .unwrap();
        assert_eq!(assigned.assignee_id, Some(h.staff.id()));
    }

    #[tokio::test]
    async fn test_history_is_staff_only() {
        let h = harness().await;
        let ticket = open_ticket(&h).await;
        set_status(&h, ticket.id, "WAITING").await.unwrap();

        let result = get_history(State(h.state.clone()), Extension(h.student.clone()), Path(ticket.id)).await;
        assert!(matches!(result, Err(ApiError::Forbidden)));

        let Json(resp) = get_history(State(h.state.clone()), Extension(h.staff.clone()), Path(ticket.id))
            .await
            .unwrap();
        assert_eq!(resp.history.len(), 1);
        assert_eq!(resp.history[0].from_status, TicketStatus::New);
    }
}
