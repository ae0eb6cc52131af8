//! Common types used across the help desk

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::SharedError;

// =============================================================================
// ID Wrappers
// =============================================================================

/// User ID wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Ticket ID wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub Uuid);

impl TicketId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Name of the real-time room carrying this ticket's events
    pub fn room_name(&self) -> String {
        format!("ticket:{}", self.0)
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TicketId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for TicketId {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| SharedError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// Enumerations
// =============================================================================

/// Generates `as_str`, `FromStr` and `Display` for a fieldless enum whose
/// database and wire representation is a fixed string per variant.
macro_rules! string_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl FromStr for $ty {
            type Err = SharedError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($ty::$variant),)+
                    other => Err(SharedError::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Ticket lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    New,
    InProgress,
    Waiting,
    Resolved,
}

string_enum!(TicketStatus, "status", {
    New => "NEW",
    InProgress => "IN_PROGRESS",
    Waiting => "WAITING",
    Resolved => "RESOLVED",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
}

string_enum!(TicketPriority, "priority", {
    Low => "LOW",
    Medium => "MEDIUM",
    High => "HIGH",
});

/// Support category a ticket is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketCategory {
    #[serde(rename = "Information Technology")]
    InformationTechnology,
    #[serde(rename = "Learning Technologies")]
    LearningTechnologies,
    #[serde(rename = "Student Services")]
    StudentServices,
    #[serde(rename = "International Affairs")]
    InternationalAffairs,
    #[serde(rename = "Registrar")]
    Registrar,
    #[serde(rename = "Student Accounts")]
    StudentAccounts,
    #[serde(rename = "Financial Aid")]
    FinancialAid,
    #[serde(rename = "Alumni Affairs and Career Services")]
    AlumniAffairsAndCareerServices,
    #[serde(rename = "Military / Veterans")]
    MilitaryVeterans,
    #[serde(rename = "Student Life")]
    StudentLife,
    #[serde(rename = "Learning Experience Design (LXD) Team")]
    LearningExperienceDesign,
}

string_enum!(TicketCategory, "category", {
    InformationTechnology => "Information Technology",
    LearningTechnologies => "Learning Technologies",
    StudentServices => "Student Services",
    InternationalAffairs => "International Affairs",
    Registrar => "Registrar",
    StudentAccounts => "Student Accounts",
    FinancialAid => "Financial Aid",
    AlumniAffairsAndCareerServices => "Alumni Affairs and Career Services",
    MilitaryVeterans => "Military / Veterans",
    StudentLife => "Student Life",
    LearningExperienceDesign => "Learning Experience Design (LXD) Team",
});

/// Role of an authenticated user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Staff,
}

string_enum!(Role, "role", {
    Student => "STUDENT",
    Staff => "STAFF",
});

/// Author role recorded on a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SenderRole {
    Student,
    Staff,
    #[serde(rename = "AI")]
    Ai,
}

string_enum!(SenderRole, "sender role", {
    Student => "STUDENT",
    Staff => "STAFF",
    Ai => "AI",
});

impl From<Role> for SenderRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Student => SenderRole::Student,
            Role::Staff => SenderRole::Staff,
        }
    }
}

// =============================================================================
// Domain Records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub role: Role,
    pub display_name: String,
}

impl User {
    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub student_id: UserId,
    pub category: TicketCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub summary: String,
    pub description: String,
    pub assignee_id: Option<UserId>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Fields supplied when a ticket is created from a confirmed intake
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub student_id: UserId,
    pub category: TicketCategory,
    pub service: Option<String>,
    pub priority: TicketPriority,
    pub summary: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub ticket_id: TicketId,
    pub sender_role: SenderRole,
    pub sender_name: String,
    pub body: String,
    pub is_internal_note: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields supplied when a message is posted; the store assigns id and timestamp
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub ticket_id: TicketId,
    pub sender_role: SenderRole,
    pub sender_name: String,
    pub body: String,
    pub is_internal_note: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    pub id: Uuid,
    pub ticket_id: TicketId,
    pub from_status: TicketStatus,
    pub to_status: TicketStatus,
    pub actor_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// An accepted status change, as announced to subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub ticket_id: TicketId,
    pub old_status: TicketStatus,
    pub new_status: TicketStatus,
    pub changed_by: UserId,
    #[serde(with = "time::serde::rfc3339")]
    pub changed_at: OffsetDateTime,
}
