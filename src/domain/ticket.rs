// Ticket domain model and status classification
use chrono::{DateTime, Utc};

/// Status derived from the CRM pipeline stage code.
///
/// Stage codes outside the known table map to `Stage(code)`; an absent or
/// empty code maps to `Unknown`. Both count as neither open nor closed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    New,
    Backlog,
    ResourceSupport,
    EmploymentSupport,
    InProcessStaffmark,
    InProcessOsw,
    WaitingForResponse,
    Closed,
    Completed,
    Archived,
    Stage(String),
    Unknown,
}

impl TicketStatus {
    /// Classify a raw pipeline stage code via the static stage table.
    pub fn from_stage_code(code: Option<&str>) -> Self {
        match code {
            None | Some("") => TicketStatus::Unknown,
            Some("1") => TicketStatus::New,
            Some("2") => TicketStatus::WaitingForResponse,
            Some("3") => TicketStatus::Backlog,
            Some("4") => TicketStatus::Closed,
            Some("257285390") => TicketStatus::ResourceSupport,
            Some("257285391") => TicketStatus::InProcessStaffmark,
            Some("257285392") => TicketStatus::InProcessOsw,
            Some("257285393") => TicketStatus::Completed,
            Some("257285394") => TicketStatus::EmploymentSupport,
            Some("257285395") => TicketStatus::Archived,
            Some(other) => TicketStatus::Stage(other.to_string()),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(
            self,
            TicketStatus::New
                | TicketStatus::Backlog
                | TicketStatus::ResourceSupport
                | TicketStatus::EmploymentSupport
                | TicketStatus::InProcessStaffmark
                | TicketStatus::InProcessOsw
                | TicketStatus::WaitingForResponse
        )
    }

    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            TicketStatus::Closed | TicketStatus::Completed | TicketStatus::Archived
        )
    }

}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketStatus::New => write!(f, "NEW"),
            TicketStatus::Backlog => write!(f, "BACKLOG"),
            TicketStatus::ResourceSupport => write!(f, "RESOURCE_SUPPORT"),
            TicketStatus::EmploymentSupport => write!(f, "EMPLOYMENT_SUPPORT"),
            TicketStatus::InProcessStaffmark => write!(f, "IN_PROCESS_STAFFMARK"),
            TicketStatus::InProcessOsw => write!(f, "IN_PROCESS_OSW"),
            TicketStatus::WaitingForResponse => write!(f, "WAITING_FOR_RESPONSE"),
            TicketStatus::Closed => write!(f, "CLOSED"),
            TicketStatus::Completed => write!(f, "COMPLETED"),
            TicketStatus::Archived => write!(f, "ARCHIVED"),
            TicketStatus::Stage(code) => write!(f, "STAGE_{}", code),
            TicketStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A normalized support ticket as consumed by the aggregation pipeline.
/// Optional fields come from the CRM attribute bag; a missing field simply
/// contributes nothing to the metrics that read it.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: String,
    pub status: TicketStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub service_provided: Option<String>,
    pub crisis_wish: Option<String>,
    pub birthday: Option<String>,
}

impl Ticket {
    pub fn new(id: String, status: TicketStatus) -> Self {
        Self {
            id,
            status,
            created_at: None,
            service_provided: None,
            crisis_wish: None,
            birthday: None,
        }
    }
}
