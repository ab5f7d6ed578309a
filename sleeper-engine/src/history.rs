use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sleeper_domain::{BerthId, PassengerId, TicketId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AllocationEventKind {
    BerthAllocated,
    RacQueued,
    WaitingQueued,
    PromotedToConfirmed,
    PromotedToRac,
    Released,
}

/// One entry of the in-memory allocation ledger: who got (or gave up)
/// what, and where they stood in a queue at that moment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationEvent {
    pub ticket_id: TicketId,
    pub passenger_id: PassengerId,
    pub kind: AllocationEventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub berth: Option<BerthId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rac_position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiting_position: Option<usize>,
    pub recorded_at: DateTime<Utc>,
}

/// Append-only ledger of allocation decisions, kept for inspection.
/// This is not durable storage; it lives and dies with the process.
#[derive(Debug, Default)]
pub struct AllocationHistory {
    events: Vec<AllocationEvent>,
}

impl AllocationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: AllocationEvent) {
        self.events.push(event);
    }

    pub fn for_ticket(&self, ticket_id: TicketId) -> Vec<AllocationEvent> {
        self.events
            .iter()
            .filter(|e| e.ticket_id == ticket_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
