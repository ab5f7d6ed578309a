use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::berth::BerthType;
use crate::passenger::{Gender, PassengerId};
use crate::ticket::{TicketId, TicketStatus};

/// Wire-facing projection of one passenger, with queue coordinates
/// resolved at read time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassengerView {
    pub id: PassengerId,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub berth: Option<BerthType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rac_position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiting_position: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketView {
    pub ticket_id: TicketId,
    pub status: TicketStatus,
    pub booking_time: DateTime<Utc>,
    pub passengers: Vec<PassengerView>,
}

/// Free berth counts per category. `side_lower` counts free occupant
/// slots, not berths, so it lines up with RAC arithmetic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BerthCounts {
    pub lower: usize,
    pub middle: usize,
    pub upper: usize,
    pub side_lower: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySnapshot {
    pub confirmed_available: usize,
    pub rac_available: usize,
    pub waiting_list_available: usize,
    pub available_berths: BerthCounts,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookedSummary {
    pub confirmed_count: usize,
    pub rac_count: usize,
    pub waiting_count: usize,
    pub total_count: usize,
}

/// All live tickets grouped by status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedSnapshot {
    pub confirmed: Vec<TicketView>,
    pub rac: Vec<TicketView>,
    pub waiting: Vec<TicketView>,
    pub summary: BookedSummary,
}
