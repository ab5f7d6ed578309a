use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::passenger::{Passenger, PassengerId};

pub type TicketId = u64;

/// Ticket lifecycle status. The status of a live ticket is the weakest
/// allocation result among its passengers: Waiting < Rac < Confirmed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Confirmed,
    Rac,
    Waiting,
    Cancelled,
}

/// A booking and its passengers. Created whole in one booking operation;
/// cancellation is terminal and retains the record for idempotent lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub status: TicketStatus,
    pub booking_time: DateTime<Utc>,
    pub passengers: Vec<Passenger>,
}

impl Ticket {
    pub fn passenger(&self, id: PassengerId) -> Option<&Passenger> {
        self.passengers.iter().find(|p| p.id == id)
    }

    pub fn passenger_mut(&mut self, id: PassengerId) -> Option<&mut Passenger> {
        self.passengers.iter_mut().find(|p| p.id == id)
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == TicketStatus::Cancelled
    }
}
