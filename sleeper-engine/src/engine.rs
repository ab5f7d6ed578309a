use chrono::Utc;
use parking_lot::RwLock;
use sleeper_domain::{
    AvailabilitySnapshot, BookedSnapshot, BookingRequest, CoachLayout, ReservationRules, TicketId,
    TicketView,
};

use crate::allocator;
use crate::cancellation;
use crate::error::EngineError;
use crate::history::AllocationEvent;
use crate::state::CoachState;

/// The transaction coordinator. Every mutating operation takes the write
/// lock and runs as one critical section over the whole reservation
/// state; readers share a consistent snapshot under the read lock. All
/// work under the lock is in-memory, so sections stay short and the
/// single lock keeps the system deadlock-free.
pub struct ReservationEngine {
    state: RwLock<CoachState>,
}

impl ReservationEngine {
    pub fn new(layout: CoachLayout, rules: ReservationRules) -> Self {
        Self {
            state: RwLock::new(CoachState::new(layout, rules)),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(CoachLayout::default(), ReservationRules::default())
    }

    /// Book a group of passengers. The booking timestamp is taken inside
    /// the critical section, which makes queue order deterministic.
    pub fn book(&self, request: &BookingRequest) -> Result<TicketView, EngineError> {
        let mut state = self.state.write();
        let ticket_id = allocator::book(&mut state, request, Utc::now())?;
        let ticket = state.ticket(ticket_id).ok_or_else(|| {
            EngineError::Inconsistent(format!("ticket {} vanished after booking", ticket_id))
        })?;
        let view = state.ticket_view(ticket);
        tracing::info!(ticket_id, status = ?view.status, passengers = view.passengers.len(), "ticket booked");
        Ok(view)
    }

    /// Cancel a ticket and promote queued passengers into the freed
    /// capacity, all in one critical section.
    pub fn cancel(&self, ticket_id: TicketId) -> Result<(), EngineError> {
        let mut state = self.state.write();
        cancellation::cancel(&mut state, ticket_id, Utc::now())?;
        tracing::info!(ticket_id, "ticket cancelled");
        Ok(())
    }

    pub fn availability(&self) -> AvailabilitySnapshot {
        self.state.read().availability()
    }

    pub fn booked(&self) -> BookedSnapshot {
        self.state.read().booked()
    }

    pub fn ticket(&self, ticket_id: TicketId) -> Result<TicketView, EngineError> {
        let state = self.state.read();
        let ticket = state
            .ticket(ticket_id)
            .ok_or(EngineError::TicketNotFound(ticket_id))?;
        Ok(state.ticket_view(ticket))
    }

    /// The allocation ledger of one ticket, oldest first
    pub fn history(&self, ticket_id: TicketId) -> Result<Vec<AllocationEvent>, EngineError> {
        let state = self.state.read();
        if state.ticket(ticket_id).is_none() {
            return Err(EngineError::TicketNotFound(ticket_id));
        }
        Ok(state.history.for_ticket(ticket_id))
    }

    /// Structural self-check over a read snapshot; backs the health
    /// endpoint and the test suite.
    pub fn invariant_violations(&self) -> Vec<String> {
        self.state.read().check_invariants()
    }

    pub fn is_consistent(&self) -> bool {
        self.invariant_violations().is_empty()
    }
}
