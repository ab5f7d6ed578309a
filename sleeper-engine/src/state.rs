use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use sleeper_domain::{
    AvailabilitySnapshot, BerthCounts, BerthType, BookedSnapshot, BookedSummary, CoachLayout,
    PassengerId, PassengerView, ReservationRules, Ticket, TicketId, TicketStatus, TicketView,
};

use crate::error::EngineError;
use crate::history::AllocationHistory;
use crate::inventory::Inventory;
use crate::queues::PositionQueue;

/// The whole reservation state of the coach: inventory, both overflow
/// queues, the ticket table and the allocation ledger. Central tables
/// keyed by id are the single source of truth; berths and queues refer
/// to passengers by id only.
pub struct CoachState {
    pub(crate) rules: ReservationRules,
    pub(crate) layout: CoachLayout,
    pub(crate) inventory: Inventory,
    pub(crate) rac: PositionQueue,
    pub(crate) waiting: PositionQueue,
    pub(crate) tickets: BTreeMap<TicketId, Ticket>,
    pub(crate) history: AllocationHistory,
    next_ticket_id: TicketId,
    next_passenger_id: PassengerId,
    last_booking_time: Option<DateTime<Utc>>,
}

impl CoachState {
    pub fn new(layout: CoachLayout, rules: ReservationRules) -> Self {
        Self {
            inventory: Inventory::new(&layout),
            rac: PositionQueue::new(layout.rac_capacity()),
            waiting: PositionQueue::new(rules.waiting_list_capacity),
            tickets: BTreeMap::new(),
            history: AllocationHistory::new(),
            next_ticket_id: 0,
            next_passenger_id: 0,
            last_booking_time: None,
            layout,
            rules,
        }
    }

    pub fn rules(&self) -> &ReservationRules {
        &self.rules
    }

    pub fn ticket(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.get(&id)
    }

    pub(crate) fn allocate_ticket_id(&mut self) -> TicketId {
        self.next_ticket_id += 1;
        self.next_ticket_id
    }

    pub(crate) fn allocate_passenger_id(&mut self) -> PassengerId {
        self.next_passenger_id += 1;
        self.next_passenger_id
    }

    /// Booking timestamps are taken under the coordinator lock and must be
    /// strictly monotonic; equal wall-clock readings are nudged forward.
    pub(crate) fn next_booking_time(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let time = match self.last_booking_time {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_booking_time = Some(time);
        time
    }

    /// Re-derive a ticket's status from its passengers' queue membership:
    /// any waiting passenger makes it Waiting, else any RAC passenger
    /// makes it RAC, else it is Confirmed. Cancelled is terminal.
    pub(crate) fn recompute_status(&mut self, ticket_id: TicketId) -> Result<(), EngineError> {
        let in_waiting = self.waiting.contains_ticket(ticket_id);
        let in_rac = self.rac.contains_ticket(ticket_id);
        let ticket = self
            .tickets
            .get_mut(&ticket_id)
            .ok_or(EngineError::TicketNotFound(ticket_id))?;
        if ticket.status == TicketStatus::Cancelled {
            return Ok(());
        }
        ticket.status = if in_waiting {
            TicketStatus::Waiting
        } else if in_rac {
            TicketStatus::Rac
        } else {
            TicketStatus::Confirmed
        };
        Ok(())
    }

    pub fn availability(&self) -> AvailabilitySnapshot {
        let lower = self.inventory.count_free(BerthType::Lower);
        let middle = self.inventory.count_free(BerthType::Middle);
        let upper = self.inventory.count_free(BerthType::Upper);
        AvailabilitySnapshot {
            confirmed_available: lower + middle + upper,
            rac_available: self.rac.remaining(),
            waiting_list_available: self.waiting.remaining(),
            available_berths: BerthCounts {
                lower,
                middle,
                upper,
                side_lower: self.inventory.side_lower_free_slots(),
            },
        }
    }

    pub fn ticket_view(&self, ticket: &Ticket) -> TicketView {
        TicketView {
            ticket_id: ticket.id,
            status: ticket.status,
            booking_time: ticket.booking_time,
            passengers: ticket
                .passengers
                .iter()
                .map(|p| PassengerView {
                    id: p.id,
                    name: p.name.clone(),
                    age: p.age,
                    gender: p.gender,
                    berth: p.berth.map(|a| a.berth.berth_type),
                    rac_position: self.rac.position_of(p.id),
                    waiting_position: self.waiting.position_of(p.id),
                })
                .collect(),
        }
    }

    pub fn booked(&self) -> BookedSnapshot {
        let mut snapshot = BookedSnapshot {
            confirmed: Vec::new(),
            rac: Vec::new(),
            waiting: Vec::new(),
            summary: BookedSummary::default(),
        };
        for ticket in self.tickets.values() {
            let view = self.ticket_view(ticket);
            match ticket.status {
                TicketStatus::Confirmed => {
                    snapshot.summary.confirmed_count += 1;
                    snapshot.confirmed.push(view);
                }
                TicketStatus::Rac => {
                    snapshot.summary.rac_count += 1;
                    snapshot.rac.push(view);
                }
                TicketStatus::Waiting => {
                    snapshot.summary.waiting_count += 1;
                    snapshot.waiting.push(view);
                }
                TicketStatus::Cancelled => continue,
            }
            snapshot.summary.total_count += 1;
        }
        snapshot
    }

    /// Validate the structural invariants of the whole state. Returns the
    /// list of violations; an empty list means the state is sound.
    pub fn check_invariants(&self) -> Vec<String> {
        let mut violations = Vec::new();

        // Per-berth occupancy limits
        for berth in self.inventory.berths() {
            if berth.occupants.len() > berth.capacity() {
                violations.push(format!(
                    "berth {:?} holds {} occupants (capacity {})",
                    berth.id,
                    berth.occupants.len(),
                    berth.capacity()
                ));
            }
        }

        // Queue sizes within their bounds
        if self.rac.len() > self.rac.capacity() {
            violations.push(format!("RAC queue overflows: {}", self.rac.len()));
        }
        if self.waiting.len() > self.waiting.capacity() {
            violations.push(format!("waiting queue overflows: {}", self.waiting.len()));
        }

        // Conservation: every confirmed berth is free or occupied, and
        // free side-lower slots mirror the RAC queue length
        let confirmed_free = self.inventory.count_free(BerthType::Lower)
            + self.inventory.count_free(BerthType::Middle)
            + self.inventory.count_free(BerthType::Upper);
        let confirmed_occupied = self
            .inventory
            .berths()
            .iter()
            .filter(|b| b.id.berth_type != BerthType::SideLower && !b.is_free())
            .count();
        if confirmed_free + confirmed_occupied != self.layout.confirmed_capacity() {
            violations.push(format!(
                "confirmed berth conservation broken: {} free + {} occupied != {}",
                confirmed_free,
                confirmed_occupied,
                self.layout.confirmed_capacity()
            ));
        }
        if self.inventory.side_lower_free_slots() + self.rac.len() != self.layout.rac_capacity() {
            violations.push(format!(
                "RAC conservation broken: {} free slots + {} queued != {}",
                self.inventory.side_lower_free_slots(),
                self.rac.len(),
                self.layout.rac_capacity()
            ));
        }

        for ticket in self.tickets.values() {
            for p in &ticket.passengers {
                let on_berth = self.inventory.occupant_of(p.id);
                let rac_pos = self.rac.position_of(p.id);
                let waiting_pos = self.waiting.position_of(p.id);

                // A passenger's recorded assignment must match the berth table
                match (p.berth, on_berth) {
                    (Some(a), Some(b)) if a.berth != b => violations.push(format!(
                        "passenger {} assignment {:?} disagrees with inventory {:?}",
                        p.id, a.berth, b
                    )),
                    (Some(a), None) => violations.push(format!(
                        "passenger {} claims berth {:?} but occupies nothing",
                        p.id, a.berth
                    )),
                    (None, Some(b)) => violations.push(format!(
                        "passenger {} occupies {:?} without an assignment",
                        p.id, b
                    )),
                    _ => {}
                }

                // Children never hold inventory or queue positions
                if p.is_child(&self.rules)
                    && (on_berth.is_some() || rac_pos.is_some() || waiting_pos.is_some())
                {
                    violations.push(format!("child passenger {} holds inventory", p.id));
                }

                // At most one of: confirmed berth, RAC entry, waiting entry
                let confirmed_seat = on_berth
                    .map(|b| b.berth_type != BerthType::SideLower)
                    .unwrap_or(false);
                let claims =
                    usize::from(confirmed_seat) + usize::from(rac_pos.is_some()) + usize::from(waiting_pos.is_some());
                if claims > 1 {
                    violations.push(format!(
                        "passenger {} appears in multiple allocation structures",
                        p.id
                    ));
                }

                // A RAC entry is always backed by a side-lower slot
                if rac_pos.is_some()
                    && on_berth.map(|b| b.berth_type) != Some(BerthType::SideLower)
                {
                    violations.push(format!(
                        "RAC passenger {} has no side-lower slot",
                        p.id
                    ));
                }

                if ticket.status == TicketStatus::Cancelled
                    && (on_berth.is_some() || rac_pos.is_some() || waiting_pos.is_some())
                {
                    violations.push(format!(
                        "cancelled ticket {} still holds resources via passenger {}",
                        ticket.id, p.id
                    ));
                }
            }

            // Live ticket status matches the weakest-passenger rule
            if ticket.status != TicketStatus::Cancelled {
                let in_waiting = self.waiting.contains_ticket(ticket.id);
                let in_rac = self.rac.contains_ticket(ticket.id);
                let expected = if in_waiting {
                    TicketStatus::Waiting
                } else if in_rac {
                    TicketStatus::Rac
                } else {
                    TicketStatus::Confirmed
                };
                if ticket.status != expected {
                    violations.push(format!(
                        "ticket {} status {:?} should be {:?}",
                        ticket.id, ticket.status, expected
                    ));
                }
            }
        }

        violations
    }
}
