use chrono::{DateTime, Utc};
use sleeper_domain::{BerthAssignment, BerthType, PassengerId, TicketId, TicketStatus};

use crate::error::EngineError;
use crate::history::{AllocationEvent, AllocationEventKind};
use crate::state::CoachState;

/// Cancel a ticket and run the promotion cascade. Cancellation is
/// terminal; a second cancel of the same ticket fails without side
/// effects.
pub fn cancel(
    state: &mut CoachState,
    ticket_id: TicketId,
    now: DateTime<Utc>,
) -> Result<(), EngineError> {
    let ticket = state
        .tickets
        .get(&ticket_id)
        .ok_or(EngineError::TicketNotFound(ticket_id))?;
    if ticket.is_cancelled() {
        return Err(EngineError::AlreadyCancelled(ticket_id));
    }

    // Release everything the ticket holds. Berths freed from the
    // confirmed pool drive the RAC promotion below.
    let holdings: Vec<(PassengerId, Option<BerthAssignment>)> = ticket
        .passengers
        .iter()
        .map(|p| (p.id, p.berth))
        .collect();
    let mut confirmed_freed = 0usize;
    for (passenger_id, assignment) in holdings {
        if let Some(assignment) = assignment {
            state.inventory.release(assignment.berth, passenger_id)?;
            if assignment.is_confirmed_berth() {
                confirmed_freed += 1;
            }
            state.history.record(AllocationEvent {
                ticket_id,
                passenger_id,
                kind: AllocationEventKind::Released,
                berth: Some(assignment.berth),
                rac_position: None,
                waiting_position: None,
                recorded_at: now,
            });
        }
    }
    state.rac.remove_ticket(ticket_id);
    state.waiting.remove_ticket(ticket_id);

    let ticket = state
        .tickets
        .get_mut(&ticket_id)
        .ok_or(EngineError::TicketNotFound(ticket_id))?;
    for passenger in &mut ticket.passengers {
        passenger.berth = None;
    }
    ticket.status = TicketStatus::Cancelled;

    promote(state, confirmed_freed, now)
}

/// The promotion cascade: freed confirmed berths pull RAC heads up, and
/// the side-lower slots they vacate pull waiting-list heads into RAC.
/// Both queues are drained strictly from the front; priority class never
/// reorders a queue.
fn promote(
    state: &mut CoachState,
    mut confirmed_freed: usize,
    now: DateTime<Utc>,
) -> Result<(), EngineError> {
    while confirmed_freed > 0 {
        let Some(entry) = state.rac.pop_front() else {
            break;
        };
        let ticket = state
            .tickets
            .get(&entry.ticket_id)
            .ok_or_else(|| {
                EngineError::Inconsistent(format!("RAC entry for unknown ticket {}", entry.ticket_id))
            })?;
        let passenger = ticket.passenger(entry.passenger_id).ok_or_else(|| {
            EngineError::Inconsistent(format!(
                "RAC entry for unknown passenger {}",
                entry.passenger_id
            ))
        })?;
        let slot = passenger.berth.ok_or_else(|| {
            EngineError::Inconsistent(format!(
                "RAC passenger {} holds no side-lower slot",
                entry.passenger_id
            ))
        })?;

        state.inventory.release(slot.berth, entry.passenger_id)?;
        let target = state
            .inventory
            .first_free(BerthType::Lower)
            .or_else(|| state.inventory.first_free(BerthType::Middle))
            .or_else(|| state.inventory.first_free(BerthType::Upper))
            .ok_or_else(|| {
                EngineError::Inconsistent("promotion found no free confirmed berth".to_string())
            })?;
        let target_slot = state.inventory.occupy(target, entry.passenger_id)?;

        let ticket = state
            .tickets
            .get_mut(&entry.ticket_id)
            .ok_or(EngineError::TicketNotFound(entry.ticket_id))?;
        let passenger = ticket
            .passenger_mut(entry.passenger_id)
            .ok_or_else(|| {
                EngineError::Inconsistent(format!("passenger {} vanished", entry.passenger_id))
            })?;
        passenger.berth = Some(BerthAssignment::new(target, target_slot));

        state.history.record(AllocationEvent {
            ticket_id: entry.ticket_id,
            passenger_id: entry.passenger_id,
            kind: AllocationEventKind::PromotedToConfirmed,
            berth: Some(target),
            rac_position: None,
            waiting_position: None,
            recorded_at: now,
        });
        state.recompute_status(entry.ticket_id)?;
        confirmed_freed -= 1;
    }

    loop {
        if state.inventory.side_lower_free_slots() == 0 || state.rac.remaining() == 0 {
            break;
        }
        let Some(entry) = state.waiting.pop_front() else {
            break;
        };
        let berth = state.inventory.next_side_lower_slot().ok_or_else(|| {
            EngineError::Inconsistent("side-lower slot disappeared during promotion".to_string())
        })?;
        let slot = state.inventory.occupy(berth, entry.passenger_id)?;
        let position = state.rac.push_back(entry)?;

        let ticket = state
            .tickets
            .get_mut(&entry.ticket_id)
            .ok_or(EngineError::TicketNotFound(entry.ticket_id))?;
        let passenger = ticket
            .passenger_mut(entry.passenger_id)
            .ok_or_else(|| {
                EngineError::Inconsistent(format!("passenger {} vanished", entry.passenger_id))
            })?;
        passenger.berth = Some(BerthAssignment::new(berth, slot));

        state.history.record(AllocationEvent {
            ticket_id: entry.ticket_id,
            passenger_id: entry.passenger_id,
            kind: AllocationEventKind::PromotedToRac,
            berth: Some(berth),
            rac_position: Some(position),
            waiting_position: None,
            recorded_at: now,
        });
        state.recompute_status(entry.ticket_id)?;
    }

    Ok(())
}
