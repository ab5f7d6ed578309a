use chrono::{DateTime, Utc};
use sleeper_domain::{
    BerthAssignment, BerthType, BookingRequest, Passenger, PassengerSpec, ReservationRules,
    Ticket, TicketId, TicketStatus,
};

use crate::classifier;
use crate::error::EngineError;
use crate::history::{AllocationEvent, AllocationEventKind};
use crate::state::CoachState;

/// Book a group. Exactly one path is taken for the whole group
/// (Confirmed, RAC, Waiting, or rejection); a booking never straddles
/// two allocation structures. Nothing is committed unless the chosen
/// path can seat every berth-holding passenger.
pub fn book(
    state: &mut CoachState,
    request: &BookingRequest,
    now: DateTime<Utc>,
) -> Result<TicketId, EngineError> {
    validate(request, state.rules())?;

    let needed = request
        .passengers
        .iter()
        .filter(|p| p.age >= state.rules().min_berth_age)
        .count();

    let confirmed_free = state.inventory.count_free(BerthType::Lower)
        + state.inventory.count_free(BerthType::Middle)
        + state.inventory.count_free(BerthType::Upper);
    let path = if confirmed_free >= needed {
        TicketStatus::Confirmed
    } else if state.inventory.side_lower_free_slots() >= needed && state.rac.remaining() >= needed
    {
        TicketStatus::Rac
    } else if state.waiting.remaining() >= needed {
        TicketStatus::Waiting
    } else {
        return Err(EngineError::NoAvailability);
    };

    let ticket_id = state.allocate_ticket_id();
    let booking_time = state.next_booking_time(now);
    let mut passengers = Vec::with_capacity(request.passengers.len());
    for spec in &request.passengers {
        let id = state.allocate_passenger_id();
        passengers.push(Passenger {
            id,
            name: spec.name.trim().to_string(),
            age: spec.age,
            gender: spec.gender,
            is_parent: spec.is_parent,
            parent_identifier: spec.parent_identifier.clone(),
            berth: None,
        });
    }

    let order = classifier::prioritized_indices(&passengers, state.rules());

    match path {
        TicketStatus::Confirmed => {
            // Priority passengers walk the free lists first, so lowers go
            // to seniors and mothers before anyone else sees them
            let mut lowers = state.inventory.free_ids(BerthType::Lower).into_iter();
            let mut middles = state.inventory.free_ids(BerthType::Middle).into_iter();
            let mut uppers = state.inventory.free_ids(BerthType::Upper).into_iter();
            let mut plan = Vec::with_capacity(order.len());
            for &idx in &order {
                let berth = lowers
                    .next()
                    .or_else(|| middles.next())
                    .or_else(|| uppers.next())
                    .ok_or_else(|| {
                        EngineError::Inconsistent(
                            "confirmed pool exhausted mid-allocation".to_string(),
                        )
                    })?;
                plan.push((idx, berth));
            }
            for (idx, berth) in plan {
                let passenger = &mut passengers[idx];
                let slot = state.inventory.occupy(berth, passenger.id)?;
                passenger.berth = Some(BerthAssignment::new(berth, slot));
                state.history.record(AllocationEvent {
                    ticket_id,
                    passenger_id: passenger.id,
                    kind: AllocationEventKind::BerthAllocated,
                    berth: Some(berth),
                    rac_position: None,
                    waiting_position: None,
                    recorded_at: booking_time,
                });
            }
        }
        TicketStatus::Rac => {
            let plan = state
                .inventory
                .plan_side_lower_slots(order.len())
                .ok_or_else(|| {
                    EngineError::Inconsistent("side-lower pool exhausted mid-allocation".to_string())
                })?;
            for (&idx, berth) in order.iter().zip(plan) {
                let passenger = &mut passengers[idx];
                let slot = state.inventory.occupy(berth, passenger.id)?;
                passenger.berth = Some(BerthAssignment::new(berth, slot));
                let position = state.rac.push_back(crate::queues::QueueEntry {
                    ticket_id,
                    passenger_id: passenger.id,
                })?;
                state.history.record(AllocationEvent {
                    ticket_id,
                    passenger_id: passenger.id,
                    kind: AllocationEventKind::RacQueued,
                    berth: Some(berth),
                    rac_position: Some(position),
                    waiting_position: None,
                    recorded_at: booking_time,
                });
            }
        }
        TicketStatus::Waiting => {
            for &idx in &order {
                let passenger = &passengers[idx];
                let position = state.waiting.push_back(crate::queues::QueueEntry {
                    ticket_id,
                    passenger_id: passenger.id,
                })?;
                state.history.record(AllocationEvent {
                    ticket_id,
                    passenger_id: passenger.id,
                    kind: AllocationEventKind::WaitingQueued,
                    berth: None,
                    rac_position: None,
                    waiting_position: Some(position),
                    recorded_at: booking_time,
                });
            }
        }
        TicketStatus::Cancelled => unreachable!("booking never selects the cancelled path"),
    }

    state.tickets.insert(
        ticket_id,
        Ticket {
            id: ticket_id,
            status: path,
            booking_time,
            passengers,
        },
    );
    Ok(ticket_id)
}

fn validate(request: &BookingRequest, rules: &ReservationRules) -> Result<(), EngineError> {
    if request.passengers.is_empty() {
        return Err(EngineError::validation(
            "passengers",
            "request must include a non-empty 'passengers' list",
        ));
    }

    for spec in &request.passengers {
        if spec.name.trim().is_empty() {
            return Err(EngineError::validation(
                "name",
                "every passenger must have a name",
            ));
        }
        if spec.age < 0 {
            return Err(EngineError::validation(
                "age",
                "age must be a non-negative number",
            ));
        }
    }

    let berth_holders = request
        .passengers
        .iter()
        .filter(|p| p.age >= rules.min_berth_age)
        .count();
    if berth_holders == 0 {
        return Err(EngineError::validation(
            "passengers",
            format!(
                "at least one passenger must be {} years or older",
                rules.min_berth_age
            ),
        ));
    }
    if berth_holders > rules.max_group_size {
        return Err(EngineError::validation(
            "passengers",
            format!(
                "a booking covers at most {} berth-holding passengers",
                rules.max_group_size
            ),
        ));
    }

    for child in request
        .passengers
        .iter()
        .filter(|p| p.age < rules.min_berth_age)
    {
        if !has_parent_in_group(child, &request.passengers) {
            return Err(EngineError::validation(
                "parent_identifier",
                format!(
                    "child '{}' must be linked to a parent in the same booking",
                    child.name.trim()
                ),
            ));
        }
    }

    Ok(())
}

fn has_parent_in_group(child: &PassengerSpec, group: &[PassengerSpec]) -> bool {
    let Some(identifier) = child.parent_identifier.as_deref().filter(|s| !s.is_empty()) else {
        return false;
    };
    group.iter().any(|p| {
        p.is_parent && p.parent_identifier.as_deref() == Some(identifier)
    })
}
