pub mod berth;
pub mod config;
pub mod passenger;
pub mod request;
pub mod ticket;
pub mod views;

pub use berth::{BerthAssignment, BerthId, BerthType};
pub use config::{CoachLayout, ReservationRules};
pub use passenger::{Gender, Passenger, PassengerId};
pub use request::{BookingRequest, PassengerSpec};
pub use ticket::{Ticket, TicketId, TicketStatus};
pub use views::{
    AvailabilitySnapshot, BerthCounts, BookedSnapshot, BookedSummary, PassengerView, TicketView,
};
