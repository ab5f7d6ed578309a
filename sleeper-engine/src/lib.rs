pub mod allocator;
pub mod cancellation;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod history;
pub mod inventory;
pub mod queues;
pub mod state;

pub use classifier::PriorityClass;
pub use engine::ReservationEngine;
pub use error::EngineError;
pub use history::{AllocationEvent, AllocationEventKind};
pub use inventory::Inventory;
pub use state::CoachState;
