use sleeper_domain::TicketId;
use thiserror::Error;

/// Outcome taxonomy for engine operations. Client faults (validation,
/// availability) and state faults (lookup) carry machine-readable codes;
/// `Inconsistent` signals a broken internal invariant and always aborts
/// the operation that detected it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("{message}")]
    Validation {
        field: Option<&'static str>,
        message: String,
    },

    #[error("no tickets available for the requested number of passengers")]
    NoAvailability,

    #[error("ticket with ID {0} not found")]
    TicketNotFound(TicketId),

    #[error("ticket {0} is already cancelled")]
    AlreadyCancelled(TicketId),

    #[error("reservation state is inconsistent: {0}")]
    Inconsistent(String),
}

impl EngineError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: Some(field),
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NoAvailability => "NO_AVAILABILITY",
            Self::TicketNotFound(_) => "RESOURCE_NOT_FOUND",
            Self::AlreadyCancelled(_) => "ALREADY_CANCELLED",
            Self::Inconsistent(_) => "INTERNAL_ERROR",
        }
    }
}
