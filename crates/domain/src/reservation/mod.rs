//! Reservation aggregate and related types.

mod aggregate;
mod availability;
mod commands;
mod events;
mod ports;
mod service;
mod state;
mod value_objects;

pub use aggregate::{CANCELLATION_DEADLINE_HOURS, Reservation};
pub use availability::RepositoryAvailabilityChecker;
pub use commands::CreateReservation;
pub use events::{
    ReservationCancelledData, ReservationChangedData, ReservationCreatedData, ReservationEvent,
    topics,
};
pub use ports::{AvailabilityChecker, AvailabilityError, ReservationRepository};
pub use service::ReservationService;
pub use state::ReservationStatus;
pub use value_objects::{DateRange, GuestInfo};

use thiserror::Error;

/// Errors raised by reservation business rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReservationError {
    /// Check-out is less than a day after check-in.
    #[error("Check-out must be after check-in")]
    InvalidDateRange,

    /// Check-in falls on a day before today.
    #[error("Check-in date cannot be in the past")]
    CheckInPast,

    /// Check-out equals check-in.
    #[error("Minimum stay is 1 night")]
    MinimumStay,

    /// Reservation is not in the expected status.
    #[error("Invalid state transition: cannot {action} from {current_state} state")]
    InvalidStateTransition {
        current_state: ReservationStatus,
        action: &'static str,
    },

    #[error("Cannot cancel reservation within 24 hours of check-in")]
    CannotCancelNearCheckIn,

    #[error("Cannot cancel an active reservation")]
    CannotCancelActive,

    #[error("Cannot cancel a completed reservation")]
    CannotCancelCompleted,

    #[error("Reservation is already cancelled")]
    AlreadyCancelled,

    /// Reservation lists no guests.
    #[error("At least one guest is required")]
    NoGuests,
}
