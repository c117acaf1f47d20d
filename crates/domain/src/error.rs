//! Domain error types.

use common::RoomId;
use store::{PublishError, RepositoryError};
use thiserror::Error;

use crate::payment::{GatewayError, GatewayOperation, PaymentError};
use crate::reservation::{AvailabilityError, ReservationError};

/// Errors that can occur during service operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A reservation business rule was violated.
    #[error("Reservation error: {0}")]
    Reservation(#[from] ReservationError),

    /// A payment business rule was violated.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// The repository failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// An event could not be published.
    #[error("Failed to publish event: {0}")]
    Publish(#[from] PublishError),

    /// The payment gateway rejected or failed an operation.
    #[error("Payment gateway {operation} failed: {source}")]
    Gateway {
        operation: GatewayOperation,
        #[source]
        source: GatewayError,
    },

    /// The availability check itself failed.
    #[error("Failed to check availability: {0}")]
    Availability(#[from] AvailabilityError),

    /// The room is already booked for an overlapping range.
    #[error("Room {room_id} is not available for the selected dates")]
    RoomUnavailable { room_id: RoomId },
}

impl DomainError {
    /// Returns true if the error is a gateway failure.
    pub fn is_gateway_error(&self) -> bool {
        matches!(self, DomainError::Gateway { .. })
    }
}
