//! Outbound ports of the reservation context.

use async_trait::async_trait;
use common::{ReservationId, RoomId};
use store::{Repository, RepositoryError};
use thiserror::Error;

use super::{DateRange, Reservation};

/// Storage for reservations.
pub trait ReservationRepository: Repository<ReservationId, Reservation> {}

impl<T> ReservationRepository for T where T: Repository<ReservationId, Reservation> + ?Sized {}

/// Errors raised while checking room availability.
#[derive(Debug, Error)]
pub enum AvailabilityError {
    /// Existing reservations could not be read.
    #[error("Failed to read reservations: {0}")]
    Repository(#[from] RepositoryError),

    /// The availability source could not be reached.
    #[error("Availability source unavailable: {0}")]
    Unavailable(String),
}

/// Answers whether a room is free for a date range.
#[async_trait]
pub trait AvailabilityChecker: Send + Sync {
    /// Returns true if no live reservation holds the room for an overlapping range.
    async fn is_room_available(
        &self,
        room_id: &RoomId,
        date_range: &DateRange,
    ) -> Result<bool, AvailabilityError>;

    /// Returns non-cancelled reservations of the room that overlap the range.
    async fn get_overlapping_reservations(
        &self,
        room_id: &RoomId,
        date_range: &DateRange,
    ) -> Result<Vec<Reservation>, AvailabilityError>;
}

#[async_trait]
impl<T: AvailabilityChecker + ?Sized> AvailabilityChecker for std::sync::Arc<T> {
    async fn is_room_available(
        &self,
        room_id: &RoomId,
        date_range: &DateRange,
    ) -> Result<bool, AvailabilityError> {
        (**self).is_room_available(room_id, date_range).await
    }

    async fn get_overlapping_reservations(
        &self,
        room_id: &RoomId,
        date_range: &DateRange,
    ) -> Result<Vec<Reservation>, AvailabilityError> {
        (**self).get_overlapping_reservations(room_id, date_range).await
    }
}
