//! Availability derived from stored reservations.

use async_trait::async_trait;
use common::RoomId;
use store::Repository;

use super::{
    AvailabilityChecker, AvailabilityError, DateRange, Reservation, ReservationRepository,
    ReservationStatus,
};

/// Checks availability by scanning every stored reservation.
///
/// The check and a subsequent create are separate operations, so two callers
/// racing for the same room can both see it as free.
#[derive(Clone)]
pub struct RepositoryAvailabilityChecker<R> {
    repository: R,
}

impl<R: ReservationRepository> RepositoryAvailabilityChecker<R> {
    /// Creates a checker reading from the given repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: ReservationRepository> AvailabilityChecker for RepositoryAvailabilityChecker<R> {
    async fn is_room_available(
        &self,
        room_id: &RoomId,
        date_range: &DateRange,
    ) -> Result<bool, AvailabilityError> {
        let overlapping = self
            .get_overlapping_reservations(room_id, date_range)
            .await?;
        Ok(overlapping.is_empty())
    }

    async fn get_overlapping_reservations(
        &self,
        room_id: &RoomId,
        date_range: &DateRange,
    ) -> Result<Vec<Reservation>, AvailabilityError> {
        let reservations = self.repository.read_all().await?;
        Ok(reservations
            .into_iter()
            .filter(|r| {
                r.room_id() == room_id
                    && r.status() != ReservationStatus::Cancelled
                    && r.date_range().overlaps(date_range)
            })
            .collect())
    }
}
