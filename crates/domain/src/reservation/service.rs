//! Reservation service coordinating storage, availability and events.

use common::{GuestId, ReservationId};
use store::{EventPublisher, Repository};

use crate::error::DomainError;
use crate::event::EventPublisherExt;

use super::{
    AvailabilityChecker, CreateReservation, Reservation, ReservationEvent, ReservationRepository,
};

/// Service for managing reservations.
///
/// Every operation is read, transition, write, publish. A failed transition
/// returns before anything is written.
pub struct ReservationService<R, C, P> {
    repository: R,
    availability: C,
    publisher: P,
}

impl<R, C, P> ReservationService<R, C, P>
where
    R: ReservationRepository,
    C: AvailabilityChecker,
    P: EventPublisher,
{
    /// Creates a new reservation service.
    pub fn new(repository: R, availability: C, publisher: P) -> Self {
        Self {
            repository,
            availability,
            publisher,
        }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Creates a reservation after checking the room is free.
    #[tracing::instrument(skip(self))]
    pub async fn create_reservation(
        &self,
        cmd: CreateReservation,
    ) -> Result<Reservation, DomainError> {
        let available = self
            .availability
            .is_room_available(&cmd.room_id, &cmd.date_range)
            .await?;
        if !available {
            return Err(DomainError::RoomUnavailable {
                room_id: cmd.room_id,
            });
        }

        let reservation = Reservation::new(
            cmd.reservation_id,
            cmd.guest_id,
            cmd.room_id,
            cmd.date_range,
            cmd.total_amount,
            cmd.guests,
        )?;

        self.repository
            .create(reservation.id(), reservation.clone())
            .await?;
        self.publisher
            .publish_event(&ReservationEvent::created(&reservation))
            .await?;

        tracing::info!(reservation_id = %reservation.id(), "reservation created");
        Ok(reservation)
    }

    /// Confirms a pending reservation.
    #[tracing::instrument(skip(self))]
    pub async fn confirm_reservation(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<Reservation, DomainError> {
        self.execute(reservation_id, Reservation::confirm, ReservationEvent::confirmed)
            .await
    }

    /// Checks the guest in.
    #[tracing::instrument(skip(self))]
    pub async fn activate_reservation(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<Reservation, DomainError> {
        self.execute(reservation_id, Reservation::activate, ReservationEvent::activated)
            .await
    }

    /// Checks the guest out.
    #[tracing::instrument(skip(self))]
    pub async fn complete_reservation(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<Reservation, DomainError> {
        self.execute(reservation_id, Reservation::complete, ReservationEvent::completed)
            .await
    }

    /// Cancels a reservation with a reason.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_reservation(
        &self,
        reservation_id: &ReservationId,
        reason: &str,
    ) -> Result<Reservation, DomainError> {
        self.execute(
            reservation_id,
            |reservation| reservation.cancel(reason),
            ReservationEvent::cancelled,
        )
        .await
    }

    /// Loads a reservation by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_reservation(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<Reservation, DomainError> {
        Ok(self.repository.read(reservation_id).await?)
    }

    /// Lists every reservation made by a guest.
    #[tracing::instrument(skip(self))]
    pub async fn list_reservations_by_guest(
        &self,
        guest_id: &GuestId,
    ) -> Result<Vec<Reservation>, DomainError> {
        let reservations = self.repository.read_all().await?;
        Ok(reservations
            .into_iter()
            .filter(|r| r.guest_id() == guest_id)
            .collect())
    }

    // Event-driven entry points

    /// Confirms the reservation once its payment has been captured.
    pub async fn confirm_reservation_on_payment_captured(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<Reservation, DomainError> {
        self.confirm_reservation(reservation_id).await
    }

    /// Cancels the reservation after its payment failed.
    pub async fn cancel_reservation_on_payment_failed(
        &self,
        reservation_id: &ReservationId,
        reason: &str,
    ) -> Result<Reservation, DomainError> {
        self.cancel_reservation(reservation_id, reason).await
    }

    async fn execute<F, E>(
        &self,
        reservation_id: &ReservationId,
        transition: F,
        event: E,
    ) -> Result<Reservation, DomainError>
    where
        F: FnOnce(&mut Reservation) -> Result<(), super::ReservationError>,
        E: FnOnce(&Reservation) -> ReservationEvent,
    {
        let mut reservation = self.repository.read(reservation_id).await?;
        transition(&mut reservation)?;

        self.repository
            .update(reservation_id, reservation.clone())
            .await?;
        self.publisher.publish_event(&event(&reservation)).await?;

        tracing::info!(
            %reservation_id,
            status = %reservation.status(),
            "reservation updated"
        );
        Ok(reservation)
    }
}
