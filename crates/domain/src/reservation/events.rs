//! Reservation domain events.

use chrono::{DateTime, Utc};
use common::{GuestId, Money, ReservationId, RoomId};
use serde::{Deserialize, Serialize};

use crate::event::DomainEvent;

use super::{DateRange, Reservation};

/// Topics reservation events are published on.
pub mod topics {
    pub const CREATED: &str = "reservation.created";
    pub const CONFIRMED: &str = "reservation.confirmed";
    pub const ACTIVATED: &str = "reservation.activated";
    pub const COMPLETED: &str = "reservation.completed";
    pub const CANCELLED: &str = "reservation.cancelled";
}

/// Events that can occur on a reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ReservationEvent {
    /// Reservation was created and is awaiting payment.
    Created(ReservationCreatedData),

    /// Payment was captured and the reservation confirmed.
    Confirmed(ReservationChangedData),

    /// Guest checked in.
    Activated(ReservationChangedData),

    /// Guest checked out.
    Completed(ReservationChangedData),

    /// Reservation was cancelled.
    Cancelled(ReservationCancelledData),
}

impl ReservationEvent {
    /// Builds a `Created` event from a new reservation.
    pub fn created(reservation: &Reservation) -> Self {
        ReservationEvent::Created(ReservationCreatedData {
            reservation_id: reservation.id().clone(),
            guest_id: reservation.guest_id().clone(),
            room_id: reservation.room_id().clone(),
            date_range: *reservation.date_range(),
            total_amount: reservation.total_amount().clone(),
            created_at: reservation.created_at(),
        })
    }

    /// Builds a `Confirmed` event.
    pub fn confirmed(reservation: &Reservation) -> Self {
        ReservationEvent::Confirmed(ReservationChangedData::from(reservation))
    }

    /// Builds an `Activated` event.
    pub fn activated(reservation: &Reservation) -> Self {
        ReservationEvent::Activated(ReservationChangedData::from(reservation))
    }

    /// Builds a `Completed` event.
    pub fn completed(reservation: &Reservation) -> Self {
        ReservationEvent::Completed(ReservationChangedData::from(reservation))
    }

    /// Builds a `Cancelled` event carrying the cancellation reason.
    pub fn cancelled(reservation: &Reservation) -> Self {
        ReservationEvent::Cancelled(ReservationCancelledData {
            reservation_id: reservation.id().clone(),
            reason: reservation
                .cancellation_reason()
                .unwrap_or_default()
                .to_string(),
            cancelled_at: reservation.updated_at(),
        })
    }

    /// Returns the reservation the event belongs to.
    pub fn reservation_id(&self) -> &ReservationId {
        match self {
            ReservationEvent::Created(data) => &data.reservation_id,
            ReservationEvent::Confirmed(data)
            | ReservationEvent::Activated(data)
            | ReservationEvent::Completed(data) => &data.reservation_id,
            ReservationEvent::Cancelled(data) => &data.reservation_id,
        }
    }
}

impl DomainEvent for ReservationEvent {
    fn topic(&self) -> &'static str {
        match self {
            ReservationEvent::Created(_) => topics::CREATED,
            ReservationEvent::Confirmed(_) => topics::CONFIRMED,
            ReservationEvent::Activated(_) => topics::ACTIVATED,
            ReservationEvent::Completed(_) => topics::COMPLETED,
            ReservationEvent::Cancelled(_) => topics::CANCELLED,
        }
    }

    fn aggregate_type(&self) -> &'static str {
        "Reservation"
    }

    fn aggregate_id(&self) -> String {
        self.reservation_id().to_string()
    }
}

/// Data for the `Created` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationCreatedData {
    pub reservation_id: ReservationId,
    pub guest_id: GuestId,
    pub room_id: RoomId,
    pub date_range: DateRange,

    /// Amount the payment must cover.
    pub total_amount: Money,

    pub created_at: DateTime<Utc>,
}

/// Data for status-change events that carry nothing beyond the status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationChangedData {
    pub reservation_id: ReservationId,

    /// When the status changed.
    pub changed_at: DateTime<Utc>,
}

impl From<&Reservation> for ReservationChangedData {
    fn from(reservation: &Reservation) -> Self {
        Self {
            reservation_id: reservation.id().clone(),
            changed_at: reservation.updated_at(),
        }
    }
}

/// Data for the `Cancelled` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationCancelledData {
    pub reservation_id: ReservationId,

    /// Why the reservation was cancelled.
    pub reason: String,

    pub cancelled_at: DateTime<Utc>,
}
