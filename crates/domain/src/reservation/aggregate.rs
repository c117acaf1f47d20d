//! Reservation aggregate implementation.

use chrono::{DateTime, Duration, Utc};
use common::{GuestId, Money, ReservationId, RoomId};
use serde::{Deserialize, Serialize};

use super::{DateRange, GuestInfo, ReservationError, ReservationStatus};

/// Hours before check-in after which a reservation can no longer be cancelled.
pub const CANCELLATION_DEADLINE_HOURS: i64 = 24;

/// A guest's booking of one room for a date range.
///
/// All invariants are enforced on construction and on every transition; a
/// rejected transition leaves the reservation untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    guest_id: GuestId,
    room_id: RoomId,
    date_range: DateRange,
    status: ReservationStatus,
    total_amount: Money,
    cancellation_reason: Option<String>,
    guests: Vec<GuestInfo>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Creates a validated pending reservation.
    pub fn new(
        id: ReservationId,
        guest_id: GuestId,
        room_id: RoomId,
        date_range: DateRange,
        total_amount: Money,
        guests: Vec<GuestInfo>,
    ) -> Result<Self, ReservationError> {
        Self::new_at(
            id,
            guest_id,
            room_id,
            date_range,
            total_amount,
            guests,
            Utc::now(),
        )
    }

    /// Creates a validated pending reservation as of `now`.
    pub fn new_at(
        id: ReservationId,
        guest_id: GuestId,
        room_id: RoomId,
        date_range: DateRange,
        total_amount: Money,
        guests: Vec<GuestInfo>,
        now: DateTime<Utc>,
    ) -> Result<Self, ReservationError> {
        let stay = date_range.check_out - date_range.check_in;
        if stay < Duration::days(1) {
            if date_range.check_out == date_range.check_in {
                return Err(ReservationError::MinimumStay);
            }
            return Err(ReservationError::InvalidDateRange);
        }

        if date_range.check_in.date_naive() < now.date_naive() {
            return Err(ReservationError::CheckInPast);
        }

        if guests.is_empty() {
            return Err(ReservationError::NoGuests);
        }

        Ok(Self {
            id,
            guest_id,
            room_id,
            date_range,
            status: ReservationStatus::Pending,
            total_amount,
            cancellation_reason: None,
            guests,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> &ReservationId {
        &self.id
    }

    pub fn guest_id(&self) -> &GuestId {
        &self.guest_id
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn date_range(&self) -> &DateRange {
        &self.date_range
    }

    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    pub fn total_amount(&self) -> &Money {
        &self.total_amount
    }

    /// Returns the reason given when the reservation was cancelled.
    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    pub fn guests(&self) -> &[GuestInfo] {
        &self.guests
    }

    /// Returns the first listed guest, who receives notifications.
    pub fn primary_guest(&self) -> Option<&GuestInfo> {
        self.guests.first()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Transitions

    /// Confirms a pending reservation after payment.
    pub fn confirm(&mut self) -> Result<(), ReservationError> {
        self.transition(ReservationStatus::Confirmed, "confirm", |s| s.can_confirm())
    }

    /// Checks the guest in.
    pub fn activate(&mut self) -> Result<(), ReservationError> {
        self.transition(ReservationStatus::Active, "activate", |s| s.can_activate())
    }

    /// Checks the guest out.
    pub fn complete(&mut self) -> Result<(), ReservationError> {
        self.transition(ReservationStatus::Completed, "complete", |s| {
            s.can_complete()
        })
    }

    /// Cancels the reservation with a reason.
    pub fn cancel(&mut self, reason: impl Into<String>) -> Result<(), ReservationError> {
        self.cancel_at(reason, Utc::now())
    }

    /// Cancels the reservation as of `now`.
    ///
    /// Checks run in order: already cancelled, completed, active, then the
    /// check-in deadline.
    pub fn cancel_at(
        &mut self,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), ReservationError> {
        match self.status {
            ReservationStatus::Cancelled => return Err(ReservationError::AlreadyCancelled),
            ReservationStatus::Completed => return Err(ReservationError::CannotCancelCompleted),
            ReservationStatus::Active => return Err(ReservationError::CannotCancelActive),
            ReservationStatus::Pending | ReservationStatus::Confirmed => {}
        }

        if !self.can_be_cancelled_at(now) {
            return Err(ReservationError::CannotCancelNearCheckIn);
        }

        self.status = ReservationStatus::Cancelled;
        self.cancellation_reason = Some(reason.into());
        self.updated_at = now;
        Ok(())
    }

    fn transition(
        &mut self,
        to: ReservationStatus,
        action: &'static str,
        allowed: impl Fn(&ReservationStatus) -> bool,
    ) -> Result<(), ReservationError> {
        if !allowed(&self.status) {
            return Err(ReservationError::InvalidStateTransition {
                current_state: self.status,
                action,
            });
        }

        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }

    // Queries

    /// Returns true if the reservation may still be cancelled.
    pub fn can_be_cancelled(&self) -> bool {
        self.can_be_cancelled_at(Utc::now())
    }

    /// Returns true if the reservation may be cancelled as of `now`.
    pub fn can_be_cancelled_at(&self, now: DateTime<Utc>) -> bool {
        if !self.status.can_cancel() {
            return false;
        }
        self.date_range.check_in - now >= Duration::hours(CANCELLATION_DEADLINE_HOURS)
    }

    /// Returns true if both reservations hold the same room for overlapping
    /// dates and neither is cancelled.
    pub fn is_overlapping(&self, other: &Reservation) -> bool {
        self.room_id == other.room_id
            && self.status != ReservationStatus::Cancelled
            && other.status != ReservationStatus::Cancelled
            && self.date_range.overlaps(&other.date_range)
    }

    /// Returns the number of nights booked.
    pub fn nights(&self) -> i64 {
        self.date_range.nights()
    }

    /// Returns the number of days until check-in.
    pub fn days_until_check_in(&self) -> i64 {
        self.days_until_check_in_at(Utc::now())
    }

    /// Returns the number of whole UTC days from `now` until check-in.
    pub fn days_until_check_in_at(&self, now: DateTime<Utc>) -> i64 {
        (self.date_range.check_in.date_naive() - now.date_naive()).num_days()
    }
}
