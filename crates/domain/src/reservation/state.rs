//! Reservation state machine.

use serde::{Deserialize, Serialize};

/// The status of a reservation in its lifecycle.
///
/// State transitions:
/// ```text
/// Pending ──► Confirmed ──► Active ──► Completed
///    │            │
///    └────────────┴──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Created, awaiting payment.
    #[default]
    Pending,

    /// Payment captured, stay is booked.
    Confirmed,

    /// Guest has checked in.
    Active,

    /// Guest has checked out (terminal state).
    Completed,

    /// Reservation was cancelled (terminal state).
    Cancelled,
}

impl ReservationStatus {
    /// Returns true if the reservation can be confirmed in this status.
    pub fn can_confirm(&self) -> bool {
        matches!(self, ReservationStatus::Pending)
    }

    /// Returns true if the guest can check in from this status.
    pub fn can_activate(&self) -> bool {
        matches!(self, ReservationStatus::Confirmed)
    }

    /// Returns true if the guest can check out from this status.
    pub fn can_complete(&self) -> bool {
        matches!(self, ReservationStatus::Active)
    }

    /// Returns true if this status allows cancellation, ignoring the
    /// check-in deadline.
    pub fn can_cancel(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        )
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Active => "active",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
