//! Hotel booking saga steps and compensation reasons.

use serde::{Deserialize, Serialize};

/// The saga type identifier for hotel bookings.
pub const SAGA_TYPE: &str = "HotelBooking";

/// Cancellation reason when payment authorization fails.
pub const REASON_PAYMENT_AUTHORIZATION_FAILED: &str = "payment_authorization_failed";

/// Cancellation reason when payment capture fails.
pub const REASON_PAYMENT_CAPTURE_FAILED: &str = "payment_capture_failed";

/// Cancellation reason when the reservation cannot be confirmed.
pub const REASON_CONFIRMATION_FAILED: &str = "confirmation_failed";

/// Payment method used when a payment is started from a reservation event.
pub const DEFAULT_PAYMENT_METHOD: &str = "default";

/// The forward steps of a booking, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStep {
    CreateReservation,
    AuthorizePayment,
    CapturePayment,
    ConfirmReservation,
}

impl BookingStep {
    /// Returns the 1-based position of the step.
    pub fn number(&self) -> u8 {
        match self {
            BookingStep::CreateReservation => 1,
            BookingStep::AuthorizePayment => 2,
            BookingStep::CapturePayment => 3,
            BookingStep::ConfirmReservation => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStep::CreateReservation => "create_reservation",
            BookingStep::AuthorizePayment => "authorize_payment",
            BookingStep::CapturePayment => "capture_payment",
            BookingStep::ConfirmReservation => "confirm_reservation",
        }
    }

    /// Returns the reason recorded on the reservation when this step fails,
    /// or `None` if nothing needs undoing.
    pub fn cancellation_reason(&self) -> Option<&'static str> {
        match self {
            BookingStep::CreateReservation => None,
            BookingStep::AuthorizePayment => Some(REASON_PAYMENT_AUTHORIZATION_FAILED),
            BookingStep::CapturePayment => Some(REASON_PAYMENT_CAPTURE_FAILED),
            BookingStep::ConfirmReservation => Some(REASON_CONFIRMATION_FAILED),
        }
    }
}

impl std::fmt::Display for BookingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "step {} ({})", self.number(), self.as_str())
    }
}

/// A compensating action run after a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompensationAction {
    RefundPayment,
    CancelReservation,
}

impl CompensationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompensationAction::RefundPayment => "refund_payment",
            CompensationAction::CancelReservation => "cancel_reservation",
        }
    }
}

impl std::fmt::Display for CompensationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_display() {
        assert_eq!(
            BookingStep::AuthorizePayment.to_string(),
            "step 2 (authorize_payment)"
        );
        assert_eq!(
            BookingStep::ConfirmReservation.to_string(),
            "step 4 (confirm_reservation)"
        );
    }

    #[test]
    fn test_cancellation_reasons() {
        assert_eq!(BookingStep::CreateReservation.cancellation_reason(), None);
        assert_eq!(
            BookingStep::AuthorizePayment.cancellation_reason(),
            Some("payment_authorization_failed")
        );
        assert_eq!(
            BookingStep::CapturePayment.cancellation_reason(),
            Some("payment_capture_failed")
        );
        assert_eq!(
            BookingStep::ConfirmReservation.cancellation_reason(),
            Some("confirmation_failed")
        );
    }
}
