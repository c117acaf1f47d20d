//! Payment commands.

use common::{Money, PaymentId, ReservationId};

/// Command to authorize a new payment for a reservation.
#[derive(Debug, Clone)]
pub struct AuthorizePayment {
    /// The payment ID to create.
    pub payment_id: PaymentId,

    /// The reservation being paid for.
    pub reservation_id: ReservationId,

    /// Amount to authorize.
    pub amount: Money,

    /// Payment method label (e.g., "card").
    pub payment_method: String,
}

impl AuthorizePayment {
    /// Creates a new AuthorizePayment command.
    pub fn new(
        payment_id: PaymentId,
        reservation_id: ReservationId,
        amount: Money,
        payment_method: impl Into<String>,
    ) -> Self {
        Self {
            payment_id,
            reservation_id,
            amount,
            payment_method: payment_method.into(),
        }
    }
}
