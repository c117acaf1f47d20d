//! Payment domain events.

use chrono::{DateTime, Utc};
use common::{Money, PaymentId, ReservationId};
use serde::{Deserialize, Serialize};

use crate::event::DomainEvent;

use super::Payment;

/// Topics payment events are published on.
pub mod topics {
    pub const AUTHORIZED: &str = "payment.authorized";
    pub const CAPTURED: &str = "payment.captured";
    pub const FAILED: &str = "payment.failed";
    pub const REFUNDED: &str = "payment.refunded";
}

/// Events that can occur on a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PaymentEvent {
    /// Gateway authorized the amount.
    Authorized(PaymentAuthorizedData),

    /// Authorized funds were captured.
    Captured(PaymentSettledData),

    /// Gateway rejected an operation.
    Failed(PaymentFailedData),

    /// Captured funds were refunded.
    Refunded(PaymentSettledData),
}

impl PaymentEvent {
    /// Builds an `Authorized` event.
    pub fn authorized(payment: &Payment) -> Self {
        PaymentEvent::Authorized(PaymentAuthorizedData {
            payment_id: payment.id().clone(),
            reservation_id: payment.reservation_id().clone(),
            transaction_id: payment.transaction_id().unwrap_or_default().to_string(),
            amount: payment.amount().clone(),
            authorized_at: payment.updated_at(),
        })
    }

    /// Builds a `Captured` event.
    pub fn captured(payment: &Payment) -> Self {
        PaymentEvent::Captured(PaymentSettledData::from(payment))
    }

    /// Builds a `Refunded` event.
    pub fn refunded(payment: &Payment) -> Self {
        PaymentEvent::Refunded(PaymentSettledData::from(payment))
    }

    /// Builds a `Failed` event from the payment's last failed attempt.
    pub fn failed(payment: &Payment) -> Self {
        let last_failure = payment.attempts().iter().rev().find(|a| a.is_failure());
        PaymentEvent::Failed(PaymentFailedData {
            payment_id: payment.id().clone(),
            reservation_id: payment.reservation_id().clone(),
            error_code: last_failure
                .and_then(|a| a.error_code.clone())
                .unwrap_or_default(),
            error_msg: last_failure
                .and_then(|a| a.error_msg.clone())
                .unwrap_or_default(),
            failed_at: payment.updated_at(),
        })
    }

    /// Returns the payment the event belongs to.
    pub fn payment_id(&self) -> &PaymentId {
        match self {
            PaymentEvent::Authorized(data) => &data.payment_id,
            PaymentEvent::Captured(data) | PaymentEvent::Refunded(data) => &data.payment_id,
            PaymentEvent::Failed(data) => &data.payment_id,
        }
    }
}

impl DomainEvent for PaymentEvent {
    fn topic(&self) -> &'static str {
        match self {
            PaymentEvent::Authorized(_) => topics::AUTHORIZED,
            PaymentEvent::Captured(_) => topics::CAPTURED,
            PaymentEvent::Failed(_) => topics::FAILED,
            PaymentEvent::Refunded(_) => topics::REFUNDED,
        }
    }

    fn aggregate_type(&self) -> &'static str {
        "Payment"
    }

    fn aggregate_id(&self) -> String {
        self.payment_id().to_string()
    }
}

/// Data for the `Authorized` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentAuthorizedData {
    pub payment_id: PaymentId,
    pub reservation_id: ReservationId,

    /// Gateway reference for later capture or refund.
    pub transaction_id: String,

    pub amount: Money,
    pub authorized_at: DateTime<Utc>,
}

/// Data for the `Captured` and `Refunded` events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSettledData {
    pub payment_id: PaymentId,
    pub reservation_id: ReservationId,
    pub amount: Money,
    pub settled_at: DateTime<Utc>,
}

impl From<&Payment> for PaymentSettledData {
    fn from(payment: &Payment) -> Self {
        Self {
            payment_id: payment.id().clone(),
            reservation_id: payment.reservation_id().clone(),
            amount: payment.amount().clone(),
            settled_at: payment.updated_at(),
        }
    }
}

/// Data for the `Failed` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentFailedData {
    pub payment_id: PaymentId,
    pub reservation_id: ReservationId,

    /// Machine-readable failure code (e.g., "gateway_error").
    pub error_code: String,

    /// Gateway's failure message.
    pub error_msg: String,

    pub failed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment() -> Payment {
        Payment::new(
            PaymentId::new("pay-1"),
            ReservationId::new("res-1"),
            Money::new(30000, "USD"),
            "card",
        )
    }

    #[test]
    fn test_authorized_carries_transaction() {
        let mut payment = payment();
        payment.authorize("txn_pay-1_30000").unwrap();

        let event = PaymentEvent::authorized(&payment);
        assert_eq!(event.topic(), "payment.authorized");
        match event {
            PaymentEvent::Authorized(data) => {
                assert_eq!(data.transaction_id, "txn_pay-1_30000");
                assert_eq!(data.reservation_id.as_str(), "res-1");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_failed_uses_last_failure() {
        let mut payment = payment();
        payment.fail("gateway_error", "card declined").unwrap();

        let event = PaymentEvent::failed(&payment);
        assert_eq!(event.topic(), "payment.failed");
        match event {
            PaymentEvent::Failed(data) => {
                assert_eq!(data.error_code, "gateway_error");
                assert_eq!(data.error_msg, "card declined");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_envelope_decodes() {
        let mut payment = payment();
        payment.authorize("txn-1").unwrap();
        payment.capture().unwrap();

        let envelope = PaymentEvent::captured(&payment).to_envelope().unwrap();
        assert_eq!(envelope.topic, "payment.captured");
        assert_eq!(envelope.aggregate_type, "Payment");
        assert_eq!(envelope.aggregate_id, "pay-1");

        let decoded: PaymentEvent = envelope.decode().unwrap();
        assert!(matches!(decoded, PaymentEvent::Captured(_)));
    }
}
