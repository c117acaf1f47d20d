//! Payment aggregate implementation.

use chrono::{DateTime, Utc};
use common::{Money, PaymentId, ReservationId};
use serde::{Deserialize, Serialize};

use super::{PaymentAttempt, PaymentError, PaymentStatus};

/// Number of failed attempts after which authorization is no longer retried.
pub const MAX_FAILED_ATTEMPTS: usize = 3;

/// Payment for one reservation, referenced by ID only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    id: PaymentId,
    reservation_id: ReservationId,
    amount: Money,
    status: PaymentStatus,
    payment_method: String,
    transaction_id: Option<String>,
    attempts: Vec<PaymentAttempt>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a pending payment with no attempts.
    pub fn new(
        id: PaymentId,
        reservation_id: ReservationId,
        amount: Money,
        payment_method: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            reservation_id,
            amount,
            status: PaymentStatus::Pending,
            payment_method: payment_method.into(),
            transaction_id: None,
            attempts: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &PaymentId {
        &self.id
    }

    pub fn reservation_id(&self) -> &ReservationId {
        &self.reservation_id
    }

    pub fn amount(&self) -> &Money {
        &self.amount
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    /// Returns the gateway transaction ID, set once authorized.
    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    /// Returns every recorded attempt, oldest first.
    pub fn attempts(&self) -> &[PaymentAttempt] {
        &self.attempts
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Transitions

    /// Records a successful gateway authorization.
    pub fn authorize(&mut self, transaction_id: impl Into<String>) -> Result<(), PaymentError> {
        if self.status == PaymentStatus::Authorized {
            return Err(PaymentError::AlreadyAuthorized);
        }
        if !self.status.can_authorize() {
            return Err(PaymentError::InvalidTransition {
                current_state: self.status,
                action: "authorize",
            });
        }

        self.transaction_id = Some(transaction_id.into());
        self.record(PaymentStatus::Authorized);
        Ok(())
    }

    /// Records a successful capture of authorized funds.
    pub fn capture(&mut self) -> Result<(), PaymentError> {
        if self.status == PaymentStatus::Captured {
            return Err(PaymentError::AlreadyCaptured);
        }
        if !self.status.can_capture() {
            return Err(PaymentError::NotAuthorized);
        }

        self.record(PaymentStatus::Captured);
        Ok(())
    }

    /// Records a refund of captured funds.
    pub fn refund(&mut self) -> Result<(), PaymentError> {
        if self.status == PaymentStatus::Refunded {
            return Err(PaymentError::AlreadyRefunded);
        }
        if !self.status.can_refund() {
            return Err(PaymentError::CannotRefund);
        }

        self.record(PaymentStatus::Refunded);
        Ok(())
    }

    /// Marks the payment failed with the gateway's error details.
    pub fn fail(
        &mut self,
        error_code: impl Into<String>,
        error_msg: impl Into<String>,
    ) -> Result<(), PaymentError> {
        if !self.status.can_fail() {
            return Err(PaymentError::InvalidTransition {
                current_state: self.status,
                action: "fail",
            });
        }

        let now = Utc::now();
        self.status = PaymentStatus::Failed;
        self.attempts
            .push(PaymentAttempt::failed(error_code, error_msg, now));
        self.updated_at = now;
        Ok(())
    }

    fn record(&mut self, status: PaymentStatus) {
        let now = Utc::now();
        self.status = status;
        self.attempts.push(PaymentAttempt::succeeded(status, now));
        self.updated_at = now;
    }

    // Queries

    /// Returns the number of failed attempts recorded.
    pub fn failed_attempt_count(&self) -> usize {
        self.attempts.iter().filter(|a| a.is_failure()).count()
    }

    /// Returns true if authorization may be attempted again.
    pub fn can_be_retried(&self) -> bool {
        self.status.can_authorize() && self.failed_attempt_count() < MAX_FAILED_ATTEMPTS
    }

    /// Checks that authorization may be attempted again.
    pub fn ensure_retryable(&self) -> Result<(), PaymentError> {
        if !self.status.can_authorize() {
            return Err(PaymentError::InvalidTransition {
                current_state: self.status,
                action: "retry authorization",
            });
        }
        let failed_attempts = self.failed_attempt_count();
        if failed_attempts >= MAX_FAILED_ATTEMPTS {
            return Err(PaymentError::RetryLimitExceeded { failed_attempts });
        }
        Ok(())
    }

    /// Returns true once funds have been captured.
    pub fn is_successful(&self) -> bool {
        self.status == PaymentStatus::Captured
    }
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
    fn test_new_payment_is_pending() {
        let payment = payment();

        assert_eq!(payment.status(), PaymentStatus::Pending);
        assert!(payment.attempts().is_empty());
        assert!(payment.transaction_id().is_none());
        assert!(payment.can_be_retried());
        assert!(!payment.is_successful());
    }

    #[test]
    fn test_authorize_capture_refund() {
        let mut payment = payment();

        payment.authorize("txn-1").unwrap();
        assert_eq!(payment.status(), PaymentStatus::Authorized);
        assert_eq!(payment.transaction_id(), Some("txn-1"));

        payment.capture().unwrap();
        assert!(payment.is_successful());

        payment.refund().unwrap();
        assert_eq!(payment.status(), PaymentStatus::Refunded);

        let statuses: Vec<_> = payment.attempts().iter().map(|a| a.status).collect();
        assert_eq!(
            statuses,
            vec![
                PaymentStatus::Authorized,
                PaymentStatus::Captured,
                PaymentStatus::Refunded
            ]
        );
    }

    #[test]
    fn test_authorize_twice_fails() {
        let mut payment = payment();
        payment.authorize("txn-1").unwrap();

        assert_eq!(payment.authorize("txn-2"), Err(PaymentError::AlreadyAuthorized));
        assert_eq!(payment.transaction_id(), Some("txn-1"));
        assert_eq!(payment.attempts().len(), 1);
    }

    #[test]
    fn test_authorize_after_capture_is_invalid() {
        let mut payment = payment();
        payment.authorize("txn-1").unwrap();
        payment.capture().unwrap();

        assert_eq!(
            payment.authorize("txn-2"),
            Err(PaymentError::InvalidTransition {
                current_state: PaymentStatus::Captured,
                action: "authorize",
            })
        );
    }

    #[test]
    fn test_authorize_after_failure() {
        let mut payment = payment();
        payment.fail("gateway_error", "declined").unwrap();
        payment.authorize("txn-1").unwrap();

        assert_eq!(payment.status(), PaymentStatus::Authorized);
        assert_eq!(payment.failed_attempt_count(), 1);
    }

    #[test]
    fn test_capture_errors() {
        let mut payment = payment();
        assert_eq!(payment.capture(), Err(PaymentError::NotAuthorized));

        payment.authorize("txn-1").unwrap();
        payment.capture().unwrap();
        assert_eq!(payment.capture(), Err(PaymentError::AlreadyCaptured));
    }

    #[test]
    fn test_refund_errors() {
        let mut payment = payment();
        assert_eq!(payment.refund(), Err(PaymentError::CannotRefund));

        payment.authorize("txn-1").unwrap();
        assert_eq!(payment.refund(), Err(PaymentError::CannotRefund));

        payment.capture().unwrap();
        payment.refund().unwrap();
        assert_eq!(payment.refund(), Err(PaymentError::AlreadyRefunded));
    }

    #[test]
    fn test_fail_records_error() {
        let mut payment = payment();
        payment.authorize("txn-1").unwrap();
        payment.fail("capture_failed", "gateway timeout").unwrap();

        assert_eq!(payment.status(), PaymentStatus::Failed);
        let last = payment.attempts().last().unwrap();
        assert_eq!(last.error_code.as_deref(), Some("capture_failed"));
        assert_eq!(last.error_msg.as_deref(), Some("gateway timeout"));
    }

    #[test]
    fn test_cannot_fail_captured_or_refunded() {
        let mut payment = payment();
        payment.authorize("txn-1").unwrap();
        payment.capture().unwrap();
        assert!(matches!(
            payment.fail("x", "y"),
            Err(PaymentError::InvalidTransition { action: "fail", .. })
        ));

        payment.refund().unwrap();
        assert!(payment.fail("x", "y").is_err());
        assert_eq!(payment.status(), PaymentStatus::Refunded);
    }

    #[test]
    fn test_retry_limit() {
        let mut payment = payment();
        payment.fail("gateway_error", "declined").unwrap();
        payment.fail("gateway_error", "declined").unwrap();
        assert!(payment.can_be_retried());
        assert!(payment.ensure_retryable().is_ok());

        payment.fail("gateway_error", "declined").unwrap();
        assert_eq!(payment.failed_attempt_count(), MAX_FAILED_ATTEMPTS);
        assert!(!payment.can_be_retried());
        assert_eq!(
            payment.ensure_retryable(),
            Err(PaymentError::RetryLimitExceeded { failed_attempts: 3 })
        );
    }

    #[test]
    fn test_authorized_payment_is_not_retryable() {
        let mut payment = payment();
        payment.authorize("txn-1").unwrap();

        assert!(!payment.can_be_retried());
        assert!(matches!(
            payment.ensure_retryable(),
            Err(PaymentError::InvalidTransition { .. })
        ));
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Op {
        Authorize,
        Capture,
        Refund,
        Fail,
    }

    fn apply(payment: &mut Payment, op: Op) -> Result<(), PaymentError> {
        match op {
            Op::Authorize => payment.authorize("txn-1"),
            Op::Capture => payment.capture(),
            Op::Refund => payment.refund(),
            Op::Fail => payment.fail("gateway_error", "declined"),
        }
    }

    fn in_status(status: PaymentStatus) -> Payment {
        let mut payment = payment();
        let path: &[Op] = match status {
            PaymentStatus::Pending => &[],
            PaymentStatus::Authorized => &[Op::Authorize],
            PaymentStatus::Captured => &[Op::Authorize, Op::Capture],
            PaymentStatus::Failed => &[Op::Fail],
            PaymentStatus::Refunded => &[Op::Authorize, Op::Capture, Op::Refund],
        };
        for op in path {
            apply(&mut payment, *op).unwrap();
        }
        assert_eq!(payment.status(), status);
        payment
    }

    #[test]
    fn test_transition_matrix() {
        use PaymentStatus::{Authorized, Captured, Failed, Pending, Refunded};

        let allowed = [
            (Pending, Op::Authorize, Authorized),
            (Failed, Op::Authorize, Authorized),
            (Authorized, Op::Capture, Captured),
            (Captured, Op::Refund, Refunded),
            (Pending, Op::Fail, Failed),
            (Authorized, Op::Fail, Failed),
            (Failed, Op::Fail, Failed),
        ];

        for from in [Pending, Authorized, Captured, Failed, Refunded] {
            for op in [Op::Authorize, Op::Capture, Op::Refund, Op::Fail] {
                let mut payment = in_status(from);
                let before = payment.clone();
                let result = apply(&mut payment, op);

                match allowed.iter().find(|(f, o, _)| *f == from && *o == op) {
                    Some((_, _, to)) => {
                        assert_eq!(result, Ok(()), "{op:?} from {from:?}");
                        assert_eq!(payment.status(), *to, "{op:?} from {from:?}");
                        assert_eq!(payment.attempts().len(), before.attempts().len() + 1);
                    }
                    None => {
                        assert!(result.is_err(), "{op:?} from {from:?} should fail");
                        assert_eq!(payment, before, "{op:?} from {from:?} changed state");
                    }
                }
            }
        }
    }
}
