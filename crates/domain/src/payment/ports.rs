//! Outbound ports of the payment context.

use async_trait::async_trait;
use common::{Money, PaymentId};
use serde::{Deserialize, Serialize};
use store::Repository;
use thiserror::Error;

use super::Payment;

/// Storage for payments.
pub trait PaymentRepository: Repository<PaymentId, Payment> {}

impl<T> PaymentRepository for T where T: Repository<PaymentId, Payment> + ?Sized {}

/// Gateway operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GatewayOperation {
    Authorize,
    Capture,
    Refund,
}

impl GatewayOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayOperation::Authorize => "authorize",
            GatewayOperation::Capture => "capture",
            GatewayOperation::Refund => "refund",
        }
    }
}

impl std::fmt::Display for GatewayOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors reported by a payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The issuer declined the charge.
    #[error("Payment declined: {0}")]
    Declined(String),

    /// No authorization exists for the transaction.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Capture or refund amount differs from the authorized amount.
    #[error("Amount mismatch: authorized {authorized}, requested {requested}")]
    AmountMismatch { authorized: Money, requested: Money },

    /// The gateway could not be reached.
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),
}

/// External payment processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Authorizes the payment's amount, returning a transaction ID.
    async fn authorize(&self, payment: &Payment) -> Result<String, GatewayError>;

    /// Captures funds previously authorized under `transaction_id`.
    async fn capture(&self, transaction_id: &str, amount: &Money) -> Result<(), GatewayError>;

    /// Refunds captured funds.
    async fn refund(&self, transaction_id: &str, amount: &Money) -> Result<(), GatewayError>;
}

#[async_trait]
impl<T: PaymentGateway + ?Sized> PaymentGateway for std::sync::Arc<T> {
    async fn authorize(&self, payment: &Payment) -> Result<String, GatewayError> {
        (**self).authorize(payment).await
    }

    async fn capture(&self, transaction_id: &str, amount: &Money) -> Result<(), GatewayError> {
        (**self).capture(transaction_id, amount).await
    }

    async fn refund(&self, transaction_id: &str, amount: &Money) -> Result<(), GatewayError> {
        (**self).refund(transaction_id, amount).await
    }
}
