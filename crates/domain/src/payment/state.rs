//! Payment state machine.

use serde::{Deserialize, Serialize};

/// The status of a payment.
///
/// State transitions:
/// ```text
/// Pending ──► Authorized ──► Captured ──► Refunded
///    │  ▲          │
///    ▼  │          │
///   Failed ◄───────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Created, not yet sent to the gateway.
    #[default]
    Pending,

    /// Funds reserved at the gateway.
    Authorized,

    /// Funds collected.
    Captured,

    /// Gateway rejected an operation. Authorization may be retried.
    Failed,

    /// Captured funds returned (terminal state).
    Refunded,
}

impl PaymentStatus {
    /// Returns true if authorization may be attempted from this status.
    pub fn can_authorize(&self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Failed)
    }

    /// Returns true if the payment can be captured from this status.
    pub fn can_capture(&self) -> bool {
        matches!(self, PaymentStatus::Authorized)
    }

    /// Returns true if the payment can be refunded from this status.
    pub fn can_refund(&self) -> bool {
        matches!(self, PaymentStatus::Captured)
    }

    /// Returns true if the payment can be marked failed from this status.
    pub fn can_fail(&self) -> bool {
        !matches!(self, PaymentStatus::Captured | PaymentStatus::Refunded)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Authorized => "authorized",
            PaymentStatus::Captured => "captured",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
