use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PaymentStatus;

/// One recorded payment transition.
///
/// Attempts are appended on every successful transition and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentAttempt {
    pub attempted_at: DateTime<Utc>,

    /// Status the payment moved to.
    pub status: PaymentStatus,

    pub error_code: Option<String>,
    pub error_msg: Option<String>,
}

impl PaymentAttempt {
    /// Records a successful transition.
    pub fn succeeded(status: PaymentStatus, at: DateTime<Utc>) -> Self {
        Self {
            attempted_at: at,
            status,
            error_code: None,
            error_msg: None,
        }
    }

    /// Records a failure with the gateway's error details.
    pub fn failed(code: impl Into<String>, msg: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            attempted_at: at,
            status: PaymentStatus::Failed,
            error_code: Some(code.into()),
            error_msg: Some(msg.into()),
        }
    }

    /// Returns true if this attempt recorded a failure.
    pub fn is_failure(&self) -> bool {
        self.status == PaymentStatus::Failed
    }
}
