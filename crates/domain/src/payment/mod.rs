//! Payment aggregate and related types.

mod aggregate;
mod attempt;
mod commands;
mod events;
mod ports;
mod service;
mod state;

pub use aggregate::{MAX_FAILED_ATTEMPTS, Payment};
pub use attempt::PaymentAttempt;
pub use commands::AuthorizePayment;
pub use events::{
    PaymentAuthorizedData, PaymentEvent, PaymentFailedData, PaymentSettledData, topics,
};
pub use ports::{GatewayError, GatewayOperation, PaymentGateway, PaymentRepository};
pub use service::{AUTHORIZATION_FAILED_CODE, CAPTURE_FAILED_CODE, PaymentService};
pub use state::PaymentStatus;

use thiserror::Error;

/// Errors raised by payment business rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// Payment is not in a status that allows the action.
    #[error("Invalid payment state transition: cannot {action} from {current_state} state")]
    InvalidTransition {
        current_state: PaymentStatus,
        action: &'static str,
    },

    #[error("Payment already authorized")]
    AlreadyAuthorized,

    #[error("Payment not authorized")]
    NotAuthorized,

    #[error("Payment already captured")]
    AlreadyCaptured,

    #[error("Payment already refunded")]
    AlreadyRefunded,

    #[error("Can only refund captured payments")]
    CannotRefund,

    /// Authorization has failed too many times to try again.
    #[error("Retry limit exceeded after {failed_attempts} failed attempts")]
    RetryLimitExceeded { failed_attempts: usize },
}
