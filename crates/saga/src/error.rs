//! Saga error types.

use domain::DomainError;
use thiserror::Error;

use crate::booking::{BookingStep, CompensationAction};

/// A compensating action that could not be completed.
#[derive(Debug)]
pub struct CompensationFailure {
    pub action: CompensationAction,
    pub error: DomainError,
}

impl std::fmt::Display for CompensationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.action, self.error)
    }
}

fn describe_failures(failures: &[CompensationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur during saga operations.
#[derive(Debug, Error)]
pub enum SagaError {
    /// A forward step failed; any compensation it needed succeeded.
    #[error("Booking {step} failed: {source}")]
    StepFailed {
        step: BookingStep,
        #[source]
        source: DomainError,
    },

    /// A forward step failed and at least one compensation failed too.
    #[error(
        "Booking {step} failed: {source}; compensation failed: {}",
        describe_failures(.failures)
    )]
    CompensationFailed {
        step: BookingStep,
        #[source]
        source: DomainError,
        failures: Vec<CompensationFailure>,
    },

    /// Domain error outside a numbered step.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// The event's payload does not match its topic.
    #[error("Unsupported event on topic '{topic}'")]
    UnsupportedEvent { topic: String },

    /// The event's payload could not be decoded.
    #[error("Malformed event on topic '{topic}': {source}")]
    MalformedEvent {
        topic: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SagaError {
    /// Returns the step that failed, if the error came from a numbered step.
    pub fn step(&self) -> Option<BookingStep> {
        match self {
            SagaError::StepFailed { step, .. } | SagaError::CompensationFailed { step, .. } => {
                Some(*step)
            }
            _ => None,
        }
    }

    /// Returns the compensations that failed.
    pub fn compensation_failures(&self) -> &[CompensationFailure] {
        match self {
            SagaError::CompensationFailed { failures, .. } => failures,
            _ => &[],
        }
    }
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;
