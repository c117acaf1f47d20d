//! Event-driven entry path for the booking saga.
//!
//! Each handler reacts to one published event and performs the next step of
//! the booking. Replaying an event repeats its step: there is no idempotency
//! key.

use std::sync::Arc;

use common::PaymentId;
use domain::payment::topics as payment_topics;
use domain::reservation::topics as reservation_topics;
use domain::{
    AuthorizePayment, AvailabilityChecker, Payment, PaymentEvent, PaymentGateway,
    PaymentRepository, Reservation, ReservationEvent, ReservationRepository,
};
use serde::de::DeserializeOwned;
use store::{EventEnvelope, EventPublisher};

use crate::booking;
use crate::coordinator::BookingCoordinator;
use crate::error::SagaError;
use crate::services::NotificationService;

/// Topics the booking handler reacts to.
pub const SUBSCRIBED_TOPICS: [&str; 4] = [
    reservation_topics::CREATED,
    payment_topics::AUTHORIZED,
    payment_topics::CAPTURED,
    payment_topics::FAILED,
];

/// What handling an event did.
#[derive(Debug)]
pub enum HandlerOutcome {
    /// A payment was authorized for a new reservation.
    PaymentAuthorized(Payment),

    /// An authorized payment was captured.
    PaymentCaptured(Payment),

    /// The reservation was confirmed.
    ReservationConfirmed(Reservation),

    /// The reservation was cancelled after a payment failure.
    ReservationCancelled(Reservation),

    /// The topic is not one the handler reacts to.
    Ignored,
}

/// Dispatches booking events to the coordinator's handlers.
pub struct BookingEventHandler<RR, AC, PR, PG, EP, N> {
    coordinator: Arc<BookingCoordinator<RR, AC, PR, PG, EP, N>>,
}

impl<RR, AC, PR, PG, EP, N> Clone for BookingEventHandler<RR, AC, PR, PG, EP, N> {
    fn clone(&self) -> Self {
        Self {
            coordinator: Arc::clone(&self.coordinator),
        }
    }
}

impl<RR, AC, PR, PG, EP, N> BookingEventHandler<RR, AC, PR, PG, EP, N>
where
    RR: ReservationRepository,
    AC: AvailabilityChecker,
    PR: PaymentRepository,
    PG: PaymentGateway,
    EP: EventPublisher,
    N: NotificationService,
{
    /// Creates a handler driving the given coordinator.
    pub fn new(coordinator: Arc<BookingCoordinator<RR, AC, PR, PG, EP, N>>) -> Self {
        Self { coordinator }
    }

    /// Returns the coordinator.
    pub fn coordinator(&self) -> &BookingCoordinator<RR, AC, PR, PG, EP, N> {
        &self.coordinator
    }

    /// Handles one event envelope.
    #[tracing::instrument(
        skip(self, envelope),
        fields(topic = %envelope.topic, event_id = %envelope.event_id)
    )]
    pub async fn handle(&self, envelope: &EventEnvelope) -> Result<HandlerOutcome, SagaError> {
        match envelope.topic.as_str() {
            reservation_topics::CREATED => {
                let ReservationEvent::Created(data) = decode::<ReservationEvent>(envelope)? else {
                    return Err(unsupported(envelope));
                };

                let cmd = AuthorizePayment::new(
                    PaymentId::new(format!("pay-{}", data.reservation_id)),
                    data.reservation_id,
                    data.total_amount,
                    booking::DEFAULT_PAYMENT_METHOD,
                );
                let payment = self
                    .coordinator
                    .payments()
                    .authorize_payment_for_reservation(cmd)
                    .await?;
                Ok(HandlerOutcome::PaymentAuthorized(payment))
            }
            payment_topics::AUTHORIZED => {
                let PaymentEvent::Authorized(data) = decode::<PaymentEvent>(envelope)? else {
                    return Err(unsupported(envelope));
                };

                let payment = self
                    .coordinator
                    .on_payment_authorized(&data.payment_id, &data.reservation_id)
                    .await?;
                Ok(HandlerOutcome::PaymentCaptured(payment))
            }
            payment_topics::CAPTURED => {
                let PaymentEvent::Captured(data) = decode::<PaymentEvent>(envelope)? else {
                    return Err(unsupported(envelope));
                };

                let reservation = self
                    .coordinator
                    .on_payment_captured(&data.reservation_id)
                    .await?;
                Ok(HandlerOutcome::ReservationConfirmed(reservation))
            }
            payment_topics::FAILED => {
                let PaymentEvent::Failed(data) = decode::<PaymentEvent>(envelope)? else {
                    return Err(unsupported(envelope));
                };

                let reason = format!("payment_failed: {} - {}", data.error_code, data.error_msg);
                let reservation = self
                    .coordinator
                    .on_payment_failed(&data.reservation_id, &reason)
                    .await?;
                Ok(HandlerOutcome::ReservationCancelled(reservation))
            }
            _ => {
                tracing::debug!("event ignored");
                Ok(HandlerOutcome::Ignored)
            }
        }
    }
}

fn decode<T: DeserializeOwned>(envelope: &EventEnvelope) -> Result<T, SagaError> {
    envelope
        .decode()
        .map_err(|source| SagaError::MalformedEvent {
            topic: envelope.topic.clone(),
            source,
        })
}

fn unsupported(envelope: &EventEnvelope) -> SagaError {
    SagaError::UnsupportedEvent {
        topic: envelope.topic.clone(),
    }
}
