//! Demo wiring for the hotel booking saga.
//!
//! Builds the booking system on the in-memory adapters and runs one booking,
//! either orchestrated by the coordinator or driven by published events.

pub mod config;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{GuestId, PaymentId, ReservationId, RoomId};
use domain::{
    CreateReservation, GuestInfo, Payment, PaymentService, RepositoryAvailabilityChecker,
    Reservation, ReservationService,
};
use saga::{
    BookingCoordinator, BookingEventHandler, BookingRequest, InMemoryBookingCoordinator,
    InMemoryBookingEventHandler, InMemoryNotificationService, InMemoryPaymentGateway,
    InMemoryPaymentRepository, InMemoryReservationRepository, SagaError,
};
use store::{InMemoryEventPublisher, InMemoryRepository, Repository};

pub use config::{BookingMode, Config, ConfigError, GatewayFailure, LogFormat};

/// Room booked by the demo.
pub const DEMO_ROOM: &str = "room-101";

/// Reservation id used by the demo.
pub const DEMO_RESERVATION: &str = "res-demo-1";

/// Booking saga wired to in-memory adapters, with handles on each adapter.
pub struct BookingSystem {
    pub coordinator: Arc<InMemoryBookingCoordinator>,
    pub reservations: InMemoryReservationRepository,
    pub payments: InMemoryPaymentRepository,
    pub gateway: InMemoryPaymentGateway,
    pub publisher: InMemoryEventPublisher,
    pub notifications: InMemoryNotificationService,
}

impl BookingSystem {
    /// Creates a system with empty in-memory adapters.
    pub fn in_memory() -> Self {
        let reservations: InMemoryReservationRepository = InMemoryRepository::new("Reservation");
        let payments: InMemoryPaymentRepository = InMemoryRepository::new("Payment");
        let gateway = InMemoryPaymentGateway::new();
        let publisher = InMemoryEventPublisher::new();
        let notifications = InMemoryNotificationService::new();

        let reservation_service = ReservationService::new(
            reservations.clone(),
            RepositoryAvailabilityChecker::new(reservations.clone()),
            publisher.clone(),
        );
        let payment_service =
            PaymentService::new(payments.clone(), gateway.clone(), publisher.clone());
        let coordinator =
            BookingCoordinator::new(reservation_service, payment_service, notifications.clone());

        Self {
            coordinator: Arc::new(coordinator),
            reservations,
            payments,
            gateway,
            publisher,
            notifications,
        }
    }

    /// Makes the gateway fail the given operation.
    pub fn apply_gateway_failure(&self, failure: GatewayFailure) {
        self.gateway
            .set_fail_on_authorize(failure == GatewayFailure::Authorize);
        self.gateway
            .set_fail_on_capture(failure == GatewayFailure::Capture);
        self.gateway
            .set_fail_on_refund(failure == GatewayFailure::Refund);
    }

    /// Returns an event handler driving this system's coordinator.
    pub fn event_handler(&self) -> InMemoryBookingEventHandler {
        BookingEventHandler::new(Arc::clone(&self.coordinator))
    }

    /// Feeds published events through `handler` until none remain.
    ///
    /// Returns the topics of the handled events, in order. Handler errors are
    /// logged and do not stop the pump.
    pub async fn pump_events(&self, handler: &InMemoryBookingEventHandler) -> Vec<String> {
        let mut handled = Vec::new();
        loop {
            let batch = self.publisher.drain().await;
            if batch.is_empty() {
                return handled;
            }
            for envelope in batch {
                if let Err(error) = handler.handle(&envelope).await {
                    tracing::warn!(topic = %envelope.topic, %error, "event handler failed");
                }
                handled.push(envelope.topic);
            }
        }
    }
}

/// Builds the demo reservation command from the configuration.
pub fn demo_reservation(
    config: &Config,
    now: DateTime<Utc>,
) -> Result<CreateReservation, ConfigError> {
    Ok(CreateReservation::new(
        ReservationId::new(DEMO_RESERVATION),
        GuestId::new("guest-demo"),
        RoomId::new(DEMO_ROOM),
        config.stay(now)?,
        config.total_amount()?,
        vec![GuestInfo::new(
            "Grace Hopper",
            "grace@example.com",
            "+1-555-0199",
        )],
    ))
}

/// Outcome of a demo run.
#[derive(Debug)]
pub struct DemoReport {
    /// The saga error, if the booking failed.
    pub error: Option<SagaError>,

    /// Final stored reservation, if one was created.
    pub reservation: Option<Reservation>,

    /// Final stored payment, if one was created.
    pub payment: Option<Payment>,

    /// Topics published during the run, in order.
    pub topics: Vec<String>,
}

impl DemoReport {
    /// Returns true if the booking ended confirmed.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
            && self
                .reservation
                .as_ref()
                .is_some_and(|r| r.status() == domain::ReservationStatus::Confirmed)
    }
}

/// Runs one demo booking on `system` as configured.
///
/// Fails only if the configured stay or price cannot be represented; booking
/// failures are reported in the [`DemoReport`].
#[tracing::instrument(skip(system, config), fields(mode = ?config.mode))]
pub async fn run_demo(system: &BookingSystem, config: &Config) -> Result<DemoReport, ConfigError> {
    let cmd = demo_reservation(config, Utc::now())?;
    system.apply_gateway_failure(config.gateway_failure);
    let reservation_id = cmd.reservation_id.clone();
    let payment_id = PaymentId::new(format!("pay-{reservation_id}"));

    let (error, topics) = match config.mode {
        BookingMode::Orchestrated => {
            let request = BookingRequest::new(cmd, payment_id.clone(), "card");
            let result = system.coordinator.complete_booking(request).await;
            (result.err(), system.publisher.topics().await)
        }
        BookingMode::EventDriven => match system.coordinator.initiate_booking(cmd).await {
            Ok(_) => {
                let handled = system.pump_events(&system.event_handler()).await;
                tracing::debug!(events = handled.len(), "event pump drained");
                (None, handled)
            }
            Err(error) => (Some(error), Vec::new()),
        },
    };

    let report = DemoReport {
        error,
        reservation: system.reservations.read(&reservation_id).await.ok(),
        payment: system.payments.read(&payment_id).await.ok(),
        topics,
    };

    match &report.error {
        None => tracing::info!(
            reservation_status = ?report.reservation.as_ref().map(|r| r.status()),
            payment_status = ?report.payment.as_ref().map(|p| p.status()),
            "demo booking finished"
        ),
        Some(error) => tracing::warn!(%error, "demo booking failed"),
    }

    Ok(report)
}
