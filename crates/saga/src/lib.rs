//! Saga pattern implementation for hotel bookings.
//!
//! This crate coordinates the reservation and payment services, which are
//! persisted independently, with compensating actions on failure.
//!
//! The booking saga follows these steps:
//! 1. Create reservation
//! 2. Authorize payment
//! 3. Capture payment
//! 4. Confirm reservation
//!
//! If step 2 or 3 fails the reservation is cancelled. If step 4 fails the
//! payment is refunded and the reservation cancelled. The same flow can be
//! driven by events through [`BookingEventHandler`].

pub mod booking;
pub mod coordinator;
pub mod error;
pub mod handlers;
pub mod services;

use common::{PaymentId, ReservationId};
use domain::{Payment, RepositoryAvailabilityChecker, Reservation};
use store::{InMemoryEventPublisher, InMemoryRepository};

pub use booking::{BookingStep, CompensationAction};
pub use coordinator::{BookingCoordinator, BookingRequest};
pub use error::{CompensationFailure, SagaError};
pub use handlers::{BookingEventHandler, HandlerOutcome, SUBSCRIBED_TOPICS};
pub use services::{
    InMemoryNotificationService, InMemoryPaymentGateway, Notification, NotificationError,
    NotificationService,
};

/// Reservation repository backed by memory.
pub type InMemoryReservationRepository = InMemoryRepository<ReservationId, Reservation>;

/// Payment repository backed by memory.
pub type InMemoryPaymentRepository = InMemoryRepository<PaymentId, Payment>;

/// Booking coordinator wired to the in-memory adapters.
pub type InMemoryBookingCoordinator = BookingCoordinator<
    InMemoryReservationRepository,
    RepositoryAvailabilityChecker<InMemoryReservationRepository>,
    InMemoryPaymentRepository,
    InMemoryPaymentGateway,
    InMemoryEventPublisher,
    InMemoryNotificationService,
>;

/// Event handler wired to the in-memory adapters.
pub type InMemoryBookingEventHandler = BookingEventHandler<
    InMemoryReservationRepository,
    RepositoryAvailabilityChecker<InMemoryReservationRepository>,
    InMemoryPaymentRepository,
    InMemoryPaymentGateway,
    InMemoryEventPublisher,
    InMemoryNotificationService,
>;
