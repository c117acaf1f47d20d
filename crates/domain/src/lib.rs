//! Domain layer for the booking system.
//!
//! This crate provides the two bounded contexts a booking spans:
//! - Reservation aggregate, availability checking and reservation service
//! - Payment aggregate, gateway port and payment service
//! - DomainEvent trait and publishing helpers shared by both
//!
//! The aggregates are persisted independently. Nothing here coordinates
//! them; that is the saga's job.

pub mod error;
pub mod event;
pub mod payment;
pub mod reservation;

pub use error::DomainError;
pub use event::{DomainEvent, EventPublisherExt};
pub use payment::{
    AuthorizePayment, GatewayError, GatewayOperation, Payment, PaymentError, PaymentEvent,
    PaymentGateway, PaymentRepository, PaymentService, PaymentStatus,
};
pub use reservation::{
    AvailabilityChecker, AvailabilityError, CreateReservation, DateRange, GuestInfo,
    RepositoryAvailabilityChecker, Reservation, ReservationError, ReservationEvent,
    ReservationRepository, ReservationService, ReservationStatus,
};
