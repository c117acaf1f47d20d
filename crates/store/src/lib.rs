//! Persistence and publishing ports for the booking system.
//!
//! Concrete backends (files, Postgres, a message broker) live outside this
//! workspace; the in-memory adapters here back tests and the demo binary.

pub mod error;
pub mod event;
pub mod memory;
pub mod publisher;
pub mod repository;

pub use error::{PublishError, RepositoryError, Result};
pub use event::{EventEnvelope, EventEnvelopeBuilder, EventId};
pub use memory::InMemoryRepository;
pub use publisher::{EventPublisher, InMemoryEventPublisher};
pub use repository::Repository;
