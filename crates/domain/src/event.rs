//! Domain event trait and publishing helpers.

use async_trait::async_trait;
use serde::Serialize;
use store::{EventEnvelope, EventPublisher, PublishError};

/// Trait for domain events.
///
/// Domain events represent facts that have happened to an aggregate. They are
/// immutable, named in past tense and routed by topic.
pub trait DomainEvent: Serialize + Send + Sync {
    /// Returns the topic the event is published on (e.g., "reservation.created").
    fn topic(&self) -> &'static str;

    /// Returns the aggregate type name.
    fn aggregate_type(&self) -> &'static str;

    /// Returns the identifier of the aggregate the event belongs to.
    fn aggregate_id(&self) -> String;

    /// Wraps the event in an envelope, serializing its payload.
    fn to_envelope(&self) -> Result<EventEnvelope, PublishError>
    where
        Self: Sized,
    {
        EventEnvelope::builder()
            .topic(self.topic())
            .aggregate_type(self.aggregate_type())
            .aggregate_id(self.aggregate_id())
            .payload(self)?
            .build()
    }
}

/// Extension trait for publishing domain events directly.
#[async_trait]
pub trait EventPublisherExt: EventPublisher {
    /// Serializes a domain event into an envelope and publishes it.
    async fn publish_event<E: DomainEvent>(&self, event: &E) -> Result<(), PublishError> {
        let envelope = event.to_envelope()?;
        self.publish(envelope).await
    }
}

impl<T: EventPublisher + ?Sized> EventPublisherExt for T {}
