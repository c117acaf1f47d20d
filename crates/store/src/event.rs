use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::PublishError;

/// Unique identifier for a published event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A serialized domain event with the topic and aggregate it is routed by.
///
/// The payload is serialized when the envelope is built, so later changes to
/// the source aggregate never show up in a published event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// The topic the event is published on (e.g., "reservation.created").
    pub topic: String,

    /// The aggregate this event belongs to.
    pub aggregate_id: String,

    /// The type of aggregate (e.g., "Reservation", "Payment").
    pub aggregate_type: String,

    /// When the event was created.
    pub timestamp: DateTime<Utc>,

    /// The event payload as JSON.
    pub payload: serde_json::Value,
}

impl EventEnvelope {
    /// Creates a new event envelope builder.
    pub fn builder() -> EventEnvelopeBuilder {
        EventEnvelopeBuilder::default()
    }

    /// Deserializes the payload into a concrete event type.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

/// Collects the routing fields and payload of an envelope.
///
/// A fresh [`EventId`] and the current time are assigned by [`build`](Self::build).
#[derive(Debug, Default)]
pub struct EventEnvelopeBuilder {
    topic: Option<String>,
    aggregate_id: Option<String>,
    aggregate_type: Option<String>,
    payload: Option<serde_json::Value>,
}

impl EventEnvelopeBuilder {
    /// Sets the topic.
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Sets the aggregate ID.
    pub fn aggregate_id(mut self, id: impl Into<String>) -> Self {
        self.aggregate_id = Some(id.into());
        self
    }

    /// Sets the aggregate type.
    pub fn aggregate_type(mut self, aggregate_type: impl Into<String>) -> Self {
        self.aggregate_type = Some(aggregate_type.into());
        self
    }

    /// Sets the payload from a serializable value.
    pub fn payload<T: Serialize>(mut self, payload: &T) -> Result<Self, PublishError> {
        self.payload = Some(serde_json::to_value(payload)?);
        Ok(self)
    }

    /// Sets the payload from a raw JSON value.
    pub fn payload_raw(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Builds the event envelope.
    ///
    /// Fails if the topic, aggregate ID, aggregate type or payload is missing.
    pub fn build(self) -> Result<EventEnvelope, PublishError> {
        Ok(EventEnvelope {
            event_id: EventId::new(),
            topic: self.topic.ok_or(PublishError::MissingField("topic"))?,
            aggregate_id: self
                .aggregate_id
                .ok_or(PublishError::MissingField("aggregate_id"))?,
            aggregate_type: self
                .aggregate_type
                .ok_or(PublishError::MissingField("aggregate_type"))?,
            timestamp: Utc::now(),
            payload: self.payload.ok_or(PublishError::MissingField("payload"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_id_new_creates_unique_ids() {
        let id1 = EventId::new();
        let id2 = EventId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn event_envelope_builder() {
        let payload = serde_json::json!({"reservation_id": "res-1"});

        let envelope = EventEnvelope::builder()
            .topic("reservation.created")
            .aggregate_id("res-1")
            .aggregate_type("Reservation")
            .payload_raw(payload.clone())
            .build()
            .unwrap();

        assert_eq!(envelope.topic, "reservation.created");
        assert_eq!(envelope.aggregate_id, "res-1");
        assert_eq!(envelope.aggregate_type, "Reservation");
        assert_eq!(envelope.payload, payload);
    }

    #[test]
    fn build_reports_missing_field() {
        let result = EventEnvelope::builder()
            .aggregate_id("res-1")
            .aggregate_type("Reservation")
            .payload_raw(serde_json::json!({}))
            .build();
        assert!(matches!(result, Err(PublishError::MissingField("topic"))));
    }

    #[test]
    fn decode_payload() {
        #[derive(Debug, Serialize, Deserialize, PartialEq)]
        struct Sample {
            value: i32,
        }

        let envelope = EventEnvelope::builder()
            .topic("sample")
            .aggregate_id("a")
            .aggregate_type("Sample")
            .payload(&Sample { value: 7 })
            .unwrap()
            .build()
            .unwrap();

        let decoded: Sample = envelope.decode().unwrap();
        assert_eq!(decoded, Sample { value: 7 });
    }
}
