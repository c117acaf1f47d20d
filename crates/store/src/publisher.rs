use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{EventEnvelope, PublishError};

/// Publishes event envelopes to a message transport.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes a single envelope on its topic.
    async fn publish(&self, envelope: EventEnvelope) -> Result<(), PublishError>;
}

#[async_trait]
impl<T: EventPublisher + ?Sized> EventPublisher for Arc<T> {
    async fn publish(&self, envelope: EventEnvelope) -> Result<(), PublishError> {
        (**self).publish(envelope).await
    }
}

/// In-memory publisher that records every envelope in publication order.
///
/// Stands in for the messaging transport in tests and demos. Topics can be
/// configured to reject publication.
#[derive(Clone, Default)]
pub struct InMemoryEventPublisher {
    events: Arc<RwLock<Vec<EventEnvelope>>>,
    failing_topics: Arc<RwLock<HashSet<String>>>,
}

impl InMemoryEventPublisher {
    /// Creates a new publisher with no recorded events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures publication on `topic` to fail.
    pub async fn set_fail_on_topic(&self, topic: impl Into<String>, fail: bool) {
        let mut failing = self.failing_topics.write().await;
        let topic = topic.into();
        if fail {
            failing.insert(topic);
        } else {
            failing.remove(&topic);
        }
    }

    /// Returns every recorded envelope.
    pub async fn events(&self) -> Vec<EventEnvelope> {
        self.events.read().await.clone()
    }

    /// Returns recorded envelopes for one topic.
    pub async fn events_for_topic(&self, topic: &str) -> Vec<EventEnvelope> {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.topic == topic)
            .cloned()
            .collect()
    }

    /// Returns the topics of recorded envelopes, in order.
    pub async fn topics(&self) -> Vec<String> {
        self.events
            .read()
            .await
            .iter()
            .map(|e| e.topic.clone())
            .collect()
    }

    /// Returns the number of recorded envelopes.
    pub async fn event_count(&self) -> usize {
        self.events.read().await.len()
    }

    /// Removes and returns every recorded envelope.
    pub async fn drain(&self) -> Vec<EventEnvelope> {
        std::mem::take(&mut *self.events.write().await)
    }

    /// Clears recorded envelopes and failure configuration.
    pub async fn clear(&self) {
        self.events.write().await.clear();
        self.failing_topics.write().await.clear();
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, envelope: EventEnvelope) -> Result<(), PublishError> {
        if self.failing_topics.read().await.contains(&envelope.topic) {
            return Err(PublishError::Rejected {
                topic: envelope.topic,
                reason: "transport unavailable".to_string(),
            });
        }

        tracing::debug!(topic = %envelope.topic, aggregate_id = %envelope.aggregate_id, "event published");
        self.events.write().await.push(envelope);
        Ok(())
    }
}
