//! In-memory event bus.
//!
//! Captures every published envelope in order and traces it. Used by the
//! binary, where events end up in the log, and by tests for assertions.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventPublisher;

/// In-process event sink.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// bus.publish(envelope).await?;
/// assert!(bus.has_event("cycle.finished"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryEventBus {
    published: Mutex<Vec<EventEnvelope>>,
}

impl InMemoryEventBus {
    /// Creates a new empty event bus.
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the Vec half-written.
    fn events(&self) -> MutexGuard<'_, Vec<EventEnvelope>> {
        self.published.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns all published events.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.events().clone()
    }

    /// Returns events of a specific type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.events()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Returns events for a specific aggregate.
    pub fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.events()
            .iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .cloned()
            .collect()
    }

    /// Clears all published events.
    pub fn clear(&self) {
        self.events().clear();
    }

    /// Returns count of published events.
    pub fn event_count(&self) -> usize {
        self.events().len()
    }

    /// Checks if a specific event type was published.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.events().iter().any(|e| e.event_type == event_type)
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        tracing::debug!(
            event_type = %event.event_type,
            aggregate_id = %event.aggregate_id,
            event_id = %event.event_id.as_str(),
            "Event published"
        );
        self.events().push(event);
        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{EventId, EventMetadata, Timestamp};
    use serde_json::json;

    fn test_envelope(event_type: &str, aggregate_id: &str) -> EventEnvelope {
        EventEnvelope {
            event_id: EventId::new(),
            event_type: event_type.to_string(),
            aggregate_id: aggregate_id.to_string(),
            aggregate_type: "Test".to_string(),
            occurred_at: Timestamp::now(),
            payload: json!({}),
            metadata: EventMetadata::default(),
        }
    }

    #[tokio::test]
    async fn publish_stores_event() {
        let bus = InMemoryEventBus::new();

        bus.publish(test_envelope("cycle.finished", "3")).await.unwrap();

        assert_eq!(bus.event_count(), 1);
        assert!(bus.has_event("cycle.finished"));
        assert!(!bus.has_event("bids.submitted"));
    }

    #[tokio::test]
    async fn events_of_type_filters_correctly() {
        let bus = InMemoryEventBus::new();

        bus.publish(test_envelope("bid.reviewed", "1")).await.unwrap();
        bus.publish(test_envelope("cycle.finished", "2")).await.unwrap();
        bus.publish(test_envelope("bid.reviewed", "3")).await.unwrap();

        assert_eq!(bus.events_of_type("bid.reviewed").len(), 2);
    }

    #[tokio::test]
    async fn events_for_aggregate_filters_correctly() {
        let bus = InMemoryEventBus::new();

        bus.publish(test_envelope("bid.reviewed", "bid-1")).await.unwrap();
        bus.publish(test_envelope("bid.reviewed", "bid-2")).await.unwrap();
        bus.publish(test_envelope("bid.multiplier_changed", "bid-1")).await.unwrap();

        assert_eq!(bus.events_for_aggregate("bid-1").len(), 2);
    }

    #[tokio::test]
    async fn publish_all_keeps_order() {
        let bus = InMemoryEventBus::new();

        bus.publish_all(vec![
            test_envelope("a", "1"),
            test_envelope("b", "2"),
            test_envelope("c", "3"),
        ])
        .await
        .unwrap();

        let types: Vec<String> = bus
            .published_events()
            .into_iter()
            .map(|e| e.event_type)
            .collect();
        assert_eq!(types, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn clear_removes_all_events() {
        let bus = InMemoryEventBus::new();
        bus.publish(test_envelope("a", "1")).await.unwrap();

        bus.clear();

        assert_eq!(bus.event_count(), 0);
    }
}
