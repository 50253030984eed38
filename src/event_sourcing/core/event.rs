use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// Event Envelope - Event Metadata
// ============================================================================
//
// Wraps domain events with identity, ordering and timing so they can be
// stored in the activity log. Generic over the event type.
//
// ============================================================================

/// Generic Event Envelope - wraps any domain event with metadata
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope<E> {
    // Event Identity
    pub event_id: Uuid,
    pub aggregate_id: String,
    pub sequence_number: i64,

    // Event Type Information
    pub event_type: String,

    // Event Payload
    pub event_data: E,

    // Timing
    pub timestamp: DateTime<Utc>,

    // Additional Metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl<E: DomainEvent> EventEnvelope<E> {
    pub fn new(
        aggregate_id: impl Into<String>,
        sequence_number: i64,
        event_data: E,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            aggregate_id: aggregate_id.into(),
            sequence_number,
            event_type: event_data.event_type().to_string(),
            event_data,
            timestamp,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

// ============================================================================
// Domain Event Trait
// ============================================================================

/// All domain events implement this to be wrapped in an envelope.
pub trait DomainEvent: Serialize + for<'de> Deserialize<'de> + Clone + Send + Sync {
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    struct TestEvent {
        data: String,
    }

    impl DomainEvent for TestEvent {
        fn event_type(&self) -> &'static str {
            "TestEvent"
        }
    }

    #[test]
    fn test_event_envelope_creation() {
        let now = Utc::now();
        let envelope = EventEnvelope::new(
            "ORD-1-AAAAAA",
            1,
            TestEvent { data: "test".to_string() },
            now,
        )
        .with_metadata("customer_id", "cust-1");

        assert_eq!(envelope.aggregate_id, "ORD-1-AAAAAA");
        assert_eq!(envelope.sequence_number, 1);
        assert_eq!(envelope.event_type, "TestEvent");
        assert_eq!(envelope.timestamp, now);
        assert_eq!(envelope.metadata.get("customer_id").map(String::as_str), Some("cust-1"));
    }

    #[test]
    fn test_envelope_json_shape() {
        let envelope = EventEnvelope::new("a", 7, TestEvent { data: "x".into() }, Utc::now());
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["aggregateId"], "a");
        assert_eq!(json["sequenceNumber"], 7);
        assert!(json.get("metadata").is_none());

        let back: EventEnvelope<TestEvent> = serde_json::from_value(json).unwrap();
        assert_eq!(back, envelope);
    }
}
