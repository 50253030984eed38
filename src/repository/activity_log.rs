use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::order::{Order, OrderEvent};
use crate::event_sourcing::core::EventEnvelope;
use crate::storage::{namespaced_key, JsonCollection, KeyValueStore, StorageError};

pub const ACTIVITY_COLLECTION: &str = "activity";

/// Entries kept; older ones fall off the end.
pub const ACTIVITY_CAPACITY: usize = 100;

pub type ActivityEntry = EventEnvelope<OrderEvent>;

// ============================================================================
// Activity Log - recent order events, newest first
// ============================================================================
//
// Feeds the customer-facing notification list. Sequence numbers keep
// growing even after old entries are dropped.
//
// ============================================================================

pub struct ActivityLog {
    entries: JsonCollection<ActivityEntry>,
    write_lock: Mutex<()>,
}

impl ActivityLog {
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
        Self {
            entries: JsonCollection::new(store, namespaced_key(namespace, ACTIVITY_COLLECTION)),
            write_lock: Mutex::new(()),
        }
    }

    /// Append the events one order operation produced.
    pub async fn record(&self, order: &Order, events: &[OrderEvent]) -> Result<Vec<ActivityEntry>, StorageError> {
        if events.is_empty() {
            return Ok(Vec::new());
        }

        let _guard = self.write_lock.lock().await;
        let mut entries = self.entries.load().await?;
        let mut sequence = entries.first().map(|e| e.sequence_number).unwrap_or(0);

        let mut recorded = Vec::with_capacity(events.len());
        for event in events {
            sequence += 1;
            let entry = EventEnvelope::new(order.id.clone(), sequence, event.clone(), event.occurred_at())
                .with_metadata("customerId", order.customer_id.clone())
                .with_metadata("trackingNumber", order.tracking_number.clone());
            entries.insert(0, entry.clone());
            recorded.push(entry);
        }

        entries.truncate(ACTIVITY_CAPACITY);
        self.entries.save(&entries).await?;

        tracing::debug!(order_id = %order.id, count = recorded.len(), "Recorded order activity");
        Ok(recorded)
    }

    pub async fn recent(&self, limit: usize) -> Result<Vec<ActivityEntry>, StorageError> {
        let mut entries = self.entries.load().await?;
        entries.truncate(limit);
        Ok(entries)
    }

    pub async fn for_order(&self, order_id: &str) -> Result<Vec<ActivityEntry>, StorageError> {
        let mut entries = self.entries.load().await?;
        entries.retain(|e| e.aggregate_id == order_id);
        Ok(entries)
    }

    pub async fn for_customer(&self, customer_id: &str) -> Result<Vec<ActivityEntry>, StorageError> {
        let mut entries = self.entries.load().await?;
        entries.retain(|e| e.metadata.get("customerId").map(String::as_str) == Some(customer_id));
        Ok(entries)
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        self.entries.clear().await
    }
}
