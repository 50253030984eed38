use std::sync::Arc;

use super::aggregate::{NewOrder, Order};
use super::commands::OrderCommand;
use super::errors::OrderError;
use super::events::OrderEvent;
use super::value_objects::OrderStatus;
use crate::infra::Clock;
use crate::metrics::Metrics;
use crate::repository::{ActivityLog, OrderChange, OrderRepository};

// ============================================================================
// Order Command Handler
// ============================================================================
//
// Orchestrates: Command → Aggregate → Events → Repository → Activity Log
//
// The order write is the operation's outcome. The activity entry is derived
// from it, so a failure there is logged and counted but does not fail a
// change that is already stored.
//
// ============================================================================

pub struct OrderCommandHandler {
    repository: Arc<OrderRepository>,
    activity: Arc<ActivityLog>,
    clock: Arc<dyn Clock>,
    metrics: Option<Arc<Metrics>>,
}

impl OrderCommandHandler {
    pub fn new(
        repository: Arc<OrderRepository>,
        activity: Arc<ActivityLog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            activity,
            clock,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Create an order and record its creation.
    pub async fn create(&self, draft: NewOrder) -> Result<Order, OrderError> {
        let order = self
            .repository
            .create_order(draft)
            .await
            .map_err(|e| self.observe_failure("create_order", e))?;

        let events = vec![order.created_event()];
        self.after_change(&order, &events).await;
        Ok(order)
    }

    /// Handle a command and persist resulting events
    pub async fn handle(&self, order_id: &str, command: OrderCommand) -> Result<OrderChange, OrderError> {
        let change = self
            .repository
            .execute(order_id, &command)
            .await
            .map_err(|e| self.observe_failure("update_order", e))?;

        self.after_change(&change.order, &change.events).await;
        Ok(change)
    }

    /// Advance one step along the status flow. No-op once completed.
    pub async fn progress_order(&self, order_id: &str) -> Result<OrderChange, OrderError> {
        self.handle(order_id, OrderCommand::Advance { at: self.clock.now() })
            .await
    }

    /// Operator override of the status (forward only).
    pub async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<OrderChange, OrderError> {
        self.handle(order_id, OrderCommand::SetStatus { status, at: self.clock.now() })
            .await
    }

    async fn after_change(&self, order: &Order, events: &[OrderEvent]) {
        if events.is_empty() {
            return;
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_events(events);
        }

        if let Err(e) = self.activity.record(order, events).await {
            tracing::warn!(order_id = %order.id, error = %e, "Failed to record order activity");
            if let Some(metrics) = &self.metrics {
                metrics.record_storage_failure("record_activity");
            }
        }
    }

    fn observe_failure(&self, operation: &str, error: OrderError) -> OrderError {
        if let OrderError::Persistence(e) = &error {
            tracing::error!(operation, error = %e, "Order storage failure");
            if let Some(metrics) = &self.metrics {
                metrics.record_storage_failure(operation);
            }
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::aggregate::tests::sample_draft;
    use crate::infra::{ManualClock, SequentialIds};
    use crate::repository::order_repository::tests::{t0, FlakyStore};
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::sync::atomic::Ordering;

    fn handler_over(store: Arc<dyn KeyValueStore>) -> (OrderCommandHandler, Arc<Metrics>) {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(t0()));
        let repository = Arc::new(OrderRepository::new(
            store.clone(),
            "test",
            clock.clone(),
            Arc::new(SequentialIds::new()),
        ));
        let activity = Arc::new(ActivityLog::new(store, "test"));
        let metrics = Arc::new(Metrics::new().unwrap());

        let handler = OrderCommandHandler::new(repository, activity, clock).with_metrics(metrics.clone());
        (handler, metrics)
    }

    #[tokio::test]
    async fn test_progress_walks_whole_flow_then_stops() {
        let (handler, metrics) = handler_over(Arc::new(MemoryStore::new()));
        let order = handler.create(sample_draft(60.0, 2.0)).await.unwrap();

        for expected in crate::domain::order::STATUS_FLOW.iter().skip(1) {
            let change = handler.progress_order(&order.id).await.unwrap();
            assert!(change.changed());
            assert_eq!(change.order.status, *expected);
            assert_eq!(change.order.tracking_events.len(), expected.index() + 1);
        }

        let idle = handler.progress_order(&order.id).await.unwrap();
        assert!(!idle.changed());
        assert_eq!(idle.order.status, OrderStatus::Completed);

        assert_eq!(metrics.orders_created_total.get(), 1);
        assert_eq!(
            metrics
                .order_status_transitions_total
                .with_label_values(&["completed"])
                .get(),
            1
        );

        let activity = handler.activity.for_order(&order.id).await.unwrap();
        assert_eq!(activity.len(), 14);
    }

    #[tokio::test]
    async fn test_progress_unknown_order_is_not_found() {
        let (handler, _) = handler_over(Arc::new(MemoryStore::new()));
        assert!(matches!(
            handler.progress_order("ORD-0-GHOST0").await,
            Err(OrderError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_storage_failure_is_counted() {
        let store = Arc::new(FlakyStore::default());
        let (handler, metrics) = handler_over(store.clone());
        let order = handler.create(sample_draft(10.0, 1.0)).await.unwrap();

        store.fail_writes.store(true, Ordering::SeqCst);
        let result = handler.update_order_status(&order.id, OrderStatus::Purchased).await;

        assert!(matches!(result, Err(OrderError::Persistence(_))));
        assert_eq!(
            metrics
                .storage_failures_total
                .with_label_values(&["update_order"])
                .get(),
            1
        );
    }

    #[tokio::test]
    async fn test_setting_same_status_is_not_a_transition() {
        let (handler, metrics) = handler_over(Arc::new(MemoryStore::new()));
        let order = handler.create(sample_draft(10.0, 1.0)).await.unwrap();

        handler.update_order_status(&order.id, OrderStatus::Purchased).await.unwrap();
        let change = handler.update_order_status(&order.id, OrderStatus::Purchased).await.unwrap();
        assert!(matches!(change.events[..], [OrderEvent::StatusRefreshed(_)]));

        assert_eq!(
            metrics
                .order_status_transitions_total
                .with_label_values(&["purchased"])
                .get(),
            1
        );

        let activity = handler.activity.for_order(&order.id).await.unwrap();
        assert_eq!(activity[0].event_type, "OrderStatusRefreshed");
        assert_eq!(activity[1].event_type, "OrderStatusChanged");
    }
}
