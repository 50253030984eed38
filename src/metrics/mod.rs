use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

use crate::domain::order::{Order, OrderEvent};

// ============================================================================
// Metrics Module - Prometheus metrics for the order lifecycle
// ============================================================================
//
// Provides metrics for:
// - Order creation and deletion
// - Status transitions, labelled by the status reached
// - Storage failures, labelled by operation
// - Orders still in flight
//
// ============================================================================

/// Central metrics registry
pub struct Metrics {
    registry: Registry,

    // Order Lifecycle Metrics
    pub orders_created_total: IntCounter,
    pub orders_deleted_total: IntCounter,
    pub order_status_transitions_total: IntCounterVec,
    pub active_orders: IntGauge,

    // Storage Metrics
    pub storage_failures_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let orders_created_total = IntCounter::new("orders_created_total", "Total orders created")?;
        registry.register(Box::new(orders_created_total.clone()))?;

        let orders_deleted_total = IntCounter::new("orders_deleted_total", "Total orders deleted")?;
        registry.register(Box::new(orders_deleted_total.clone()))?;

        let order_status_transitions_total = IntCounterVec::new(
            Opts::new("order_status_transitions_total", "Order status changes by target status"),
            &["status"],
        )?;
        registry.register(Box::new(order_status_transitions_total.clone()))?;

        let active_orders = IntGauge::new("active_orders", "Orders not yet completed")?;
        registry.register(Box::new(active_orders.clone()))?;

        let storage_failures_total = IntCounterVec::new(
            Opts::new("storage_failures_total", "Storage reads/writes that failed"),
            &["operation"],
        )?;
        registry.register(Box::new(storage_failures_total.clone()))?;

        Ok(Self {
            registry,
            orders_created_total,
            orders_deleted_total,
            order_status_transitions_total,
            active_orders,
            storage_failures_total,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Count the events produced by one order operation
    pub fn record_events(&self, events: &[OrderEvent]) {
        for event in events {
            match event {
                OrderEvent::Created(_) => self.orders_created_total.inc(),
                OrderEvent::StatusChanged(e) => {
                    self.order_status_transitions_total
                        .with_label_values(&[e.to.as_str()])
                        .inc();
                }
                OrderEvent::StatusRefreshed(_) => {}
            }
        }
    }

    pub fn record_storage_failure(&self, operation: &str) {
        self.storage_failures_total.with_label_values(&[operation]).inc();
    }

    pub fn set_active_orders(&self, orders: &[Order]) {
        let active = orders.iter().filter(|o| !o.is_completed()).count();
        self.active_orders.set(active as i64);
    }

    /// Prometheus text exposition of everything registered
    pub fn render(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{OrderCreated, OrderStatus, OrderStatusChanged, OrderStatusRefreshed};
    use chrono::Utc;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert!(!metrics.registry().gather().is_empty());
    }

    #[test]
    fn test_record_events() {
        let metrics = Metrics::new().unwrap();
        let now = Utc::now();
        metrics.record_events(&[
            OrderEvent::Created(OrderCreated {
                customer_id: "c".into(),
                tracking_number: "TR0000000001".into(),
                total: 10.0,
                created_at: now,
            }),
            OrderEvent::StatusChanged(OrderStatusChanged {
                from: OrderStatus::Created,
                to: OrderStatus::PendingPayment,
                changed_at: now,
            }),
            OrderEvent::StatusRefreshed(OrderStatusRefreshed {
                status: OrderStatus::PendingPayment,
                refreshed_at: now,
            }),
        ]);

        assert_eq!(metrics.orders_created_total.get(), 1);
        assert_eq!(
            metrics
                .order_status_transitions_total
                .with_label_values(&["pending_payment"])
                .get(),
            1
        );
    }

    #[test]
    fn test_render_contains_metric_names() {
        let metrics = Metrics::new().unwrap();
        metrics.record_storage_failure("save_orders");

        let text = metrics.render().unwrap();
        assert!(text.contains("storage_failures_total"));
        assert!(text.contains("orders_created_total"));
    }
}
