use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::order::{NewOrder, Order, OrderCommand, OrderError, OrderEvent, OrderStatus};
use crate::event_sourcing::core::Aggregate;
use crate::infra::{Clock, IdGenerator};
use crate::storage::{namespaced_key, JsonCollection, KeyValueStore};

pub const ORDERS_COLLECTION: &str = "orders";

/// Attempts at drawing an id that no stored order already uses.
const MAX_ID_ATTEMPTS: u32 = 8;

// ============================================================================
// Order Repository
// ============================================================================
//
// Orders live in ONE record holding the whole collection, newest first.
// Every mutation is load -> change in memory -> save, under a mutex so two
// calls in this process cannot interleave. Validation and business rules run
// before the save, so a failed call never writes.
//
// ============================================================================

/// Result of running a command against a stored order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderChange {
    pub order: Order,
    /// Empty when the command was a no-op (nothing was written).
    pub events: Vec<OrderEvent>,
}

impl OrderChange {
    pub fn changed(&self) -> bool {
        !self.events.is_empty()
    }
}

pub struct OrderRepository {
    orders: JsonCollection<Order>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    write_lock: Mutex<()>,
}

impl OrderRepository {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        namespace: &str,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            orders: JsonCollection::new(store, namespaced_key(namespace, ORDERS_COLLECTION)),
            clock,
            ids,
            write_lock: Mutex::new(()),
        }
    }

    /// Create and persist a new order stamped with the clock's current time.
    pub async fn create_order(&self, draft: NewOrder) -> Result<Order, OrderError> {
        draft.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut orders = self.orders.load().await?;
        let now = self.clock.now();

        let id = allocate_unique(
            "order id",
            || self.ids.order_id(now),
            |candidate| orders.iter().any(|o| o.id == candidate),
        )?;
        let tracking_number = allocate_unique(
            "tracking number",
            || self.ids.tracking_number(),
            |candidate| orders.iter().any(|o| o.tracking_number == candidate),
        )?;

        let order = Order::create(draft, id, tracking_number, now);
        orders.insert(0, order.clone());
        self.orders.save(&orders).await?;

        tracing::info!(
            order_id = %order.id,
            tracking_number = %order.tracking_number,
            customer_id = %order.customer_id,
            total = order.cost_breakdown.total,
            "Order created"
        );

        Ok(order)
    }

    pub async fn get_order(&self, order_id: &str) -> Result<Order, OrderError> {
        self.orders
            .load()
            .await?
            .into_iter()
            .find(|o| o.id == order_id)
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))
    }

    pub async fn get_order_by_tracking(&self, tracking_number: &str) -> Result<Order, OrderError> {
        self.orders
            .load()
            .await?
            .into_iter()
            .find(|o| o.tracking_number == tracking_number)
            .ok_or_else(|| OrderError::TrackingNotFound(tracking_number.to_string()))
    }

    /// All orders, most recently created first.
    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.load().await?)
    }

    pub async fn orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.orders.load().await?;
        orders.retain(|o| o.customer_id == customer_id);
        Ok(orders)
    }

    /// Orders that have not reached `completed`.
    pub async fn active_orders(&self) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.orders.load().await?;
        orders.retain(|o| !o.is_completed());
        Ok(orders)
    }

    /// Run a command against one stored order.
    ///
    /// Unknown ids fail with `NotFound` and rejected commands fail with the
    /// aggregate's error; in both cases storage is untouched. A command that
    /// emits no events is also not written.
    pub async fn execute(&self, order_id: &str, command: &OrderCommand) -> Result<OrderChange, OrderError> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.orders.load().await?;

        let order = orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))?;

        let events = order.execute(command)?;
        let updated = order.clone();

        if events.is_empty() {
            tracing::debug!(order_id = %order_id, status = %updated.status, "Command was a no-op");
            return Ok(OrderChange { order: updated, events });
        }

        self.orders.save(&orders).await?;

        tracing::info!(
            order_id = %order_id,
            status = %updated.status,
            tracking_events = updated.tracking_events.len(),
            "Order updated"
        );

        Ok(OrderChange { order: updated, events })
    }

    /// Direct status write. Forward jumps are allowed, regressions are not.
    pub async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<OrderChange, OrderError> {
        let command = OrderCommand::SetStatus {
            status,
            at: self.clock.now(),
        };
        self.execute(order_id, &command).await
    }

    /// Remove an order. Returns whether anything was removed.
    pub async fn delete_order(&self, order_id: &str) -> Result<bool, OrderError> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.orders.load().await?;

        let before = orders.len();
        orders.retain(|o| o.id != order_id);
        if orders.len() == before {
            return Ok(false);
        }

        self.orders.save(&orders).await?;
        tracing::info!(order_id = %order_id, "Order deleted");
        Ok(true)
    }

    /// Drop the whole orders collection.
    pub async fn clear_orders(&self) -> Result<(), OrderError> {
        let _guard = self.write_lock.lock().await;
        self.orders.clear().await?;

        tracing::warn!(key = %self.orders.key(), "Orders collection cleared");
        Ok(())
    }
}

fn allocate_unique(
    kind: &'static str,
    mut generate: impl FnMut() -> String,
    taken: impl Fn(&str) -> bool,
) -> Result<String, OrderError> {
    for attempt in 1..=MAX_ID_ATTEMPTS {
        let candidate = generate();
        if !taken(&candidate) {
            return Ok(candidate);
        }
        tracing::warn!(kind, candidate = %candidate, attempt, "Generated id already in use");
    }

    Err(OrderError::IdExhausted {
        kind,
        attempts: MAX_ID_ATTEMPTS,
    })
}

// ============================================================================
// Unit Tests
// ============================================================================
