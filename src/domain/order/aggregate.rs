use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::commands::OrderCommand;
use super::errors::OrderError;
use super::events::*;
use super::pricing::{CostBreakdown, RevenueBreakdown};
use super::progression::simulate_order_progress;
use super::tracking::generate_tracking_events;
use super::value_objects::{OrderStatus, ShippingAddress, TrackingEvent};
use crate::event_sourcing::core::Aggregate;

// ============================================================================
// Order Aggregate - Domain Logic
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    // Identity
    pub id: String,
    pub tracking_number: String,

    // References
    pub product_id: String,
    pub customer_id: String,
    pub customer_email: String,

    // Current State
    pub status: OrderStatus,
    /// Derived from `status` and `created_at`, most recent first.
    pub tracking_events: Vec<TrackingEvent>,
    pub shipping_address: ShippingAddress,

    // Money, fixed at creation
    pub cost_breakdown: CostBreakdown,
    pub revenue_breakdown: RevenueBreakdown,

    // Audit Trail
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub estimated_delivery: DateTime<Utc>,
}

/// Everything the caller supplies for a new order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub product_id: String,
    pub customer_id: String,
    pub customer_email: String,
    pub shipping_address: ShippingAddress,
    pub cost_breakdown: CostBreakdown,
    pub revenue_breakdown: RevenueBreakdown,
}

impl NewOrder {
    /// Both breakdowns must hold only finite amounts before they are stored.
    pub fn validate(&self) -> Result<(), OrderError> {
        self.cost_breakdown.validate()?;
        self.revenue_breakdown.validate()
    }
}

impl Order {
    /// Build a fresh order at `created` with its one-entry history.
    pub fn create(draft: NewOrder, id: String, tracking_number: String, now: DateTime<Utc>) -> Self {
        let mut order = Self {
            id,
            tracking_number,
            product_id: draft.product_id,
            customer_id: draft.customer_id,
            customer_email: draft.customer_email,
            status: OrderStatus::Created,
            tracking_events: Vec::new(),
            shipping_address: draft.shipping_address,
            cost_breakdown: draft.cost_breakdown,
            revenue_breakdown: draft.revenue_breakdown,
            created_at: now,
            updated_at: now,
            estimated_delivery: estimate_delivery(now, OrderStatus::Created),
        };
        order.tracking_events = generate_tracking_events(&order);
        order
    }

    /// The event describing this order's creation.
    pub fn created_event(&self) -> OrderEvent {
        OrderEvent::Created(OrderCreated {
            customer_id: self.customer_id.clone(),
            tracking_number: self.tracking_number.clone(),
            total: self.cost_breakdown.total,
            created_at: self.created_at,
        })
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }

    fn status_changed(&self, to: OrderStatus, at: DateTime<Utc>) -> OrderEvent {
        OrderEvent::StatusChanged(OrderStatusChanged {
            from: self.status,
            to,
            changed_at: at,
        })
    }
}

fn estimate_delivery(from: DateTime<Utc>, status: OrderStatus) -> DateTime<Utc> {
    from + Duration::days(status.days_until_delivery())
}

// ============================================================================
// Aggregate Trait Implementation
// ============================================================================

impl Aggregate for Order {
    type Event = OrderEvent;
    type Command = OrderCommand;
    type Error = OrderError;

    fn handle_command(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            OrderCommand::Advance { at } => {
                let next = simulate_order_progress(self);
                if next == self.status {
                    return Ok(vec![]);
                }
                Ok(vec![self.status_changed(next, *at)])
            }

            OrderCommand::SetStatus { status, at } => {
                if *status < self.status {
                    return Err(OrderError::InvalidStatusTransition {
                        from: self.status,
                        to: *status,
                    });
                }
                if *status == self.status {
                    return Ok(vec![OrderEvent::StatusRefreshed(OrderStatusRefreshed {
                        status: *status,
                        refreshed_at: *at,
                    })]);
                }
                Ok(vec![self.status_changed(*status, *at)])
            }
        }
    }

    fn apply_event(&mut self, event: &Self::Event) {
        match event {
            OrderEvent::Created(_) => {
                // Creation goes through `Order::create`
            }
            OrderEvent::StatusChanged(e) => {
                self.status = e.to;
                self.updated_at = e.changed_at;
                self.estimated_delivery = estimate_delivery(e.changed_at, e.to);
                self.tracking_events = generate_tracking_events(self);
            }
            OrderEvent::StatusRefreshed(e) => {
                self.updated_at = e.refreshed_at;
                self.estimated_delivery = estimate_delivery(e.refreshed_at, e.status);
                self.tracking_events = generate_tracking_events(self);
            }
        }
    }

    fn aggregate_id(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
