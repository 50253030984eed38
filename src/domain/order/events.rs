use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value_objects::OrderStatus;
use crate::event_sourcing::core::DomainEvent;

// ============================================================================
// Order Events - Domain Events for the Order Aggregate
// ============================================================================

/// Order Event - Union type for all order events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OrderEvent {
    Created(OrderCreated),
    StatusChanged(OrderStatusChanged),
    StatusRefreshed(OrderStatusRefreshed),
}

impl DomainEvent for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::Created(_) => "OrderCreated",
            OrderEvent::StatusChanged(_) => "OrderStatusChanged",
            OrderEvent::StatusRefreshed(_) => "OrderStatusRefreshed",
        }
    }
}

/// Order Created - Initial event in order lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub customer_id: String,
    pub tracking_number: String,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

/// Order Status Changed - the order moved to another stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusChanged {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub changed_at: DateTime<Utc>,
}

/// Order Status Refreshed - the status was set to the one it already had
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusRefreshed {
    pub status: OrderStatus,
    pub refreshed_at: DateTime<Utc>,
}

impl OrderEvent {
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OrderEvent::Created(e) => e.created_at,
            OrderEvent::StatusChanged(e) => e.changed_at,
            OrderEvent::StatusRefreshed(e) => e.refreshed_at,
        }
    }
}
