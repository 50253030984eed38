use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::OrderError;

// ============================================================================
// Order Value Objects
// ============================================================================

/// Order lifecycle stage.
///
/// Declaration order IS the canonical status flow, so the derived `Ord`
/// compares by position in the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Created,
    PendingPayment,
    PaymentConfirmed,
    Purchasing,
    Purchased,
    TransitBrazil,
    ArrivedLocker,
    BrazilCustoms,
    ShippingVenezuela,
    InTransit,
    ArrivedVenezuela,
    InDelivery,
    Delivered,
    Completed,
}

/// The canonical status flow, index 0..=13.
pub const STATUS_FLOW: [OrderStatus; 14] = [
    OrderStatus::Created,
    OrderStatus::PendingPayment,
    OrderStatus::PaymentConfirmed,
    OrderStatus::Purchasing,
    OrderStatus::Purchased,
    OrderStatus::TransitBrazil,
    OrderStatus::ArrivedLocker,
    OrderStatus::BrazilCustoms,
    OrderStatus::ShippingVenezuela,
    OrderStatus::InTransit,
    OrderStatus::ArrivedVenezuela,
    OrderStatus::InDelivery,
    OrderStatus::Delivered,
    OrderStatus::Completed,
];

/// Days between consecutive stages on the simulated timeline.
pub const DAYS_PER_STAGE: i64 = 2;

/// Human-readable text for one stage of the tracking history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDescriptor {
    pub title: &'static str,
    pub description: &'static str,
    pub location: &'static str,
}

impl OrderStatus {
    /// Position in [`STATUS_FLOW`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The following status, or `self` when already terminal.
    pub fn next(self) -> OrderStatus {
        STATUS_FLOW.get(self.index() + 1).copied().unwrap_or(self)
    }

    pub fn is_terminal(self) -> bool {
        self == OrderStatus::Completed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::PendingPayment => "pending_payment",
            OrderStatus::PaymentConfirmed => "payment_confirmed",
            OrderStatus::Purchasing => "purchasing",
            OrderStatus::Purchased => "purchased",
            OrderStatus::TransitBrazil => "transit_brazil",
            OrderStatus::ArrivedLocker => "arrived_locker",
            OrderStatus::BrazilCustoms => "brazil_customs",
            OrderStatus::ShippingVenezuela => "shipping_venezuela",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::ArrivedVenezuela => "arrived_venezuela",
            OrderStatus::InDelivery => "in_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
        }
    }

    pub fn descriptor(self) -> StatusDescriptor {
        let (title, description, location) = match self {
            OrderStatus::Created => (
                "Order created",
                "Your order has been registered in our system",
                "System",
            ),
            OrderStatus::PendingPayment => (
                "Awaiting payment",
                "Waiting for payment confirmation",
                "System",
            ),
            OrderStatus::PaymentConfirmed => (
                "Payment confirmed",
                "Your payment has been received and verified",
                "System",
            ),
            OrderStatus::Purchasing => (
                "Purchasing",
                "We are buying your product from the store",
                "Online store",
            ),
            OrderStatus::Purchased => (
                "Product purchased",
                "The store confirmed the purchase of your product",
                "Online store",
            ),
            OrderStatus::TransitBrazil => (
                "On the way to Brazil",
                "The store shipped your package to our Brazilian locker",
                "International transit",
            ),
            OrderStatus::ArrivedLocker => (
                "Arrived at locker",
                "Your package was received at our locker",
                "São Paulo, Brazil",
            ),
            OrderStatus::BrazilCustoms => (
                "Brazilian customs",
                "Your package is being processed by export customs",
                "São Paulo customs, Brazil",
            ),
            OrderStatus::ShippingVenezuela => (
                "Shipping to Venezuela",
                "Your package was dispatched towards Venezuela",
                "São Paulo, Brazil",
            ),
            OrderStatus::InTransit => (
                "In international transit",
                "Your package is travelling to Venezuela",
                "International transit",
            ),
            OrderStatus::ArrivedVenezuela => (
                "Arrived in Venezuela",
                "Your package arrived at our Venezuelan warehouse",
                "Caracas, Venezuela",
            ),
            OrderStatus::InDelivery => (
                "Out for delivery",
                "A courier is taking your package to your address",
                "Local delivery",
            ),
            OrderStatus::Delivered => (
                "Delivered",
                "Your package was delivered",
                "Destination address",
            ),
            OrderStatus::Completed => (
                "Completed",
                "Order closed, thank you for shopping with us",
                "System",
            ),
        };

        StatusDescriptor {
            title,
            description,
            location,
        }
    }

    /// Days still expected before delivery from this stage (0 once delivered).
    pub fn days_until_delivery(self) -> i64 {
        match self {
            OrderStatus::Created => 30,
            OrderStatus::PendingPayment => 28,
            OrderStatus::PaymentConfirmed => 25,
            OrderStatus::Purchasing => 22,
            OrderStatus::Purchased => 20,
            OrderStatus::TransitBrazil => 18,
            OrderStatus::ArrivedLocker => 15,
            OrderStatus::BrazilCustoms => 12,
            OrderStatus::ShippingVenezuela => 10,
            OrderStatus::InTransit => 7,
            OrderStatus::ArrivedVenezuela => 5,
            OrderStatus::InDelivery => 2,
            OrderStatus::Delivered | OrderStatus::Completed => 0,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STATUS_FLOW
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| OrderError::InvalidStatus(s.to_string()))
    }
}

/// Delivery address. The core stores it and never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// One reached stage in an order's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    /// `<order_id>_<status>`
    pub id: String,
    pub status: OrderStatus,
    pub title: String,
    pub description: String,
    pub location: String,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_matches_declaration_order() {
        for (i, status) in STATUS_FLOW.iter().enumerate() {
            assert_eq!(status.index(), i);
        }
        assert_eq!(OrderStatus::Created.index(), 0);
        assert_eq!(OrderStatus::Completed.index(), 13);
    }

    #[test]
    fn test_next_walks_the_flow_and_stops_at_completed() {
        let mut visited = vec![OrderStatus::Created];
        let mut current = OrderStatus::Created;
        loop {
            let next = current.next();
            if next == current {
                break;
            }
            visited.push(next);
            current = next;
        }

        assert_eq!(visited, STATUS_FLOW.to_vec());
        assert_eq!(OrderStatus::Completed.next(), OrderStatus::Completed);
        assert!(OrderStatus::Completed.is_terminal());
        assert!(!OrderStatus::Delivered.is_terminal());
    }

    #[test]
    fn test_ordering_follows_flow() {
        assert!(OrderStatus::Created < OrderStatus::PendingPayment);
        assert!(OrderStatus::InDelivery < OrderStatus::Delivered);
    }

    #[test]
    fn test_parse_round_trips_wire_names() {
        for status in STATUS_FLOW {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);

            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_unknown_status_is_invalid_status_error() {
        let err = "pending".parse::<OrderStatus>().unwrap_err();
        assert!(matches!(err, OrderError::InvalidStatus(ref s) if s == "pending"));

        let from_json: Result<OrderStatus, _> = serde_json::from_str("\"shipped\"");
        assert!(from_json.is_err());
    }

    #[test]
    fn test_every_status_has_descriptor_text() {
        for status in STATUS_FLOW {
            let d = status.descriptor();
            assert!(!d.title.is_empty());
            assert!(!d.description.is_empty());
            assert!(!d.location.is_empty());
        }
    }

    #[test]
    fn test_descriptor_locations() {
        assert_eq!(OrderStatus::Created.descriptor().location, "System");
        assert_eq!(OrderStatus::Purchasing.descriptor().location, "Online store");
        assert_eq!(OrderStatus::BrazilCustoms.descriptor().location, "São Paulo customs, Brazil");
        assert_eq!(OrderStatus::InDelivery.descriptor().location, "Local delivery");
        assert_eq!(OrderStatus::Delivered.descriptor().location, "Destination address");
        assert_eq!(OrderStatus::Completed.descriptor().location, "System");
    }

    #[test]
    fn test_delivery_estimate_shrinks_along_the_flow() {
        for pair in STATUS_FLOW.windows(2) {
            assert!(pair[0].days_until_delivery() >= pair[1].days_until_delivery());
        }
    }

    #[test]
    fn test_days_until_delivery_table() {
        assert_eq!(OrderStatus::Created.days_until_delivery(), 30);
        assert_eq!(OrderStatus::PendingPayment.days_until_delivery(), 28);
        assert_eq!(OrderStatus::ArrivedLocker.days_until_delivery(), 15);
        assert_eq!(OrderStatus::ArrivedVenezuela.days_until_delivery(), 5);
        assert_eq!(OrderStatus::InDelivery.days_until_delivery(), 2);
        assert_eq!(OrderStatus::Delivered.days_until_delivery(), 0);
        assert_eq!(OrderStatus::Completed.days_until_delivery(), 0);
    }
}
