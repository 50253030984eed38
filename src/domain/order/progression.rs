use super::aggregate::Order;
use super::value_objects::OrderStatus;

// ============================================================================
// Order Progression
// ============================================================================
//
// The only controlled mutation path that guarantees the status flow is
// walked one step at a time. It is applied through `OrderCommand::Advance`.
//
// ============================================================================

/// The status that follows the order's current one, or the current one
/// when the order is already completed.
pub fn simulate_order_progress(order: &Order) -> OrderStatus {
    order.status.next()
}
