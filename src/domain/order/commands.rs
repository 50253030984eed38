use chrono::{DateTime, Utc};

use super::value_objects::OrderStatus;

// ============================================================================
// Order Commands - Represent user intent
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum OrderCommand {
    /// Move one step along the status flow (no-op at `completed`).
    Advance { at: DateTime<Utc> },
    /// Operator override. Forward jumps allowed, regressions rejected.
    SetStatus { status: OrderStatus, at: DateTime<Utc> },
}
