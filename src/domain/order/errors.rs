use super::value_objects::OrderStatus;
use crate::domain::product::Store;
use crate::storage::StorageError;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Invalid {field}: {value} (must be finite and non-negative)")]
    Validation { field: &'static str, value: f64 },

    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("No order with tracking number: {0}")]
    TrackingNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Not a supported store URL: {0}")]
    UnsupportedStore(String),

    #[error("URL {url} belongs to {detected}, not {declared}")]
    StoreMismatch {
        url: String,
        declared: Store,
        detected: Store,
    },

    #[error("Invalid order status: {0}")]
    InvalidStatus(String),

    #[error("Cannot move order from {from} back to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    #[error("Could not allocate a unique {kind} after {attempts} attempts")]
    IdExhausted { kind: &'static str, attempts: u32 },

    #[error("Persistence failure: {0}")]
    Persistence(#[from] StorageError),
}

impl OrderError {
    /// Reject negative, NaN and infinite amounts.
    pub fn check_amount(field: &'static str, value: f64) -> Result<f64, OrderError> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(OrderError::Validation { field, value })
        }
    }

    /// Reject NaN and infinite results. Negative values pass.
    pub fn check_finite(field: &'static str, value: f64) -> Result<f64, OrderError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(OrderError::Validation { field, value })
        }
    }
}
