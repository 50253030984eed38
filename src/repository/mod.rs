// ============================================================================
// Repositories - typed collections over the key/value store
// ============================================================================

pub mod activity_log;
pub mod order_repository;
pub mod product_repository;

pub use activity_log::{ActivityEntry, ActivityLog, ACTIVITY_CAPACITY};
pub use order_repository::{OrderChange, OrderRepository};
pub use product_repository::ProductRepository;
