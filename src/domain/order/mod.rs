// ============================================================================
// Order Domain - Business Logic for the Order Aggregate
// ============================================================================
//
// - Value objects (OrderStatus, StatusDescriptor, ShippingAddress, TrackingEvent)
// - Pricing (CostBreakdown, RevenueBreakdown, PricingPolicy)
// - Tracking history generation
// - Progression along the status flow
// - Events, Commands, Errors
// - Aggregate (Order)
// - Command Handler (OrderCommandHandler)
//
// ============================================================================

pub mod value_objects;
pub mod pricing;
pub mod tracking;
pub mod progression;
pub mod events;
pub mod commands;
pub mod errors;
pub mod aggregate;
pub mod command_handler;

// Re-export for convenience
pub use value_objects::*;
pub use pricing::*;
pub use tracking::*;
pub use progression::*;
pub use events::*;
pub use commands::*;
pub use errors::*;
pub use aggregate::{NewOrder, Order};
pub use command_handler::*;
