// ============================================================================
// Event Sourcing Core - Generic Abstractions
// ============================================================================
//
// No domain-specific code lives here (no Order, Product, ...).
//
// ============================================================================

pub mod aggregate;
pub mod event;

pub use aggregate::Aggregate;
pub use event::{DomainEvent, EventEnvelope};
