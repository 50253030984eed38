// ============================================================================
// Event Sourcing Infrastructure
// ============================================================================
//
// Generic, reusable aggregate and event abstractions.
// Domain-specific code is in src/domain/
//
// ============================================================================

pub mod core;

pub use self::core::*;
