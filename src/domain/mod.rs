// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each aggregate has its own subdirectory. Persistence lives in
// src/repository/ and only sees these types through serde.
//
// ============================================================================

pub mod order;
pub mod product;
