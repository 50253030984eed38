// ============================================================================
// Infrastructure Boundary - time and identity sources
// ============================================================================
//
// The core never calls `Utc::now()` or a random generator directly. Both
// arrive through these traits so tests can pin them.
//
// ============================================================================

pub mod clock;
pub mod ids;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
