//! CLV Calculator - Discounted-cash-flow customer lifetime value engine
//!
//! This library provides:
//! - A parameter model with boundary coercion of raw input
//! - A horizon resizer that keeps the repeat probability series in step
//!   with the number of periods
//! - A discounting engine producing a per-period present value breakdown
//! - A flat CSV export of the breakdown and a reader for it
//! - A sensitivity runner for batches of scenarios

pub mod error;
pub mod params;
pub mod projection;
pub mod export;
pub mod session;
pub mod scenario;

// Re-export commonly used types
pub use error::{ClvError, Result};
pub use params::ClvParameters;
pub use projection::{compute, ClvBreakdown, YearlyBreakdownRow};
pub use session::ClvSession;
pub use scenario::ScenarioRunner;
