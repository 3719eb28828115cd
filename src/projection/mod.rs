//! Discounting engine for per-period present values and aggregate CLV

mod engine;
mod breakdown;

pub use engine::{compute, compute_period, discount_factor};
pub use breakdown::{BreakdownSummary, ClvBreakdown, YearlyBreakdownRow};
