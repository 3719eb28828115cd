//! Discounting engine: parameters to a period-by-period present value breakdown

use crate::params::ClvParameters;
use super::breakdown::{ClvBreakdown, YearlyBreakdownRow};

/// Discount factor `(1 + rate/100)^period` for a percentage rate.
///
/// Period 0 is always 1. A rate of -100 gives 0 for every later period and
/// the resulting division is left to IEEE semantics.
pub fn discount_factor(discount_rate: f64, period: u32) -> f64 {
    (1.0 + discount_rate / 100.0).powi(period as i32)
}

/// Compute one period's row
pub fn compute_period(params: &ClvParameters, period: u32) -> YearlyBreakdownRow {
    let repeat_prob = params.repeat_probability(period);
    let adjusted_margin = params.margin * repeat_prob / 100.0;
    let discount_factor = discount_factor(params.discount_rate, period);
    let present_value = adjusted_margin / discount_factor;

    YearlyBreakdownRow {
        period,
        margin: params.margin,
        repeat_prob,
        adjusted_margin,
        discount_factor,
        present_value,
    }
}

/// Recompute the full CLV breakdown from scratch.
///
/// Pure function of `params`; periods are evaluated in increasing order and
/// their present values accumulated in that order.
pub fn compute(params: &ClvParameters) -> ClvBreakdown {
    let mut result = ClvBreakdown::new(params.acquisition_cost);

    for period in 0..params.time_horizon {
        result.add_row(compute_period(params, period));
    }

    result.finish()
}
