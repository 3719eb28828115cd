//! Sensitivity runner for batches of CLV scenarios
//!
//! Holds one set of base parameters and evaluates variations of it (other
//! discount rates, other horizons) without touching the base. Scenarios are
//! independent, so batches run in parallel with results kept in input order.

use rayon::prelude::*;
use serde::Serialize;

use crate::params::ClvParameters;
use crate::projection::{compute, ClvBreakdown};

/// One evaluated scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub discount_rate: f64,
    pub time_horizon: u32,
    pub breakdown: ClvBreakdown,
}

impl ScenarioResult {
    /// Largest acquisition cost that still leaves a non-negative CLV
    pub fn breakeven_acquisition_cost(&self) -> f64 {
        self.breakdown.total_pv
    }
}

/// Pre-configured scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(ClvParameters::default());
/// for result in runner.run_discount_rates(&[5.0, 10.0, 15.0]) {
///     println!("{:.1}% -> {:.2}", result.discount_rate, result.breakdown.clv);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_params: ClvParameters,
}

impl ScenarioRunner {
    pub fn new(base_params: ClvParameters) -> Self {
        Self { base_params }
    }

    /// Evaluate the base parameters after applying `adjust` to a copy
    pub fn run<F: FnOnce(&mut ClvParameters)>(&self, adjust: F) -> ScenarioResult {
        let mut params = self.base_params.clone();
        adjust(&mut params);
        evaluate(&params)
    }

    /// Evaluate the base parameters at each discount rate
    pub fn run_discount_rates(&self, rates: &[f64]) -> Vec<ScenarioResult> {
        rates
            .par_iter()
            .map(|&rate| self.run(|p| p.set_discount_rate(rate)))
            .collect()
    }

    /// Evaluate the base parameters at each horizon.
    ///
    /// Horizons are reached through the horizon resizer, so added periods
    /// get the default repeat probability and out-of-range targets stop at
    /// the nearest bound.
    pub fn run_horizons(&self, horizons: &[u32]) -> Vec<ScenarioResult> {
        horizons
            .par_iter()
            .map(|&horizon| self.run(|p| resize_to(p, horizon)))
            .collect()
    }

    /// Evaluate every (rate, horizon) pair, rates varying slowest
    pub fn run_grid(&self, rates: &[f64], horizons: &[u32]) -> Vec<ScenarioResult> {
        let pairs: Vec<(f64, u32)> = rates
            .iter()
            .flat_map(|&rate| horizons.iter().map(move |&h| (rate, h)))
            .collect();

        pairs
            .par_iter()
            .map(|&(rate, horizon)| {
                self.run(|p| {
                    p.set_discount_rate(rate);
                    resize_to(p, horizon);
                })
            })
            .collect()
    }

    pub fn params(&self) -> &ClvParameters {
        &self.base_params
    }

    pub fn params_mut(&mut self) -> &mut ClvParameters {
        &mut self.base_params
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new(ClvParameters::default())
    }
}

fn resize_to(params: &mut ClvParameters, horizon: u32) {
    let steps = horizon as i64 - params.time_horizon as i64;
    params.step_horizon(steps.clamp(i32::MIN as i64, i32::MAX as i64) as i32);
}

fn evaluate(params: &ClvParameters) -> ScenarioResult {
    ScenarioResult {
        discount_rate: params.discount_rate,
        time_horizon: params.time_horizon,
        breakdown: compute(params),
    }
}
