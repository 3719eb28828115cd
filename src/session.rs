//! Single-owner session that keeps a breakdown in step with its parameters
//!
//! Every mutation recomputes the breakdown before returning, so a reader of
//! `breakdown()` never sees a result that lags the parameters.

use log::{debug, warn};

use crate::params::ClvParameters;
use crate::projection::{compute, ClvBreakdown};

#[derive(Debug, Clone)]
pub struct ClvSession {
    params: ClvParameters,
    breakdown: ClvBreakdown,
}

impl ClvSession {
    pub fn new(params: ClvParameters) -> Self {
        let breakdown = compute(&params);
        Self { params, breakdown }
    }

    pub fn params(&self) -> &ClvParameters {
        &self.params
    }

    pub fn breakdown(&self) -> &ClvBreakdown {
        &self.breakdown
    }

    pub fn into_parts(self) -> (ClvParameters, ClvBreakdown) {
        (self.params, self.breakdown)
    }

    fn recompute(&mut self) {
        if self.params.has_degenerate_discount_rate() {
            warn!(
                "Discount rate {}% is at or below -100%; discounted values will not be finite",
                self.params.discount_rate
            );
        }
        self.breakdown = compute(&self.params);
        debug!(
            "Recomputed {} periods: total PV {:.2}, CLV {:.2}",
            self.breakdown.rows.len(),
            self.breakdown.total_pv,
            self.breakdown.clv
        );
    }

    /// Apply an arbitrary mutation and recompute
    pub fn update<F: FnOnce(&mut ClvParameters)>(&mut self, mutate: F) -> &ClvBreakdown {
        mutate(&mut self.params);
        self.recompute();
        &self.breakdown
    }

    pub fn set_margin_raw(&mut self, raw: &str) -> &ClvBreakdown {
        self.update(|p| p.set_margin_raw(raw))
    }

    pub fn set_acquisition_cost_raw(&mut self, raw: &str) -> &ClvBreakdown {
        self.update(|p| p.set_acquisition_cost_raw(raw))
    }

    pub fn set_discount_rate_raw(&mut self, raw: &str) -> &ClvBreakdown {
        self.update(|p| p.set_discount_rate_raw(raw))
    }

    pub fn set_repeat_probability_raw(&mut self, index: usize, raw: &str) -> &ClvBreakdown {
        self.update(|p| {
            p.set_repeat_probability_raw(index, raw);
        })
    }

    pub fn grow_horizon(&mut self) -> &ClvBreakdown {
        self.update(|p| {
            p.grow_horizon();
        })
    }

    pub fn shrink_horizon(&mut self) -> &ClvBreakdown {
        self.update(|p| {
            p.shrink_horizon();
        })
    }
}

impl Default for ClvSession {
    fn default() -> Self {
        Self::new(ClvParameters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_session_starts_computed() {
        let session = ClvSession::default();
        assert_eq!(session.breakdown().rows.len(), 6);
        assert_abs_diff_eq!(session.breakdown().clv, 219.32, epsilon = 0.01);
    }

    #[test]
    fn test_every_mutation_recomputes() {
        let mut session = ClvSession::default();

        session.set_acquisition_cost_raw("20");
        assert_abs_diff_eq!(session.breakdown().clv, 205.32, epsilon = 0.01);

        session.set_discount_rate_raw("0");
        assert_abs_diff_eq!(session.breakdown().total_pv, 270.0, epsilon = 1e-9);

        session.grow_horizon();
        assert_eq!(session.breakdown().rows.len(), 7);
        assert_eq!(session.breakdown().rows[6].repeat_prob, 20.0);

        session.set_repeat_probability_raw(6, "garbage");
        assert_eq!(session.breakdown().rows[6].present_value, 0.0);

        session.shrink_horizon();
        assert_eq!(session.params().repeat_probabilities.len(), 6);
        assert_eq!(session.breakdown().rows.len(), 6);
    }

    #[test]
    fn test_breakdown_matches_fresh_compute() {
        let mut session = ClvSession::default();
        session.set_margin_raw("72.5");
        session.update(|p| {
            p.step_horizon(-2);
        });

        let (params, breakdown) = session.into_parts();
        assert_eq!(breakdown, compute(&params));
    }
}
