//! CLV parameter model and the horizon resizer

use log::warn;
use serde::{Deserialize, Serialize};

use super::coerce::{finite_or_zero, parse_or_zero};

/// Shortest horizon that can be evaluated (the acquisition period alone)
pub const MIN_TIME_HORIZON: u32 = 1;

/// Longest horizon that can be evaluated
pub const MAX_TIME_HORIZON: u32 = 10;

/// Repeat probability (%) given to a period added by `grow_horizon`
pub const NEW_PERIOD_REPEAT_PROBABILITY: f64 = 20.0;

/// Business inputs for a single customer lifetime value estimate.
///
/// Missing fields deserialize to the defaults, so a partial JSON document
/// is a valid parameter file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClvParameters {
    /// Gross margin earned per period before probability weighting
    pub margin: f64,

    /// Repeat probability (%) per period; index 0 is the acquisition period.
    /// Entries missing below `time_horizon` read as 0.
    pub repeat_probabilities: Vec<f64>,

    /// One-time cost subtracted from the total present value
    pub acquisition_cost: f64,

    /// Discount rate in percent per period (10.0 means 10%)
    pub discount_rate: f64,

    /// Number of periods evaluated, within `[MIN_TIME_HORIZON, MAX_TIME_HORIZON]`
    pub time_horizon: u32,
}

impl Default for ClvParameters {
    fn default() -> Self {
        Self {
            margin: 60.0,
            repeat_probabilities: vec![100.0, 90.0, 85.0, 85.0, 60.0, 30.0],
            acquisition_cost: 6.0,
            discount_rate: 10.0,
            time_horizon: 6,
        }
    }
}

impl ClvParameters {
    /// Create parameters, clamping the horizon into its allowed range
    pub fn new(
        margin: f64,
        repeat_probabilities: Vec<f64>,
        acquisition_cost: f64,
        discount_rate: f64,
        time_horizon: u32,
    ) -> Self {
        Self {
            margin,
            repeat_probabilities,
            acquisition_cost,
            discount_rate,
            time_horizon: time_horizon.clamp(MIN_TIME_HORIZON, MAX_TIME_HORIZON),
        }
    }

    /// Repeat probability for a period, or 0 when no entry exists
    pub fn repeat_probability(&self, period: u32) -> f64 {
        self.repeat_probabilities
            .get(period as usize)
            .copied()
            .unwrap_or(0.0)
    }

    /// Clamp the horizon and make the probability series exactly as long
    /// as the horizon. Gaps are filled with 0, which is how the engine
    /// reads them anyway, so results do not change.
    pub fn normalized(mut self) -> Self {
        self.time_horizon = self.time_horizon.clamp(MIN_TIME_HORIZON, MAX_TIME_HORIZON);
        self.repeat_probabilities
            .resize(self.time_horizon as usize, 0.0);
        for p in self.repeat_probabilities.iter_mut() {
            *p = finite_or_zero(*p);
        }
        self.margin = finite_or_zero(self.margin);
        self.acquisition_cost = finite_or_zero(self.acquisition_cost);
        self.discount_rate = finite_or_zero(self.discount_rate);
        self
    }

    /// True when the discount rate makes `1 + rate/100` non-positive, where
    /// discount factors collapse to 0 or alternate sign
    pub fn has_degenerate_discount_rate(&self) -> bool {
        self.discount_rate <= -100.0
    }

    // ------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------

    pub fn set_margin(&mut self, margin: f64) {
        self.margin = finite_or_zero(margin);
    }

    pub fn set_acquisition_cost(&mut self, cost: f64) {
        self.acquisition_cost = finite_or_zero(cost);
    }

    pub fn set_discount_rate(&mut self, rate: f64) {
        self.discount_rate = finite_or_zero(rate);
    }

    /// Replace the probability of one period.
    ///
    /// Only indices inside the current horizon are written; anything else is
    /// ignored and reported with `false`.
    pub fn set_repeat_probability(&mut self, index: usize, value: f64) -> bool {
        if index >= self.time_horizon as usize {
            warn!(
                "Ignoring repeat probability write at index {} (horizon is {})",
                index, self.time_horizon
            );
            return false;
        }
        if index >= self.repeat_probabilities.len() {
            self.repeat_probabilities.resize(index + 1, 0.0);
        }
        self.repeat_probabilities[index] = finite_or_zero(value);
        true
    }

    pub fn set_margin_raw(&mut self, raw: &str) {
        self.set_margin(parse_or_zero(raw));
    }

    pub fn set_acquisition_cost_raw(&mut self, raw: &str) {
        self.set_acquisition_cost(parse_or_zero(raw));
    }

    pub fn set_discount_rate_raw(&mut self, raw: &str) {
        self.set_discount_rate(parse_or_zero(raw));
    }

    pub fn set_repeat_probability_raw(&mut self, index: usize, raw: &str) -> bool {
        self.set_repeat_probability(index, parse_or_zero(raw))
    }

    // ------------------------------------------------------------------
    // Horizon resizer
    // ------------------------------------------------------------------

    /// Add one period to the horizon, seeded with
    /// `NEW_PERIOD_REPEAT_PROBABILITY`. No-op at `MAX_TIME_HORIZON`.
    ///
    /// Returns whether the horizon changed.
    pub fn grow_horizon(&mut self) -> bool {
        if self.time_horizon >= MAX_TIME_HORIZON {
            return false;
        }
        self.repeat_probabilities
            .resize(self.time_horizon as usize, 0.0);
        self.repeat_probabilities.push(NEW_PERIOD_REPEAT_PROBABILITY);
        self.time_horizon += 1;
        true
    }

    /// Drop the last period from the horizon. No-op at `MIN_TIME_HORIZON`.
    ///
    /// Returns whether the horizon changed.
    pub fn shrink_horizon(&mut self) -> bool {
        if self.time_horizon <= MIN_TIME_HORIZON {
            return false;
        }
        self.time_horizon -= 1;
        self.repeat_probabilities
            .resize(self.time_horizon as usize, 0.0);
        true
    }

    /// Step the horizon by `steps` periods (negative shrinks), stopping
    /// silently at either bound. Returns the number of steps applied.
    pub fn step_horizon(&mut self, steps: i32) -> u32 {
        let mut applied = 0;
        for _ in 0..steps.unsigned_abs() {
            let changed = if steps > 0 {
                self.grow_horizon()
            } else {
                self.shrink_horizon()
            };
            if !changed {
                break;
            }
            applied += 1;
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ClvParameters::default();
        assert_eq!(params.margin, 60.0);
        assert_eq!(params.repeat_probabilities, vec![100.0, 90.0, 85.0, 85.0, 60.0, 30.0]);
        assert_eq!(params.acquisition_cost, 6.0);
        assert_eq!(params.discount_rate, 10.0);
        assert_eq!(params.time_horizon, 6);
    }

    #[test]
    fn test_new_clamps_horizon() {
        assert_eq!(ClvParameters::new(1.0, vec![], 0.0, 0.0, 0).time_horizon, 1);
        assert_eq!(ClvParameters::new(1.0, vec![], 0.0, 0.0, 25).time_horizon, 10);
        assert_eq!(ClvParameters::new(1.0, vec![], 0.0, 0.0, 4).time_horizon, 4);
    }

    #[test]
    fn test_missing_probability_reads_as_zero() {
        let params = ClvParameters::new(60.0, vec![100.0], 0.0, 10.0, 3);
        assert_eq!(params.repeat_probability(0), 100.0);
        assert_eq!(params.repeat_probability(2), 0.0);
    }

    #[test]
    fn test_grow_appends_default_probability() {
        let mut params = ClvParameters::default();
        assert!(params.grow_horizon());
        assert_eq!(params.time_horizon, 7);
        assert_eq!(params.repeat_probabilities.len(), 7);
        assert_eq!(params.repeat_probabilities[6], NEW_PERIOD_REPEAT_PROBABILITY);
    }

    #[test]
    fn test_grow_is_noop_at_upper_bound() {
        let mut params = ClvParameters::default();
        while params.grow_horizon() {}
        assert_eq!(params.time_horizon, MAX_TIME_HORIZON);

        let before = params.clone();
        assert!(!params.grow_horizon());
        assert_eq!(params, before);
    }

    #[test]
    fn test_shrink_drops_last_entry() {
        let mut params = ClvParameters::default();
        assert!(params.shrink_horizon());
        assert_eq!(params.time_horizon, 5);
        assert_eq!(params.repeat_probabilities, vec![100.0, 90.0, 85.0, 85.0, 60.0]);
    }

    #[test]
    fn test_shrink_is_noop_at_lower_bound() {
        let mut params = ClvParameters::default();
        while params.shrink_horizon() {}
        assert_eq!(params.time_horizon, MIN_TIME_HORIZON);
        assert_eq!(params.repeat_probabilities, vec![100.0]);

        let before = params.clone();
        assert!(!params.shrink_horizon());
        assert_eq!(params, before);
    }

    #[test]
    fn test_resize_repairs_short_series() {
        // Two entries for a horizon of four: the gap is zero-filled before the new period
        let mut params = ClvParameters::new(60.0, vec![100.0, 50.0], 0.0, 0.0, 4);
        params.grow_horizon();
        assert_eq!(params.repeat_probabilities, vec![100.0, 50.0, 0.0, 0.0, 20.0]);
    }

    #[test]
    fn test_step_horizon_stops_at_bounds() {
        let mut params = ClvParameters::default();
        assert_eq!(params.step_horizon(10), 4);
        assert_eq!(params.time_horizon, 10);
        assert_eq!(params.step_horizon(-20), 9);
        assert_eq!(params.time_horizon, 1);
        assert_eq!(params.repeat_probabilities.len(), 1);
    }

    #[test]
    fn test_set_repeat_probability_in_range_only() {
        let mut params = ClvParameters::default();
        assert!(params.set_repeat_probability(2, 42.0));
        assert_eq!(params.repeat_probabilities[2], 42.0);

        assert!(!params.set_repeat_probability(6, 42.0));
        assert_eq!(params.repeat_probabilities.len(), 6);
    }

    #[test]
    fn test_raw_setters_coerce() {
        let mut params = ClvParameters::default();
        params.set_margin_raw("75.5");
        params.set_acquisition_cost_raw("n/a");
        params.set_discount_rate_raw("");
        params.set_repeat_probability_raw(1, "oops");

        assert_eq!(params.margin, 75.5);
        assert_eq!(params.acquisition_cost, 0.0);
        assert_eq!(params.discount_rate, 0.0);
        assert_eq!(params.repeat_probabilities[1], 0.0);
    }

    #[test]
    fn test_normalized_matches_horizon() {
        let params = ClvParameters {
            margin: f64::NAN,
            repeat_probabilities: vec![100.0; 12],
            acquisition_cost: 6.0,
            discount_rate: 10.0,
            time_horizon: 15,
        }
        .normalized();

        assert_eq!(params.time_horizon, MAX_TIME_HORIZON);
        assert_eq!(params.repeat_probabilities.len(), 10);
        assert_eq!(params.margin, 0.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params: ClvParameters = serde_json::from_str(r#"{"margin": 80}"#).unwrap();
        assert_eq!(params.margin, 80.0);
        assert_eq!(params.time_horizon, 6);
        assert_eq!(params.discount_rate, 10.0);
    }
}
