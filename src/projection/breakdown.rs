//! Output structures for a CLV computation

use serde::{Deserialize, Serialize};

/// Present-value breakdown for a single period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyBreakdownRow {
    /// Period index; 0 is the acquisition period
    pub period: u32,
    pub margin: f64,
    /// Repeat probability in percent
    pub repeat_prob: f64,
    pub adjusted_margin: f64,
    pub discount_factor: f64,
    pub present_value: f64,
}

impl YearlyBreakdownRow {
    /// Label used in tables and exports: `Acquisition` or `Year N`
    pub fn label(&self) -> String {
        if self.period == 0 {
            "Acquisition".to_string()
        } else {
            format!("Year {}", self.period)
        }
    }
}

/// Complete result of one CLV computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClvBreakdown {
    /// One row per period, in period order
    pub rows: Vec<YearlyBreakdownRow>,

    /// Sum of the per-period present values
    pub total_pv: f64,

    /// Acquisition cost the CLV was netted against
    pub acquisition_cost: f64,

    /// `total_pv - acquisition_cost`
    pub clv: f64,
}

impl ClvBreakdown {
    pub fn new(acquisition_cost: f64) -> Self {
        Self {
            rows: Vec::new(),
            total_pv: 0.0,
            acquisition_cost,
            clv: -acquisition_cost,
        }
    }

    /// Add a period row and accumulate its present value
    pub fn add_row(&mut self, row: YearlyBreakdownRow) {
        self.total_pv += row.present_value;
        self.rows.push(row);
    }

    /// Net the accumulated present value against the acquisition cost
    pub fn finish(mut self) -> Self {
        self.clv = self.total_pv - self.acquisition_cost;
        self
    }

    /// True when any value is infinite or NaN (degenerate discount rate)
    pub fn is_degenerate(&self) -> bool {
        !self.total_pv.is_finite()
            || self
                .rows
                .iter()
                .any(|r| !r.discount_factor.is_finite() || !r.present_value.is_finite())
    }

    /// Summary statistics
    pub fn summary(&self) -> BreakdownSummary {
        let total_adjusted_margin: f64 = self.rows.iter().map(|r| r.adjusted_margin).sum();
        let discounting_cost = total_adjusted_margin - self.total_pv;
        let payback_period = self.payback_period();

        BreakdownSummary {
            periods: self.rows.len() as u32,
            total_adjusted_margin,
            discounting_cost,
            total_pv: self.total_pv,
            clv: self.clv,
            payback_period,
        }
    }

    /// First period whose cumulative present value covers the acquisition
    /// cost, if any
    pub fn payback_period(&self) -> Option<u32> {
        let mut cumulative = 0.0;
        for row in &self.rows {
            cumulative += row.present_value;
            if cumulative >= self.acquisition_cost {
                return Some(row.period);
            }
        }
        None
    }
}

/// Summary statistics for a breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownSummary {
    pub periods: u32,
    /// Probability-weighted margin before discounting
    pub total_adjusted_margin: f64,
    /// Value lost to discounting (`total_adjusted_margin - total_pv`)
    pub discounting_cost: f64,
    pub total_pv: f64,
    pub clv: f64,
    pub payback_period: Option<u32>,
}
