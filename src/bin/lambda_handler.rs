//! AWS Lambda handler for CLV calculations
//!
//! Accepts CLV parameters as JSON, optionally steps the horizon, and returns
//! the period breakdown, summary and (on request) the CSV export text.

use clv_calculator::export::export_to_string;
use clv_calculator::projection::{BreakdownSummary, ClvBreakdown};
use clv_calculator::{ClvParameters, ClvSession};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::info;
use serde::{Deserialize, Serialize};

/// Input for one calculation
#[derive(Debug, Deserialize)]
pub struct ClvRequest {
    /// Parameters; missing fields use the defaults
    #[serde(default)]
    pub params: ClvParameters,

    /// Horizon steps applied after loading (negative shrinks)
    #[serde(default)]
    pub horizon_steps: i32,

    /// Include the CSV export text in the response
    #[serde(default)]
    pub include_export: bool,
}

/// Output of one calculation
#[derive(Debug, Serialize)]
pub struct ClvResponse {
    pub params: ClvParameters,
    pub breakdown: ClvBreakdown,
    pub summary: BreakdownSummary,
    /// True when a discount rate at or below -100% produced non-finite values
    pub degenerate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_csv: Option<String>,
    pub execution_time_ms: u64,
}

async fn handler(event: LambdaEvent<ClvRequest>) -> Result<ClvResponse, Error> {
    let start = std::time::Instant::now();
    let request = event.payload;

    let mut session = ClvSession::new(request.params.normalized());
    session.update(|p| {
        p.step_horizon(request.horizon_steps);
    });

    let (params, breakdown) = session.into_parts();
    let export_csv = if request.include_export {
        Some(export_to_string(&breakdown)?)
    } else {
        None
    };

    info!(
        "Computed CLV {:.2} over {} periods",
        breakdown.clv, params.time_horizon
    );

    Ok(ClvResponse {
        summary: breakdown.summary(),
        degenerate: breakdown.is_degenerate(),
        params,
        breakdown,
        export_csv,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
