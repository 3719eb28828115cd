//! CLV Calculator CLI
//!
//! Computes a customer lifetime value breakdown from command-line
//! parameters and writes the flat CSV export.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::info;
use std::path::PathBuf;

use clv_calculator::export::write_export_file;
use clv_calculator::params::{load_parameters, load_repeat_probabilities, parse_or_zero};
use clv_calculator::{ClvParameters, ClvSession};

#[derive(Parser, Debug)]
#[command(name = "clv_calculator")]
#[command(about = "Estimate customer lifetime value with a discounted-cash-flow model")]
struct Args {
    /// JSON parameter file; missing fields use the defaults
    #[arg(long)]
    params: Option<PathBuf>,

    /// CSV repeat probability curve (`period,repeat_prob`); sets the horizon
    #[arg(long)]
    probabilities: Option<PathBuf>,

    /// Per-period gross margin
    #[arg(long, allow_hyphen_values = true)]
    margin: Option<String>,

    /// One-time acquisition cost
    #[arg(long, allow_hyphen_values = true)]
    acquisition_cost: Option<String>,

    /// Discount rate in percent per period
    #[arg(long, allow_hyphen_values = true)]
    discount_rate: Option<String>,

    /// Comma-separated repeat probabilities (%); sets the horizon
    #[arg(long, value_delimiter = ',')]
    repeat_probs: Option<Vec<String>>,

    /// Add periods to the horizon (new periods start at 20%)
    #[arg(long, default_value_t = 0)]
    grow: u32,

    /// Remove periods from the end of the horizon
    #[arg(long, default_value_t = 0)]
    shrink: u32,

    /// Export path (default: clv_export_<YYYYMMDD>.csv)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Skip writing the CSV export
    #[arg(long)]
    no_export: bool,

    /// Print the breakdown as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn with_curve(mut params: ClvParameters, curve: Vec<f64>) -> ClvParameters {
    params.time_horizon = curve.len() as u32;
    params.repeat_probabilities = curve;
    params.normalized()
}

fn build_params(args: &Args) -> Result<ClvParameters> {
    let mut params = match &args.params {
        Some(path) => load_parameters(path)
            .with_context(|| format!("Failed to load parameters from {}", path.display()))?,
        None => ClvParameters::default(),
    };

    if let Some(path) = &args.probabilities {
        let curve = load_repeat_probabilities(path)
            .with_context(|| format!("Failed to load probabilities from {}", path.display()))?;
        params = with_curve(params, curve);
    }

    if let Some(raw) = &args.repeat_probs {
        let curve = raw.iter().map(|r| parse_or_zero(r)).collect();
        params = with_curve(params, curve);
    }

    if let Some(raw) = &args.margin {
        params.set_margin_raw(raw);
    }
    if let Some(raw) = &args.acquisition_cost {
        params.set_acquisition_cost_raw(raw);
    }
    if let Some(raw) = &args.discount_rate {
        params.set_discount_rate_raw(raw);
    }

    Ok(params)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mut session = ClvSession::new(build_params(&args)?);

    for _ in 0..args.grow {
        session.grow_horizon();
    }
    for _ in 0..args.shrink {
        session.shrink_horizon();
    }

    let params = session.params();
    let breakdown = session.breakdown();

    if args.json {
        println!("{}", serde_json::to_string_pretty(breakdown)?);
    } else {
        println!("CLV Calculator v0.1.0");
        println!("=====================\n");

        println!("Parameters:");
        println!("  Margin: ${:.2}", params.margin);
        println!("  Acquisition Cost: ${:.2}", params.acquisition_cost);
        println!("  Discount Rate: {:.2}%", params.discount_rate);
        println!("  Time Horizon: {} periods", params.time_horizon);
        println!();

        println!("{:<12} {:>10} {:>8} {:>12} {:>10} {:>12}",
            "Period", "Margin", "Prob %", "Adj Margin", "Factor", "PV");
        println!("{}", "-".repeat(69));
        for row in &breakdown.rows {
            println!("{:<12} {:>10.2} {:>8.0} {:>12.2} {:>10.4} {:>12.2}",
                row.label(),
                row.margin,
                row.repeat_prob,
                row.adjusted_margin,
                row.discount_factor,
                row.present_value,
            );
        }

        let summary = breakdown.summary();
        println!("\nSummary:");
        println!("  Total PV: ${:.2}", summary.total_pv);
        println!("  Acquisition Cost: -${:.2}", params.acquisition_cost);
        println!("  Final CLV: ${:.2}", summary.clv);
        println!("  Lost to discounting: ${:.2}", summary.discounting_cost);
        match summary.payback_period {
            Some(period) => println!("  Payback period: {}", period),
            None => println!("  Payback period: not within horizon"),
        }
    }

    if !args.no_export {
        let path = args.output.clone().unwrap_or_else(|| {
            PathBuf::from(format!("clv_export_{}.csv", Local::now().format("%Y%m%d")))
        });
        write_export_file(&path, breakdown)
            .with_context(|| format!("Failed to write export to {}", path.display()))?;
        info!("Export written to {}", path.display());
        if !args.json {
            println!("\nExport written to: {}", path.display());
        }
    }

    Ok(())
}
