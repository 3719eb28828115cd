//! Discount rate / horizon sensitivity table for a CLV parameter set
//!
//! Usage: cargo run --bin clv_sensitivity -- --rates 0,5,10,15 --horizons 3,6,10

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use clv_calculator::params::load_parameters;
use clv_calculator::{ClvParameters, ScenarioRunner};

#[derive(Parser, Debug)]
#[command(name = "clv_sensitivity")]
#[command(about = "Tabulate CLV across discount rates and horizons")]
struct Args {
    /// JSON parameter file; defaults are used when omitted
    #[arg(long)]
    params: Option<PathBuf>,

    /// Discount rates in percent
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_values_t = [0.0, 5.0, 10.0, 15.0, 20.0])]
    rates: Vec<f64>,

    /// Horizons to evaluate (defaults to the parameter file's horizon)
    #[arg(long, value_delimiter = ',')]
    horizons: Vec<u32>,

    /// Output CSV path
    #[arg(long, default_value = "clv_sensitivity.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let params = match &args.params {
        Some(path) => load_parameters(path)
            .with_context(|| format!("Failed to load parameters from {}", path.display()))?,
        None => ClvParameters::default(),
    };

    let horizons = if args.horizons.is_empty() {
        vec![params.time_horizon]
    } else {
        args.horizons.clone()
    };

    let start = Instant::now();
    let runner = ScenarioRunner::new(params);
    let results = runner.run_grid(&args.rates, &horizons);
    info!("Evaluated {} scenarios in {:?}", results.len(), start.elapsed());

    let mut file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    writeln!(file, "DiscountRate,TimeHorizon,TotalPV,AcquisitionCost,CLV,BreakevenAcqCost")?;

    println!("{:>10} {:>8} {:>12} {:>12} {:>12}", "Rate %", "Horizon", "Total PV", "CLV", "Breakeven");
    println!("{}", "-".repeat(58));

    for result in &results {
        writeln!(
            file,
            "{:.4},{},{:.2},{:.2},{:.2},{:.2}",
            result.discount_rate,
            result.time_horizon,
            result.breakdown.total_pv,
            result.breakdown.acquisition_cost,
            result.breakdown.clv,
            result.breakeven_acquisition_cost(),
        )?;
        println!(
            "{:>10.2} {:>8} {:>12.2} {:>12.2} {:>12.2}",
            result.discount_rate,
            result.time_horizon,
            result.breakdown.total_pv,
            result.breakdown.clv,
            result.breakeven_acquisition_cost(),
        );
    }

    println!("\nWritten {} scenarios to {}", results.len(), args.output.display());
    Ok(())
}
