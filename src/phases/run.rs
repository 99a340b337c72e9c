use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use colored::*;
use csv::Writer;
use dotenv::dotenv;
use tracing::{info, info_span, Instrument};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::distance::providers::{GoogleDistanceMatrix, TrafficModel};
use crate::domain::types::CostMeasure;
use crate::error::Result;
use crate::setup::init::load_trip;
use crate::utils::format_seconds;

use super::core_logic::plan_trip;
use super::phases_types::{LegPlan, TripPlan};

/// Order a set of stops for the trip out and the trip back.
#[derive(Debug, Parser)]
#[command(name = "trip-planner", version)]
pub struct Args {
    /// Trip JSON: addresses, start_index, end_index, leave_time, return_time
    #[arg(short, long)]
    pub input: PathBuf,

    /// duration, duration_in_traffic or distance (overrides COST_MEASURE)
    #[arg(short, long)]
    pub measure: Option<CostMeasure>,

    /// best_guess, pessimistic or optimistic (overrides TRAFFIC_MODEL)
    #[arg(long)]
    pub traffic_model: Option<TrafficModel>,

    /// Wall-clock limit per solve, in milliseconds
    #[arg(long)]
    pub time_budget_ms: Option<u64>,

    /// Skip the local-search pass and keep the greedy route
    #[arg(long)]
    pub no_improve: bool,

    /// Also write both routes to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

/// Initialize tracing and environment
fn init_tracing_and_env() {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(false))
        .init();
}

fn apply_args(config: &mut Config, args: &Args) {
    if let Some(measure) = args.measure {
        config.cost_measure = measure;
    }
    if let Some(model) = args.traffic_model {
        config.traffic_model = model;
    }
    if let Some(ms) = args.time_budget_ms {
        config.solver.time_budget = Some(Duration::from_millis(ms));
    }
    if args.no_improve {
        config.solver.improve = false;
    }
}

pub async fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing_and_env();

    let mut config = Config::from_env()?;
    apply_args(&mut config, &args);

    let trip = load_trip(&args.input)?;
    info!(
        "Planning {} stops: start {:?}, end {:?}",
        trip.locations.len(),
        trip.locations[trip.start],
        trip.locations[trip.end]
    );

    let oracle = GoogleDistanceMatrix::new(&config)?;
    let plan = plan_trip(&oracle, &trip, config.cost_measure, &config.solver)
        .instrument(info_span!("plan_trip"))
        .await;

    print_plan(&plan, config.cost_measure);

    if let Some(path) = &args.csv {
        save_to_csv(&plan, path)?;
        info!("Wrote routes to {}", path.display());
    }

    Ok(())
}

fn print_plan(plan: &TripPlan, measure: CostMeasure) {
    for (direction, leg) in plan.legs() {
        println!();
        match leg {
            Ok(leg) => print_leg(leg, measure),
            Err(e) => println!("{}", format!("{direction}: no route ({e})").red()),
        }
    }
}

fn print_leg(leg: &LegPlan, measure: CostMeasure) {
    let total = match measure {
        CostMeasure::Distance => format!("{} m", leg.total_cost()),
        _ => format!("{}s ({})", leg.total_cost(), format_seconds(leg.total_cost())),
    };
    println!(
        "{}",
        format!("{} leaving {}: {}", leg.direction, leg.departure_time, total).green()
    );
    for (position, (stop, arrival)) in leg.stops.iter().zip(&leg.arrivals).enumerate() {
        println!("  {:>2}. {} (+{})", position + 1, stop, arrival);
    }
}

fn save_to_csv(plan: &TripPlan, filename: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(filename)?;

    wtr.write_record(["direction", "position", "stop_index", "address", "cumulative_cost"])?;

    for (_, leg) in plan.legs() {
        let Ok(leg) = leg else { continue };
        for (position, ((index, stop), arrival)) in leg
            .route
            .route
            .iter()
            .zip(&leg.stops)
            .zip(&leg.arrivals)
            .enumerate()
        {
            wtr.write_record([
                leg.direction.to_string(),
                position.to_string(),
                index.to_string(),
                stop.clone(),
                arrival.to_string(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
