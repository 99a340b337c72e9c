use std::env;
use std::time::Duration;

use dotenv::dotenv;
use tracing::{info, warn};

use crate::distance::providers::TrafficModel;
use crate::domain::types::CostMeasure;
use crate::error::{PlannerError, Result};
use crate::solver::cheapest_arc::SolverOptions;

pub mod constant {
    pub const GOOGLE_DISTANCE_MATRIX_URL: &str =
        "https://maps.googleapis.com/maps/api/distancematrix/json";
    pub const ORACLE_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_TIME_BUDGET_MS: u64 = 2_000;
    pub const MAX_RELOCATE_SEGMENT: usize = 3;
}

/// Everything the planner needs besides the trip itself.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub cost_measure: CostMeasure,
    pub traffic_model: TrafficModel,
    pub solver: SolverOptions,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: constant::GOOGLE_DISTANCE_MATRIX_URL.to_string(),
            timeout: Duration::from_secs(constant::ORACLE_TIMEOUT_SECS),
            cost_measure: CostMeasure::default(),
            traffic_model: TrafficModel::default(),
            solver: SolverOptions::default(),
        }
    }

    /// Reads `.env` and the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("GOOGLE_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| PlannerError::Config("GOOGLE_API_KEY is not set".to_string()))?;
        info!("Loaded Google Maps API key from environment");

        let mut config = Self::new(api_key.trim());

        if let Some(url) = lookup("GOOGLE_DISTANCE_MATRIX_URL") {
            info!("Using distance matrix endpoint {}", url);
            config.base_url = url;
        }

        if let Some(raw) = lookup("ORACLE_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                PlannerError::Config(format!(
                    "ORACLE_TIMEOUT_SECS must be whole seconds, got '{raw}'"
                ))
            })?;
            if secs == 0 {
                warn!(
                    "ORACLE_TIMEOUT_SECS is 0, keeping default of {}s",
                    constant::ORACLE_TIMEOUT_SECS
                );
            } else {
                config.timeout = Duration::from_secs(secs);
            }
        }

        if let Some(raw) = lookup("COST_MEASURE") {
            config.cost_measure = raw.parse()?;
        }

        if let Some(raw) = lookup("TRAFFIC_MODEL") {
            config.traffic_model = raw.parse()?;
        }

        Ok(config)
    }
}
