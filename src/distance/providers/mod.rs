pub mod google;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

pub use google::GoogleDistanceMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TravelMode {
    #[default]
    Driving,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrafficModel {
    #[default]
    BestGuess,
    Pessimistic,
    Optimistic,
}

impl TrafficModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficModel::BestGuess => "best_guess",
            TrafficModel::Pessimistic => "pessimistic",
            TrafficModel::Optimistic => "optimistic",
        }
    }
}

impl fmt::Display for TrafficModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrafficModel {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "best_guess" => Ok(TrafficModel::BestGuess),
            "pessimistic" => Ok(TrafficModel::Pessimistic),
            "optimistic" => Ok(TrafficModel::Optimistic),
            other => Err(PlannerError::Config(format!("unknown traffic model '{other}'"))),
        }
    }
}

/// One batched origins × destinations query.
#[derive(Debug, Clone)]
pub struct MatrixRequest {
    pub origins: Vec<String>,
    pub destinations: Vec<String>,
    pub departure_time: DateTime<Utc>,
    pub mode: TravelMode,
}

impl MatrixRequest {
    /// Every stop to every stop, driving.
    pub fn square(stops: &[String], departure_time: DateTime<Utc>) -> Self {
        Self {
            origins: stops.to_vec(),
            destinations: stops.to_vec(),
            departure_time,
            mode: TravelMode::default(),
        }
    }
}

/// Distance Matrix API response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceMatrixResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub origin_addresses: Vec<String>,
    #[serde(default)]
    pub destination_addresses: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_in_traffic: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<Measure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    pub value: u64, // seconds or meters
    #[serde(default)]
    pub text: String,
}

/// Source of pairwise, time-dependent travel data.
#[allow(async_fn_in_trait)]
pub trait DistanceOracle {
    async fn query(&self, request: &MatrixRequest) -> Result<DistanceMatrixResponse>;
}
