use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised while building a cost matrix or solving a route.
///
/// Every variant is terminal for the direction being solved; the other
/// direction of a trip is unaffected.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("distance oracle returned unusable data: {0}")]
    UpstreamData(String),

    #[error("departure time {departure} is not after the current time {now}")]
    InvalidDepartureTime {
        departure: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("no route connects all stops: {0}")]
    NoSolution(String),

    #[error("invalid routing problem: {0}")]
    InvalidProblem(String),

    #[error("distance oracle request failed: {0}")]
    Oracle(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
