use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::types::Route;
use crate::error::Result;
use crate::solver::cheapest_arc::SolveStats;

/// A resolved trip: ordered locations, fixed endpoints and two departure times.
#[derive(Debug, Clone)]
pub struct Trip {
    pub locations: Vec<String>,
    pub start: usize,
    pub end: usize,
    pub leave_time: DateTime<Utc>,
    pub return_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outbound,
    Return,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Outbound => "outbound",
            Direction::Return => "return",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Solved leg, with stops given as location identifiers.
#[derive(Debug, Clone)]
pub struct LegPlan {
    pub direction: Direction,
    pub departure_time: DateTime<Utc>,
    pub route: Route,
    pub stops: Vec<String>,
    /// Seconds (or meters) elapsed on arrival at each stop.
    pub arrivals: Vec<u64>,
    pub stats: SolveStats,
}

impl LegPlan {
    pub fn total_cost(&self) -> u64 {
        self.route.cost
    }
}

/// Both legs of a trip; each succeeds or fails on its own.
#[derive(Debug)]
pub struct TripPlan {
    pub outbound: Result<LegPlan>,
    pub inbound: Result<LegPlan>,
}

impl TripPlan {
    pub fn legs(&self) -> [(Direction, &Result<LegPlan>); 2] {
        [
            (Direction::Outbound, &self.outbound),
            (Direction::Return, &self.inbound),
        ]
    }
}
