use std::time::{Duration, Instant};

use tracing::{debug, info, span, warn, Level};

use crate::config::constant::DEFAULT_TIME_BUDGET_MS;
use crate::domain::types::{Route, RouteProblem};
use crate::error::Result;
use crate::utils::Deadline;

use super::construction::construct_route;
use super::neighbourhood::improve_route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverOptions {
    /// Run the local-search pass after construction.
    pub improve: bool,
    /// Wall-clock limit for the whole solve. `None` runs to a local optimum.
    pub time_budget: Option<Duration>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            improve: true,
            time_budget: Some(Duration::from_millis(DEFAULT_TIME_BUDGET_MS)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub construction_cost: u64,
    pub final_cost: u64,
    pub moves_applied: usize,
    pub interrupted: bool,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub route: Route,
    pub stats: SolveStats,
}

/// Finds a start-to-end order over every stop of `problem`.
///
/// Greedy cheapest-arc construction, then (optionally) interior local search.
/// Deterministic for a given problem and options, apart from where a time
/// budget happens to cut the improvement phase.
pub fn solve(problem: &RouteProblem, options: &SolverOptions) -> Result<SolveOutcome> {
    let solve_span = span!(
        Level::DEBUG,
        "solve",
        stops = problem.num_stops(),
        start = problem.start,
        end = problem.end
    );
    let _guard = solve_span.enter();

    let started = Instant::now();
    let deadline = Deadline::after(options.time_budget);
    if options.time_budget.is_none() && !problem.cost_matrix.is_dense() {
        warn!("Solving a matrix with missing arcs and no time budget; backtracking is unbounded");
    }

    let mut route = construct_route(problem, &deadline)?;
    let construction_cost = route.cost;
    debug!("Construction cost: {}", construction_cost);

    let mut stats = SolveStats {
        construction_cost,
        ..SolveStats::default()
    };

    if options.improve {
        let outcome = improve_route(&mut route, problem, &deadline);
        stats.moves_applied = outcome.moves_applied;
        stats.interrupted = outcome.interrupted;
    }

    route.check_against(problem)?;
    stats.final_cost = route.cost;
    stats.elapsed = started.elapsed();

    info!(
        "Solved {} stops in {:?}: cost {} (construction {}, {} improving moves{})",
        problem.num_stops(),
        stats.elapsed,
        stats.final_cost,
        stats.construction_cost,
        stats.moves_applied,
        if stats.interrupted { ", budget reached" } else { "" }
    );

    Ok(SolveOutcome { route, stats })
}
