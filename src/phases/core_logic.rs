use tracing::{info, info_span, warn, Instrument};

use crate::distance::matrix::build_cost_matrix;
use crate::distance::providers::DistanceOracle;
use crate::domain::types::{CostMeasure, RouteProblem};
use crate::error::{PlannerError, Result};
use crate::evaluation::fitness::cumulative_costs;
use crate::solver::cheapest_arc::{solve, SolverOptions};
use crate::utils::print_cost_matrix;

use super::phases_types::{Direction, LegPlan, Trip, TripPlan};

/// Builds the matrix for one direction and solves it.
///
/// Outbound runs start→end at the leave time; return runs end→start at the
/// return time.
pub async fn solve_leg<O: DistanceOracle>(
    oracle: &O,
    trip: &Trip,
    direction: Direction,
    measure: CostMeasure,
    options: &SolverOptions,
) -> Result<LegPlan> {
    let (start, end, departure_time) = match direction {
        Direction::Outbound => (trip.start, trip.end, trip.leave_time),
        Direction::Return => (trip.end, trip.start, trip.return_time),
    };

    let leg_span = info_span!("leg", direction = %direction, start, end);
    async move {
        RouteProblem::check_endpoints(trip.locations.len(), start, end)?;

        let cost_matrix =
            build_cost_matrix(oracle, &trip.locations, departure_time, measure).await?;
        print_cost_matrix(&cost_matrix);

        let problem = RouteProblem::new(cost_matrix, start, end)?;
        let outcome = solve(&problem, options)?;

        let arrivals = cumulative_costs(&outcome.route.route, &problem.cost_matrix)
            .ok_or_else(|| {
                PlannerError::NoSolution("solved route uses a missing arc".to_string())
            })?;
        let stops = outcome
            .route
            .labelled(&trip.locations)
            .into_iter()
            .map(String::from)
            .collect();

        info!("{} leg cost {} {}", direction, outcome.route.cost, measure);

        Ok(LegPlan {
            direction,
            departure_time,
            route: outcome.route,
            stops,
            arrivals,
            stats: outcome.stats,
        })
    }
    .instrument(leg_span)
    .await
}

/// Solves both legs concurrently. A failure in one leg leaves the other intact.
pub async fn plan_trip<O: DistanceOracle>(
    oracle: &O,
    trip: &Trip,
    measure: CostMeasure,
    options: &SolverOptions,
) -> TripPlan {
    let (outbound, inbound) = futures::join!(
        solve_leg(oracle, trip, Direction::Outbound, measure, options),
        solve_leg(oracle, trip, Direction::Return, measure, options),
    );

    for (direction, leg) in [(Direction::Outbound, &outbound), (Direction::Return, &inbound)] {
        if let Err(e) = leg {
            warn!("{} leg failed: {}", direction, e);
        }
    }

    TripPlan { outbound, inbound }
}
