use tracing::{debug, trace};

use crate::domain::types::{Route, RouteProblem, SearchState};
use crate::error::{PlannerError, Result};
use crate::utils::Deadline;

/// Extension choices for one prefix length, cheapest first.
struct Frame {
    candidates: Vec<(u64, usize)>,
    next: usize,
    // cost of the arc that produced this frame's tail, to undo it on backtrack
    arrival_cost: u64,
}

impl Frame {
    fn new(candidates: Vec<(u64, usize)>, arrival_cost: u64) -> Self {
        Self {
            candidates,
            next: 0,
            arrival_cost,
        }
    }

    fn advance(&mut self) -> Option<(u64, usize)> {
        let choice = self.candidates.get(self.next).copied();
        self.next += 1;
        choice
    }
}

/// Unvisited stops reachable from the tail, ordered by (arc cost, stop index).
fn extension_candidates(problem: &RouteProblem, state: &SearchState) -> Vec<(u64, usize)> {
    let tail = state.tail();
    let mut candidates: Vec<(u64, usize)> = (0..problem.num_stops())
        .filter(|&stop| !state.visited[stop])
        .filter_map(|stop| problem.arc_cost(tail, stop).map(|cost| (cost, stop)))
        .collect();
    candidates.sort_unstable();
    candidates
}

fn close_route(problem: &RouteProblem, state: &SearchState) -> Option<Route> {
    let closing = problem.arc_cost(state.tail(), problem.end)?;
    let mut route = state.clone().into_route();
    route.route.push(problem.end);
    route.cost += closing;
    Some(route)
}

/// Path-cheapest-arc construction with fixed endpoints.
///
/// Starting from `[start]`, always append the cheapest unvisited stop reachable
/// from the current tail (ties go to the lower index), then append `end`.
/// On a dense matrix this never backtracks and always returns the greedy
/// route, whatever the deadline. Missing arcs can make the greedy choice a
/// dead end, in which case the next-cheapest choice at the most recent step
/// is tried. That search is exponential in the worst case, so sparse input
/// should come with a deadline; once it expires mid-backtrack the result is
/// `NoSolution`.
pub fn construct_route(problem: &RouteProblem, deadline: &Deadline) -> Result<Route> {
    problem.validate()?;
    let n = problem.num_stops();

    if n == 1 {
        return Ok(Route {
            route: vec![problem.start],
            cost: 0,
        });
    }

    let mut state = SearchState::new(n, problem.start);
    // end is placed by the closing step only
    state.visited[problem.end] = true;

    if state.partial.len() == n - 1 {
        return close_route(problem, &state).ok_or_else(|| {
            PlannerError::NoSolution(format!(
                "no arc from start {} to end {}",
                problem.start, problem.end
            ))
        });
    }

    let mut stack = vec![Frame::new(extension_candidates(problem, &state), 0)];
    let mut backtracks = 0usize;

    while let Some(step) = stack.last_mut().map(Frame::advance) {
        // the greedy pass itself is never cut short, only the backtracking search
        if backtracks > 0 && deadline.expired() {
            return Err(PlannerError::NoSolution(format!(
                "time budget ran out after {backtracks} backtracks without a complete route"
            )));
        }

        match step {
            Some((arc, stop)) => {
                state.push(stop, arc);
                trace!("extend with stop {} (arc {}), prefix {:?}", stop, arc, state.partial);

                if state.partial.len() < n - 1 {
                    stack.push(Frame::new(extension_candidates(problem, &state), arc));
                    continue;
                }

                if let Some(route) = close_route(problem, &state) {
                    debug!(
                        "constructed route {:?} with cost {} ({} backtracks)",
                        route.route, route.cost, backtracks
                    );
                    return Ok(route);
                }

                trace!("no arc from {} to end {}, backtracking", stop, problem.end);
                state.pop(arc);
                backtracks += 1;
            }
            None => {
                let exhausted = stack.pop();
                if stack.is_empty() {
                    break;
                }
                if let Some(frame) = exhausted {
                    state.pop(frame.arrival_cost);
                }
                backtracks += 1;
            }
        }
    }

    Err(PlannerError::NoSolution(format!(
        "no path from {} to {} visits all {} stops using available arcs",
        problem.start, problem.end, n
    )))
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::domain::types::CostMatrix;

    fn dense(rows: Vec<Vec<u64>>, start: usize, end: usize) -> RouteProblem {
        RouteProblem::new(CostMatrix::from_rows(rows).unwrap(), start, end).unwrap()
    }

    #[test]
    fn test_single_stop() {
        let p = dense(vec![vec![0]], 0, 0);
        let route = construct_route(&p, &Deadline::none()).unwrap();
        assert_eq!(route.route, vec![0]);
        assert_eq!(route.cost, 0);
    }

    #[test]
    fn test_two_stops_uses_direct_arc() {
        let p = dense(vec![vec![0, 42], vec![7, 0]], 1, 0);
        let route = construct_route(&p, &Deadline::none()).unwrap();
        assert_eq!(route.route, vec![1, 0]);
        assert_eq!(route.cost, 7);
    }

    #[test]
    fn test_greedy_picks_cheapest_then_closes() {
        // from 0 the cheapest is 2, then from 2 the cheapest unvisited is 1
        let p = dense(
            vec![
                vec![0, 5, 1, 9],
                vec![5, 0, 2, 1],
                vec![1, 3, 0, 1],
                vec![9, 1, 1, 0],
            ],
            0,
            3,
        );
        let route = construct_route(&p, &Deadline::none()).unwrap();
        assert_eq!(route.route, vec![0, 2, 1, 3]);
        assert_eq!(route.cost, 1 + 3 + 1);
    }

    #[test]
    fn test_end_is_not_chosen_early_even_if_cheapest() {
        let p = dense(
            vec![vec![0, 10, 1], vec![10, 0, 10], vec![1, 10, 0]],
            0,
            2,
        );
        let route = construct_route(&p, &Deadline::none()).unwrap();
        assert_eq!(route.route, vec![0, 1, 2]);
        assert_eq!(route.cost, 20);
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        let p = dense(
            vec![
                vec![0, 4, 4, 4],
                vec![4, 0, 4, 4],
                vec![4, 4, 0, 4],
                vec![4, 4, 4, 0],
            ],
            0,
            3,
        );
        let route = construct_route(&p, &Deadline::none()).unwrap();
        assert_eq!(route.route, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_backtracks_around_missing_closing_arc() {
        // greedy goes 0 -> 1 -> 2, but 2 cannot reach 3
        let dm = CostMatrix::from_sparse_rows(vec![
            vec![Some(0), Some(1), Some(5), None],
            vec![Some(1), Some(0), Some(1), Some(1)],
            vec![Some(5), Some(1), Some(0), None],
            vec![None, Some(1), None, Some(0)],
        ])
        .unwrap();
        let p = RouteProblem::new(dm, 0, 3).unwrap();
        let route = construct_route(&p, &Deadline::none()).unwrap();
        assert_eq!(route.route, vec![0, 2, 1, 3]);
        assert_eq!(route.cost, 7);
    }

    #[test]
    fn test_disconnected_matrix_has_no_solution() {
        let dm = CostMatrix::from_sparse_rows(vec![
            vec![Some(0), Some(1), None],
            vec![None, Some(0), None],
            vec![None, None, Some(0)],
        ])
        .unwrap();
        let p = RouteProblem::new(dm, 0, 2).unwrap();
        let err = construct_route(&p, &Deadline::none()).unwrap_err();
        assert!(matches!(err, PlannerError::NoSolution(_)));
    }

    #[test]
    fn test_dense_matrix_ignores_expired_deadline() {
        let p = dense(
            vec![
                vec![0, 5, 1, 9],
                vec![5, 0, 2, 1],
                vec![1, 3, 0, 1],
                vec![9, 1, 1, 0],
            ],
            0,
            3,
        );
        let expired = Deadline::after(Some(Duration::ZERO));
        let route = construct_route(&p, &expired).unwrap();
        assert_eq!(route.route, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_hopeless_sparse_search_stops_at_deadline() {
        // nothing can reach the end, so without a deadline every ordering of
        // the 12 interior stops would be tried
        let n = 14;
        let rows = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        let cost = 1 + ((i * 7 + j * 3) % 11) as u64;
                        (i == j || j != n - 1).then_some(cost)
                    })
                    .collect()
            })
            .collect();
        let p = RouteProblem::new(CostMatrix::from_sparse_rows(rows).unwrap(), 0, n - 1).unwrap();

        let started = Instant::now();
        let err = construct_route(&p, &Deadline::after(Some(Duration::from_millis(20))))
            .unwrap_err();
        assert!(matches!(err, PlannerError::NoSolution(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_missing_direct_arc_with_two_stops() {
        let dm = CostMatrix::from_sparse_rows(vec![vec![Some(0), None], vec![Some(1), Some(0)]])
            .unwrap();
        let p = RouteProblem::new(dm, 0, 1).unwrap();
        assert!(matches!(
            construct_route(&p, &Deadline::none()),
            Err(PlannerError::NoSolution(_))
        ));
    }
}
