use std::collections::HashSet;

use crate::domain::types::{Route, RouteProblem};
use crate::error::{PlannerError, Result};
use crate::evaluation::fitness::find_cost;

impl Route {
    /// Checks the route is a start-to-end permutation of every stop and that
    /// its reported cost matches the matrix.
    pub fn check_against(&self, problem: &RouteProblem) -> Result<()> {
        let n = problem.num_stops();
        if self.route.len() != n {
            return Err(PlannerError::NoSolution(format!(
                "route has {} stops, expected {}",
                self.route.len(),
                n
            )));
        }
        if self.route.first() != Some(&problem.start) || self.route.last() != Some(&problem.end) {
            return Err(PlannerError::NoSolution(format!(
                "route {:?} does not run from {} to {}",
                self.route, problem.start, problem.end
            )));
        }
        let distinct: HashSet<usize> = self.route.iter().copied().collect();
        if distinct.len() != n || self.route.iter().any(|&s| s >= n) {
            return Err(PlannerError::NoSolution(format!(
                "route {:?} repeats or skips a stop",
                self.route
            )));
        }
        match find_cost(&self.route, &problem.cost_matrix) {
            Some(cost) if cost == self.cost => Ok(()),
            Some(cost) => Err(PlannerError::NoSolution(format!(
                "route cost {} disagrees with matrix total {}",
                self.cost, cost
            ))),
            None => Err(PlannerError::NoSolution(format!(
                "route {:?} uses a missing arc",
                self.route
            ))),
        }
    }

    /// Maps stop indices back to the caller's location identifiers.
    pub fn labelled<'a>(&self, locations: &'a [String]) -> Vec<&'a str> {
        self.route.iter().map(|&i| locations[i].as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CostMatrix;

    fn problem() -> RouteProblem {
        let dm = CostMatrix::from_rows(vec![
            vec![0, 1, 5],
            vec![2, 0, 1],
            vec![5, 2, 0],
        ])
        .unwrap();
        RouteProblem::new(dm, 0, 2).unwrap()
    }

    #[test]
    fn test_valid_route_passes() {
        let route = Route {
            route: vec![0, 1, 2],
            cost: 2,
        };
        assert!(route.check_against(&problem()).is_ok());
    }

    #[test]
    fn test_wrong_cost_rejected() {
        let route = Route {
            route: vec![0, 1, 2],
            cost: 3,
        };
        assert!(route.check_against(&problem()).is_err());
    }

    #[test]
    fn test_repeated_stop_rejected() {
        let route = Route {
            route: vec![0, 0, 2],
            cost: 1,
        };
        assert!(route.check_against(&problem()).is_err());
    }

    #[test]
    fn test_labelled() {
        let route = Route {
            route: vec![0, 2, 1],
            cost: 0,
        };
        let names = vec!["home".to_string(), "shop".to_string(), "park".to_string()];
        assert_eq!(route.labelled(&names), vec!["home", "park", "shop"]);
    }
}
