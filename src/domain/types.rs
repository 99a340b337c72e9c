use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Which scalar of an oracle element becomes the arc cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostMeasure {
    Duration,
    #[default]
    DurationInTraffic,
    Distance,
}

impl CostMeasure {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostMeasure::Duration => "duration",
            CostMeasure::DurationInTraffic => "duration_in_traffic",
            CostMeasure::Distance => "distance",
        }
    }
}

impl fmt::Display for CostMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CostMeasure {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "duration" => Ok(CostMeasure::Duration),
            "duration_in_traffic" | "traffic" => Ok(CostMeasure::DurationInTraffic),
            "distance" => Ok(CostMeasure::Distance),
            other => Err(PlannerError::Config(format!("unknown cost measure '{other}'"))),
        }
    }
}

/// Dense N×N table of arc costs stored in row-major order.
///
/// `None` marks an arc with no finite cost. Matrices produced from oracle
/// data are always fully populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    data: Vec<Option<u64>>,
    size: usize,
}

impl CostMatrix {
    /// Builds a fully populated matrix from square rows.
    pub fn from_rows(rows: Vec<Vec<u64>>) -> Result<Self> {
        Self::from_sparse_rows(
            rows.into_iter()
                .map(|row| row.into_iter().map(Some).collect())
                .collect(),
        )
    }

    /// Builds a matrix that may contain missing arcs.
    pub fn from_sparse_rows(rows: Vec<Vec<Option<u64>>>) -> Result<Self> {
        let size = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(PlannerError::InvalidProblem(format!(
                "cost matrix row {} has {} entries, expected {}",
                i,
                row.len(),
                size
            )));
        }
        let data = rows.into_iter().flatten().collect();
        Ok(Self { data, size })
    }

    /// Cost of travelling from `from` to `to`, `None` if the arc is missing.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn arc(&self, from: usize, to: usize) -> Option<u64> {
        self.data[from * self.size + to]
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_dense(&self) -> bool {
        self.data.iter().all(Option::is_some)
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| ((i + 1)..self.size).all(|j| self.arc(i, j) == self.arc(j, i)))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<u64>]> {
        // chunks() panics on zero, and an empty matrix has no rows anyway
        self.data.chunks(self.size.max(1))
    }
}

/// One optimizer invocation: a cost matrix with fixed endpoints.
#[derive(Debug, Clone)]
pub struct RouteProblem {
    pub cost_matrix: CostMatrix,
    pub start: usize,
    pub end: usize,
}

impl RouteProblem {
    pub fn new(cost_matrix: CostMatrix, start: usize, end: usize) -> Result<Self> {
        let problem = Self {
            cost_matrix,
            start,
            end,
        };
        problem.validate()?;
        Ok(problem)
    }

    pub fn num_stops(&self) -> usize {
        self.cost_matrix.size()
    }

    /// Arc cost lookup in terms of stop indices.
    pub fn arc_cost(&self, from: usize, to: usize) -> Option<u64> {
        self.cost_matrix.arc(from, to)
    }

    pub fn validate(&self) -> Result<()> {
        Self::check_endpoints(self.num_stops(), self.start, self.end)
    }

    /// Endpoint checks that need only the stop count, so they can run before
    /// any matrix exists.
    pub fn check_endpoints(n: usize, start: usize, end: usize) -> Result<()> {
        if n == 0 {
            return Err(PlannerError::InvalidProblem("no stops to visit".to_string()));
        }
        if start >= n || end >= n {
            return Err(PlannerError::InvalidProblem(format!(
                "start {} / end {} out of range for {} stops",
                start, end, n
            )));
        }
        if n > 1 && start == end {
            return Err(PlannerError::InvalidProblem(format!(
                "start and end are both {} but there are {} stops",
                start, n
            )));
        }
        Ok(())
    }
}

/// A complete start-to-end visiting order and its summed arc cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub route: Vec<usize>,
    pub cost: u64,
}

/// Partial route kept while the constructive heuristic runs.
#[derive(Debug, Clone)]
pub struct SearchState {
    pub partial: Vec<usize>,
    pub visited: Vec<bool>,
    pub cost: u64,
}

impl SearchState {
    pub fn new(num_stops: usize, start: usize) -> Self {
        let mut visited = vec![false; num_stops];
        visited[start] = true;
        Self {
            partial: vec![start],
            visited,
            cost: 0,
        }
    }

    pub fn tail(&self) -> usize {
        self.partial[self.partial.len() - 1]
    }

    pub fn push(&mut self, stop: usize, arc_cost: u64) {
        self.partial.push(stop);
        self.visited[stop] = true;
        self.cost += arc_cost;
    }

    pub fn pop(&mut self, arc_cost: u64) -> Option<usize> {
        if self.partial.len() <= 1 {
            return None;
        }
        let stop = self.partial.pop()?;
        self.visited[stop] = false;
        self.cost -= arc_cost;
        Some(stop)
    }

    pub fn into_route(self) -> Route {
        Route {
            route: self.partial,
            cost: self.cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = CostMatrix::from_rows(vec![vec![0, 1], vec![1]]).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidProblem(_)));
    }

    #[test]
    fn test_arc_is_directional() {
        let dm = CostMatrix::from_rows(vec![vec![0, 5], vec![9, 0]]).unwrap();
        assert_eq!(dm.arc(0, 1), Some(5));
        assert_eq!(dm.arc(1, 0), Some(9));
        assert!(!dm.is_symmetric());
        assert!(dm.is_dense());
    }

    #[test]
    fn test_sparse_matrix_reports_missing_arc() {
        let dm = CostMatrix::from_sparse_rows(vec![vec![Some(0), None], vec![Some(2), Some(0)]])
            .unwrap();
        assert_eq!(dm.arc(0, 1), None);
        assert!(!dm.is_dense());
    }

    #[test]
    fn test_problem_validation() {
        let dm = CostMatrix::from_rows(vec![vec![0, 1], vec![1, 0]]).unwrap();
        assert!(RouteProblem::new(dm.clone(), 0, 1).is_ok());
        assert!(RouteProblem::new(dm.clone(), 0, 2).is_err());
        assert!(RouteProblem::new(dm, 1, 1).is_err());

        let single = CostMatrix::from_rows(vec![vec![0]]).unwrap();
        assert!(RouteProblem::new(single, 0, 0).is_ok());

        let empty = CostMatrix::from_rows(vec![]).unwrap();
        assert!(RouteProblem::new(empty, 0, 0).is_err());
    }

    #[test]
    fn test_cost_measure_parsing() {
        assert_eq!("duration".parse::<CostMeasure>().unwrap(), CostMeasure::Duration);
        assert_eq!(
            "duration-in-traffic".parse::<CostMeasure>().unwrap(),
            CostMeasure::DurationInTraffic
        );
        assert_eq!("Distance".parse::<CostMeasure>().unwrap(), CostMeasure::Distance);
        assert!("speed".parse::<CostMeasure>().is_err());
    }

    #[test]
    fn test_search_state_push_pop() {
        let mut state = SearchState::new(3, 0);
        state.push(2, 7);
        assert_eq!(state.tail(), 2);
        assert_eq!(state.cost, 7);
        assert_eq!(state.pop(7), Some(2));
        assert_eq!(state.cost, 0);
        assert!(!state.visited[2]);
        assert_eq!(state.pop(0), None);
    }
}
