use itertools::Itertools;

use crate::domain::types::CostMatrix;

/// Total cost of visiting `route` in order, `None` if any arc along it is missing.
pub fn find_cost(route: &[usize], dm: &CostMatrix) -> Option<u64> {
    route
        .iter()
        .tuple_windows()
        .map(|(&from, &to)| cost_between(from, to, dm))
        .sum()
}

/// Running total at each position of `route`, starting with 0 at the first stop.
pub fn cumulative_costs(route: &[usize], dm: &CostMatrix) -> Option<Vec<u64>> {
    let mut running = 0;
    let mut costs = Vec::with_capacity(route.len());
    if !route.is_empty() {
        costs.push(0);
    }
    for (&from, &to) in route.iter().tuple_windows() {
        running += cost_between(from, to, dm)?;
        costs.push(running);
    }
    Some(costs)
}

pub fn cost_between(from_loc: usize, to_loc: usize, dm: &CostMatrix) -> Option<u64> {
    dm.arc(from_loc, to_loc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asymmetric() -> CostMatrix {
        CostMatrix::from_rows(vec![
            vec![0, 4, 9],
            vec![1, 0, 2],
            vec![8, 3, 0],
        ])
        .unwrap()
    }

    #[test]
    fn test_find_cost_follows_direction() {
        let dm = asymmetric();
        assert_eq!(find_cost(&[0, 1, 2], &dm), Some(6));
        assert_eq!(find_cost(&[2, 1, 0], &dm), Some(4));
    }

    #[test]
    fn test_find_cost_trivial_routes() {
        let dm = asymmetric();
        assert_eq!(find_cost(&[], &dm), Some(0));
        assert_eq!(find_cost(&[1], &dm), Some(0));
    }

    #[test]
    fn test_find_cost_missing_arc() {
        let dm = CostMatrix::from_sparse_rows(vec![
            vec![Some(0), None],
            vec![Some(1), Some(0)],
        ])
        .unwrap();
        assert_eq!(find_cost(&[0, 1], &dm), None);
        assert_eq!(find_cost(&[1, 0], &dm), Some(1));
    }

    #[test]
    fn test_cumulative_costs() {
        let dm = asymmetric();
        assert_eq!(cumulative_costs(&[0, 1, 2], &dm), Some(vec![0, 4, 6]));
        assert_eq!(cumulative_costs(&[], &dm), Some(vec![]));
    }
}
