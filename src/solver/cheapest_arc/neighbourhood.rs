use tracing::{debug, trace};

use crate::config::constant::MAX_RELOCATE_SEGMENT;
use crate::domain::types::{Route, RouteProblem};
use crate::utils::Deadline;

/// A change to the interior of a route (positions `1..n-1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Reverse `route[i..=j]`. With `j == i + 1` this swaps two neighbours.
    Reverse { i: usize, j: usize },
    /// Move `route[i..i + len]` so it follows the stop currently at `after`.
    Relocate { i: usize, len: usize, after: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImprovementOutcome {
    pub moves_applied: usize,
    pub interrupted: bool,
}

/// Cost change from reversing `r[i..=j]`, or `None` if the reversed path needs a missing arc.
///
/// The matrix is asymmetric, so the inner arcs are re-priced in the opposite direction.
pub fn reversal_delta(r: &[usize], i: usize, j: usize, problem: &RouteProblem) -> Option<i64> {
    let arc = |a: usize, b: usize| problem.arc_cost(a, b);

    let mut old = arc(r[i - 1], r[i])? + arc(r[j], r[j + 1])?;
    let mut new = arc(r[i - 1], r[j])? + arc(r[i], r[j + 1])?;
    for k in i..j {
        old += arc(r[k], r[k + 1])?;
        new += arc(r[k + 1], r[k])?;
    }
    Some(new as i64 - old as i64)
}

/// Cost change from relocating `r[i..i + len]` between `r[after]` and `r[after + 1]`.
pub fn relocation_delta(
    r: &[usize],
    i: usize,
    len: usize,
    after: usize,
    problem: &RouteProblem,
) -> Option<i64> {
    let arc = |a: usize, b: usize| problem.arc_cost(a, b);
    let (first, last) = (r[i], r[i + len - 1]);
    let (prev, next) = (r[i - 1], r[i + len]);
    let (a, b) = (r[after], r[after + 1]);

    let removed = arc(prev, first)? + arc(last, next)? + arc(a, b)?;
    let added = arc(prev, next)? + arc(a, first)? + arc(last, b)?;
    Some(added as i64 - removed as i64)
}

fn apply_move(route: &mut Vec<usize>, mv: Move) {
    match mv {
        Move::Reverse { i, j } => route[i..=j].reverse(),
        Move::Relocate { i, len, after } => {
            let segment: Vec<usize> = route.drain(i..i + len).collect();
            let at = if after < i { after + 1 } else { after + 1 - len };
            route.splice(at..at, segment);
        }
    }
}

/// First strictly improving move in a fixed scan order: reversals by `(i, j)`,
/// then relocations by `(len, i, after)`.
fn first_improving_move(r: &[usize], problem: &RouteProblem) -> Option<(Move, i64)> {
    let n = r.len();
    if n < 4 {
        return None;
    }
    let last_interior = n - 2;

    for i in 1..last_interior {
        for j in (i + 1)..=last_interior {
            if let Some(delta) = reversal_delta(r, i, j, problem) {
                if delta < 0 {
                    return Some((Move::Reverse { i, j }, delta));
                }
            }
        }
    }

    for len in 1..=MAX_RELOCATE_SEGMENT.min(last_interior - 1) {
        for i in 1..=(last_interior + 1 - len) {
            // insertion points outside the segment and its left boundary
            let positions = (0..i - 1).chain((i + len)..=last_interior);
            for after in positions {
                if let Some(delta) = relocation_delta(r, i, len, after, problem) {
                    if delta < 0 {
                        return Some((Move::Relocate { i, len, after }, delta));
                    }
                }
            }
        }
    }

    None
}

/// First-improvement local search over the route interior.
///
/// Endpoints never move and every applied move strictly lowers the cost, so
/// the search ends at a local optimum unless the deadline stops it first. The
/// route is complete after every move.
pub fn improve_route(
    route: &mut Route,
    problem: &RouteProblem,
    deadline: &Deadline,
) -> ImprovementOutcome {
    let mut outcome = ImprovementOutcome::default();

    loop {
        if deadline.expired() {
            debug!(
                "time budget reached after {} improving moves",
                outcome.moves_applied
            );
            outcome.interrupted = true;
            break;
        }

        let Some((mv, delta)) = first_improving_move(&route.route, problem) else {
            break;
        };

        apply_move(&mut route.route, mv);
        route.cost = (route.cost as i64 + delta) as u64;
        outcome.moves_applied += 1;
        trace!("applied {:?} (delta {}), cost now {}", mv, delta, route.cost);
    }

    outcome
}
