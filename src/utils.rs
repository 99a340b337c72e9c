use std::time::{Duration, Instant};

use tracing::debug;

use crate::domain::types::CostMatrix;

/// Optional wall-clock limit shared by the construction and improvement phases.
#[derive(Debug, Clone, Copy)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    pub fn after(budget: Option<Duration>) -> Self {
        Deadline(budget.map(|b| Instant::now() + b))
    }

    pub fn none() -> Self {
        Deadline(None)
    }

    pub fn expired(&self) -> bool {
        self.0.is_some_and(|d| Instant::now() >= d)
    }
}

/// Renders seconds as `1h 05m 03s`, dropping leading zero units.
pub fn format_seconds(total: u64) -> String {
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    match (h, m) {
        (0, 0) => format!("{s}s"),
        (0, _) => format!("{m}m {s:02}s"),
        _ => format!("{h}h {m:02}m {s:02}s"),
    }
}

// Print cost matrix for debugging
pub fn print_cost_matrix(dm: &CostMatrix) {
    debug!("Cost matrix ({}x{}):", dm.size(), dm.size());
    for row in dm.rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|c| c.map_or_else(|| "-".to_string(), |v| v.to_string()))
            .collect();
        debug!("[{}]", cells.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0), "0s");
        assert_eq!(format_seconds(59), "59s");
        assert_eq!(format_seconds(61), "1m 01s");
        assert_eq!(format_seconds(3903), "1h 05m 03s");
    }

    #[test]
    fn test_deadline() {
        assert!(!Deadline::none().expired());
        assert!(Deadline::after(Some(Duration::ZERO)).expired());
        assert!(!Deadline::after(Some(Duration::from_secs(3600))).expired());
    }
}
