use std::sync::atomic::{AtomicUsize, Ordering};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::distance::providers::{
    DistanceMatrixResponse, DistanceOracle, Element, MatrixRequest, Measure, Row,
};
use crate::domain::types::CostMatrix;
use crate::error::Result;

/// Seeded asymmetric travel times in seconds, zero on the diagonal.
///
/// Each direction gets its own traffic skew so `cost[i][j] != cost[j][i]`
/// in general.
pub fn random_cost_rows(n: usize, seed: u64) -> Vec<Vec<u64>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let points: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.gen_range(0.0..20.0), rng.gen_range(0.0..20.0)))
        .collect();

    (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i == j {
                        return 0;
                    }
                    let (dx, dy) = (points[i].0 - points[j].0, points[i].1 - points[j].1);
                    // ~1 minute per km plus a per-direction traffic factor
                    let base = (dx * dx + dy * dy).sqrt() * 60.0;
                    let skew: f64 = rng.gen_range(0.8..1.6);
                    (base * skew).round() as u64 + 30
                })
                .collect()
        })
        .collect()
}

pub fn random_cost_matrix(n: usize, seed: u64) -> Result<CostMatrix> {
    CostMatrix::from_rows(random_cost_rows(n, seed))
}

/// Wraps per-pair seconds into an all-OK oracle response.
///
/// Durations without traffic are reported 20% lower, distances as 15 m per second.
pub fn oracle_response(
    addresses: &[String],
    traffic_seconds: &[Vec<u64>],
) -> DistanceMatrixResponse {
    let measure = |value: u64| Measure {
        value,
        text: String::new(),
    };
    DistanceMatrixResponse {
        status: "OK".to_string(),
        error_message: None,
        origin_addresses: addresses.to_vec(),
        destination_addresses: addresses.to_vec(),
        rows: traffic_seconds
            .iter()
            .map(|row| Row {
                elements: row
                    .iter()
                    .map(|&secs| Element {
                        status: "OK".to_string(),
                        duration: Some(measure(secs * 4 / 5)),
                        duration_in_traffic: Some(measure(secs)),
                        distance: Some(measure(secs * 15)),
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// In-memory oracle that hands back a fixed response and counts queries.
#[derive(Debug)]
pub struct StaticOracle {
    response: DistanceMatrixResponse,
    calls: AtomicUsize,
}

impl StaticOracle {
    pub fn new(response: DistanceMatrixResponse) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DistanceOracle for StaticOracle {
    async fn query(&self, request: &MatrixRequest) -> Result<DistanceMatrixResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!(
            "static oracle answering {} origins at {}",
            request.origins.len(),
            request.departure_time
        );
        Ok(self.response.clone())
    }
}
