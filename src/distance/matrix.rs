use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::domain::types::{CostMatrix, CostMeasure};
use crate::error::{PlannerError, Result};

use super::providers::{DistanceMatrixResponse, DistanceOracle, Element, MatrixRequest};

const STATUS_OK: &str = "OK";

/// The three scalars the oracle reports for one origin/destination pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TravelElement {
    pub duration: Option<u64>,
    pub duration_in_traffic: Option<u64>,
    pub distance: Option<u64>,
}

impl TravelElement {
    pub fn measure(&self, measure: CostMeasure) -> Option<u64> {
        match measure {
            CostMeasure::Duration => self.duration,
            CostMeasure::DurationInTraffic => self.duration_in_traffic,
            CostMeasure::Distance => self.distance,
        }
    }
}

impl From<&Element> for TravelElement {
    fn from(element: &Element) -> Self {
        Self {
            duration: element.duration.as_ref().map(|m| m.value),
            duration_in_traffic: element.duration_in_traffic.as_ref().map(|m| m.value),
            distance: element.distance.as_ref().map(|m| m.value),
        }
    }
}

/// Every measure of a validated oracle response, in input stop order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelMatrices {
    pub origin_addresses: Vec<String>,
    pub destination_addresses: Vec<String>,
    pub elements: Vec<Vec<TravelElement>>,
}

impl TravelMatrices {
    /// Validates an N×N response. Any failed status or missing row/element is an error.
    pub fn from_response(response: DistanceMatrixResponse, n: usize) -> Result<Self> {
        if response.status != STATUS_OK {
            let detail = response.error_message.unwrap_or_default();
            error!("Distance Matrix status {}: {}", response.status, detail);
            return Err(PlannerError::UpstreamData(format!(
                "response status {} {}",
                response.status, detail
            )));
        }
        if response.rows.len() != n {
            return Err(PlannerError::UpstreamData(format!(
                "expected {} rows, got {}",
                n,
                response.rows.len()
            )));
        }

        let mut elements = Vec::with_capacity(n);
        for (i, row) in response.rows.iter().enumerate() {
            if row.elements.len() != n {
                return Err(PlannerError::UpstreamData(format!(
                    "row {} has {} elements, expected {}",
                    i,
                    row.elements.len(),
                    n
                )));
            }
            if let Some((j, bad)) = row
                .elements
                .iter()
                .enumerate()
                .find(|(_, e)| e.status != STATUS_OK)
            {
                warn!("Element ({}, {}) has status {}", i, j, bad.status);
                return Err(PlannerError::UpstreamData(format!(
                    "element ({}, {}) has status {}",
                    i, j, bad.status
                )));
            }
            elements.push(row.elements.iter().map(TravelElement::from).collect());
        }

        Ok(Self {
            origin_addresses: response.origin_addresses,
            destination_addresses: response.destination_addresses,
            elements,
        })
    }

    pub fn size(&self) -> usize {
        self.elements.len()
    }

    /// Reduces to one measure. A missing value off the diagonal is an error;
    /// the diagonal is always 0.
    pub fn cost_matrix(&self, measure: CostMeasure) -> Result<CostMatrix> {
        let mut rows = Vec::with_capacity(self.size());
        for (i, row) in self.elements.iter().enumerate() {
            let mut costs = Vec::with_capacity(row.len());
            for (j, element) in row.iter().enumerate() {
                let cost = match element.measure(measure) {
                    Some(value) if i != j => value,
                    _ if i == j => 0,
                    _ => {
                        return Err(PlannerError::UpstreamData(format!(
                            "element ({i}, {j}) has no {measure}"
                        )))
                    }
                };
                costs.push(cost);
            }
            rows.push(costs);
        }
        CostMatrix::from_rows(rows)
    }
}

/// Rejects departure times that are not strictly after `now`.
pub fn validate_departure_time(departure: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
    if departure <= now {
        return Err(PlannerError::InvalidDepartureTime { departure, now });
    }
    Ok(())
}

/// Queries the oracle once for all stop pairs and keeps every measure.
pub async fn fetch_travel_matrices<O: DistanceOracle>(
    oracle: &O,
    stops: &[String],
    departure_time: DateTime<Utc>,
) -> Result<TravelMatrices> {
    if stops.is_empty() {
        return Err(PlannerError::InvalidProblem("stop list is empty".to_string()));
    }
    validate_departure_time(departure_time, Utc::now())?;

    let request = MatrixRequest::square(stops, departure_time);
    let response = oracle.query(&request).await?;
    let matrices = TravelMatrices::from_response(response, stops.len())?;

    info!(
        "Retrieved {}x{} travel matrix departing {}",
        matrices.size(),
        matrices.size(),
        departure_time
    );
    Ok(matrices)
}

/// One oracle query reduced to the cost matrix of `cost_measure`.
pub async fn build_cost_matrix<O: DistanceOracle>(
    oracle: &O,
    stops: &[String],
    departure_time: DateTime<Utc>,
    cost_measure: CostMeasure,
) -> Result<CostMatrix> {
    fetch_travel_matrices(oracle, stops, departure_time)
        .await?
        .cost_matrix(cost_measure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::providers::{Measure, Row};
    use chrono::Duration;

    fn element(status: &str, secs: u64, traffic: Option<u64>, meters: u64) -> Element {
        Element {
            status: status.to_string(),
            duration: Some(Measure {
                value: secs,
                text: String::new(),
            }),
            duration_in_traffic: traffic.map(|value| Measure {
                value,
                text: String::new(),
            }),
            distance: Some(Measure {
                value: meters,
                text: String::new(),
            }),
        }
    }

    fn response(rows: Vec<Vec<Element>>) -> DistanceMatrixResponse {
        DistanceMatrixResponse {
            status: "OK".to_string(),
            error_message: None,
            origin_addresses: vec![],
            destination_addresses: vec![],
            rows: rows.into_iter().map(|elements| Row { elements }).collect(),
        }
    }

    fn two_by_two() -> DistanceMatrixResponse {
        response(vec![
            vec![element("OK", 0, Some(0), 0), element("OK", 100, Some(130), 900)],
            vec![element("OK", 120, Some(150), 950), element("OK", 0, Some(0), 0)],
        ])
    }

    #[test]
    fn test_selects_measure_in_order() {
        let tm = TravelMatrices::from_response(two_by_two(), 2).unwrap();
        let traffic = tm.cost_matrix(CostMeasure::DurationInTraffic).unwrap();
        assert_eq!(traffic.arc(0, 1), Some(130));
        assert_eq!(traffic.arc(1, 0), Some(150));
        let plain = tm.cost_matrix(CostMeasure::Duration).unwrap();
        assert_eq!(plain.arc(0, 1), Some(100));
        let dist = tm.cost_matrix(CostMeasure::Distance).unwrap();
        assert_eq!(dist.arc(1, 0), Some(950));
    }

    #[test]
    fn test_failed_element_rejected() {
        let mut resp = two_by_two();
        resp.rows[1].elements[0].status = "ZERO_RESULTS".to_string();
        let err = TravelMatrices::from_response(resp, 2).unwrap_err();
        assert!(matches!(err, PlannerError::UpstreamData(_)));
    }

    #[test]
    fn test_missing_row_rejected() {
        let mut resp = two_by_two();
        resp.rows.pop();
        assert!(TravelMatrices::from_response(resp, 2).is_err());
    }

    #[test]
    fn test_short_row_rejected() {
        let mut resp = two_by_two();
        resp.rows[0].elements.pop();
        assert!(TravelMatrices::from_response(resp, 2).is_err());
    }

    #[test]
    fn test_top_level_status_rejected() {
        let mut resp = two_by_two();
        resp.status = "MAX_ELEMENTS_EXCEEDED".to_string();
        let err = TravelMatrices::from_response(resp, 2).unwrap_err();
        assert!(err.to_string().contains("MAX_ELEMENTS_EXCEEDED"));
    }

    #[test]
    fn test_missing_traffic_measure_rejected_off_diagonal() {
        let resp = response(vec![
            vec![element("OK", 0, None, 0), element("OK", 100, None, 900)],
            vec![element("OK", 120, Some(150), 950), element("OK", 0, None, 0)],
        ]);
        let tm = TravelMatrices::from_response(resp, 2).unwrap();
        assert!(tm.cost_matrix(CostMeasure::DurationInTraffic).is_err());
        // durations are all there
        assert!(tm.cost_matrix(CostMeasure::Duration).is_ok());
    }

    #[test]
    fn test_missing_measure_on_diagonal_is_zero() {
        let resp = response(vec![
            vec![element("OK", 0, None, 0), element("OK", 100, Some(110), 900)],
            vec![element("OK", 120, Some(150), 950), element("OK", 0, None, 0)],
        ]);
        let tm = TravelMatrices::from_response(resp, 2).unwrap();
        let dm = tm.cost_matrix(CostMeasure::DurationInTraffic).unwrap();
        assert_eq!(dm.arc(0, 0), Some(0));
        assert_eq!(dm.arc(0, 1), Some(110));
    }

    #[test]
    fn test_departure_time_must_be_future() {
        let now = Utc::now();
        assert!(validate_departure_time(now + Duration::minutes(5), now).is_ok());
        assert!(matches!(
            validate_departure_time(now, now),
            Err(PlannerError::InvalidDepartureTime { .. })
        ));
        assert!(validate_departure_time(now - Duration::hours(1), now).is_err());
    }
}
