use reqwest::Client;
use tracing::{debug, error, info, trace};

use crate::config::Config;
use crate::error::Result;

use super::{DistanceMatrixResponse, DistanceOracle, MatrixRequest, TrafficModel};

/// Google Maps Distance Matrix client.
#[derive(Debug, Clone)]
pub struct GoogleDistanceMatrix {
    client: Client,
    base_url: String,
    api_key: String,
    traffic_model: TrafficModel,
}

impl GoogleDistanceMatrix {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            traffic_model: config.traffic_model,
        })
    }

    fn query_params(&self, request: &MatrixRequest) -> Vec<(&'static str, String)> {
        vec![
            ("origins", request.origins.join("|")),
            ("destinations", request.destinations.join("|")),
            ("mode", request.mode.as_str().to_string()),
            ("traffic_model", self.traffic_model.as_str().to_string()),
            ("departure_time", request.departure_time.timestamp().to_string()),
            ("key", self.api_key.clone()),
        ]
    }
}

impl DistanceOracle for GoogleDistanceMatrix {
    async fn query(&self, request: &MatrixRequest) -> Result<DistanceMatrixResponse> {
        info!(
            "Sending GET request to Google Distance Matrix \
             ({} origins x {} destinations, departing {}, {} traffic)",
            request.origins.len(),
            request.destinations.len(),
            request.departure_time,
            self.traffic_model
        );
        trace!("Origins: {:?}", request.origins);

        let response = self
            .client
            .get(&self.base_url)
            .query(&self.query_params(request))
            .send()
            .await
            .map_err(|e| {
                error!("Distance Matrix request failed: {}", e);
                e
            })?;

        let status = response.status();
        debug!(
            "Received response: HTTP {} ({} bytes)",
            status,
            response.content_length().unwrap_or(0)
        );
        let response = response.error_for_status().map_err(|e| {
            error!(
                "Distance Matrix returned HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            );
            e
        })?;

        let body = response.json::<DistanceMatrixResponse>().await?;
        debug!(
            "Distance Matrix status {} with {} rows",
            body.status,
            body.rows.len()
        );
        Ok(body)
    }
}
