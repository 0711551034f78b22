//! HTTP geocoder for Google-compatible geocoding APIs
//!
//! Response parsing is a pure function so it can be tested without a
//! network.

use placebook_core::errors::{ExError, ExErrorKind, Result};
use placebook_core::geocode::Geocoder;
use placebook_core::model::Location;
use placebook_core_types::Sensitive;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

pub struct HttpGeocoder {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: Sensitive<String>,
}

impl HttpGeocoder {
    pub fn new(endpoint: impl Into<String>, api_key: Sensitive<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ExError::operation_failed("geocoder_init", e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }
}

impl Geocoder for HttpGeocoder {
    fn locate(&self, address: &str) -> Result<Location> {
        let body = self
            .client
            .get(&self.endpoint)
            .query(&[("address", address), ("key", self.api_key.expose().as_str())])
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| ExError::operation_failed("geocode", e.without_url().to_string()))?;

        parse_response(&body, address)
    }
}

/// Extract the first result's coordinate from a geocoding response body
pub fn parse_response(body: &str, address: &str) -> Result<Location> {
    let response: GeocodeResponse = serde_json::from_str(body)
        .map_err(|e| ExError::operation_failed("geocode", format!("bad response: {}", e)))?;

    match response.status.as_str() {
        "OK" | "ZERO_RESULTS" => {}
        other => {
            return Err(ExError::operation_failed(
                "geocode",
                format!("geocoder returned status {}", other),
            ))
        }
    }

    response
        .results
        .into_iter()
        .next()
        .map(|r| r.geometry.location)
        .ok_or_else(|| {
            ExError::new(ExErrorKind::NotFound)
                .with_op("geocode")
                .with_entity_id(address)
                .with_message("Could not find location for the specified address.")
        })
}
