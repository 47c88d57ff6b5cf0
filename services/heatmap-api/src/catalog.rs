//! HTTP client for the external plume catalog.
//!
//! The catalog is a collaborator, not part of this service: it returns a
//! GeoJSON FeatureCollection of detected plumes with automated emission
//! estimates. Its failures surface as `CatalogUnavailable`, never as a
//! partial or empty grid.

use std::time::Duration;

use chrono::NaiveDate;
use plume_common::PlumeRecord;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog returned status {status}")]
    BadStatus { status: u16 },

    #[error("Catalog returned an unparseable body: {0}")]
    BadBody(#[from] serde_json::Error),
}

/// GeoJSON FeatureCollection envelope, reduced to what the pipeline
/// consumes.
#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<PlumeRecord>,
}

/// Client for the plume catalog API.
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a client for the catalog at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetch plume features, optionally filtered to a single day.
    #[instrument(skip(self))]
    pub async fn fetch_plumes(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<Vec<PlumeRecord>, CatalogError> {
        let url = format!("{}/plumes", self.base_url.trim_end_matches('/'));
        let mut request = self.client.get(&url);
        if let Some(date) = date {
            request = request.query(&[("date", date.format("%Y-%m-%d").to_string())]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::BadStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let records = parse_feature_collection(&body)?;
        debug!(count = records.len(), "Fetched plume features");
        Ok(records)
    }
}

/// Parse a FeatureCollection body into plume records.
///
/// Individual features with odd geometry still parse (the record type is
/// lenient); only a structurally broken body is an error.
pub fn parse_feature_collection(body: &str) -> Result<Vec<PlumeRecord>, serde_json::Error> {
    let collection: FeatureCollection = serde_json::from_str(body)?;
    Ok(collection.features)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feature_collection() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [-119.5, 36.5]},
                    "properties": {"emission_auto": 312.8, "plume_id": "CH4_a"}
                },
                {
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [-104.8]},
                    "properties": {"emission_auto": 45.0}
                }
            ]
        }"#;

        let records = parse_feature_collection(body).unwrap();
        assert_eq!(records.len(), 2);
        // First record is usable, second has truncated geometry and is
        // kept for the rasterizer to skip.
        assert!(records[0].observation().is_some());
        assert!(records[1].observation().is_none());
    }

    #[test]
    fn test_parse_empty_collection() {
        let records = parse_feature_collection(r#"{"type":"FeatureCollection","features":[]}"#)
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_rejects_broken_body() {
        assert!(parse_feature_collection("<html>gateway timeout</html>").is_err());
    }
}
