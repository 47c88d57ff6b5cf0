//! HTTP request handlers for the heatmap API.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use plume_common::{BoundingBox, HeatmapError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, instrument};

use crate::pipeline;
use crate::state::AppState;

/// Body of `POST /api/predict`.
///
/// Unknown fields (legacy clients send the map center as `lat`/`lon`)
/// are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    /// Day to pull catalog detections for, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Corner pairs `[[minLat,minLon],[maxLat,maxLon]]`. Defaults to the
    /// full Earth extent.
    pub bounds: Option<[[f64; 2]; 2]>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Inline `data:image/png;base64,...` overlay.
    pub heatmap_image: String,
    /// The bounds the overlay was rendered against, in corner order.
    pub bounds: [[f64; 2]; 2],
    /// `"model"` or `"passthrough"`.
    pub source: &'static str,
}

#[instrument(skip(state, request))]
pub async fn predict_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Response {
    let bounds = match request.bounds {
        Some(corners) => match BoundingBox::from_corners(corners) {
            Ok(bounds) => bounds,
            Err(err) => return error_response(&err.into()),
        },
        None => BoundingBox::global(),
    };

    let date = match parse_date(request.date.as_deref()) {
        Ok(date) => date,
        Err(err) => return error_response(&err),
    };

    let records = match state.catalog.fetch_plumes(date).await {
        Ok(records) => records,
        Err(err) => return error_response(&HeatmapError::CatalogUnavailable(err.to_string())),
    };

    match pipeline::predict(&records, bounds, state.shape, &state.engine, &state.palette) {
        Ok(prediction) => {
            info!(
                records = records.len(),
                source = prediction.source.as_str(),
                "Prediction served"
            );
            Json(PredictResponse {
                heatmap_image: prediction.image.data_uri,
                bounds: prediction.image.bounds.corners(),
                source: prediction.source.as_str(),
            })
            .into_response()
        }
        Err(err) => error_response(&err),
    }
}

#[derive(Debug, Deserialize)]
pub struct PlumesParams {
    pub date: Option<String>,
}

/// `GET /api/plumes`: expose the catalog's raw features to map clients.
#[instrument(skip(state))]
pub async fn plumes_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<PlumesParams>,
) -> Response {
    let date = match parse_date(params.date.as_deref()) {
        Ok(date) => date,
        Err(err) => return error_response(&err),
    };

    match state.catalog.fetch_plumes(date).await {
        Ok(features) => Json(json!({ "features": features })).into_response(),
        Err(err) => error_response(&HeatmapError::CatalogUnavailable(err.to_string())),
    }
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn ready_handler() -> impl IntoResponse {
    Json(json!({ "status": "ready" }))
}

pub async fn metrics_handler(Extension(handle): Extension<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}

fn parse_date(date: Option<&str>) -> Result<Option<NaiveDate>, HeatmapError> {
    let Some(date) = date else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| HeatmapError::InvalidParameter {
            param: "date".to_string(),
            message: format!("'{date}' is not a YYYY-MM-DD date"),
        })
}

/// Serialize an error as a tagged JSON failure with its HTTP status.
fn error_response(err: &HeatmapError) -> Response {
    error!(error = %err, "Request failed");
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({ "status": "error", "message": err.to_string() })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_request_tolerates_legacy_fields() {
        let request: PredictRequest = serde_json::from_str(
            r#"{"date": "2023-06-01", "lat": 36.5, "lon": -119.5}"#,
        )
        .unwrap();
        assert_eq!(request.date.as_deref(), Some("2023-06-01"));
        assert!(request.bounds.is_none());
    }

    #[test]
    fn test_predict_request_with_bounds() {
        let request: PredictRequest = serde_json::from_str(
            r#"{"bounds": [[32.0, -120.0], [42.0, -114.0]]}"#,
        )
        .unwrap();
        assert_eq!(request.bounds, Some([[32.0, -120.0], [42.0, -114.0]]));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(None).unwrap(), None);
        assert_eq!(
            parse_date(Some("2023-06-01")).unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 1)
        );
        assert!(parse_date(Some("June 1st")).is_err());
        assert!(parse_date(Some("2023-13-01")).is_err());
    }

    #[test]
    fn test_predict_response_shape() {
        let response = PredictResponse {
            heatmap_image: "data:image/png;base64,AAAA".to_string(),
            bounds: [[-90.0, -180.0], [90.0, 180.0]],
            source: "passthrough",
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["bounds"][0][0], -90.0);
        assert_eq!(value["bounds"][1][1], 180.0);
        assert_eq!(value["source"], "passthrough");
        assert!(value["heatmap_image"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,"));
    }
}
