use axum::{extract::Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::info;

use placement_core::{snap_rectilinear, Point};

use crate::{validate_outline, ErrorResponse};

fn default_snap_threshold() -> f64 {
    15.0
}

#[derive(Debug, Deserialize)]
pub struct SnapRequest {
    points: Vec<Point>,
    #[serde(default = "default_snap_threshold")]
    threshold: f64,
}

#[derive(Debug, Serialize)]
pub struct SnapResponse {
    points: Vec<Point>,
}

/// Snap a hand-drawn outline onto shared axis lines. Inputs below 3
/// points come back unchanged.
pub async fn snap_outline_handler(
    Json(request): Json<SnapRequest>,
) -> Result<Json<SnapResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!(
        "Received snap request with {} points, threshold {}",
        request.points.len(),
        request.threshold
    );

    validate_outline("points", &request.points)?;

    if !request.threshold.is_finite() || request.threshold < 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "INVALID_THRESHOLD".to_string(),
                message: "Snap threshold must be a non-negative finite number".to_string(),
            }),
        ));
    }

    let points = snap_rectilinear(&request.points, request.threshold);

    Ok(Json(SnapResponse { points }))
}
