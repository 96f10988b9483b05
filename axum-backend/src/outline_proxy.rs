use anyhow::{Context, Result};
use axum::{extract::Json, http::StatusCode};
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use placement_core::Point;

use crate::ErrorResponse;

// Vision services propose outlines on this fixed grid, top-left origin.
const NORMALIZED_GRID: f64 = 1000.0;

#[derive(Debug, Deserialize)]
pub struct ProposeOutlineRequest {
    /// Base64-encoded floor-plan raster.
    image: String,
    /// Pixel dimensions of the image as shown in the editor.
    width_px: f64,
    height_px: f64,
}

/// Shape returned by the outline-acquisition service, still on the
/// normalized grid.
#[derive(Debug, Deserialize)]
struct UpstreamOutline {
    points: Vec<Point>,
    #[serde(default)]
    scale_segment: Option<UpstreamScaleSegment>,
}

/// Optional reference segment of known physical length, used to seed
/// the editor's scale calibration.
#[derive(Debug, Deserialize)]
struct UpstreamScaleSegment {
    a: Point,
    b: Point,
    length_mm: f64,
}

#[derive(Debug, Serialize)]
pub struct ProposeOutlineResponse {
    /// Proposed room outline, rescaled into pixel space.
    points: Vec<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scale_px_per_mm: Option<f64>,
}

/// Forward a floor-plan image to the external outline-acquisition
/// service and rescale its 0-1000 normalized proposal into pixel
/// space. Downstream consumers (snap, layout) only ever see pixels.
pub async fn propose_outline_handler(
    Json(request): Json<ProposeOutlineRequest>,
) -> Result<Json<ProposeOutlineResponse>, (StatusCode, Json<ErrorResponse>)> {
    let engine = base64::engine::general_purpose::STANDARD;
    let img_bytes = engine.decode(&request.image).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "INVALID_BASE64".to_string(),
                message: format!("Failed to decode base64 image: {}", e),
            }),
        )
    })?;

    if !request.width_px.is_finite()
        || !request.height_px.is_finite()
        || request.width_px <= 0.0
        || request.height_px <= 0.0
    {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "INVALID_DIMENSIONS".to_string(),
                message: "Image dimensions must be positive finite pixel sizes".to_string(),
            }),
        ));
    }

    info!("Outline proposal requested, image size: {} bytes", img_bytes.len());

    let api_url = std::env::var("OUTLINE_API_URL").map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "NOT_CONFIGURED".to_string(),
                message: "OUTLINE_API_URL not configured".to_string(),
            }),
        )
    })?;

    let upstream = request_outline(&api_url, &request.image).await.map_err(|e| {
        warn!("Outline service call failed: {:#}", e);
        (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: "OUTLINE_SERVICE_FAILED".to_string(),
                message: format!("{:#}", e),
            }),
        )
    })?;

    info!(
        "Outline service proposed {} points (scale segment: {})",
        upstream.points.len(),
        upstream.scale_segment.is_some()
    );

    let points = rescale_points(&upstream.points, request.width_px, request.height_px);
    let scale_px_per_mm = upstream
        .scale_segment
        .and_then(|seg| derive_scale(&seg, request.width_px, request.height_px));

    Ok(Json(ProposeOutlineResponse {
        points,
        scale_px_per_mm,
    }))
}

async fn request_outline(api_url: &str, image_base64: &str) -> Result<UpstreamOutline> {
    let client = reqwest::Client::new();

    let mut req = client
        .post(api_url)
        .json(&serde_json::json!({ "image": image_base64 }));
    if let Ok(key) = std::env::var("OUTLINE_API_KEY") {
        req = req.header("Authorization", format!("Bearer {}", key));
    }

    let response = req
        .send()
        .await
        .context("outline service request failed")?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("outline service returned status {}", status);
    }

    response
        .json::<UpstreamOutline>()
        .await
        .context("failed to decode outline service response")
}

/// Map points from the 0-1000 normalized grid onto the image's pixel
/// dimensions.
fn rescale_points(points: &[Point], width_px: f64, height_px: f64) -> Vec<Point> {
    let sx = width_px / NORMALIZED_GRID;
    let sy = height_px / NORMALIZED_GRID;

    points
        .iter()
        .map(|p| Point::new(p.x * sx, p.y * sy))
        .collect()
}

/// Turn the reference segment into a px/mm factor, once its endpoints
/// are in pixel space. Degenerate segments yield no scale.
fn derive_scale(segment: &UpstreamScaleSegment, width_px: f64, height_px: f64) -> Option<f64> {
    if !segment.length_mm.is_finite() || segment.length_mm <= 0.0 {
        return None;
    }

    let endpoints = rescale_points(&[segment.a, segment.b], width_px, height_px);
    let len_px = endpoints[0].distance_to(&endpoints[1]);
    if len_px > 0.0 {
        Some(len_px / segment.length_mm)
    } else {
        None
    }
}
