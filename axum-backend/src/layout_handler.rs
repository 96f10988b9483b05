use axum::{extract::Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use placement_core::{
    bounding_box, place, FurnitureSpec, IdSource, LayoutPattern, PlaceError, PlacedItem,
    Point, SampledContainment, Scale,
};

use crate::catalog::default_catalog;
use crate::quote::{self, QuoteSummary};
use crate::{validate_outline, ErrorResponse, MAX_CATALOG_ENTRIES, MAX_HOLES};

// Ceiling on the estimated number of sweep cursor positions. The
// engine always terminates, but a huge room at a fine scale can make
// one request arbitrarily expensive; past this bound the request is
// refused rather than the sweep truncated.
const MAX_SWEEP_CELLS: f64 = 4_000_000.0;

// Worst-case cursor advances of the sweep, used for the cell estimate:
// a 50 mm search step per column, a 100 mm advance per empty row.
const MIN_COLUMN_STEP_MM: f64 = 50.0;
const MIN_ROW_STEP_MM: f64 = 100.0;

/// Random ids for production layouts; tests use the core's
/// sequential source.
struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

fn default_patterns() -> Vec<LayoutPattern> {
    LayoutPattern::ALL.to_vec()
}

#[derive(Debug, Deserialize)]
pub struct LayoutRequest {
    polygon: Vec<Point>,
    #[serde(default)]
    holes: Vec<Vec<Point>>,
    scale_px_per_mm: f64,
    #[serde(default = "default_patterns")]
    patterns: Vec<LayoutPattern>,
    /// Catalog snapshot for this request; falls back to the built-in
    /// catalog. Entry order is first-fit priority.
    #[serde(default)]
    furniture: Option<Vec<FurnitureSpec>>,
}

#[derive(Debug, Serialize)]
pub struct PatternLayout {
    pub pattern: LayoutPattern,
    pub aisle_gap_mm: f64,
    pub items: Vec<PlacedItem>,
    pub utilization: f64,
    pub quote: QuoteSummary,
}

#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    pub room_area_m2: f64,
    pub layouts: Vec<PatternLayout>,
}

/// Fill the room once per requested density pattern and price each
/// result. An empty item list is a valid outcome (the room may simply
/// be too small for the gap and the smallest footprint).
pub async fn generate_layout_handler(
    Json(request): Json<LayoutRequest>,
) -> Result<Json<LayoutResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!(
        "Received layout request: {} polygon points, {} holes, {} patterns",
        request.polygon.len(),
        request.holes.len(),
        request.patterns.len()
    );

    validate_outline("polygon", &request.polygon)?;

    if request.polygon.len() < 3 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "INVALID_POLYGON".to_string(),
                message: format!(
                    "Room polygon needs at least 3 points, got {}",
                    request.polygon.len()
                ),
            }),
        ));
    }

    if request.holes.len() > MAX_HOLES {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "INPUT_TOO_LARGE".to_string(),
                message: format!(
                    "Too many exclusion zones. Maximum allowed: {}. Received: {}",
                    MAX_HOLES,
                    request.holes.len()
                ),
            }),
        ));
    }
    for hole in &request.holes {
        validate_outline("hole", hole)?;
    }

    let scale = Scale::new(request.scale_px_per_mm).ok_or_else(|| {
        warn!("Rejected layout request with scale {}", request.scale_px_per_mm);
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "INVALID_SCALE".to_string(),
                message: format!(
                    "Scale must be a positive finite px/mm factor, got {}",
                    request.scale_px_per_mm
                ),
            }),
        )
    })?;

    let catalog = match request.furniture {
        Some(furniture) if !furniture.is_empty() => furniture,
        _ => default_catalog(),
    };
    if catalog.len() > MAX_CATALOG_ENTRIES {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "INPUT_TOO_LARGE".to_string(),
                message: format!(
                    "Too many catalog entries. Maximum allowed: {}. Received: {}",
                    MAX_CATALOG_ENTRIES,
                    catalog.len()
                ),
            }),
        ));
    }

    // Caller-side iteration bound: estimate the cursor grid from the
    // bounding box and the engine's minimum advances, refuse requests
    // that would sweep past the ceiling.
    let [min_x, min_y, max_x, max_y] = bounding_box(&request.polygon);
    let est_cells = ((max_x - min_x) / scale.to_pixels(MIN_COLUMN_STEP_MM)).max(0.0)
        * ((max_y - min_y) / scale.to_pixels(MIN_ROW_STEP_MM)).max(0.0);
    if est_cells > MAX_SWEEP_CELLS {
        warn!(
            "Rejected layout request sweeping ~{:.0} cells (limit {})",
            est_cells, MAX_SWEEP_CELLS
        );
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "COMPUTATION_TOO_LARGE".to_string(),
                message: "Room is too large for the configured scale".to_string(),
            }),
        ));
    }

    let room_area_m2 = quote::room_area_m2(&request.polygon, &request.holes, scale);

    let mut layouts = Vec::with_capacity(request.patterns.len());
    for pattern in &request.patterns {
        let items = place(
            &request.polygon,
            &request.holes,
            scale.px_per_mm(),
            &catalog,
            pattern.aisle_gap_mm(),
            &SampledContainment,
            &mut UuidIds,
        )
        .map_err(|err| match err {
            PlaceError::InvalidScale(value) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "INVALID_SCALE".to_string(),
                    message: format!("Scale must be a positive finite px/mm factor, got {}", value),
                }),
            ),
        })?;

        info!(
            "Placed {} items with {} pattern (gap {} mm)",
            items.len(),
            pattern.as_str(),
            pattern.aisle_gap_mm()
        );

        layouts.push(PatternLayout {
            pattern: *pattern,
            aisle_gap_mm: pattern.aisle_gap_mm(),
            utilization: quote::utilization(&items, &catalog, room_area_m2),
            quote: quote::build_quote(&items, &catalog),
            items,
        });
    }

    Ok(Json(LayoutResponse {
        room_area_m2,
        layouts,
    }))
}
