use serde::{Deserialize, Serialize};

use crate::catalog::FurnitureSpec;
use crate::containment::ContainmentStrategy;
use crate::geometry::{bounding_box, Point};
use crate::scale::Scale;

// Fixed clearance between neighbouring items within a row, mm.
const ITEM_GAP_MM: f64 = 50.0;
// Horizontal search step when nothing fits at the cursor, mm.
const SEARCH_STEP_MM: f64 = 50.0;
// Row advance when an entire row stays empty, mm.
const EMPTY_ROW_STEP_MM: f64 = 100.0;

/// One furniture instance produced by the sweep. Position is the
/// top-left corner of the table footprint in pixels; rotation is
/// always 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub furniture_id: String,
}

/// Errors the placement engine can report before entering the sweep.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceError {
    /// Scale factor was zero, negative or non-finite. With a
    /// degenerate scale every converted gap collapses and the sweep
    /// cursors stop advancing, so this is rejected up front.
    InvalidScale(f64),
}

impl std::fmt::Display for PlaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaceError::InvalidScale(value) => {
                write!(f, "invalid scale factor: {} px/mm", value)
            }
        }
    }
}

impl std::error::Error for PlaceError {}

/// Supplier of identifiers for placed items. Injected so the engine
/// stays deterministic under test while production uses random ids.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Deterministic id source: `item-0`, `item-1`, ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: usize,
}

impl SequentialIds {
    pub fn new() -> Self {
        SequentialIds { next: 0 }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("item-{}", self.next);
        self.next += 1;
        id
    }
}

/// Fill the room polygon with furniture via a greedy row-major sweep.
///
/// Rows advance from the top of the room's bounding box, each row
/// starting one aisle gap in from the left edge. At every cursor
/// position the enabled catalog entries are tried in catalog order and
/// the first admissible footprint wins (catalog order is the caller's
/// priority knob). The footprint of an entry is its table width by
/// table depth plus the chair row. Items are returned in generation
/// order, row by row.
///
/// A main polygon with fewer than 3 points yields an empty result; a
/// room too small for the gap and the smallest footprint legitimately
/// yields an empty result as well.
pub fn place(
    main_polygon: &[Point],
    holes: &[Vec<Point>],
    scale_px_per_mm: f64,
    catalog: &[FurnitureSpec],
    aisle_gap_mm: f64,
    containment: &dyn ContainmentStrategy,
    ids: &mut dyn IdSource,
) -> Result<Vec<PlacedItem>, PlaceError> {
    let scale = Scale::new(scale_px_per_mm)
        .ok_or(PlaceError::InvalidScale(scale_px_per_mm))?;

    if main_polygon.len() < 3 {
        return Ok(Vec::new());
    }

    let [min_x, min_y, max_x, max_y] = bounding_box(main_polygon);

    let gap_px = scale.to_pixels(aisle_gap_mm);
    let item_gap_px = scale.to_pixels(ITEM_GAP_MM);
    let search_step_px = scale.to_pixels(SEARCH_STEP_MM);
    let empty_row_step_px = scale.to_pixels(EMPTY_ROW_STEP_MM);

    let mut placed = Vec::new();

    let mut cursor_y = min_y + gap_px;
    while cursor_y < max_y {
        let mut cursor_x = min_x + gap_px;
        let mut row_height = 0.0_f64;

        while cursor_x < max_x {
            let mut emitted = false;

            for spec in catalog.iter().filter(|s| s.enabled) {
                let w = scale.to_pixels(spec.width_mm);
                let total_h = scale.to_pixels(spec.footprint_depth_mm());

                if containment.rect_admissible(
                    cursor_x, cursor_y, w, total_h, main_polygon, holes,
                ) {
                    placed.push(PlacedItem {
                        id: ids.next_id(),
                        x: cursor_x,
                        y: cursor_y,
                        rotation: 0.0,
                        furniture_id: spec.id.clone(),
                    });
                    cursor_x += w + item_gap_px;
                    row_height = row_height.max(total_h);
                    emitted = true;
                    break;
                }
            }

            if !emitted {
                cursor_x += search_step_px;
            }
        }

        if row_height > 0.0 {
            cursor_y += row_height + gap_px;
        } else {
            cursor_y += empty_row_step_px;
        }
    }

    Ok(placed)
}
