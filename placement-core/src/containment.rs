use crate::geometry::Point;

/// Horizontal ray-cast parity test. An edge counts as crossed when its
/// y-span strictly straddles the query height and its x-intersection
/// at that height lies to the right of the point; the point is inside
/// iff an odd number of edges cross.
///
/// Exact for simple polygons. A point exactly on an edge may land on
/// either side; callers must tolerate that ambiguity.
pub fn point_in_polygon(point: &Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (polygon[i].x, polygon[i].y);
        let (xj, yj) = (polygon[j].x, polygon[j].y);

        if ((yi > point.y) != (yj > point.y))
            && point.x < (xj - xi) * (point.y - yi) / (yj - yi) + xi
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Decides whether an axis-aligned rectangle is admissible: fully
/// inside the room boundary and clear of every exclusion zone.
///
/// A trait seam so the sampled approximation below can later be
/// replaced by exact polygon clipping without touching the engine.
pub trait ContainmentStrategy {
    fn rect_admissible(
        &self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        main_polygon: &[Point],
        holes: &[Vec<Point>],
    ) -> bool;
}

/// Five-point sampled admissibility: the rectangle's four corners and
/// its center must all be inside the main polygon and outside every
/// hole. A hole that clips a rectangle edge without covering any of
/// the five samples goes undetected; that imprecision is accepted for
/// interactive use.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampledContainment;

impl SampledContainment {
    fn sample_points(x: f64, y: f64, w: f64, h: f64) -> [Point; 5] {
        [
            Point::new(x, y),
            Point::new(x + w, y),
            Point::new(x, y + h),
            Point::new(x + w, y + h),
            Point::new(x + w / 2.0, y + h / 2.0),
        ]
    }
}

impl ContainmentStrategy for SampledContainment {
    fn rect_admissible(
        &self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        main_polygon: &[Point],
        holes: &[Vec<Point>],
    ) -> bool {
        let samples = Self::sample_points(x, y, w, h);

        for sample in &samples {
            if !point_in_polygon(sample, main_polygon) {
                return false;
            }
        }

        for hole in holes {
            for sample in &samples {
                if point_in_polygon(sample, hole) {
                    return false;
                }
            }
        }

        true
    }
}
