use chrono::Utc;
use geo::{Area, Coord, LineString, Polygon as GeoPolygon};
use serde::Serialize;

use placement_core::{FurnitureSpec, PlacedItem, Point, Scale};

/// One priced row of the quote: every placed instance of a catalog
/// entry collapses into a single line item.
#[derive(Debug, Clone, Serialize)]
pub struct LineItem {
    pub furniture_id: String,
    pub name: String,
    pub quantity: usize,
    pub seats: u32,
    pub unit_price: f64,
    pub line_total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteSummary {
    pub line_items: Vec<LineItem>,
    pub total_price: f64,
    pub total_seats: u32,
    pub generated_at: String,
}

/// Aggregate placed items into a line-itemized quote. Line items keep
/// catalog order; entries that never got placed are omitted.
pub fn build_quote(items: &[PlacedItem], catalog: &[FurnitureSpec]) -> QuoteSummary {
    let mut line_items = Vec::new();
    let mut total_price = 0.0;
    let mut total_seats = 0;

    for spec in catalog {
        let quantity = items
            .iter()
            .filter(|item| item.furniture_id == spec.id)
            .count();
        if quantity == 0 {
            continue;
        }

        let line_total = spec.unit_price * quantity as f64;
        total_price += line_total;
        total_seats += spec.seats * quantity as u32;

        line_items.push(LineItem {
            furniture_id: spec.id.clone(),
            name: spec.name.clone(),
            quantity,
            seats: spec.seats,
            unit_price: spec.unit_price,
            line_total,
        });
    }

    QuoteSummary {
        line_items,
        total_price,
        total_seats,
        generated_at: Utc::now().to_rfc3339(),
    }
}

/// Polygon area in squared pixel units via geo's shoelace.
pub fn polygon_area_px2(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let coords: Vec<Coord> = points
        .iter()
        .map(|p| Coord { x: p.x, y: p.y })
        .collect();

    let line_string = LineString::from(coords);
    let polygon = GeoPolygon::new(line_string, vec![]);

    polygon.unsigned_area()
}

/// Usable room area in square metres: main outline minus exclusion
/// zones, converted out of pixel space through the scale factor.
pub fn room_area_m2(main_polygon: &[Point], holes: &[Vec<Point>], scale: Scale) -> f64 {
    let hole_area: f64 = holes.iter().map(|h| polygon_area_px2(h)).sum();
    let area_px2 = (polygon_area_px2(main_polygon) - hole_area).max(0.0);

    let px_per_mm = scale.px_per_mm();
    area_px2 / (px_per_mm * px_per_mm) / 1_000_000.0
}

/// Fraction of the usable room area covered by placed footprints
/// (table plus chair row).
pub fn utilization(
    items: &[PlacedItem],
    catalog: &[FurnitureSpec],
    room_area_m2: f64,
) -> f64 {
    if room_area_m2 <= 0.0 {
        return 0.0;
    }

    let footprint_mm2: f64 = items
        .iter()
        .filter_map(|item| catalog.iter().find(|spec| spec.id == item.furniture_id))
        .map(|spec| spec.width_mm * spec.footprint_depth_mm())
        .sum();

    (footprint_mm2 / 1_000_000.0) / room_area_m2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<FurnitureSpec> {
        vec![
            FurnitureSpec {
                id: "trestle-1800".to_string(),
                name: "Trestle Table 1800".to_string(),
                width_mm: 1800.0,
                depth_mm: 750.0,
                seats: 6,
                unit_price: 27.0,
                color: "#8a5a2b".to_string(),
                enabled: true,
            },
            FurnitureSpec {
                id: "seminar-1200".to_string(),
                name: "Seminar Table 1200".to_string(),
                width_mm: 1200.0,
                depth_mm: 450.0,
                seats: 3,
                unit_price: 18.5,
                color: "#4f7fae".to_string(),
                enabled: true,
            },
        ]
    }

    fn item(id: &str, furniture_id: &str) -> PlacedItem {
        PlacedItem {
            id: id.to_string(),
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            furniture_id: furniture_id.to_string(),
        }
    }

    #[test]
    fn test_quote_groups_by_catalog_entry() {
        let items = vec![
            item("a", "seminar-1200"),
            item("b", "trestle-1800"),
            item("c", "seminar-1200"),
        ];

        let quote = build_quote(&items, &specs());

        assert_eq!(quote.line_items.len(), 2);
        // catalog order, not placement order
        assert_eq!(quote.line_items[0].furniture_id, "trestle-1800");
        assert_eq!(quote.line_items[0].quantity, 1);
        assert_eq!(quote.line_items[1].quantity, 2);
        assert!((quote.total_price - (27.0 + 2.0 * 18.5)).abs() < 1e-9);
        assert_eq!(quote.total_seats, 12);
    }

    #[test]
    fn test_empty_placement_quotes_to_zero() {
        let quote = build_quote(&[], &specs());

        assert!(quote.line_items.is_empty());
        assert_eq!(quote.total_price, 0.0);
        assert_eq!(quote.total_seats, 0);
    }

    #[test]
    fn test_room_area_subtracts_holes() {
        let room = vec![
            Point::new(0.0, 0.0),
            Point::new(6000.0, 0.0),
            Point::new(6000.0, 6000.0),
            Point::new(0.0, 6000.0),
        ];
        let hole = vec![
            Point::new(0.0, 0.0),
            Point::new(1000.0, 0.0),
            Point::new(1000.0, 1000.0),
            Point::new(0.0, 1000.0),
        ];
        let scale = Scale::new(1.0).unwrap();

        assert!((room_area_m2(&room, &[], scale) - 36.0).abs() < 1e-9);
        assert!((room_area_m2(&room, &[hole], scale) - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_utilization_fraction() {
        let items = vec![item("a", "seminar-1200")];

        // one 1200 x 1050 mm footprint in a 12.6 m2 room
        let utilization = utilization(&items, &specs(), 12.6);

        assert!((utilization - 0.1).abs() < 1e-9);
    }
}
