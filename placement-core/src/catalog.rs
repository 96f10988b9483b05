use serde::{Deserialize, Serialize};

/// Depth of the chair row in front of each table, in millimetres.
/// Chairs render separately but count toward the collision footprint.
pub const CHAIR_DEPTH_MM: f64 = 600.0;

/// One immutable furniture catalog entry. The engine only reads these;
/// the caller owns the catalog and controls ordering (first-fit
/// priority) and per-entry enablement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureSpec {
    pub id: String,
    pub name: String,
    /// Table width in millimetres.
    pub width_mm: f64,
    /// Table depth in millimetres, excluding the chair row.
    pub depth_mm: f64,
    pub seats: u32,
    pub unit_price: f64,
    pub color: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl FurnitureSpec {
    /// Full collision footprint depth: table plus chair row.
    pub fn footprint_depth_mm(&self) -> f64 {
        self.depth_mm + CHAIR_DEPTH_MM
    }
}

/// Aisle-density pattern. Each level maps to a fixed clearance kept
/// around the room perimeter and between rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPattern {
    Tight,
    Standard,
    Generous,
}

impl LayoutPattern {
    pub const ALL: [LayoutPattern; 3] = [
        LayoutPattern::Tight,
        LayoutPattern::Standard,
        LayoutPattern::Generous,
    ];

    /// Aisle gap in millimetres for this density level.
    pub fn aisle_gap_mm(self) -> f64 {
        match self {
            LayoutPattern::Tight => 900.0,
            LayoutPattern::Standard => 1300.0,
            LayoutPattern::Generous => 1800.0,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LayoutPattern::Tight => "tight",
            LayoutPattern::Standard => "standard",
            LayoutPattern::Generous => "generous",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_widens_with_density_level() {
        assert!(LayoutPattern::Tight.aisle_gap_mm() < LayoutPattern::Standard.aisle_gap_mm());
        assert!(LayoutPattern::Standard.aisle_gap_mm() < LayoutPattern::Generous.aisle_gap_mm());
    }

    #[test]
    fn test_enabled_defaults_to_true() {
        let spec: FurnitureSpec = serde_json::from_str(
            r##"{
                "id": "seminar-1200",
                "name": "Seminar Table 1200",
                "width_mm": 1200.0,
                "depth_mm": 450.0,
                "seats": 3,
                "unit_price": 18.5,
                "color": "#4f7fae"
            }"##,
        )
        .unwrap();

        assert!(spec.enabled);
        assert!((spec.footprint_depth_mm() - 1050.0).abs() < 1e-9);
    }
}
