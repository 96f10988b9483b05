use placement_core::FurnitureSpec;

/// Built-in catalog snapshot used when a request carries no furniture
/// list of its own. Order matters: it is the first-fit priority the
/// engine walks at every cursor position.
pub fn default_catalog() -> Vec<FurnitureSpec> {
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
        FurnitureSpec {
            id: "cafe-900".to_string(),
            name: "Cafe Table 900".to_string(),
            width_mm: 900.0,
            depth_mm: 900.0,
            seats: 4,
            unit_price: 14.0,
            color: "#5e8c61".to_string(),
            enabled: true,
        },
    ]
}
