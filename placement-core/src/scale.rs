use serde::{Deserialize, Serialize};

/// Pixels-per-millimetre conversion factor linking the editing
/// coordinate space to physical dimensions.
///
/// Millimetre and pixel quantities only ever meet through this type;
/// nothing else in the crate multiplies the two unit spaces together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scale(f64);

impl Scale {
    /// Returns `None` unless `px_per_mm` is finite and strictly
    /// positive. A zero or non-finite scale would make every
    /// conversion degenerate and the placement sweep non-terminating.
    pub fn new(px_per_mm: f64) -> Option<Self> {
        if px_per_mm.is_finite() && px_per_mm > 0.0 {
            Some(Scale(px_per_mm))
        } else {
            None
        }
    }

    pub fn px_per_mm(&self) -> f64 {
        self.0
    }

    pub fn to_pixels(&self, mm: f64) -> f64 {
        mm * self.0
    }

    pub fn to_millimeters(&self, px: f64) -> f64 {
        px / self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_scale_round_trips() {
        let scale = Scale::new(2.5).unwrap();

        assert!((scale.to_pixels(100.0) - 250.0).abs() < 1e-9);
        assert!((scale.to_millimeters(250.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_degenerate_factors() {
        assert!(Scale::new(0.0).is_none());
        assert!(Scale::new(-1.0).is_none());
        assert!(Scale::new(f64::NAN).is_none());
        assert!(Scale::new(f64::INFINITY).is_none());
    }
}
