use glam::{DVec2, DVec3};

/// Maps raw world coordinates (large UTM values) into render space.
pub trait CoordinateTransform {
    /// Forward transform when `inverse` is false, render space back to world
    /// space otherwise. Returns None while the transform is not initialized.
    fn apply_offset(&self, point: DVec3, inverse: bool) -> Option<DVec3>;

    fn is_initialized(&self) -> bool;
}

/// Fixed planar offset, captured once from the first known vehicle
/// position so render-space values stay small enough for f32.
#[derive(Debug, Clone, Copy, Default)]
pub struct Coordinates {
    offset: Option<DVec2>,
}

impl Coordinates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(offset: DVec2) -> Self {
        Self {
            offset: Some(offset),
        }
    }

    /// Set the offset unless one is already in place.
    pub fn initialize(&mut self, x: f64, y: f64) {
        if self.offset.is_none() {
            log::info!("Coordinate offset initialized at ({:.3}, {:.3})", x, y);
            self.offset = Some(DVec2::new(x, y));
        }
    }

    pub fn offset(&self) -> Option<DVec2> {
        self.offset
    }
}

impl CoordinateTransform for Coordinates {
    fn apply_offset(&self, point: DVec3, inverse: bool) -> Option<DVec3> {
        let offset = self.offset?.extend(0.0);
        Some(if inverse { point + offset } else { point - offset })
    }

    fn is_initialized(&self) -> bool {
        self.offset.is_some()
    }
}
