//! Layout boxes
//!
//! The tree never computes layout. Hosts that track pointer geometry hand
//! each box over through [`DomTree::set_rect`](crate::DomTree::set_rect).

/// Client rectangle of an element
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DomRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DomRect {
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Horizontal position of `x` across the box, clamped to `0..=1`
    pub fn fraction_x(&self, x: f64) -> Option<f64> {
        (self.width > 0.0).then(|| ((x - self.x) / self.width).clamp(0.0, 1.0))
    }

    /// Vertical position of `y` down the box, clamped to `0..=1`
    pub fn fraction_y(&self, y: f64) -> Option<f64> {
        (self.height > 0.0).then(|| ((y - self.y) / self.height).clamp(0.0, 1.0))
    }
}
