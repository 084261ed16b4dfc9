use serde::{Deserialize, Serialize};

/// Opaque handle to an element, issued by the host document.
///
/// Handles are only meaningful to the document that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An element's box in page coordinates (not viewport coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> f64 {
        self.w.max(0.0) * self.h.max(0.0)
    }

    /// Fraction of this rect's area inside the viewport, in `[0, 1]`.
    ///
    /// Zero-area rects report 0 rather than dividing by zero.
    pub fn intersection_ratio(&self, viewport: &Viewport) -> f64 {
        let area = self.area();
        if area <= 0.0 {
            return 0.0;
        }
        let top = self.y.max(viewport.scroll_y);
        let bottom = (self.y + self.h).min(viewport.scroll_y + viewport.height);
        let left = self.x.max(0.0);
        let right = (self.x + self.w).min(viewport.width);
        let visible = (bottom - top).max(0.0) * (right - left).max(0.0);
        (visible / area).clamp(0.0, 1.0)
    }
}

/// The visible window onto the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Vertical page offset of the viewport's top edge.
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_y: f64, width: f64, height: f64) -> Self {
        Self {
            scroll_y,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fully_visible_rect() {
        let vp = Viewport::new(0.0, 1024.0, 768.0);
        let r = Rect::new(10.0, 100.0, 200.0, 50.0);
        assert_eq!(r.intersection_ratio(&vp), 1.0);
    }

    #[test]
    fn half_visible_rect() {
        let vp = Viewport::new(0.0, 1024.0, 768.0);
        // Straddles the bottom edge: 718..818
        let r = Rect::new(0.0, 718.0, 100.0, 100.0);
        assert!((r.intersection_ratio(&vp) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn below_the_fold_after_scrolling() {
        let r = Rect::new(0.0, 2000.0, 100.0, 100.0);
        assert_eq!(r.intersection_ratio(&Viewport::new(0.0, 1024.0, 768.0)), 0.0);
        assert_eq!(r.intersection_ratio(&Viewport::new(1500.0, 1024.0, 768.0)), 1.0);
    }

    #[test]
    fn zero_area_is_never_visible() {
        let vp = Viewport::new(0.0, 1024.0, 768.0);
        assert_eq!(Rect::new(0.0, 10.0, 0.0, 20.0).intersection_ratio(&vp), 0.0);
    }
}
