use serde::{Deserialize, Serialize};

use super::Point;

/// Where the y axis starts in a vendor's coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// y grows downwards (image convention, ZXing, ML Kit)
    #[default]
    TopLeft,
    /// y grows upwards (Core Graphics / Vision convention)
    BottomLeft,
}

/// Units of the bounds handed back to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSpace {
    /// Pixels of the source image or upright frame
    #[default]
    Pixels,
    /// Fractions of the source width/height, clamped to `[0, 1]`
    Normalized,
}

impl CoordinateSpace {
    /// Parse `"pixels"` / `"normalized"` (case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pixels" | "pixel" | "px" => Some(CoordinateSpace::Pixels),
            "normalized" | "normalised" | "relative" => Some(CoordinateSpace::Normalized),
            _ => None,
        }
    }
}

/// Axis-aligned rectangle with a top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Smallest x
    pub left: f32,
    /// Smallest y
    pub top: f32,
    /// Largest x
    pub right: f32,
    /// Largest y
    pub bottom: f32,
}

impl Rect {
    /// Rectangle from edge coordinates, reordering swapped edges
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    /// Tightest rectangle around a set of points
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut rect = Rect {
            left: first.x,
            top: first.y,
            right: first.x,
            bottom: first.y,
        };
        for p in &points[1..] {
            rect.left = rect.left.min(p.x);
            rect.top = rect.top.min(p.y);
            rect.right = rect.right.max(p.x);
            rect.bottom = rect.bottom.max(p.y);
        }
        Some(rect)
    }

    /// Rectangle from an origin and size.
    ///
    /// `extent_height` is the height of the coordinate space (1.0 for
    /// normalized input); it is only used to flip bottom-left origins.
    pub fn from_origin_size(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        origin: Origin,
        extent_height: f32,
    ) -> Self {
        let top = match origin {
            Origin::TopLeft => y,
            Origin::BottomLeft => extent_height - (y + height),
        };
        Rect::from_edges(x, top, x + width, top + height)
    }

    /// Width
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Multiply every coordinate
    pub fn scale(&self, sx: f32, sy: f32) -> Self {
        Rect::from_edges(
            self.left * sx,
            self.top * sy,
            self.right * sx,
            self.bottom * sy,
        )
    }

    /// Clamp into `[0, max_x] x [0, max_y]`
    pub fn clamp(&self, max_x: f32, max_y: f32) -> Self {
        Rect {
            left: self.left.clamp(0.0, max_x),
            top: self.top.clamp(0.0, max_y),
            right: self.right.clamp(0.0, max_x),
            bottom: self.bottom.clamp(0.0, max_y),
        }
    }
}

/// Bounding region reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Top edge
    pub top: f64,
    /// Bottom edge
    pub bottom: f64,
    /// Left edge
    pub left: f64,
    /// Right edge
    pub right: f64,
    /// `right - left`
    pub width: f64,
    /// `bottom - top`
    pub height: f64,
}

impl Bounds {
    /// Convert a top-left pixel rectangle measured in an image of
    /// `extent = (width, height)` pixels into caller bounds.
    pub fn from_rect(rect: &Rect, space: CoordinateSpace, extent: (u32, u32)) -> Self {
        let (w, h) = (extent.0.max(1) as f32, extent.1.max(1) as f32);
        let rect = match space {
            CoordinateSpace::Pixels => rect.clamp(w, h),
            CoordinateSpace::Normalized => rect.scale(1.0 / w, 1.0 / h).clamp(1.0, 1.0),
        };
        Bounds {
            top: f64::from(rect.top),
            bottom: f64::from(rect.bottom),
            left: f64::from(rect.left),
            right: f64::from(rect.right),
            width: f64::from(rect.right) - f64::from(rect.left),
            height: f64::from(rect.bottom) - f64::from(rect.top),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_points() {
        let rect = Rect::from_points(&[
            Point::new(10.0, 40.0),
            Point::new(50.0, 12.0),
            Point::new(30.0, 80.0),
        ])
        .unwrap();
        assert_eq!(rect, Rect::from_edges(10.0, 12.0, 50.0, 80.0));
        assert_eq!(rect.width(), 40.0);
        assert_eq!(rect.height(), 68.0);
        assert!(Rect::from_points(&[]).is_none());
    }

    #[test]
    fn test_origin_size_conventions_agree() {
        // Same box described top-left (pixels) and bottom-left (normalized).
        let top_left = Rect::from_origin_size(0.25, 0.1, 0.5, 0.2, Origin::TopLeft, 1.0);
        let bottom_left = Rect::from_origin_size(0.25, 0.7, 0.5, 0.2, Origin::BottomLeft, 1.0);
        assert!((top_left.top - bottom_left.top).abs() < 1e-6);
        assert!((top_left.bottom - bottom_left.bottom).abs() < 1e-6);
        assert_eq!(top_left.left, bottom_left.left);
    }

    #[test]
    fn test_normalized_bounds_are_clamped() {
        let rect = Rect::from_edges(-3.0, -1.0, 205.0, 101.0);
        let bounds = Bounds::from_rect(&rect, CoordinateSpace::Normalized, (200, 100));
        assert_eq!(bounds.left, 0.0);
        assert_eq!(bounds.top, 0.0);
        assert_eq!(bounds.right, 1.0);
        assert_eq!(bounds.bottom, 1.0);
        assert_eq!(bounds.width, 1.0);
    }

    #[test]
    fn test_pixel_bounds() {
        let rect = Rect::from_edges(10.0, 20.0, 110.0, 70.0);
        let bounds = Bounds::from_rect(&rect, CoordinateSpace::Pixels, (640, 480));
        assert_eq!(bounds.width, 100.0);
        assert_eq!(bounds.height, 50.0);
        assert_eq!(bounds.right, 110.0);
    }

    #[test]
    fn test_width_matches_edges_exactly() {
        // Edges that are not representable exactly after scaling.
        let rect = Rect::from_edges(37.3, 11.7, 191.9, 83.1);
        for space in [CoordinateSpace::Pixels, CoordinateSpace::Normalized] {
            let b = Bounds::from_rect(&rect, space, (333, 97));
            assert_eq!(b.width, b.right - b.left);
            assert_eq!(b.height, b.bottom - b.top);
        }
    }

    #[test]
    fn test_coordinate_space_parse() {
        assert_eq!(CoordinateSpace::parse("Normalized"), Some(CoordinateSpace::Normalized));
        assert_eq!(CoordinateSpace::parse("px"), Some(CoordinateSpace::Pixels));
        assert_eq!(CoordinateSpace::parse("inches"), None);
    }
}
