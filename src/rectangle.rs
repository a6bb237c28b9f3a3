use crate::point2d::Point2D;

/// Pixel rectangle with inclusive bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Rect {
    /// Pixels touched by the points, clamped to a `width` x `height` raster.
    /// `None` when the points are non-finite or miss the raster entirely.
    pub fn bounding(points: &[Point2D], width: u32, height: u32) -> Option<Rect> {
        if width == 0 || height == 0 || points.is_empty() {
            return None;
        }
        let mut min = Point2D::new(f32::INFINITY, f32::INFINITY);
        let mut max = Point2D::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for p in points {
            if !p.x.is_finite() || !p.y.is_finite() {
                return None;
            }
            min = Point2D::new(min.x.min(p.x), min.y.min(p.y));
            max = Point2D::new(max.x.max(p.x), max.y.max(p.y));
        }
        let (w, h) = (width as f32, height as f32);
        if max.x < 0.0 || max.y < 0.0 || min.x >= w || min.y >= h {
            return None;
        }
        Some(Rect {
            min_x: min.x.floor().max(0.0) as u32,
            min_y: min.y.floor().max(0.0) as u32,
            max_x: (max.x.ceil().min(w - 1.0)) as u32,
            max_y: (max.y.ceil().min(h - 1.0)) as u32,
        })
    }
}
