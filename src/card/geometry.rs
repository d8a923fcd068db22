//! Rounded-rectangle geometry
//!
//! Coverage is sampled at pixel centres against closed shapes, so a surface
//! with a native rounded rectangle and one that only has rectangles and pie
//! slices agree pixel for pixel.

use glam::{DVec2, Vec2};

/// Axis-aligned box in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(Vec2::new(x0, y0), Vec2::new(x1, y1))
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y
    }

    /// Closed containment test
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        let (min, max) = (self.min.as_dvec2(), self.max.as_dvec2());
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }

    /// Inclusive pixel index ranges whose centres may fall inside, clipped to
    /// a `width` x `height` canvas. None when nothing is visible.
    pub fn pixel_bounds(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        if self.is_empty() || width == 0 || height == 0 {
            return None;
        }
        let x0 = (self.min.x - 0.5).ceil().max(0.0);
        let y0 = (self.min.y - 0.5).ceil().max(0.0);
        let x1 = (self.max.x - 0.5).floor().min(width as f32 - 1.0);
        let y1 = (self.max.y - 0.5).floor().min(height as f32 - 1.0);
        if x1 < x0 || y1 < y0 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

/// Centre of pixel (x, y)
#[inline]
pub fn pixel_center(x: u32, y: u32) -> DVec2 {
    DVec2::new(x as f64 + 0.5, y as f64 + 0.5)
}

/// Pie slice of the ellipse inscribed in `bbox`.
///
/// Angles are in degrees, clockwise from 3 o'clock (y points down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSlice {
    pub bbox: Rect,
    pub start_deg: f32,
    pub end_deg: f32,
}

impl PieSlice {
    pub fn new(bbox: Rect, start_deg: f32, end_deg: f32) -> Self {
        Self {
            bbox,
            start_deg,
            end_deg,
        }
    }

    pub fn contains(&self, p: DVec2) -> bool {
        let center = self.bbox.center().as_dvec2();
        let rx = self.bbox.width() as f64 * 0.5;
        let ry = self.bbox.height() as f64 * 0.5;
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }

        let d = p - center;
        let inside = if rx == ry {
            d.length_squared() <= rx * rx
        } else {
            (d.x / rx).powi(2) + (d.y / ry).powi(2) <= 1.0
        };
        if !inside {
            return false;
        }

        let sweep = (self.end_deg - self.start_deg) as f64;
        if sweep >= 360.0 {
            return true;
        }
        let angle = d.y.atan2(d.x).to_degrees().rem_euclid(360.0);
        let from_start = (angle - self.start_deg as f64).rem_euclid(360.0);
        // rem_euclid can land on 360.0 for tiny negative inputs
        from_start <= sweep || from_start >= 360.0
    }
}

/// Two straight bands plus four quarter discs covering a rounded rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedRectParts {
    /// Horizontal-span band and vertical-span band
    pub bands: [Rect; 2],
    /// Top-left, top-right, bottom-left, bottom-right
    pub corners: [PieSlice; 4],
}

/// Largest radius that still fits the box
#[inline]
pub fn clamp_radius(rect: Rect, radius: f32) -> f32 {
    radius
        .min(rect.width() * 0.5)
        .min(rect.height() * 0.5)
        .max(0.0)
}

/// Decompose a rounded rectangle for surfaces without a native primitive
pub fn rounded_rect_parts(rect: Rect, radius: f32) -> RoundedRectParts {
    let r = clamp_radius(rect, radius);
    let Rect { min, max } = rect;
    let d = 2.0 * r;

    RoundedRectParts {
        bands: [
            Rect::from_corners(min.x + r, min.y, max.x - r, max.y),
            Rect::from_corners(min.x, min.y + r, max.x, max.y - r),
        ],
        corners: [
            PieSlice::new(Rect::from_corners(min.x, min.y, min.x + d, min.y + d), 180.0, 270.0),
            PieSlice::new(Rect::from_corners(max.x - d, min.y, max.x, min.y + d), 270.0, 360.0),
            PieSlice::new(Rect::from_corners(min.x, max.y - d, min.x + d, max.y), 90.0, 180.0),
            PieSlice::new(Rect::from_corners(max.x - d, max.y - d, max.x, max.y), 0.0, 90.0),
        ],
    }
}

/// Signed distance to a rounded box (negative inside)
#[inline]
pub fn sd_rounded_box(p: DVec2, rect: Rect, radius: f32) -> f64 {
    let r = clamp_radius(rect, radius) as f64;
    let center = rect.center().as_dvec2();
    let half = DVec2::new(rect.width() as f64, rect.height() as f64) * 0.5;
    let q = (p - center).abs() - (half - DVec2::splat(r));
    q.max(DVec2::ZERO).length() + q.x.max(q.y).min(0.0) - r
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covered_by_parts(parts: &RoundedRectParts, p: DVec2) -> bool {
        parts.bands.iter().any(|b| b.contains(p)) || parts.corners.iter().any(|c| c.contains(p))
    }

    #[test]
    fn test_parts_match_rounded_box() {
        let boxes = [
            (Rect::from_corners(40.0, 40.0, 200.0, 120.0), 20.0),
            (Rect::from_corners(3.0, 5.0, 60.0, 33.0), 9.0),
            (Rect::from_corners(10.0, 10.0, 91.0, 47.0), 13.0),
        ];
        for (rect, radius) in boxes {
            let parts = rounded_rect_parts(rect, radius);
            for y in 0..140 {
                for x in 0..220 {
                    let p = pixel_center(x, y);
                    assert_eq!(
                        covered_by_parts(&parts, p),
                        sd_rounded_box(p, rect, radius) <= 0.0,
                        "pixel ({x}, {y}) of {rect:?} r={radius}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_corner_pixel_is_cut() {
        let rect = Rect::from_corners(0.0, 0.0, 100.0, 100.0);
        let parts = rounded_rect_parts(rect, 30.0);
        assert!(!covered_by_parts(&parts, pixel_center(0, 0)));
        assert!(!covered_by_parts(&parts, pixel_center(99, 99)));
        assert!(covered_by_parts(&parts, pixel_center(50, 0)));
        assert!(covered_by_parts(&parts, pixel_center(0, 50)));
    }

    #[test]
    fn test_radius_is_clamped() {
        let rect = Rect::from_corners(0.0, 0.0, 40.0, 10.0);
        assert_eq!(clamp_radius(rect, 100.0), 5.0);
        assert_eq!(clamp_radius(rect, -3.0), 0.0);
    }

    #[test]
    fn test_quarter_slices_face_outward() {
        let bbox = Rect::from_corners(0.0, 0.0, 20.0, 20.0);
        let top_left = PieSlice::new(bbox, 180.0, 270.0);
        assert!(top_left.contains(DVec2::new(5.0, 5.0)));
        assert!(!top_left.contains(DVec2::new(15.0, 5.0)));
        assert!(!top_left.contains(DVec2::new(5.0, 15.0)));

        let bottom_right = PieSlice::new(bbox, 0.0, 90.0);
        assert!(bottom_right.contains(DVec2::new(15.0, 15.0)));
        assert!(!bottom_right.contains(DVec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_pixel_bounds_clip() {
        let rect = Rect::from_corners(-10.0, 2.0, 50.0, 8.0);
        assert_eq!(rect.pixel_bounds(20, 20), Some((0, 2, 19, 7)));
        assert_eq!(Rect::from_corners(30.0, 0.0, 40.0, 5.0).pixel_bounds(20, 20), None);
        assert_eq!(Rect::from_corners(5.0, 5.0, 2.0, 8.0).pixel_bounds(20, 20), None);
    }
}
