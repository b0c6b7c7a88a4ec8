//! Device<->image coordinate mathematics for the canvas viewport.
//!
//! Geometry is stored in untransformed image coordinates; the zoom factor and
//! the centering offset are applied only at presentation and hit-test time.
//! Extracted as pure functions for testability.

use crate::model::Point;

/// The canvas viewport transform: zoom factor plus the offset that centers a
/// smaller-than-viewport image within the available area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    /// Image-pixel-to-device-pixel ratio.
    pub scale: f32,
    /// Device size of the visible viewport (width, height).
    pub viewport: (f32, f32),
    /// Image size in image pixels (width, height).
    pub image_size: (f32, f32),
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            viewport: (0.0, 0.0),
            image_size: (0.0, 0.0),
        }
    }
}

impl CanvasTransform {
    pub fn new(scale: f32, viewport: (f32, f32), image_size: (f32, f32)) -> Self {
        Self {
            scale,
            viewport,
            image_size,
        }
    }

    /// Offset (in image coordinates) that centers the image in the viewport.
    /// Zero on an axis where the scaled image fills or overflows the area.
    pub fn center_offset(&self) -> Point {
        let s = self.scale;
        let (iw, ih) = (self.image_size.0 * s, self.image_size.1 * s);
        let (aw, ah) = self.viewport;
        let x = if aw > iw { (aw - iw) / (2.0 * s) } else { 0.0 };
        let y = if ah > ih { (ah - ih) / (2.0 * s) } else { 0.0 };
        Point::new(x, y)
    }

    /// Map a device (viewport-relative) position to image coordinates.
    pub fn to_image(&self, device: Point) -> Point {
        device / self.scale - self.center_offset()
    }

    /// Map an image position back to device coordinates.
    pub fn to_device(&self, image: Point) -> Point {
        (image + self.center_offset()) * self.scale
    }

    /// A device-pixel tolerance expressed in image pixels: shrinks when
    /// zoomed in, grows when zoomed out.
    pub fn image_tolerance(&self, device_epsilon: f32) -> f32 {
        device_epsilon / self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let t = CanvasTransform::new(2.5, (800.0, 600.0), (200.0, 100.0));
        let p = Point::new(42.0, 17.0);
        let back = t.to_image(t.to_device(p));
        assert!((back.x - p.x).abs() < 0.001);
        assert!((back.y - p.y).abs() < 0.001);
    }

    #[test]
    fn test_small_image_is_centered() {
        let t = CanvasTransform::new(1.0, (400.0, 400.0), (200.0, 100.0));
        assert_eq!(t.center_offset(), Point::new(100.0, 150.0));
        // The image origin lands at the centering offset in device space.
        assert_eq!(t.to_device(Point::ZERO), Point::new(100.0, 150.0));
    }

    #[test]
    fn test_large_image_has_no_offset() {
        let t = CanvasTransform::new(2.0, (400.0, 400.0), (300.0, 300.0));
        assert_eq!(t.center_offset(), Point::ZERO);
        assert_eq!(t.to_image(Point::new(100.0, 50.0)), Point::new(50.0, 25.0));
    }

    #[test]
    fn test_tolerance_scales_inversely_with_zoom() {
        let mut t = CanvasTransform::default();
        t.scale = 2.0;
        assert_eq!(t.image_tolerance(10.0), 5.0);
        t.scale = 0.5;
        assert_eq!(t.image_tolerance(10.0), 20.0);
    }
}
