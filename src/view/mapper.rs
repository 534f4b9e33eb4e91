//! Maps host pointer coordinates into logical drawing space.
//!
//! Two scalings sit between a pointer event and the path log: the ratio of
//! the surface's backing store to its displayed size (device pixel ratio or
//! CSS scaling), and the current [`ViewTransform`].

use super::transform::ViewTransform;
use crate::draw::Point;

/// Where the surface is displayed and how large its backing store is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    /// Left edge of the displayed surface, in client (CSS) pixels.
    pub left: f64,
    /// Top edge of the displayed surface, in client (CSS) pixels.
    pub top: f64,
    /// Displayed width in client pixels.
    pub display_width: f64,
    /// Displayed height in client pixels.
    pub display_height: f64,
    /// Backing store width in device pixels.
    pub backing_width: u32,
    /// Backing store height in device pixels.
    pub backing_height: u32,
}

impl SurfaceRect {
    pub fn new(
        left: f64,
        top: f64,
        display_width: f64,
        display_height: f64,
        backing_width: u32,
        backing_height: u32,
    ) -> Self {
        Self {
            left,
            top,
            display_width,
            display_height,
            backing_width,
            backing_height,
        }
    }

    /// A surface at the client origin whose display size equals its backing size.
    pub fn unscaled(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, f64::from(width), f64::from(height), width, height)
    }

    pub fn backing_size(&self) -> (u32, u32) {
        (self.backing_width, self.backing_height)
    }

    /// Backing pixels per displayed pixel, horizontally.
    pub fn scale_x(&self) -> f64 {
        ratio(self.backing_width, self.display_width)
    }

    /// Backing pixels per displayed pixel, vertically.
    pub fn scale_y(&self) -> f64 {
        ratio(self.backing_height, self.display_height)
    }

    /// Client position to backing-pixel position.
    pub fn to_backing(&self, client_x: f64, client_y: f64) -> Point {
        Point {
            x: (client_x - self.left) * self.scale_x(),
            y: (client_y - self.top) * self.scale_y(),
        }
    }

    /// Backing-pixel position to client position.
    pub fn to_client(&self, backing: Point) -> Point {
        Point {
            x: backing.x / self.scale_x() + self.left,
            y: backing.y / self.scale_y() + self.top,
        }
    }

    /// Center of the backing store.
    pub fn backing_center(&self) -> Point {
        Point {
            x: f64::from(self.backing_width) / 2.0,
            y: f64::from(self.backing_height) / 2.0,
        }
    }
}

fn ratio(backing: u32, display: f64) -> f64 {
    if display > 0.0 && display.is_finite() && backing > 0 {
        f64::from(backing) / display
    } else {
        1.0
    }
}

/// Converts a client-space pointer position to a logical point.
///
/// `logical = ((client - rect.origin) * backing/display - offset) / zoom`
pub fn to_logical(client_x: f64, client_y: f64, view: &ViewTransform, rect: &SurfaceRect) -> Point {
    view.to_logical(rect.to_backing(client_x, client_y))
}

/// Converts a logical point to the client position where it is painted.
pub fn to_client(logical: Point, view: &ViewTransform, rect: &SurfaceRect) -> Point {
    rect.to_client(view.to_device(logical))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn identity_view_maps_offset_by_rect_origin() {
        let rect = SurfaceRect::new(10.0, 20.0, 800.0, 600.0, 800, 600);
        let point = to_logical(110.0, 70.0, &ViewTransform::default(), &rect);
        assert_eq!(point, Point::new(100.0, 50.0));
    }

    #[test]
    fn accounts_for_backing_ratio_and_zoom() {
        // 2x device pixel ratio, zoom 2: (x - left) * 2 / 2.
        let rect = SurfaceRect::new(5.0, 0.0, 400.0, 300.0, 800, 600);
        let view = ViewTransform::new(2.0, 0.0, 0.0);
        let point = to_logical(105.0, 30.0, &view, &rect);
        assert_eq!(point, Point::new(100.0, 30.0));
    }

    #[test]
    fn subtracts_pan_offset_before_dividing_by_zoom() {
        let rect = SurfaceRect::unscaled(800, 600);
        let view = ViewTransform::new(2.0, -100.0, -50.0);
        let point = to_logical(100.0, 50.0, &view, &rect);
        assert_eq!(point, Point::new(100.0, 50.0));
    }

    #[test]
    fn to_client_inverts_to_logical() {
        let rect = SurfaceRect::new(12.0, 34.0, 640.0, 480.0, 1280, 960);
        let view = ViewTransform::new(1.7, -212.0, -33.0);
        let client = Point::new(300.25, 199.5);
        let logical = to_logical(client.x, client.y, &view, &rect);
        assert!(close(to_client(logical, &view, &rect), client));
    }

    #[test]
    fn degenerate_display_size_falls_back_to_unit_ratio() {
        let rect = SurfaceRect::new(0.0, 0.0, 0.0, 0.0, 800, 600);
        assert_eq!(rect.scale_x(), 1.0);
        assert_eq!(rect.scale_y(), 1.0);
    }
}
