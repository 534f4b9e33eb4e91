//! Zoom/pan transform between logical drawing space and backing pixels.

use crate::draw::Point;

/// Zoom factor and pan offset applied when painting logical space.
///
/// `device = logical * zoom + offset`, with device measured in backing-store
/// pixels. The renderer establishes it as translate-then-scale and the mapper
/// inverts it in the same order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub zoom: f64,
    /// Horizontal pan offset in backing pixels.
    pub offset_x: f64,
    /// Vertical pan offset in backing pixels.
    pub offset_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl ViewTransform {
    pub fn new(zoom: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            zoom,
            offset_x,
            offset_y,
        }
    }

    /// Logical point to backing-pixel position.
    pub fn to_device(&self, logical: Point) -> Point {
        Point {
            x: logical.x * self.zoom + self.offset_x,
            y: logical.y * self.zoom + self.offset_y,
        }
    }

    /// Backing-pixel position to logical point.
    pub fn to_logical(&self, device: Point) -> Point {
        Point {
            x: (device.x - self.offset_x) / self.zoom,
            y: (device.y - self.offset_y) / self.zoom,
        }
    }

    /// Same view at `zoom`, with the logical point under `anchor` kept in place.
    pub fn zoomed_about(&self, anchor: Point, zoom: f64) -> Self {
        let logical = self.to_logical(anchor);
        Self {
            zoom,
            offset_x: anchor.x - logical.x * zoom,
            offset_y: anchor.y - logical.y * zoom,
        }
    }

    /// Clamps the pan offset for a `width` x `height` backing store.
    ///
    /// Logical content spans the backing rectangle at zoom 1. Zoomed in, the
    /// viewport may not leave that content; zoomed out, the content may not
    /// leave the viewport.
    pub fn clamp_offset(&self, width: u32, height: u32) -> Self {
        Self {
            zoom: self.zoom,
            offset_x: clamp_axis(self.offset_x, f64::from(width), self.zoom),
            offset_y: clamp_axis(self.offset_y, f64::from(height), self.zoom),
        }
    }
}

fn clamp_axis(offset: f64, extent: f64, zoom: f64) -> f64 {
    let slack = extent - extent * zoom;
    let (lo, hi) = if slack < 0.0 { (slack, 0.0) } else { (0.0, slack) };
    if offset.is_nan() { lo } else { offset.clamp(lo, hi) }
}

/// Allowed zoom range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBounds {
    min: f64,
    max: f64,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self { min: 0.5, max: 3.0 }
    }
}

impl ZoomBounds {
    /// Creates bounds from two limits, in either order.
    ///
    /// Non-positive or non-finite limits fall back to the defaults.
    pub fn new(min: f64, max: f64) -> Self {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(min) || !valid(max) {
            return Self::default();
        }
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, zoom: f64) -> bool {
        (self.min..=self.max).contains(&zoom)
    }

    /// Clamps `zoom` into range. NaN is treated as a request for zoom 1.
    pub fn clamp(&self, zoom: f64) -> f64 {
        let zoom = if zoom.is_nan() { 1.0 } else { zoom };
        zoom.clamp(self.min, self.max)
    }
}
