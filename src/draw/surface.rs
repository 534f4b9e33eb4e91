//! The 2D immediate-mode drawing capability the renderer paints through.
//!
//! Any backend with canvas-style path construction, affine transforms, a
//! compositing switch and rectangle clearing can host the drawing pipeline.

use super::color::Color;
use thiserror::Error;

/// Errors raised by a drawing surface backend.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The host could not provide a drawing context. Fatal at startup.
    #[error("drawing surface unavailable: {0}")]
    Unavailable(String),

    /// A single drawing call failed.
    #[error("drawing backend error: {0}")]
    Backend(String),
}

/// How new paint combines with existing pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeMode {
    /// Paint over existing content (canvas `source-over`).
    SourceOver,
    /// Remove existing content where painted (canvas `destination-out`).
    DestinationOut,
}

impl CompositeMode {
    /// Canvas `globalCompositeOperation` name.
    pub fn as_css(self) -> &'static str {
        match self {
            CompositeMode::SourceOver => "source-over",
            CompositeMode::DestinationOut => "destination-out",
        }
    }
}

/// Immediate-mode 2D drawing surface.
///
/// Coordinates passed to path and clear calls are interpreted through the
/// current transform, exactly like a browser `CanvasRenderingContext2d`.
pub trait Surface {
    /// Backing store size in device pixels.
    fn backing_size(&self) -> (u32, u32);

    /// Reallocates the backing store. Existing pixels and drawing state are lost.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError>;

    /// Replaces the current transform with the matrix `[a c e; b d f]`.
    #[allow(clippy::many_single_char_names)]
    fn set_transform(
        &mut self,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
        f: f64,
    ) -> Result<(), SurfaceError>;

    fn translate(&mut self, x: f64, y: f64) -> Result<(), SurfaceError>;

    fn scale(&mut self, x: f64, y: f64) -> Result<(), SurfaceError>;

    fn set_composite(&mut self, mode: CompositeMode) -> Result<(), SurfaceError>;

    fn set_stroke_color(&mut self, color: Color);

    fn set_line_width(&mut self, width: f64);

    /// Round line caps and joins, so zero-length strokes paint a dot.
    fn set_round_caps(&mut self);

    fn begin_path(&mut self);

    fn move_to(&mut self, x: f64, y: f64);

    fn line_to(&mut self, x: f64, y: f64);

    fn stroke(&mut self) -> Result<(), SurfaceError>;

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), SurfaceError>;

    /// Resets the transform to identity.
    fn reset_transform(&mut self) -> Result<(), SurfaceError> {
        self.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }
}
