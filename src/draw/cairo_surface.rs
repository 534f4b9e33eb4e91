//! Cairo image-surface backend for the drawing pipeline.
//!
//! Used by native hosts, offline export and pixel-level tests.

use super::color::Color;
use super::surface::{CompositeMode, Surface, SurfaceError};
use anyhow::{Context as _, Result, anyhow};
use cairo::{Context, Format, ImageSurface, LineCap, LineJoin, Matrix, Operator};
use std::fs::File;
use std::path::Path;

/// ARGB32 raster surface backed by Cairo.
pub struct CairoSurface {
    surface: ImageSurface,
    ctx: Context,
    width: u32,
    height: u32,
}

impl CairoSurface {
    /// Allocates a transparent surface of `width` x `height` device pixels.
    ///
    /// # Errors
    /// Returns [`SurfaceError::Unavailable`] if Cairo cannot allocate the
    /// image or a drawing context for it.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        let (surface, ctx) = create(width, height)?;
        Ok(Self {
            surface,
            ctx,
            width,
            height,
        })
    }

    /// Alpha channel of the pixel at (`x`, `y`); 0 outside the surface.
    ///
    /// # Errors
    /// Returns [`SurfaceError::Backend`] if the pixel data cannot be borrowed.
    pub fn alpha_at(&self, x: u32, y: u32) -> Result<u8, SurfaceError> {
        if x >= self.width || y >= self.height {
            return Ok(0);
        }
        let stride = usize::try_from(self.surface.stride()).unwrap_or(0);
        let offset = y as usize * stride + x as usize * 4;
        self.read(|data| {
            data.get(offset..offset + 4).map_or(0, |px| {
                // ARGB32 is stored as a native-endian u32 with alpha in the top byte.
                (u32::from_ne_bytes([px[0], px[1], px[2], px[3]]) >> 24) as u8
            })
        })
    }

    /// Copy of the raw pixel buffer (premultiplied ARGB32, row stride included).
    ///
    /// # Errors
    /// Returns [`SurfaceError::Backend`] if the pixel data cannot be borrowed.
    pub fn pixels(&self) -> Result<Vec<u8>, SurfaceError> {
        self.read(<[u8]>::to_vec)
    }

    /// Whether any pixel has non-zero alpha.
    ///
    /// # Errors
    /// Returns [`SurfaceError::Backend`] if the pixel data cannot be borrowed.
    pub fn has_ink(&self) -> Result<bool, SurfaceError> {
        self.read(|data| {
            data.chunks_exact(4)
                .any(|px| u32::from_ne_bytes([px[0], px[1], px[2], px[3]]) >> 24 != 0)
        })
    }

    fn read<T>(&self, f: impl FnOnce(&[u8]) -> T) -> Result<T, SurfaceError> {
        let mut out = None;
        self.surface
            .with_data(|data| out = Some(f(data)))
            .map_err(|err| SurfaceError::Backend(format!("pixel data unavailable: {err}")))?;
        out.ok_or_else(|| SurfaceError::Backend("pixel data unavailable".into()))
    }

    /// Encodes the current drawing as a PNG file.
    pub fn write_png(&self, path: &Path) -> Result<()> {
        let mut file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        self.surface
            .write_to_png(&mut file)
            .map_err(|err| anyhow!("failed to encode PNG {}: {err}", path.display()))?;
        Ok(())
    }
}

fn create(width: u32, height: u32) -> Result<(ImageSurface, Context), SurfaceError> {
    let w = i32::try_from(width)
        .map_err(|_| SurfaceError::Unavailable(format!("width {width} out of range")))?;
    let h = i32::try_from(height)
        .map_err(|_| SurfaceError::Unavailable(format!("height {height} out of range")))?;
    let surface = ImageSurface::create(Format::ARgb32, w, h)
        .map_err(|err| SurfaceError::Unavailable(err.to_string()))?;
    let ctx = Context::new(&surface).map_err(|err| SurfaceError::Unavailable(err.to_string()))?;
    Ok((surface, ctx))
}

fn backend(err: cairo::Error) -> SurfaceError {
    SurfaceError::Backend(err.to_string())
}

impl Surface for CairoSurface {
    fn backing_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        let (surface, ctx) = create(width, height)?;
        self.surface = surface;
        self.ctx = ctx;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn set_transform(
        &mut self,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
        f: f64,
    ) -> Result<(), SurfaceError> {
        self.ctx.set_matrix(Matrix::new(a, b, c, d, e, f));
        self.ctx.status().map_err(backend)
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.ctx.translate(x, y);
        self.ctx.status().map_err(backend)
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.ctx.scale(x, y);
        self.ctx.status().map_err(backend)
    }

    fn set_composite(&mut self, mode: CompositeMode) -> Result<(), SurfaceError> {
        self.ctx.set_operator(match mode {
            CompositeMode::SourceOver => Operator::Over,
            CompositeMode::DestinationOut => Operator::DestOut,
        });
        Ok(())
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_round_caps(&mut self) {
        self.ctx.set_line_cap(LineCap::Round);
        self.ctx.set_line_join(LineJoin::Round);
    }

    fn begin_path(&mut self) {
        self.ctx.new_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn stroke(&mut self) -> Result<(), SurfaceError> {
        self.ctx.stroke().map_err(backend)
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), SurfaceError> {
        self.ctx.save().map_err(backend)?;
        self.ctx.set_operator(Operator::Clear);
        self.ctx.rectangle(x, y, width, height);
        let filled = self.ctx.fill().map_err(backend);
        self.ctx.restore().map_err(backend)?;
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::BLACK;

    #[test]
    fn zero_length_round_stroke_paints_a_dot() {
        let mut surface = CairoSurface::new(20, 20).unwrap();
        surface.set_stroke_color(BLACK);
        surface.set_line_width(6.0);
        surface.set_round_caps();
        surface.begin_path();
        surface.move_to(10.0, 10.0);
        surface.line_to(10.0, 10.0);
        surface.stroke().unwrap();

        assert_eq!(surface.alpha_at(10, 10).unwrap(), 255);
        assert_eq!(surface.alpha_at(0, 0).unwrap(), 0);
    }

    #[test]
    fn destination_out_removes_existing_ink() {
        let mut surface = CairoSurface::new(20, 20).unwrap();
        surface.set_stroke_color(BLACK);
        surface.set_line_width(4.0);
        surface.begin_path();
        surface.move_to(0.0, 10.5);
        surface.line_to(20.0, 10.5);
        surface.stroke().unwrap();
        assert!(surface.alpha_at(10, 10).unwrap() > 0);

        surface
            .set_composite(CompositeMode::DestinationOut)
            .unwrap();
        surface.set_line_width(8.0);
        surface.begin_path();
        surface.move_to(0.0, 10.5);
        surface.line_to(20.0, 10.5);
        surface.stroke().unwrap();

        assert!(!surface.has_ink().unwrap());
    }

    #[test]
    fn resize_discards_pixels() {
        let mut surface = CairoSurface::new(10, 10).unwrap();
        surface.set_stroke_color(BLACK);
        surface.set_line_width(10.0);
        surface.begin_path();
        surface.move_to(0.0, 5.0);
        surface.line_to(10.0, 5.0);
        surface.stroke().unwrap();
        assert!(surface.has_ink().unwrap());

        surface.resize(30, 20).unwrap();
        assert_eq!(surface.backing_size(), (30, 20));
        assert!(!surface.has_ink().unwrap());
    }

    #[test]
    fn readback_of_a_finished_surface_is_an_error() {
        let surface = CairoSurface::new(8, 8).unwrap();
        assert_eq!(surface.pixels().unwrap().len(), 8 * 8 * 4);

        surface.surface.finish();

        assert!(matches!(surface.alpha_at(1, 1), Err(SurfaceError::Backend(_))));
        assert!(surface.pixels().is_err());
        assert!(surface.has_ink().is_err());
        assert_eq!(surface.alpha_at(100, 100).unwrap(), 0);
    }
}
