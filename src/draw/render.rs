//! Rasterises path segments onto a [`Surface`] under a view transform.

use super::color::BLACK;
use super::segment::Segment;
use super::surface::{CompositeMode, Surface, SurfaceError};
use crate::view::ViewTransform;
use log::{debug, warn};

/// Line widths, in logical units, for each kind of segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Width of pen segments.
    pub pen_width: f64,
    /// Width of eraser segments (live preview and legacy eraser marks).
    pub eraser_width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            pen_width: 2.0,
            eraser_width: 20.0,
        }
    }
}

/// Paints segments onto the visible surface.
///
/// The renderer never touches the path store; it only reads the segments it
/// is handed. Surface failures are logged and absorbed here so a single bad
/// frame never reaches the input loop.
pub struct Renderer<S: Surface> {
    surface: S,
    style: StrokeStyle,
    redraws: u64,
}

impl<S: Surface> Renderer<S> {
    pub fn new(surface: S, style: StrokeStyle) -> Self {
        Self {
            surface,
            style,
            redraws: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Number of full redraws performed so far.
    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    /// Paints a single segment on top of the current surface content.
    ///
    /// Used on the live drawing path only; everything else goes through
    /// [`Renderer::redraw_all`].
    pub fn draw_segment(&mut self, segment: &Segment, view: &ViewTransform) {
        if let Err(err) = self.apply_view(view).and_then(|()| self.paint(segment)) {
            warn!("Failed to draw segment: {err}");
        }
    }

    /// Clears the whole surface and replays `segments` in order.
    pub fn redraw_all(&mut self, segments: &[Segment], view: &ViewTransform) {
        self.redraws += 1;
        match self.try_redraw_all(segments, view) {
            Ok(()) => debug!(
                "Redrew {} segments at zoom {:.3} offset ({:.1}, {:.1})",
                segments.len(),
                view.zoom,
                view.offset_x,
                view.offset_y
            ),
            Err(err) => warn!("Full redraw failed: {err}"),
        }
    }

    /// Wipes every pixel and leaves `view` established for later draws.
    pub fn clear(&mut self, view: &ViewTransform) {
        if let Err(err) = self.clear_surface().and_then(|()| self.apply_view(view)) {
            warn!("Failed to clear surface: {err}");
        }
    }

    /// Reallocates the backing store. The caller is responsible for repainting.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        self.surface.resize(width, height)
    }

    fn try_redraw_all(
        &mut self,
        segments: &[Segment],
        view: &ViewTransform,
    ) -> Result<(), SurfaceError> {
        self.clear_surface()?;
        self.apply_view(view)?;
        for segment in segments {
            self.paint(segment)?;
        }
        Ok(())
    }

    fn clear_surface(&mut self) -> Result<(), SurfaceError> {
        self.surface.reset_transform()?;
        let (width, height) = self.surface.backing_size();
        self.surface
            .clear_rect(0.0, 0.0, f64::from(width), f64::from(height))
    }

    // Translate first, then scale: device = logical * zoom + offset.
    // `view::mapper` inverts exactly this order.
    fn apply_view(&mut self, view: &ViewTransform) -> Result<(), SurfaceError> {
        self.surface.reset_transform()?;
        self.surface.translate(view.offset_x, view.offset_y)?;
        self.surface.scale(view.zoom, view.zoom)
    }

    fn paint(&mut self, segment: &Segment) -> Result<(), SurfaceError> {
        let (mode, width, color) = if segment.is_eraser {
            // destination-out only reads source alpha, so any opaque color works.
            (CompositeMode::DestinationOut, self.style.eraser_width, BLACK)
        } else {
            let color = segment.color.resolve().unwrap_or_else(|| {
                debug!("Unrecognised color '{}', painting black", segment.color);
                BLACK
            });
            (CompositeMode::SourceOver, self.style.pen_width, color)
        };

        self.surface.set_composite(mode)?;
        self.surface.set_stroke_color(color);
        self.surface.set_line_width(width);
        self.surface.set_round_caps();
        self.surface.begin_path();
        self.surface.move_to(segment.start.x, segment.start.y);
        self.surface.line_to(segment.end.x, segment.end.y);
        self.surface.stroke()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::surface::testing::{Op, RecordingSurface};
    use crate::draw::{ColorValue, Point, RED};

    fn segment(x1: f64, y1: f64, x2: f64, y2: f64, is_eraser: bool) -> Segment {
        Segment::new(
            Point::new(x1, y1),
            Point::new(x2, y2),
            ColorValue::from("#ff0000"),
            is_eraser,
        )
    }

    fn view(zoom: f64, offset_x: f64, offset_y: f64) -> ViewTransform {
        ViewTransform {
            zoom,
            offset_x,
            offset_y,
        }
    }

    #[test]
    fn draw_segment_establishes_view_before_painting() {
        let mut renderer = Renderer::new(RecordingSurface::new(100, 100), StrokeStyle::default());
        renderer.draw_segment(&segment(1.0, 2.0, 3.0, 4.0, false), &view(2.0, 5.0, 6.0));

        let ops = &renderer.surface().ops;
        assert_eq!(ops[0], Op::SetTransform([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]));
        assert_eq!(ops[1], Op::Translate(5.0, 6.0));
        assert_eq!(ops[2], Op::Scale(2.0, 2.0));
        assert!(ops.contains(&Op::Composite(CompositeMode::SourceOver)));
        assert!(ops.contains(&Op::StrokeColor(RED)));
        assert!(ops.contains(&Op::LineWidth(2.0)));
        assert_eq!(renderer.surface().lines(), vec![((1.0, 2.0), (3.0, 4.0))]);
        assert_eq!(renderer.redraw_count(), 0);
    }

    #[test]
    fn eraser_segments_composite_destination_out() {
        let mut renderer = Renderer::new(RecordingSurface::new(100, 100), StrokeStyle::default());
        renderer.draw_segment(&segment(0.0, 0.0, 5.0, 5.0, true), &ViewTransform::default());

        let ops = &renderer.surface().ops;
        assert!(ops.contains(&Op::Composite(CompositeMode::DestinationOut)));
        assert!(ops.contains(&Op::LineWidth(20.0)));
        assert!(!ops.contains(&Op::StrokeColor(RED)));
    }

    #[test]
    fn redraw_all_clears_then_paints_in_log_order() {
        let mut renderer = Renderer::new(RecordingSurface::new(80, 60), StrokeStyle::default());
        let segments = vec![
            segment(0.0, 0.0, 1.0, 1.0, false),
            segment(2.0, 2.0, 3.0, 3.0, true),
            segment(4.0, 4.0, 5.0, 5.0, false),
        ];

        renderer.redraw_all(&segments, &view(1.5, 0.0, 0.0));

        let surface = renderer.surface();
        let clear_at = surface
            .ops
            .iter()
            .position(|op| *op == Op::ClearRect(0.0, 0.0, 80.0, 60.0))
            .expect("full clear");
        let first_move = surface
            .ops
            .iter()
            .position(|op| matches!(op, Op::MoveTo(..)))
            .unwrap();
        assert!(clear_at < first_move);
        assert_eq!(
            surface.lines(),
            vec![
                ((0.0, 0.0), (1.0, 1.0)),
                ((2.0, 2.0), (3.0, 3.0)),
                ((4.0, 4.0), (5.0, 5.0))
            ]
        );
        assert_eq!(surface.redraw_zooms(), vec![1.5]);
        assert_eq!(renderer.redraw_count(), 1);
    }

    #[test]
    fn unknown_colors_fall_back_to_black() {
        let mut renderer = Renderer::new(RecordingSurface::new(10, 10), StrokeStyle::default());
        let mut odd = segment(0.0, 0.0, 1.0, 1.0, false);
        odd.color = ColorValue::from("not-a-color");
        renderer.draw_segment(&odd, &ViewTransform::default());
        assert!(renderer.surface().ops.contains(&Op::StrokeColor(BLACK)));
    }

    #[test]
    fn surface_failures_are_absorbed() {
        let mut surface = RecordingSurface::new(10, 10);
        surface.fail_strokes = true;
        let mut renderer = Renderer::new(surface, StrokeStyle::default());

        renderer.draw_segment(&segment(0.0, 0.0, 1.0, 1.0, false), &ViewTransform::default());
        renderer.redraw_all(
            &[segment(0.0, 0.0, 1.0, 1.0, false)],
            &ViewTransform::default(),
        );

        assert_eq!(renderer.surface().strokes(), 0);
        assert_eq!(renderer.redraw_count(), 1);
    }
}
