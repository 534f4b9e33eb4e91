//! Surface geometry tracking and resize handling.

use super::mapper::SurfaceRect;
use super::zoom::ZoomController;
use crate::draw::{Renderer, Segment, Surface};
use log::{debug, info, warn};

/// Tracks where the surface is displayed and keeps the backing store in step.
///
/// Resizing never copies pixels: the backing store is reallocated and the
/// whole log is replayed under the current view, so geometry always matches
/// the stored segments.
#[derive(Debug, Clone)]
pub struct ViewportManager {
    rect: SurfaceRect,
}

impl ViewportManager {
    pub fn new(rect: SurfaceRect) -> Self {
        Self { rect }
    }

    pub fn rect(&self) -> SurfaceRect {
        self.rect
    }

    /// Applies new surface geometry.
    ///
    /// A change of display position or CSS size only updates the mapping. A
    /// change of backing size reallocates the surface, re-clamps the pan offset
    /// and replays `segments`. Returns `true` when the surface was repainted.
    pub fn on_resize<S: Surface>(
        &mut self,
        rect: SurfaceRect,
        renderer: &mut Renderer<S>,
        zoom: &mut ZoomController,
        segments: &[Segment],
    ) -> bool {
        let (width, height) = rect.backing_size();
        if renderer.surface().backing_size() == (width, height) {
            debug!("Surface geometry changed without a backing resize");
            self.rect = rect;
            return false;
        }

        if let Err(err) = renderer.resize(width, height) {
            warn!("Failed to resize surface to {width}x{height}: {err}");
            return false;
        }
        self.rect = rect;
        zoom.set_backing_size(width, height);
        renderer.redraw_all(segments, &zoom.transform());
        info!(
            "Surface resized to {width}x{height}; replayed {} segments",
            segments.len()
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::surface::testing::{Op, RecordingSurface};
    use crate::draw::{ColorValue, Point, StrokeStyle};
    use crate::view::{ZoomAnchor, ZoomSettings};

    fn fixture() -> (ViewportManager, Renderer<RecordingSurface>, ZoomController) {
        (
            ViewportManager::new(SurfaceRect::unscaled(800, 600)),
            Renderer::new(RecordingSurface::new(800, 600), StrokeStyle::default()),
            ZoomController::new(ZoomSettings::default(), 800, 600),
        )
    }

    fn three_segments() -> Vec<Segment> {
        (0..3)
            .map(|i| {
                let x = f64::from(i) * 100.0;
                Segment::new(
                    Point::new(x, 50.0),
                    Point::new(x + 40.0, 80.0),
                    ColorValue::default(),
                    false,
                )
            })
            .collect()
    }

    #[test]
    fn backing_resize_replays_log_at_same_logical_coordinates() {
        let (mut viewport, mut renderer, mut zoom) = fixture();
        let segments = three_segments();

        let repainted = viewport.on_resize(
            SurfaceRect::unscaled(1200, 800),
            &mut renderer,
            &mut zoom,
            &segments,
        );

        assert!(repainted);
        assert_eq!(renderer.surface().backing_size(), (1200, 800));
        assert!(renderer.surface().ops.contains(&Op::Resize(1200, 800)));
        assert!(
            renderer
                .surface()
                .ops
                .contains(&Op::ClearRect(0.0, 0.0, 1200.0, 800.0))
        );
        let lines = renderer.surface().lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], ((200.0, 50.0), (240.0, 80.0)));
        assert_eq!(viewport.rect().backing_size(), (1200, 800));
    }

    #[test]
    fn resize_mid_animation_repaints_once_at_the_terminal_view() {
        let (mut viewport, mut renderer, mut zoom) = fixture();
        let segments = three_segments();
        let request = zoom
            .zoom_to(2.0, ZoomAnchor::Center, &mut renderer, &segments)
            .unwrap();
        zoom.on_frame(request.generation, &mut renderer, &segments);
        let redraws = renderer.redraw_count();

        assert!(viewport.on_resize(
            SurfaceRect::unscaled(1200, 800),
            &mut renderer,
            &mut zoom,
            &segments,
        ));

        assert!(!zoom.is_animating());
        assert_eq!(renderer.redraw_count(), redraws + 1);
        assert_eq!(renderer.surface().redraw_zooms().last(), Some(&2.0));
        assert!(zoom.on_frame(request.generation, &mut renderer, &segments).is_none());
        assert_eq!(renderer.redraw_count(), redraws + 1);
    }

    #[test]
    fn display_only_change_updates_rect_without_repaint() {
        let (mut viewport, mut renderer, mut zoom) = fixture();
        let moved = SurfaceRect::new(30.0, 40.0, 400.0, 300.0, 800, 600);

        assert!(!viewport.on_resize(moved, &mut renderer, &mut zoom, &[]));
        assert_eq!(viewport.rect(), moved);
        assert_eq!(renderer.redraw_count(), 0);
    }

    #[test]
    fn failed_resize_keeps_previous_geometry() {
        let (mut viewport, mut renderer, mut zoom) = fixture();
        renderer.surface_mut().fail_resize = true;

        assert!(!viewport.on_resize(
            SurfaceRect::unscaled(1024, 768),
            &mut renderer,
            &mut zoom,
            &[],
        ));
        assert_eq!(viewport.rect(), SurfaceRect::unscaled(800, 600));
        assert_eq!(renderer.redraw_count(), 0);
    }
}
