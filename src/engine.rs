//! A drawing session: the components wired to host events.
//!
//! The host owns the event loop and forwards pointer, wheel, resize and
//! animation-frame callbacks here. Everything runs on the host's single event
//! thread; an `Engine` is not meant to be shared across threads.

use crate::config::Config;
use crate::draw::{ColorValue, Renderer, Segment, Surface, SurfaceError};
use crate::input::{DrawTarget, InputController, PointerButton, Tool};
use crate::session::{KeyValueStore, PathStore};
use crate::view::{
    FrameRequest, SurfaceRect, ViewTransform, ViewportManager, ZoomAnchor, ZoomController,
    ZoomDirection,
};
use log::{debug, info};

/// One drawing surface with its path log, tool state and view.
pub struct Engine<S: Surface, K: KeyValueStore> {
    renderer: Renderer<S>,
    store: PathStore<K>,
    input: InputController,
    zoom: ZoomController,
    viewport: ViewportManager,
}

impl<S: Surface, K: KeyValueStore> Engine<S, K> {
    /// Starts a session: sizes the surface to `rect`, restores the stored
    /// log from `backend` and paints it.
    ///
    /// # Errors
    /// Returns [`SurfaceError`] if the surface cannot be sized. Nothing can be
    /// drawn without it, so hosts should abort initialisation.
    pub fn new(
        mut surface: S,
        backend: K,
        rect: SurfaceRect,
        config: &Config,
    ) -> Result<Self, SurfaceError> {
        let (width, height) = rect.backing_size();
        if surface.backing_size() != (width, height) {
            surface.resize(width, height)?;
        }

        let store = PathStore::open(backend, config.storage.options());
        let input = InputController::new(
            config.drawing.default_color.to_color_value(),
            config.drawing.erase_strategy,
            config.drawing.erase_radius,
        );
        let mut engine = Self {
            renderer: Renderer::new(surface, config.drawing.stroke_style()),
            store,
            input,
            zoom: ZoomController::new(config.zoom.settings(), width, height),
            viewport: ViewportManager::new(rect),
        };
        engine.redraw();
        info!(
            "Drawing session started on a {width}x{height} surface with {} stored segments",
            engine.store.len()
        );
        Ok(engine)
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    /// Pointer pressed at client coordinates.
    ///
    /// A running zoom animation is finished first so the stroke maps through
    /// the view the user will end up seeing.
    pub fn on_pointer_down(&mut self, button: PointerButton, client_x: f64, client_y: f64) -> bool {
        if button == PointerButton::Primary {
            self.zoom
                .finish_animation(&mut self.renderer, self.store.segments());
        }
        let target = draw_target(&self.zoom, &self.viewport, &mut self.renderer, &mut self.store);
        self.input.on_pointer_down(button, client_x, client_y, target)
    }

    /// Pointer motion at client coordinates. While stroking, a running zoom
    /// animation is finished first so its frames cannot repaint over the
    /// live stroke.
    pub fn on_pointer_move(&mut self, client_x: f64, client_y: f64) -> bool {
        if self.input.is_stroking() {
            self.zoom
                .finish_animation(&mut self.renderer, self.store.segments());
        }
        let target = draw_target(&self.zoom, &self.viewport, &mut self.renderer, &mut self.store);
        self.input.on_pointer_move(client_x, client_y, target)
    }

    pub fn on_pointer_up(&mut self) -> bool {
        let target = draw_target(&self.zoom, &self.viewport, &mut self.renderer, &mut self.store);
        self.input.on_pointer_up(target)
    }

    pub fn on_pointer_leave(&mut self) -> bool {
        let target = draw_target(&self.zoom, &self.viewport, &mut self.renderer, &mut self.store);
        self.input.on_pointer_leave(target)
    }

    // ------------------------------------------------------------------
    // Zoom
    // ------------------------------------------------------------------

    /// Wheel event at client coordinates, zooming about the pointer.
    pub fn on_wheel(&mut self, delta_y: f64, client_x: f64, client_y: f64) -> Option<FrameRequest> {
        let pointer = self.viewport.rect().to_backing(client_x, client_y);
        self.zoom
            .zoom_by_wheel(delta_y, pointer, &mut self.renderer, self.store.segments())
    }

    /// Toolbar zoom-in, about the canvas centre.
    pub fn zoom_in(&mut self) -> Option<FrameRequest> {
        self.zoom.zoom_by_button(
            ZoomDirection::In,
            &mut self.renderer,
            self.store.segments(),
        )
    }

    /// Toolbar zoom-out, about the canvas centre.
    pub fn zoom_out(&mut self) -> Option<FrameRequest> {
        self.zoom.zoom_by_button(
            ZoomDirection::Out,
            &mut self.renderer,
            self.store.segments(),
        )
    }

    /// Zooms to an absolute factor about the canvas centre. Out-of-range
    /// values are clamped.
    pub fn zoom_to(&mut self, zoom: f64) -> Option<FrameRequest> {
        self.zoom.zoom_to(
            zoom,
            ZoomAnchor::Center,
            &mut self.renderer,
            self.store.segments(),
        )
    }

    /// Animation frame callback for a previously returned [`FrameRequest`].
    pub fn on_animation_frame(&mut self, generation: u64) -> Option<FrameRequest> {
        self.zoom
            .on_frame(generation, &mut self.renderer, self.store.segments())
    }

    // ------------------------------------------------------------------
    // Surface geometry
    // ------------------------------------------------------------------

    /// The surface was moved, restyled or resized. Returns whether it was repainted.
    pub fn on_resize(&mut self, rect: SurfaceRect) -> bool {
        self.viewport.on_resize(
            rect,
            &mut self.renderer,
            &mut self.zoom,
            self.store.segments(),
        )
    }

    // ------------------------------------------------------------------
    // Toolbar actions
    // ------------------------------------------------------------------

    /// Selects a tool. Ends any stroke and settles any zoom animation.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool == self.input.tool() {
            return;
        }
        self.settle();
        self.input.set_tool(tool);
    }

    /// Switches between pen and eraser; returns the new tool.
    pub fn toggle_eraser(&mut self) -> Tool {
        let next = self.input.tool().toggled();
        self.set_tool(next);
        next
    }

    /// Sets the pen color for new segments.
    pub fn set_color(&mut self, color: impl Into<ColorValue>) {
        let color = color.into();
        if color.resolve().is_none() {
            debug!("Color '{color}' is not recognised; it will paint black");
        }
        self.input.set_color(color);
    }

    /// Erases everything: the log, its stored copy and the surface.
    pub fn clear(&mut self) {
        self.settle();
        self.store.clear();
        self.renderer.clear(&self.zoom.transform());
        info!("Drawing cleared");
    }

    /// Repaints the whole surface from the log under the current view.
    pub fn redraw(&mut self) {
        self.renderer
            .redraw_all(self.store.segments(), &self.zoom.transform());
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn segments(&self) -> &[Segment] {
        self.store.segments()
    }

    pub fn view(&self) -> ViewTransform {
        self.zoom.transform()
    }

    pub fn rect(&self) -> SurfaceRect {
        self.viewport.rect()
    }

    pub fn tool(&self) -> Tool {
        self.input.tool()
    }

    pub fn color(&self) -> &ColorValue {
        self.input.color()
    }

    pub fn is_stroking(&self) -> bool {
        self.input.is_stroking()
    }

    pub fn is_animating(&self) -> bool {
        self.zoom.is_animating()
    }

    /// Whether the last write reached durable storage.
    pub fn is_durable(&self) -> bool {
        self.store.is_durable()
    }

    pub fn renderer(&self) -> &Renderer<S> {
        &self.renderer
    }

    pub fn surface(&self) -> &S {
        self.renderer.surface()
    }

    pub fn store(&self) -> &PathStore<K> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PathStore<K> {
        &mut self.store
    }

    /// Ends the current stroke and jumps any zoom animation to its end.
    fn settle(&mut self) {
        let target = draw_target(&self.zoom, &self.viewport, &mut self.renderer, &mut self.store);
        self.input.end_stroke(target);
        self.zoom
            .finish_animation(&mut self.renderer, self.store.segments());
    }
}

fn draw_target<'a, S: Surface, K: KeyValueStore>(
    zoom: &ZoomController,
    viewport: &ViewportManager,
    renderer: &'a mut Renderer<S>,
    store: &'a mut PathStore<K>,
) -> DrawTarget<'a, S, K> {
    DrawTarget {
        view: zoom.transform(),
        rect: viewport.rect(),
        renderer,
        store,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::Point;
    use crate::draw::surface::testing::RecordingSurface;
    use crate::session::MemoryStore;

    fn engine_with(backend: MemoryStore) -> Engine<RecordingSurface, MemoryStore> {
        Engine::new(
            RecordingSurface::new(800, 600),
            backend,
            SurfaceRect::unscaled(800, 600),
            &Config::default(),
        )
        .unwrap()
    }

    fn engine() -> Engine<RecordingSurface, MemoryStore> {
        engine_with(MemoryStore::new())
    }

    fn draw_line(engine: &mut Engine<RecordingSurface, MemoryStore>, from: (f64, f64), to: (f64, f64)) {
        engine.on_pointer_down(PointerButton::Primary, from.0, from.1);
        engine.on_pointer_move(to.0, to.1);
        engine.on_pointer_up();
    }

    fn run_frames(engine: &mut Engine<RecordingSurface, MemoryStore>, mut request: Option<FrameRequest>) {
        while let Some(frame) = request {
            request = engine.on_animation_frame(frame.generation);
        }
    }

    #[test]
    fn startup_restores_and_paints_the_stored_log() {
        let mut backend = MemoryStore::new();
        backend
            .set(
                "canvasPaths",
                r##"[{"start":{"x":1,"y":1},"end":{"x":9,"y":9},"color":"#000000","isEraser":false}]"##,
            )
            .unwrap();

        let engine = engine_with(backend);

        assert_eq!(engine.segments().len(), 1);
        assert_eq!(engine.renderer().redraw_count(), 1);
        assert_eq!(engine.surface().lines(), vec![((1.0, 1.0), (9.0, 9.0))]);
    }

    #[test]
    fn startup_sizes_the_surface_to_the_rect() {
        let engine = Engine::new(
            RecordingSurface::new(300, 150),
            MemoryStore::new(),
            SurfaceRect::new(0.0, 0.0, 640.0, 480.0, 1280, 960),
            &Config::default(),
        )
        .unwrap();
        assert_eq!(engine.surface().backing_size(), (1280, 960));
    }

    #[test]
    fn startup_fails_when_the_surface_cannot_be_sized() {
        let mut surface = RecordingSurface::new(300, 150);
        surface.fail_resize = true;
        let result = Engine::new(
            surface,
            MemoryStore::new(),
            SurfaceRect::unscaled(800, 600),
            &Config::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn strokes_are_persisted_in_logical_units_after_zoom() {
        let mut engine = engine();
        let request = engine.zoom_to(2.0);
        run_frames(&mut engine, request);
        assert_eq!(engine.view().zoom, 2.0);

        // Centre-anchored 2x: backing (400, 300) still shows logical (400, 300).
        draw_line(&mut engine, (400.0, 300.0), (420.0, 300.0));

        let segments = engine.segments();
        assert_eq!(segments[0].start, Point::new(400.0, 300.0));
        assert_eq!(segments[1].end, Point::new(410.0, 300.0));
    }

    #[test]
    fn pointer_down_settles_a_running_animation() {
        let mut engine = engine();
        let request = engine.zoom_in();
        assert!(request.is_some());
        assert!(engine.is_animating());

        engine.on_pointer_down(PointerButton::Primary, 10.0, 10.0);

        assert!(!engine.is_animating());
        assert!((engine.view().zoom - 1.05).abs() < 1e-12);
        let stale = request.unwrap().generation;
        assert!(engine.on_animation_frame(stale).is_none());
    }

    #[test]
    fn stroke_motion_settles_a_wheel_animation() {
        let mut engine = engine();
        engine.on_pointer_down(PointerButton::Primary, 5.0, 5.0);
        let request = engine.on_wheel(-1.0, 5.0, 5.0).unwrap();
        assert!(engine.is_animating());

        assert!(engine.on_pointer_move(50.0, 50.0));

        assert!(!engine.is_animating());
        assert!((engine.view().zoom - 1.02).abs() < 1e-12);
        assert!(engine.on_animation_frame(request.generation).is_none());
        let last = engine.segments().last().unwrap();
        assert_eq!(last.end, engine.view().to_logical(Point::new(50.0, 50.0)));
    }

    #[test]
    fn hover_motion_leaves_a_zoom_animation_running() {
        let mut engine = engine();
        let request = engine.zoom_in().unwrap();

        assert!(!engine.on_pointer_move(50.0, 50.0));

        assert!(engine.is_animating());
        assert!(engine.on_animation_frame(request.generation).is_some());
    }

    #[test]
    fn wheel_zoom_is_anchored_on_the_pointer() {
        let mut engine = engine();
        let before = engine.view().to_logical(Point::new(100.0, 50.0));

        let request = engine.on_wheel(-120.0, 100.0, 50.0);
        run_frames(&mut engine, request);

        let view = engine.view();
        assert!((view.zoom - 1.02).abs() < 1e-12);
        let after = view.to_logical(Point::new(100.0, 50.0));
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn clear_wipes_log_store_and_surface_and_cancels_zoom() {
        let mut engine = engine();
        draw_line(&mut engine, (0.0, 0.0), (10.0, 10.0));
        let request = engine.zoom_out();

        engine.clear();

        assert!(engine.segments().is_empty());
        assert!(engine.store().load().is_empty());
        assert!(!engine.is_animating());
        assert!(engine.on_animation_frame(request.unwrap().generation).is_none());
        assert!(matches!(
            engine.surface().ops.last(),
            Some(crate::draw::surface::testing::Op::Scale(..))
        ));
        assert!(engine.surface().clears() >= 2);
    }

    #[test]
    fn tool_switch_ends_the_stroke_and_cancels_zoom() {
        let mut engine = engine();
        engine.on_pointer_down(PointerButton::Primary, 5.0, 5.0);
        let _ = engine.on_wheel(1.0, 5.0, 5.0);
        assert!(engine.is_stroking());
        assert!(engine.is_animating());

        assert_eq!(engine.toggle_eraser(), Tool::Eraser);

        assert!(!engine.is_stroking());
        assert!(!engine.is_animating());
        assert!(!engine.on_pointer_move(50.0, 50.0));
    }

    #[test]
    fn eraser_removes_nearby_ink_and_repaints() {
        let mut engine = engine();
        draw_line(&mut engine, (100.0, 100.0), (150.0, 100.0));
        draw_line(&mut engine, (500.0, 500.0), (550.0, 500.0));
        let redraws = engine.renderer().redraw_count();

        engine.set_tool(Tool::Eraser);
        draw_line(&mut engine, (98.0, 98.0), (148.0, 102.0));

        assert!(engine.segments().iter().all(|s| s.start.x >= 500.0));
        assert_eq!(engine.renderer().redraw_count(), redraws + 1);
    }

    #[test]
    fn resize_replays_the_log() {
        let mut engine = engine();
        draw_line(&mut engine, (10.0, 10.0), (20.0, 20.0));

        assert!(engine.on_resize(SurfaceRect::unscaled(1200, 800)));
        assert_eq!(engine.surface().backing_size(), (1200, 800));
        assert_eq!(engine.rect().backing_size(), (1200, 800));
        assert_eq!(engine.segments().len(), 2);
    }

    #[test]
    fn quota_failures_do_not_interrupt_drawing() {
        let mut engine = engine_with(MemoryStore::with_quota(64));
        draw_line(&mut engine, (0.0, 0.0), (10.0, 10.0));
        assert_eq!(engine.segments().len(), 2);
        assert!(!engine.is_durable());
    }

    #[test]
    fn set_color_applies_to_next_stroke() {
        let mut engine = engine();
        engine.set_color("green");
        draw_line(&mut engine, (0.0, 0.0), (1.0, 1.0));
        assert!(engine.segments().iter().all(|s| s.color.as_str() == "green"));
        assert_eq!(engine.color().as_str(), "green");
    }
}
