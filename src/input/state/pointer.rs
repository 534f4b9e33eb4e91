use super::core::{DrawTarget, InputController, StrokeState};
use crate::config::EraseStrategy;
use crate::draw::{Point, Segment, Surface};
use crate::input::events::PointerButton;
use crate::input::tool::Tool;
use crate::session::KeyValueStore;
use crate::view::mapper;
use log::debug;

impl InputController {
    /// Processes a pointer press at client coordinates.
    ///
    /// # Behavior
    /// - Primary button: starts a stroke with the active tool and immediately
    ///   paints a zero-length segment, so a tap alone leaves a dot
    /// - Other buttons: ignored
    ///
    /// Returns whether the event was consumed.
    pub fn on_pointer_down<S: Surface, K: KeyValueStore>(
        &mut self,
        button: PointerButton,
        client_x: f64,
        client_y: f64,
        mut target: DrawTarget<'_, S, K>,
    ) -> bool {
        if button != PointerButton::Primary {
            return false;
        }
        if self.is_stroking() {
            debug!("Pointer down during a stroke; ending the previous stroke first");
            self.finish_stroke(&mut target);
        }
        let Some(point) = self.map_point(client_x, client_y, &target) else {
            return false;
        };

        let tool = self.tool;
        let dot = Segment::dot(point, self.color.clone(), tool.is_eraser());
        self.apply(dot, &mut target);
        self.state = StrokeState::Stroking { tool, last: point };
        true
    }

    /// Processes pointer motion at client coordinates.
    ///
    /// While stroking, emits one straight segment from the previous sample to
    /// this one. Fast motion leaves straight chords; nothing is interpolated.
    pub fn on_pointer_move<S: Surface, K: KeyValueStore>(
        &mut self,
        client_x: f64,
        client_y: f64,
        mut target: DrawTarget<'_, S, K>,
    ) -> bool {
        let StrokeState::Stroking { tool, last } = self.state else {
            return false;
        };
        let Some(point) = self.map_point(client_x, client_y, &target) else {
            return false;
        };

        let segment = Segment::new(last, point, self.color.clone(), tool.is_eraser());
        self.apply(segment, &mut target);
        self.state = StrokeState::Stroking { tool, last: point };
        true
    }

    /// Processes a pointer release. Ends any stroke in progress.
    pub fn on_pointer_up<S: Surface, K: KeyValueStore>(
        &mut self,
        mut target: DrawTarget<'_, S, K>,
    ) -> bool {
        self.finish_stroke(&mut target)
    }

    /// Processes the pointer leaving the surface. Same as a release.
    pub fn on_pointer_leave<S: Surface, K: KeyValueStore>(
        &mut self,
        mut target: DrawTarget<'_, S, K>,
    ) -> bool {
        self.finish_stroke(&mut target)
    }

    /// Ends the current stroke, if any, without further segments.
    pub fn end_stroke<S: Surface, K: KeyValueStore>(
        &mut self,
        mut target: DrawTarget<'_, S, K>,
    ) -> bool {
        self.finish_stroke(&mut target)
    }

    fn finish_stroke<S: Surface, K: KeyValueStore>(
        &mut self,
        target: &mut DrawTarget<'_, S, K>,
    ) -> bool {
        let StrokeState::Stroking { tool, .. } = self.state else {
            return false;
        };
        self.state = StrokeState::Idle;

        // The live eraser stroke was only a preview; repaint from the log.
        if tool == Tool::Eraser && self.strategy == EraseStrategy::Filter {
            target
                .renderer
                .redraw_all(target.store.segments(), &target.view);
        }
        true
    }

    fn map_point<S: Surface, K: KeyValueStore>(
        &self,
        client_x: f64,
        client_y: f64,
        target: &DrawTarget<'_, S, K>,
    ) -> Option<Point> {
        let point = mapper::to_logical(client_x, client_y, &target.view, &target.rect);
        if point.is_finite() {
            Some(point)
        } else {
            debug!("Dropping pointer sample ({client_x}, {client_y}) with no finite logical position");
            None
        }
    }

    fn apply<S: Surface, K: KeyValueStore>(
        &self,
        segment: Segment,
        target: &mut DrawTarget<'_, S, K>,
    ) {
        target.renderer.draw_segment(&segment, &target.view);
        if segment.is_eraser && self.strategy == EraseStrategy::Filter {
            target.store.erase_near(segment.end, self.erase_radius);
        } else {
            target.store.append(segment);
        }
    }
}
