//! Zoom controller: owns the committed view and animates zoom transitions.
//!
//! Anchor policy: button zoom keeps the canvas centre fixed, wheel zoom keeps
//! the logical point under the pointer fixed. Animation frames are scheduled
//! by the host; each animation carries a generation number and frames from a
//! superseded animation are dropped.

use super::transform::{ViewTransform, ZoomBounds};
use crate::draw::{Point, Renderer, Segment, Surface};
use log::debug;

/// Which way a zoom request goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// The backing-pixel point a zoom keeps fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomAnchor {
    /// Centre of the backing store.
    Center,
    /// A position in backing pixels, usually the pointer.
    Pointer(Point),
}

/// Tunables for zoom behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomSettings {
    pub bounds: ZoomBounds,
    /// Multiplier per toolbar button press.
    pub button_factor: f64,
    /// Multiplier per wheel notch.
    pub wheel_factor: f64,
    /// Interpolate towards the target instead of jumping.
    pub animate: bool,
    /// Number of frames an animated transition takes.
    pub animation_steps: u32,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            bounds: ZoomBounds::default(),
            button_factor: 1.05,
            wheel_factor: 1.02,
            animate: true,
            animation_steps: 10,
        }
    }
}

/// Ask the host to call back on the next animation frame with this generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest {
    pub generation: u64,
}

#[derive(Debug, Clone, Copy)]
struct ZoomAnimation {
    generation: u64,
    from: ViewTransform,
    anchor: Point,
    target_zoom: f64,
    step: u32,
    steps: u32,
}

impl ZoomAnimation {
    fn view_at(&self, backing: (u32, u32)) -> ViewTransform {
        let zoom = if self.step >= self.steps {
            self.target_zoom
        } else {
            let t = f64::from(self.step) / f64::from(self.steps);
            self.from.zoom + (self.target_zoom - self.from.zoom) * t
        };
        self.from
            .zoomed_about(self.anchor, zoom)
            .clamp_offset(backing.0, backing.1)
    }
}

/// Owns the [`ViewTransform`] and every change to its zoom.
#[derive(Debug)]
pub struct ZoomController {
    settings: ZoomSettings,
    view: ViewTransform,
    backing: (u32, u32),
    generation: u64,
    animation: Option<ZoomAnimation>,
}

impl ZoomController {
    pub fn new(settings: ZoomSettings, backing_width: u32, backing_height: u32) -> Self {
        let view = ViewTransform {
            zoom: settings.bounds.clamp(1.0),
            ..ViewTransform::default()
        }
        .clamp_offset(backing_width, backing_height);
        Self {
            settings,
            view,
            backing: (backing_width, backing_height),
            generation: 0,
            animation: None,
        }
    }

    pub fn settings(&self) -> &ZoomSettings {
        &self.settings
    }

    /// The view currently on screen (mid-animation this is an interpolated frame).
    pub fn transform(&self) -> ViewTransform {
        self.view
    }

    /// Zoom the controller is heading to.
    pub fn target_zoom(&self) -> f64 {
        self.animation
            .map_or(self.view.zoom, |animation| animation.target_zoom)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Generation of the most recent zoom request.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// One toolbar button press, anchored on the canvas centre.
    pub fn zoom_by_button<S: Surface>(
        &mut self,
        direction: ZoomDirection,
        renderer: &mut Renderer<S>,
        segments: &[Segment],
    ) -> Option<FrameRequest> {
        let factor = self.settings.button_factor;
        self.zoom_by(direction, factor, ZoomAnchor::Center, renderer, segments)
    }

    /// One wheel event at `pointer` (backing pixels). Positive `delta_y` zooms out.
    pub fn zoom_by_wheel<S: Surface>(
        &mut self,
        delta_y: f64,
        pointer: Point,
        renderer: &mut Renderer<S>,
        segments: &[Segment],
    ) -> Option<FrameRequest> {
        let direction = if delta_y > 0.0 {
            ZoomDirection::Out
        } else if delta_y < 0.0 {
            ZoomDirection::In
        } else {
            return None;
        };
        let factor = self.settings.wheel_factor;
        self.zoom_by(
            direction,
            factor,
            ZoomAnchor::Pointer(pointer),
            renderer,
            segments,
        )
    }

    /// Multiplies (in) or divides (out) the on-screen zoom by `factor`.
    ///
    /// A request during an animation starts from the interpolated frame and
    /// replaces the running animation; the superseded target is dropped.
    pub fn zoom_by<S: Surface>(
        &mut self,
        direction: ZoomDirection,
        factor: f64,
        anchor: ZoomAnchor,
        renderer: &mut Renderer<S>,
        segments: &[Segment],
    ) -> Option<FrameRequest> {
        let base = self.view.zoom;
        let candidate = match direction {
            ZoomDirection::In => base * factor,
            ZoomDirection::Out => base / factor,
        };
        self.zoom_to(candidate, anchor, renderer, segments)
    }

    /// Starts a transition to `zoom`, clamped into bounds.
    ///
    /// Any running animation is replaced; the new one starts from the frame
    /// currently on screen. Returns a frame request when the transition is
    /// animated, otherwise commits and redraws immediately.
    pub fn zoom_to<S: Surface>(
        &mut self,
        zoom: f64,
        anchor: ZoomAnchor,
        renderer: &mut Renderer<S>,
        segments: &[Segment],
    ) -> Option<FrameRequest> {
        if let Some(previous) = self.animation.take() {
            debug!(
                "Zoom animation {} superseded at step {}/{}",
                previous.generation, previous.step, previous.steps
            );
        }
        self.generation = self.generation.wrapping_add(1);

        let anchor = self.resolve(anchor);
        let target_zoom = self.settings.bounds.clamp(zoom);
        let (w, h) = self.backing;
        let target = self.view.zoomed_about(anchor, target_zoom).clamp_offset(w, h);
        if target == self.view {
            debug!("Zoom request leaves view unchanged at {:.3}", target_zoom);
            return None;
        }

        if !self.settings.animate || self.settings.animation_steps <= 1 {
            self.commit(target, renderer, segments);
            return None;
        }

        self.animation = Some(ZoomAnimation {
            generation: self.generation,
            from: self.view,
            anchor,
            target_zoom,
            step: 0,
            steps: self.settings.animation_steps,
        });
        debug!(
            "Zoom animation {} from {:.3} to {:.3}",
            self.generation, self.view.zoom, target_zoom
        );
        Some(FrameRequest {
            generation: self.generation,
        })
    }

    /// Advances the animation by one frame and redraws.
    ///
    /// Frames whose generation does not match the running animation are ignored.
    pub fn on_frame<S: Surface>(
        &mut self,
        generation: u64,
        renderer: &mut Renderer<S>,
        segments: &[Segment],
    ) -> Option<FrameRequest> {
        let backing = self.backing;
        let Some(animation) = self.animation.as_mut() else {
            debug!("Ignoring zoom frame {generation}: no animation running");
            return None;
        };
        if animation.generation != generation {
            debug!(
                "Ignoring stale zoom frame {generation} (current {})",
                animation.generation
            );
            return None;
        }

        animation.step += 1;
        let view = animation.view_at(backing);
        let finished = animation.step >= animation.steps;
        if finished {
            self.animation = None;
        }
        self.commit(view, renderer, segments);
        (!finished).then_some(FrameRequest { generation })
    }

    /// Jumps a running animation to its terminal view and redraws once there.
    ///
    /// Pending frames become stale. Returns whether an animation was running.
    pub fn finish_animation<S: Surface>(
        &mut self,
        renderer: &mut Renderer<S>,
        segments: &[Segment],
    ) -> bool {
        let Some(view) = self.terminal_view() else {
            return false;
        };
        self.commit(view, renderer, segments);
        true
    }

    /// Records a new backing size and re-clamps the offset. Does not redraw.
    ///
    /// A running animation is first jumped to its terminal view in the old
    /// geometry; its frames become stale.
    pub fn set_backing_size(&mut self, width: u32, height: u32) {
        if let Some(view) = self.terminal_view() {
            debug!("Zoom animation settled at {:.3} by a backing resize", view.zoom);
            self.view = view;
        }
        self.backing = (width, height);
        self.view = self.view.clamp_offset(width, height);
    }

    /// Ends the running animation, if any, and returns its terminal view.
    fn terminal_view(&mut self) -> Option<ViewTransform> {
        let mut animation = self.animation.take()?;
        self.generation = self.generation.wrapping_add(1);
        animation.step = animation.steps;
        Some(animation.view_at(self.backing))
    }

    fn resolve(&self, anchor: ZoomAnchor) -> Point {
        match anchor {
            ZoomAnchor::Center => Point {
                x: f64::from(self.backing.0) / 2.0,
                y: f64::from(self.backing.1) / 2.0,
            },
            ZoomAnchor::Pointer(point) => point,
        }
    }

    fn commit<S: Surface>(
        &mut self,
        view: ViewTransform,
        renderer: &mut Renderer<S>,
        segments: &[Segment],
    ) {
        self.view = view;
        renderer.redraw_all(segments, &view);
    }
}
