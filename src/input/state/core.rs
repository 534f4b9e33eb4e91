//! Core input state types.

use crate::config::EraseStrategy;
use crate::draw::{ColorValue, Point, Renderer, Surface};
use crate::input::tool::Tool;
use crate::session::{KeyValueStore, PathStore};
use crate::view::{SurfaceRect, ViewTransform};
use log::info;

/// Stroke state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeState {
    /// Waiting for a pointer press
    Idle,
    /// Pointer is down and producing segments
    Stroking {
        /// Tool captured when the stroke began
        tool: Tool,
        /// Last logical point, start of the next segment
        last: Point,
    },
}

/// Everything a pointer event may touch, borrowed from the engine for the
/// duration of one event.
pub struct DrawTarget<'a, S: Surface, K: KeyValueStore> {
    pub view: ViewTransform,
    pub rect: SurfaceRect,
    pub renderer: &'a mut Renderer<S>,
    pub store: &'a mut PathStore<K>,
}

/// Turns pointer events into path log mutations and renderer calls.
///
/// Owns the tool state (active tool and color). Reads the view transform it is
/// handed with each event and never changes it.
#[derive(Debug, Clone)]
pub struct InputController {
    pub(super) state: StrokeState,
    pub(super) tool: Tool,
    pub(super) color: ColorValue,
    pub(super) strategy: EraseStrategy,
    pub(super) erase_radius: f64,
}

impl InputController {
    pub fn new(color: ColorValue, strategy: EraseStrategy, erase_radius: f64) -> Self {
        Self {
            state: StrokeState::Idle,
            tool: Tool::Pen,
            color,
            strategy,
            erase_radius,
        }
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_stroking(&self) -> bool {
        matches!(self.state, StrokeState::Stroking { .. })
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Color applied to new segments.
    pub fn color(&self) -> &ColorValue {
        &self.color
    }

    pub fn erase_strategy(&self) -> EraseStrategy {
        self.strategy
    }

    pub fn erase_radius(&self) -> f64 {
        self.erase_radius
    }

    /// Selects the tool for the next stroke. Returns whether it changed.
    ///
    /// A stroke in progress keeps the tool it started with; callers end it
    /// first (see [`InputController::end_stroke`]).
    pub fn set_tool(&mut self, tool: Tool) -> bool {
        if self.tool == tool {
            return false;
        }
        info!("Tool changed to {:?}", tool);
        self.tool = tool;
        true
    }

    pub fn toggle_eraser(&mut self) -> Tool {
        let next = self.tool.toggled();
        self.set_tool(next);
        next
    }

    /// Sets the color for new pen segments. Eraser strokes ignore it.
    pub fn set_color(&mut self, color: ColorValue) {
        self.color = color;
    }
}
