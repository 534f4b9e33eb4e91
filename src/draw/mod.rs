//! Drawing primitives: colors, segments, the path log and the renderer.
//!
//! This module defines the core drawing types:
//! - [`Color`] / [`ColorValue`]: RGBA colors and the string form stored with segments
//! - [`Segment`] / [`Point`]: one straight sub-stroke in logical space
//! - [`PathLog`]: ordered segment sequence (paint order)
//! - [`Surface`]: the 2D immediate-mode capability a host provides
//! - [`Renderer`]: incremental and full-surface painting

pub mod color;
pub mod path_log;
pub mod render;
pub mod segment;
pub mod surface;

#[cfg(feature = "cairo")]
pub mod cairo_surface;

// Re-export commonly used types at module level
pub use color::{Color, ColorValue};
pub use path_log::PathLog;
pub use render::{Renderer, StrokeStyle};
pub use segment::{Point, Segment};
pub use surface::{CompositeMode, Surface, SurfaceError};

#[cfg(feature = "cairo")]
pub use cairo_surface::CairoSurface;

#[allow(unused_imports)]
pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, WHITE, YELLOW};
