//! Input handling and tool state machine.
//!
//! This module translates host pointer events into drawing actions. It holds
//! the tool state (pen or eraser, current color) and the stroke state machine
//! (idle or stroking).

pub mod events;
pub mod state;
pub mod tool;

// Re-export commonly used types at module level
pub use events::PointerButton;
pub use state::{DrawTarget, InputController, StrokeState};
pub use tool::Tool;
