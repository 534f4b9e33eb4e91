mod core;
mod pointer;

pub use core::{DrawTarget, InputController, StrokeState};
