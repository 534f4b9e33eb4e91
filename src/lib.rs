//! Zoomable freehand drawing surface.
//!
//! Pointer input is mapped through the current zoom/pan transform into a
//! logical drawing space and stored as an ordered log of straight segments.
//! The visible surface is always reproducible from that log: zooming,
//! resizing and erasing repaint it from scratch.
//!
//! - [`draw`]: segments, the path log, the [`draw::Surface`] capability and the renderer
//! - [`view`]: view transform, pointer mapping, zoom animation, surface geometry
//! - [`input`]: pen/eraser stroke state machine
//! - [`session`]: durable storage of the path log
//! - [`config`]: TOML settings
//! - [`Engine`]: all of the above wired to host events

pub mod config;
pub mod draw;
pub mod engine;
pub mod input;
pub mod session;
pub mod view;

#[cfg(feature = "web")]
pub mod web;

pub use config::Config;
pub use engine::Engine;
