//! Configuration type definitions.

use super::enums::{ColorSpec, EraseStrategy};
use crate::draw::StrokeStyle;
use crate::session::{DEFAULT_MAX_BYTES, DEFAULT_STORAGE_KEY, FileStore, StorageOptions};
use crate::view::{ZoomBounds, ZoomSettings};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Drawing-related settings.
///
/// Controls the tool defaults in effect when a session starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingConfig {
    /// Initial pen color - a CSS color string or an RGB array like `[255, 0, 0]`
    #[serde(default)]
    pub default_color: ColorSpec,

    /// Pen line width in logical units (valid range: 0.5 - 50.0)
    #[serde(default = "default_pen_width")]
    pub pen_width: f64,

    /// Eraser line width in logical units (valid range: 1.0 - 200.0)
    #[serde(default = "default_eraser_width")]
    pub eraser_width: f64,

    /// Distance from the eraser within which segment endpoints are removed
    /// (valid range: 0.0 - 500.0)
    #[serde(default = "default_erase_radius")]
    pub erase_radius: f64,

    /// `filter` (remove segments from the log) or `composite` (log eraser marks)
    #[serde(default)]
    pub erase_strategy: EraseStrategy,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: ColorSpec::default(),
            pen_width: default_pen_width(),
            eraser_width: default_eraser_width(),
            erase_radius: default_erase_radius(),
            erase_strategy: EraseStrategy::default(),
        }
    }
}

impl DrawingConfig {
    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            pen_width: self.pen_width,
            eraser_width: self.eraser_width,
        }
    }
}

/// Zoom behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    /// Smallest zoom factor (valid range: 0.05 - 1.0)
    #[serde(default = "default_zoom_min")]
    pub min: f64,

    /// Largest zoom factor (valid range: 1.0 - 20.0)
    #[serde(default = "default_zoom_max")]
    pub max: f64,

    /// Multiplier per zoom button press (valid range: 1.001 - 2.0)
    #[serde(default = "default_button_factor")]
    pub button_factor: f64,

    /// Multiplier per wheel event (valid range: 1.001 - 2.0)
    #[serde(default = "default_wheel_factor")]
    pub wheel_factor: f64,

    /// Animate zoom transitions instead of jumping
    #[serde(default = "default_animate")]
    pub animate: bool,

    /// Frames per animated transition (valid range: 1 - 120)
    #[serde(default = "default_animation_steps")]
    pub animation_steps: u32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: default_zoom_min(),
            max: default_zoom_max(),
            button_factor: default_button_factor(),
            wheel_factor: default_wheel_factor(),
            animate: default_animate(),
            animation_steps: default_animation_steps(),
        }
    }
}

impl ZoomConfig {
    pub fn settings(&self) -> ZoomSettings {
        ZoomSettings {
            bounds: ZoomBounds::new(self.min, self.max),
            button_factor: self.button_factor,
            wheel_factor: self.wheel_factor,
            animate: self.animate,
            animation_steps: self.animation_steps,
        }
    }
}

/// Durable storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key the path log is stored under
    #[serde(default = "default_storage_key")]
    pub key: String,

    /// Maximum segments kept in the log; 0 means unlimited
    #[serde(default)]
    pub max_segments: usize,

    /// Byte limit for the stored log in file-backed storage; 0 means unlimited
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
            max_segments: 0,
            max_bytes: default_max_bytes(),
        }
    }
}

impl StorageConfig {
    pub fn options(&self) -> StorageOptions {
        StorageOptions {
            key: self.key.clone(),
            max_segments: self.max_segments,
        }
    }

    /// File-backed store rooted at `base_dir` honouring `max_bytes`.
    pub fn file_store(&self, base_dir: impl Into<PathBuf>) -> FileStore {
        FileStore::new(base_dir).with_max_bytes(self.max_bytes)
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_pen_width() -> f64 {
    2.0
}

fn default_eraser_width() -> f64 {
    20.0
}

fn default_erase_radius() -> f64 {
    10.0
}

fn default_zoom_min() -> f64 {
    0.5
}

fn default_zoom_max() -> f64 {
    3.0
}

fn default_button_factor() -> f64 {
    1.05
}

fn default_wheel_factor() -> f64 {
    1.02
}

fn default_animate() -> bool {
    true
}

fn default_animation_steps() -> u32 {
    10
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_max_bytes() -> usize {
    DEFAULT_MAX_BYTES
}
