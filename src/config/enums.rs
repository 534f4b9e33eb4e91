//! Configuration enum types.

use crate::draw::{Color, ColorValue};
use log::warn;
use serde::{Deserialize, Serialize};

/// Color specification - either a CSS color string or RGB values.
///
/// # Examples
/// ```toml
/// # Named or hex color
/// default_color = "#1e90ff"
///
/// # RGB color (0-255 per component)
/// default_color = [255, 128, 0]
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ColorSpec {
    /// CSS color: a name (red, green, blue, ...) or `#rgb`/`#rrggbb`/`#rrggbbaa`
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl Default for ColorSpec {
    fn default() -> Self {
        ColorSpec::Name("#000000".to_string())
    }
}

impl ColorSpec {
    /// Whether the renderer can resolve this color.
    pub fn is_valid(&self) -> bool {
        match self {
            ColorSpec::Name(name) => Color::parse_css(name).is_some(),
            ColorSpec::Rgb(_) => true,
        }
    }

    /// The string stored with segments drawn in this color.
    ///
    /// Names are kept verbatim so stored logs match what the user picked.
    /// Unknown names fall back to black with a warning.
    pub fn to_color_value(&self) -> ColorValue {
        match self {
            ColorSpec::Name(name) if Color::parse_css(name).is_some() => ColorValue::new(name.trim()),
            ColorSpec::Name(name) => {
                warn!("Unknown color '{}', using black", name);
                ColorValue::default()
            }
            ColorSpec::Rgb([r, g, b]) => ColorValue::from(Color {
                r: f64::from(*r) / 255.0,
                g: f64::from(*g) / 255.0,
                b: f64::from(*b) / 255.0,
                a: 1.0,
            }),
        }
    }
}

/// How the eraser removes ink.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EraseStrategy {
    /// Remove logged segments near the eraser; the stroke itself is only a
    /// live preview and is reconciled by a full redraw when it ends.
    #[default]
    Filter,
    /// Record eraser segments in the log and replay them as transparency.
    Composite,
}
