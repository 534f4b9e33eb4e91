//! Configuration support.
//!
//! Settings are plain TOML handed over by the host; the library never goes
//! looking for a config file itself. Every section and field has a default,
//! so an empty document is a valid configuration.

pub mod enums;
pub mod types;

pub use enums::{ColorSpec, EraseStrategy};
pub use types::{DrawingConfig, StorageConfig, ZoomConfig};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure containing all settings.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_color = "#000000"
/// pen_width = 2.0
/// eraser_width = 20.0
/// erase_radius = 10.0
/// erase_strategy = "filter"
///
/// [zoom]
/// min = 0.5
/// max = 3.0
/// button_factor = 1.05
/// wheel_factor = 1.02
/// animate = true
/// animation_steps = 10
///
/// [storage]
/// key = "canvasPaths"
/// max_segments = 0
/// max_bytes = 5242880
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Tool defaults and eraser behaviour
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Zoom range, step factors and animation
    #[serde(default)]
    pub zoom: ZoomConfig,

    /// Durable storage key and limits
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Parses a TOML document and validates it.
    ///
    /// # Errors
    /// Returns an error if `text` is not valid TOML for this structure.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(text).context("Failed to parse config")?;
        config.validate_and_clamp();
        Ok(config)
    }

    /// Loads configuration from `path`, or returns defaults if it does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let mut config: Config = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.validate_and_clamp();

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);
        Ok(config)
    }

    /// Serialises the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value (or reset to the
    /// default when not a number) and a warning is logged.
    ///
    /// Validated ranges:
    /// - `drawing.pen_width`: 0.5 - 50.0
    /// - `drawing.eraser_width`: 1.0 - 200.0
    /// - `drawing.erase_radius`: 0.0 - 500.0
    /// - `zoom.min`: 0.05 - 1.0, `zoom.max`: 1.0 - 20.0
    /// - `zoom.button_factor`, `zoom.wheel_factor`: 1.001 - 2.0
    /// - `zoom.animation_steps`: 1 - 120
    pub fn validate_and_clamp(&mut self) {
        let defaults = Config::default();

        if !self.drawing.default_color.is_valid() {
            warn!(
                "Invalid default_color {:?}, falling back to black",
                self.drawing.default_color
            );
            self.drawing.default_color = defaults.drawing.default_color.clone();
        }

        clamp_field(
            "drawing.pen_width",
            &mut self.drawing.pen_width,
            0.5,
            50.0,
            defaults.drawing.pen_width,
        );
        clamp_field(
            "drawing.eraser_width",
            &mut self.drawing.eraser_width,
            1.0,
            200.0,
            defaults.drawing.eraser_width,
        );
        clamp_field(
            "drawing.erase_radius",
            &mut self.drawing.erase_radius,
            0.0,
            500.0,
            defaults.drawing.erase_radius,
        );

        // min <= 1.0 <= max keeps the initial zoom inside the range.
        clamp_field("zoom.min", &mut self.zoom.min, 0.05, 1.0, defaults.zoom.min);
        clamp_field("zoom.max", &mut self.zoom.max, 1.0, 20.0, defaults.zoom.max);
        clamp_field(
            "zoom.button_factor",
            &mut self.zoom.button_factor,
            1.001,
            2.0,
            defaults.zoom.button_factor,
        );
        clamp_field(
            "zoom.wheel_factor",
            &mut self.zoom.wheel_factor,
            1.001,
            2.0,
            defaults.zoom.wheel_factor,
        );

        if !(1..=120).contains(&self.zoom.animation_steps) {
            warn!(
                "Invalid zoom.animation_steps {}, clamping to 1-120 range",
                self.zoom.animation_steps
            );
            self.zoom.animation_steps = self.zoom.animation_steps.clamp(1, 120);
        }

        if self.storage.key.trim().is_empty() {
            warn!(
                "Empty storage key, falling back to '{}'",
                defaults.storage.key
            );
            self.storage.key = defaults.storage.key;
        }
    }
}

fn clamp_field(name: &str, value: &mut f64, min: f64, max: f64, default: f64) {
    if !value.is_finite() {
        warn!("Invalid {name} {value}, using default {default}");
        *value = default;
    } else if !(min..=max).contains(value) {
        warn!("Invalid {name} {value:.3}, clamping to {min}-{max} range");
        *value = value.clamp(min, max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.storage.key, "canvasPaths");
        assert_eq!(config.zoom.animation_steps, 10);
        assert_eq!(config.drawing.erase_strategy, EraseStrategy::Filter);
    }

    #[test]
    fn parses_every_section() {
        let config = Config::from_toml_str(
            r#"
            [drawing]
            default_color = [255, 0, 0]
            pen_width = 4.0
            erase_strategy = "composite"

            [zoom]
            min = 0.25
            max = 8.0
            animate = false

            [storage]
            key = "sketch"
            max_segments = 5000
            "#,
        )
        .unwrap();

        assert_eq!(config.drawing.default_color, ColorSpec::Rgb([255, 0, 0]));
        assert_eq!(config.drawing.default_color.to_color_value().as_str(), "#ff0000");
        assert_eq!(config.drawing.pen_width, 4.0);
        assert_eq!(config.drawing.erase_strategy, EraseStrategy::Composite);
        assert_eq!(config.zoom.settings().bounds, crate::view::ZoomBounds::new(0.25, 8.0));
        assert!(!config.zoom.settings().animate);
        assert_eq!(config.storage.options().key, "sketch");
        assert_eq!(config.storage.options().max_segments, 5000);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = Config::from_toml_str(
            r#"
            [drawing]
            default_color = "chartreuse-ish"
            pen_width = 0.0
            erase_radius = -3.0

            [zoom]
            min = 2.0
            max = 100.0
            wheel_factor = 0.5
            animation_steps = 0

            [storage]
            key = "  "
            "#,
        )
        .unwrap();

        assert_eq!(config.drawing.default_color, ColorSpec::default());
        assert_eq!(config.drawing.pen_width, 0.5);
        assert_eq!(config.drawing.erase_radius, 0.0);
        assert_eq!(config.zoom.min, 1.0);
        assert_eq!(config.zoom.max, 20.0);
        assert_eq!(config.zoom.wheel_factor, 1.001);
        assert_eq!(config.zoom.animation_steps, 1);
        assert_eq!(config.storage.key, "canvasPaths");
    }

    #[test]
    fn non_finite_values_reset_to_defaults() {
        let mut config = Config::default();
        config.drawing.eraser_width = f64::NAN;
        config.zoom.max = f64::INFINITY;
        config.validate_and_clamp();
        assert_eq!(config.drawing.eraser_width, 20.0);
        assert_eq!(config.zoom.max, 3.0);
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(Config::from_toml_str("[zoom\nmin = ").is_err());
        assert!(Config::from_toml_str("[zoom]\nmin = \"small\"").is_err());
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::load_from(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_from_reads_and_validates_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("inkpad.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[drawing]\neraser_width = 1000.0\n[zoom]\nbutton_factor = 1.1").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.drawing.eraser_width, 200.0);
        assert_eq!(config.zoom.button_factor, 1.1);
    }

    #[test]
    fn serialised_config_parses_back() {
        let mut config = Config::default();
        config.zoom.animation_steps = 4;
        config.drawing.default_color = ColorSpec::Name("blue".into());
        let text = config.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }
}
