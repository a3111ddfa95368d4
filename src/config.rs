//! Run configuration: display bounds used by the bounds filter and the
//! styling shared by both renderers. Stored as JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::filter::DisplayBounds;

/// Largest accepted display extent, in pixels, on either axis.
pub const MAX_DISPLAY_EXTENT: i64 = 100_000;

/// Accepted range for the rendered image's width and height.
pub const IMAGE_EXTENT_RANGE: std::ops::RangeInclusive<u32> = 200..=8192;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("cannot read config file `{path}`: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write config file `{path}`: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    fn invalid_value<S: Into<String>>(field: &'static str, reason: S) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// PlotStyle
// ---------------------------------------------------------------------------

/// Rendered image size and marker sizes for targets and observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    /// Width of the written chart image in pixels.
    pub image_width: u32,
    /// Height of the written chart image in pixels.
    pub image_height: u32,
    /// Half the arm length of the `x` drawn at each target.
    pub target_half_size: f32,
    /// Opacity of the target markers.
    pub target_alpha: f32,
    /// Radius of the dot drawn per observation.
    pub observation_radius: f32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        PlotStyle {
            image_width: 1920,
            image_height: 1080,
            target_half_size: 27.0,
            target_alpha: 0.5,
            observation_radius: 3.0,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub bounds: DisplayBounds,
    pub plot: PlotStyle,
}

impl SessionConfig {
    /// Load and validate a config file. Missing keys take their defaults.
    pub fn from_json(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: SessionConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| ConfigError::FileWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("bounds.width", self.bounds.width), ("bounds.height", self.bounds.height)] {
            if !(1..=MAX_DISPLAY_EXTENT).contains(&value) {
                return Err(ConfigError::invalid_value(
                    field,
                    format!("must be within [1, {MAX_DISPLAY_EXTENT}], got {value}"),
                ));
            }
        }
        for (field, value) in [
            ("plot.image_width", self.plot.image_width),
            ("plot.image_height", self.plot.image_height),
        ] {
            if !IMAGE_EXTENT_RANGE.contains(&value) {
                return Err(ConfigError::invalid_value(
                    field,
                    format!(
                        "must be within [{}, {}], got {value}",
                        IMAGE_EXTENT_RANGE.start(),
                        IMAGE_EXTENT_RANGE.end()
                    ),
                ));
            }
        }
        if self.plot.target_half_size.is_nan() || self.plot.target_half_size <= 0.0 {
            return Err(ConfigError::invalid_value(
                "plot.target_half_size",
                "must be > 0",
            ));
        }
        if self.plot.observation_radius.is_nan() || self.plot.observation_radius <= 0.0 {
            return Err(ConfigError::invalid_value(
                "plot.observation_radius",
                "must be > 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.plot.target_alpha) {
            return Err(ConfigError::invalid_value(
                "plot.target_alpha",
                format!("must be within [0, 1], got {}", self.plot.target_alpha),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = SessionConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.bounds, DisplayBounds::new(1920, 1080));
    }

    #[test]
    fn zero_width_is_invalid() {
        let mut cfg = SessionConfig::default();
        cfg.bounds.width = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { field: "bounds.width", .. })
        ));
    }

    #[test]
    fn oversized_bounds_are_invalid() {
        let mut cfg = SessionConfig::default();
        cfg.bounds.width = u32::MAX as i64;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { field: "bounds.width", .. })
        ));

        cfg.bounds.width = 1920;
        cfg.bounds.height = (1 << 32) + 99;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { field: "bounds.height", .. })
        ));

        cfg.bounds.height = MAX_DISPLAY_EXTENT;
        cfg.validate().unwrap();
    }

    #[test]
    fn image_size_outside_range_is_invalid() {
        let mut cfg = SessionConfig::default();
        cfg.plot.image_width = 100_000;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { field: "plot.image_width", .. })
        ));
        cfg.plot.image_width = 1920;
        cfg.plot.image_height = 10;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn alpha_above_one_is_invalid() {
        let mut cfg = SessionConfig::default();
        cfg.plot.target_alpha = 1.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{ "bounds": { "width": 2560, "height": 1440 } }"#).unwrap();

        let cfg = SessionConfig::from_json(&path).unwrap();
        assert_eq!(cfg.bounds, DisplayBounds::new(2560, 1440));
        assert_eq!(cfg.plot, PlotStyle::default());
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        let mut cfg = SessionConfig::default();
        cfg.plot.observation_radius = 5.0;
        cfg.to_json(&path).unwrap();
        assert_eq!(SessionConfig::from_json(&path).unwrap(), cfg);
    }

    #[test]
    fn unreadable_file_reports_path() {
        let err = SessionConfig::from_json(Path::new("/nonexistent/cfg.json")).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
        assert!(err.to_string().contains("/nonexistent/cfg.json"));
    }
}
