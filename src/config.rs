use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::ballistics::{
    LaunchDefaults, MAX_ANGLE_DEG, MAX_GRAVITY_MPS2, MAX_SPEED_MPS, MIN_ANGLE_DEG, MIN_GRAVITY_MPS2,
};
use crate::core::window::{Canvas, ViewportMargins};
use crate::engine::AnimationSettings;
use crate::error::{LabError, Result};

pub const CONFIG_ENV_VAR: &str = "PARABOLA_LAB_CONFIG";
pub const DEFAULT_HISTORY_FILE: &str = "parabola_history.json";
pub const DEFAULT_RECENT_LIMIT: usize = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub path: PathBuf,
    pub recent_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_HISTORY_FILE),
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

/// Everything tunable about the lab. Every section and field is optional in
/// the TOML file.
///
/// ```toml
/// [canvas]
/// width = 480.0
///
/// [animation]
/// duration_cap_ms = 2000.0
///
/// [defaults]
/// gravity_mps2 = 1.62
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub canvas: Canvas,
    pub viewport: ViewportMargins,
    pub animation: AnimationSettings,
    pub defaults: LaunchDefaults,
    pub history: HistoryConfig,
}

impl LabConfig {
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| LabError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|source| LabError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given. A missing file means built-in defaults; any
    /// other read or parse failure is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        match Self::load(path) {
            Err(LabError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let within = |name: &str, value: f64, min: f64, max: f64| {
            if (min..=max).contains(&value) {
                Ok(())
            } else {
                Err(LabError::InvalidConfig(format!(
                    "{name} must be within [{min}, {max}], got {value}"
                )))
            }
        };
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(LabError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )))
            }
        };

        positive("canvas.width", self.canvas.width)?;
        positive("canvas.height", self.canvas.height)?;
        positive("viewport.range_factor", self.viewport.range_factor)?;
        positive("viewport.height_factor", self.viewport.height_factor)?;
        positive("viewport.min_span_m", self.viewport.min_span_m)?;
        positive("animation.ms_per_flight_second", self.animation.ms_per_flight_second)?;
        positive("animation.duration_cap_ms", self.animation.duration_cap_ms)?;
        positive("defaults.speed_mps", self.defaults.speed_mps)?;
        within("defaults.speed_mps", self.defaults.speed_mps, 0.0, MAX_SPEED_MPS)?;
        within(
            "defaults.gravity_mps2",
            self.defaults.gravity_mps2,
            MIN_GRAVITY_MPS2,
            MAX_GRAVITY_MPS2,
        )?;

        if !self.canvas.padding.is_finite() || self.canvas.padding < 0.0 {
            return Err(LabError::InvalidConfig(format!(
                "canvas.padding must not be negative, got {}",
                self.canvas.padding
            )));
        }
        if !(MIN_ANGLE_DEG..=MAX_ANGLE_DEG).contains(&self.defaults.angle_deg) {
            return Err(LabError::InvalidConfig(format!(
                "defaults.angle_deg must be within [{MIN_ANGLE_DEG}, {MAX_ANGLE_DEG}], got {}",
                self.defaults.angle_deg
            )));
        }
        if self.animation.sample_count == 0 {
            return Err(LabError::InvalidConfig(
                "animation.sample_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = LabConfig::from_toml_str("").expect("empty config parses");
        assert_eq!(config, LabConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = LabConfig::from_toml_str(
            r#"
            [canvas]
            width = 480.0

            [defaults]
            gravity_mps2 = 1.62
            "#,
        )
        .expect("partial config parses");

        assert_eq!(config.canvas.width, 480.0);
        assert_eq!(config.canvas.height, 250.0);
        assert_eq!(config.defaults.gravity_mps2, 1.62);
        assert_eq!(config.defaults.angle_deg, 45.0);
        assert_eq!(config.animation.sample_count, 100);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = LabConfig::load_or_default(Some(&dir.path().join("absent.toml")))
            .expect("missing file is not an error");
        assert_eq!(config, LabConfig::default());
    }

    #[test]
    fn malformed_file_reports_its_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[canvas\nwidth = ").expect("write");

        let err = LabConfig::load(file.path()).expect_err("malformed config");
        assert!(matches!(err, LabError::Config { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let config = LabConfig::from_toml_str("[defaults]\nangle_deg = 120.0")
            .expect("parses");
        assert!(matches!(
            config.validate(),
            Err(LabError::InvalidConfig(_))
        ));

        let config = LabConfig::from_toml_str("[animation]\nsample_count = 0").expect("parses");
        assert!(config.validate().is_err());
    }

    #[test]
    fn defaults_outside_the_finite_flight_range_are_rejected() {
        let config = LabConfig::from_toml_str("[defaults]\nspeed_mps = 1e200").expect("parses");
        assert!(matches!(config.validate(), Err(LabError::InvalidConfig(_))));

        let config = LabConfig::from_toml_str("[defaults]\ngravity_mps2 = 1e-320").expect("parses");
        assert!(matches!(config.validate(), Err(LabError::InvalidConfig(_))));
    }
}
