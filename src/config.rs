//! Configuration management for headmouse sessions

use crate::{
    constants::DEFAULT_SENSITIVITY,
    gesture_detector::{GestureThresholds, PrimaryEye},
    motion_mapper::MotionThresholds,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dead-zone around the calibration center
    pub motion: MotionThresholds,

    /// Wink detection
    pub eyes: EyeConfig,

    /// Mouth twitch detection
    pub mouth: MouthConfig,

    /// Output controller
    pub controller: ControllerConfig,
}

/// Wink detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeConfig {
    /// Eye aspect ratio below which an eye counts as closed
    pub ear_threshold: f64,

    /// Closed frames needed before a wink is recognised
    pub consec_frames: u32,

    /// Eye contour that drives the primary wink
    pub primary_eye: PrimaryEye,
}

/// Mouth twitch parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MouthConfig {
    /// Evaluate mouth movements at all
    pub enabled: bool,

    /// Corner drift that starts a twitch, in pixels
    pub active_threshold: f64,

    /// Corner drift below which a twitch is released, in pixels
    pub inactive_threshold: f64,
}

/// Output controller selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Controller kind (`mouse`, `keyboard`, `log`)
    pub kind: String,

    /// Pointer sensitivity coefficient
    pub sensitivity: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            motion: MotionThresholds::default(),
            eyes: EyeConfig::default(),
            mouth: MouthConfig::default(),
            controller: ControllerConfig::default(),
        }
    }
}

impl Default for EyeConfig {
    fn default() -> Self {
        let thresholds = GestureThresholds::default();
        Self {
            ear_threshold: thresholds.ear_threshold,
            consec_frames: thresholds.ear_consec_frames,
            primary_eye: PrimaryEye::Right,
        }
    }
}

impl Default for MouthConfig {
    fn default() -> Self {
        let thresholds = GestureThresholds::default();
        Self {
            enabled: false,
            active_threshold: thresholds.mouth_active_threshold,
            inactive_threshold: thresholds.mouth_inactive_threshold,
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            kind: "mouse".to_string(),
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Gesture thresholds described by this configuration
    #[must_use]
    pub fn gesture_thresholds(&self) -> GestureThresholds {
        GestureThresholds {
            ear_threshold: self.eyes.ear_threshold,
            ear_consec_frames: self.eyes.consec_frames,
            mouth_active_threshold: self.mouth.active_threshold,
            mouth_inactive_threshold: self.mouth.inactive_threshold,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.motion.validate()?;
        self.gesture_thresholds().validate()?;

        if !self.controller.sensitivity.is_finite() || self.controller.sensitivity < 0.0 {
            return Err(Error::ConfigError(format!(
                "Sensitivity must be a non-negative number, got {}",
                self.controller.sensitivity
            )));
        }
        if self.controller.kind.trim().is_empty() {
            return Err(Error::ConfigError("Controller kind must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Headmouse Configuration

# Dead-zone around the calibration center, in pixels
motion:
  thresh_x: 5.0
  thresh_y: 5.0
  y_offset: 0.0

# Wink detection
eyes:
  ear_threshold: 0.2
  consec_frames: 2
  primary_eye: "right"

# Mouth twitch detection
mouth:
  enabled: false
  active_threshold: 4.0
  inactive_threshold: 2.0

# Output controller (mouse, keyboard, log)
controller:
  kind: "mouse"
  sensitivity: 0.3
"#;
