//! Maps the nose position onto directional intents around a dead-zone.
//!
//! The dead-zone is centred on the calibration point. Leaving it to the
//! right/left/up fires the matching intent once `|d|` strictly exceeds the
//! threshold. The downward bound is pulled in by `y_offset` because heads
//! tilt further down than up. Horizontal and vertical intents are
//! independent; staying inside the zone yields [`Intent::Center`].

use crate::{
    constants::{DEFAULT_THRESHOLD_X, DEFAULT_THRESHOLD_Y, DEFAULT_Y_OFFSET},
    landmarks::Point,
    Error, Result,
};
use serde::{Deserialize, Serialize};

/// A directional decision for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Nose left of the dead-zone
    Left,
    /// Nose right of the dead-zone
    Right,
    /// Nose above the dead-zone
    Up,
    /// Nose below the dead-zone
    Down,
    /// Nose inside the dead-zone
    Center,
}

/// Horizontal component of a frame's motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    /// Moving left
    Left,
    /// Moving right
    Right,
}

/// Vertical component of a frame's motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    /// Moving up
    Up,
    /// Moving down
    Down,
}

/// Result of mapping one nose position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Motion {
    /// Horizontal intent, if the nose left the zone sideways
    pub horizontal: Option<Horizontal>,
    /// Vertical intent, if the nose left the zone vertically
    pub vertical: Option<Vertical>,
}

impl Motion {
    /// True when no directional intent fired
    #[must_use]
    pub const fn is_center(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none()
    }

    /// Intents in dispatch order: horizontal, vertical, or `Center` alone
    #[must_use]
    pub fn intents(&self) -> Vec<Intent> {
        if self.is_center() {
            return vec![Intent::Center];
        }
        let horizontal = self.horizontal.map(|h| match h {
            Horizontal::Left => Intent::Left,
            Horizontal::Right => Intent::Right,
        });
        let vertical = self.vertical.map(|v| match v {
            Vertical::Up => Intent::Up,
            Vertical::Down => Intent::Down,
        });
        horizontal.into_iter().chain(vertical).collect()
    }

    /// Whether `intent` is part of this motion
    #[must_use]
    pub fn contains(&self, intent: Intent) -> bool {
        self.intents().contains(&intent)
    }
}

/// Dead-zone configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionThresholds {
    /// Horizontal half width of the dead-zone
    pub thresh_x: f64,
    /// Vertical half height of the dead-zone (upward bound)
    pub thresh_y: f64,
    /// Amount the downward bound is pulled towards the center
    pub y_offset: f64,
}

impl Default for MotionThresholds {
    fn default() -> Self {
        Self {
            thresh_x: DEFAULT_THRESHOLD_X,
            thresh_y: DEFAULT_THRESHOLD_Y,
            y_offset: DEFAULT_Y_OFFSET,
        }
    }
}

impl MotionThresholds {
    /// Create new thresholds
    #[must_use]
    pub const fn new(thresh_x: f64, thresh_y: f64, y_offset: f64) -> Self {
        Self {
            thresh_x,
            thresh_y,
            y_offset,
        }
    }

    /// Check the thresholds are usable
    ///
    /// # Errors
    ///
    /// Returns an error if any threshold is negative or not finite, or if
    /// `y_offset` exceeds `thresh_y` (the downward bound would cross the
    /// center and overlap the upward one)
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("X threshold", self.thresh_x),
            ("Y threshold", self.thresh_y),
            ("Y offset", self.y_offset),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::ConfigError(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.y_offset > self.thresh_y {
            return Err(Error::ConfigError(format!(
                "Y offset {} exceeds Y threshold {}",
                self.y_offset, self.thresh_y
            )));
        }
        Ok(())
    }
}

/// Classify a nose position relative to the calibration center
///
/// `thresholds` are expected to pass [`MotionThresholds::validate`], which
/// keeps the up and down conditions disjoint.
#[must_use]
pub fn map(nose: Point, center: Point, thresholds: &MotionThresholds) -> Motion {
    let dx = f64::from(nose.x) - f64::from(center.x);
    let dy = f64::from(nose.y) - f64::from(center.y);

    let horizontal = if dx > thresholds.thresh_x {
        Some(Horizontal::Right)
    } else if dx < -thresholds.thresh_x {
        Some(Horizontal::Left)
    } else {
        None
    };

    let vertical = if dy > thresholds.thresh_y - thresholds.y_offset {
        Some(Vertical::Down)
    } else if dy < -thresholds.thresh_y {
        Some(Vertical::Up)
    } else {
        None
    };

    Motion {
        horizontal,
        vertical,
    }
}

/// The dead-zone rectangle in frame coordinates, for overlays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadZone {
    /// Left bound (`center.x - thresh_x`)
    pub left: f64,
    /// Right bound (`center.x + thresh_x`)
    pub right: f64,
    /// Upper bound (`center.y - thresh_y`)
    pub top: f64,
    /// Lower bound (`center.y + thresh_y - y_offset`)
    pub bottom: f64,
}

impl DeadZone {
    /// Dead-zone around `center`
    #[must_use]
    pub fn around(center: Point, thresholds: &MotionThresholds) -> Self {
        let cx = f64::from(center.x);
        let cy = f64::from(center.y);
        Self {
            left: cx - thresholds.thresh_x,
            right: cx + thresholds.thresh_x,
            top: cy - thresholds.thresh_y,
            bottom: cy + thresholds.thresh_y - thresholds.y_offset,
        }
    }

    /// Whether the nose at `point` would map to `Center`
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        let x = f64::from(point.x);
        let y = f64::from(point.y);
        (self.left..=self.right).contains(&x) && (self.top..=self.bottom).contains(&y)
    }

    /// Corners clockwise from top-left, for drawing
    #[must_use]
    pub const fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.left, self.top),
            (self.right, self.top),
            (self.right, self.bottom),
            (self.left, self.bottom),
        ]
    }
}
