//! Gesture detection from per-frame facial landmarks.
//!
//! Two kinds of gestures are recognised:
//!
//! * winks, from the eye aspect ratio (EAR) of each eye contour. A wink is
//!   edge-triggered: the eye has to stay closed for a number of consecutive
//!   frames and the event fires once, on the frame the eye opens again.
//! * mouth twitches, from how far the right mouth corner drifts away from
//!   where the nose says it should be. A hysteresis band keeps the detector
//!   from chattering around the trigger distance.

use crate::{
    constants::{
        DEFAULT_EAR_CONSEC_FRAMES, DEFAULT_EAR_THRESHOLD, DEFAULT_MOUTH_ACTIVE_THRESHOLD,
        DEFAULT_MOUTH_INACTIVE_THRESHOLD, LEFT_EYE_POINTS, MOUTH_RIGHT_CORNER_POINT, NOSE_POINT,
        RIGHT_EYE_POINTS,
    },
    landmarks::{LandmarkSet, Point},
    Error, Result,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Compute the eye aspect ratio of a six point eye contour.
///
/// `(|p2-p6| + |p3-p5|) / (2 |p1-p4|)`. A contour with no horizontal extent
/// has no meaningful ratio and is reported as wide open.
#[must_use]
pub fn eye_aspect_ratio(eye: &[Point; 6]) -> f64 {
    let vertical_a = eye[1].distance(eye[5]);
    let vertical_b = eye[2].distance(eye[4]);
    let horizontal = eye[0].distance(eye[3]);
    if horizontal == 0.0 {
        return f64::INFINITY;
    }
    (vertical_a + vertical_b) / (2.0 * horizontal)
}

/// Which eye contour drives the primary (right) wink
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryEye {
    /// Contour 36..42, the user's right eye in a mirrored frame
    #[default]
    Right,
    /// Contour 42..48
    Left,
}

impl PrimaryEye {
    /// Contours feeding the (right wink, left wink) detectors
    #[must_use]
    pub fn contours(self) -> (Range<usize>, Range<usize>) {
        match self {
            Self::Right => (RIGHT_EYE_POINTS, LEFT_EYE_POINTS),
            Self::Left => (LEFT_EYE_POINTS, RIGHT_EYE_POINTS),
        }
    }
}

/// Edge-triggered closure counter for one eye
#[derive(Debug, Clone)]
pub struct EyeClosureDetector {
    ear_threshold: f64,
    consec_frames: u32,
    counter: u32,
}

impl EyeClosureDetector {
    /// Create a new detector
    #[must_use]
    pub const fn new(ear_threshold: f64, consec_frames: u32) -> Self {
        Self {
            ear_threshold,
            consec_frames,
            counter: 0,
        }
    }

    /// Feed one frame's EAR; returns true on the frame a wink completes
    pub fn update(&mut self, ear: f64) -> bool {
        if ear < self.ear_threshold {
            self.counter = self.counter.saturating_add(1);
            return false;
        }
        let winked = self.counter >= self.consec_frames;
        self.counter = 0;
        winked
    }

    /// Consecutive closed frames seen so far
    #[must_use]
    pub const fn closed_frames(&self) -> u32 {
        self.counter
    }

    /// Change thresholds; the running counter is kept
    pub fn set_thresholds(&mut self, ear_threshold: f64, consec_frames: u32) {
        self.ear_threshold = ear_threshold;
        self.consec_frames = consec_frames;
    }

    /// Forget any closure in progress
    pub fn reset(&mut self) {
        self.counter = 0;
    }
}

/// Mouth corner drift detector with a hysteresis band
#[derive(Debug, Clone)]
pub struct MouthTwitchDetector {
    active_threshold: f64,
    inactive_threshold: f64,
    baseline: Option<(f64, f64)>,
    twitching: bool,
}

impl MouthTwitchDetector {
    /// Create a new detector
    #[must_use]
    pub const fn new(active_threshold: f64, inactive_threshold: f64) -> Self {
        Self {
            active_threshold,
            inactive_threshold,
            baseline: None,
            twitching: false,
        }
    }

    /// Drift of the mouth corner from where the nose predicts it.
    ///
    /// The first call records the nose-to-corner baseline and returns `None`.
    pub fn drift(&mut self, nose: Point, mouth_corner: Point) -> Option<f64> {
        let Some((bx, by)) = self.baseline else {
            self.baseline = Some((
                f64::from(nose.x) - f64::from(mouth_corner.x),
                f64::from(nose.y) - f64::from(mouth_corner.y),
            ));
            debug!("Mouth baseline recorded at nose {:?}, corner {:?}", nose, mouth_corner);
            return None;
        };
        let dx = f64::from(nose.x) - bx - f64::from(mouth_corner.x);
        let dy = f64::from(nose.y) - by - f64::from(mouth_corner.y);
        Some(dx.hypot(dy))
    }

    /// Feed one frame; returns true when a twitch starts
    pub fn update(&mut self, nose: Point, mouth_corner: Point) -> bool {
        let Some(distance) = self.drift(nose, mouth_corner) else {
            return false;
        };
        if self.twitching {
            if distance < self.inactive_threshold {
                self.twitching = false;
            }
            return false;
        }
        if distance > self.active_threshold {
            self.twitching = true;
            return true;
        }
        false
    }

    /// Whether the detector is inside a twitch and waiting for release
    #[must_use]
    pub const fn is_twitching(&self) -> bool {
        self.twitching
    }

    /// Whether a baseline has been recorded
    #[must_use]
    pub const fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// Change the hysteresis band
    pub fn set_thresholds(&mut self, active_threshold: f64, inactive_threshold: f64) {
        self.active_threshold = active_threshold;
        self.inactive_threshold = inactive_threshold;
    }

    /// Drop the baseline so the next frame records a new one
    pub fn reset(&mut self) {
        self.baseline = None;
        self.twitching = false;
    }
}

/// Tunables for gesture detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureThresholds {
    /// EAR below which an eye counts as closed
    pub ear_threshold: f64,
    /// Closed frames needed before a wink is recognised
    pub ear_consec_frames: u32,
    /// Mouth drift that starts a twitch
    pub mouth_active_threshold: f64,
    /// Mouth drift below which a twitch is released
    pub mouth_inactive_threshold: f64,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            ear_threshold: DEFAULT_EAR_THRESHOLD,
            ear_consec_frames: DEFAULT_EAR_CONSEC_FRAMES,
            mouth_active_threshold: DEFAULT_MOUTH_ACTIVE_THRESHOLD,
            mouth_inactive_threshold: DEFAULT_MOUTH_INACTIVE_THRESHOLD,
        }
    }
}

impl GestureThresholds {
    /// Check the thresholds are usable
    ///
    /// # Errors
    ///
    /// Returns an error for negative or non-finite thresholds, a zero frame
    /// count, or an inactive mouth threshold above the active one
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("EAR threshold", self.ear_threshold),
            ("mouth active threshold", self.mouth_active_threshold),
            ("mouth inactive threshold", self.mouth_inactive_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::ConfigError(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.ear_consec_frames == 0 {
            return Err(Error::ConfigError(
                "EAR consecutive frames must be greater than 0".to_string(),
            ));
        }
        if self.mouth_inactive_threshold > self.mouth_active_threshold {
            return Err(Error::ConfigError(format!(
                "Mouth inactive threshold {} exceeds active threshold {}",
                self.mouth_inactive_threshold, self.mouth_active_threshold
            )));
        }
        Ok(())
    }
}

/// Everything the gesture detector saw in one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GestureEvents {
    /// Nose position this frame
    pub nose: Point,
    /// Primary eye wink completed
    pub wink_right: bool,
    /// Secondary eye wink completed (never together with `wink_right`)
    pub wink_left: bool,
    /// Mouth twitch started
    pub mouth_twitch: bool,
    /// EAR of the primary eye
    pub right_ear: f64,
    /// EAR of the secondary eye
    pub left_ear: f64,
}

impl GestureEvents {
    /// Whether any discrete gesture fired
    #[must_use]
    pub const fn any(&self) -> bool {
        self.wink_right || self.wink_left || self.mouth_twitch
    }
}

/// Per-session gesture state
#[derive(Debug, Clone)]
pub struct GestureDetector {
    primary_eye: PrimaryEye,
    right_eye: EyeClosureDetector,
    left_eye: EyeClosureDetector,
    mouth: MouthTwitchDetector,
    mouth_enabled: bool,
}

impl GestureDetector {
    /// Create a new gesture detector
    #[must_use]
    pub fn new(thresholds: &GestureThresholds, primary_eye: PrimaryEye, mouth_enabled: bool) -> Self {
        Self {
            primary_eye,
            right_eye: EyeClosureDetector::new(thresholds.ear_threshold, thresholds.ear_consec_frames),
            left_eye: EyeClosureDetector::new(thresholds.ear_threshold, thresholds.ear_consec_frames),
            mouth: MouthTwitchDetector::new(
                thresholds.mouth_active_threshold,
                thresholds.mouth_inactive_threshold,
            ),
            mouth_enabled,
        }
    }

    /// Run all detectors over one frame's landmarks
    ///
    /// # Errors
    ///
    /// Returns an error if the landmark set lacks the nose, eye or mouth points
    pub fn process(&mut self, landmarks: &LandmarkSet) -> Result<GestureEvents> {
        let nose = landmark(landmarks, NOSE_POINT)?;
        let (right_contour, left_contour) = self.primary_eye.contours();
        let right_ear = eye_aspect_ratio(&landmarks.eye(right_contour)?);
        let left_ear = eye_aspect_ratio(&landmarks.eye(left_contour)?);

        let wink_right = self.right_eye.update(right_ear);
        let mut wink_left = self.left_eye.update(left_ear);
        if wink_right && wink_left {
            debug!("Both eyes winked, keeping the right wink only");
            wink_left = false;
        }

        let mouth_twitch = if self.mouth_enabled {
            let corner = landmark(landmarks, MOUTH_RIGHT_CORNER_POINT)?;
            self.mouth.update(nose, corner)
        } else {
            false
        };

        Ok(GestureEvents {
            nose,
            wink_right,
            wink_left,
            mouth_twitch,
            right_ear,
            left_ear,
        })
    }

    /// Apply new thresholds without losing running state
    pub fn set_thresholds(&mut self, thresholds: &GestureThresholds) {
        self.right_eye
            .set_thresholds(thresholds.ear_threshold, thresholds.ear_consec_frames);
        self.left_eye
            .set_thresholds(thresholds.ear_threshold, thresholds.ear_consec_frames);
        self.mouth.set_thresholds(
            thresholds.mouth_active_threshold,
            thresholds.mouth_inactive_threshold,
        );
    }

    /// Swap which eye drives the primary wink; closure counters restart
    pub fn set_primary_eye(&mut self, primary_eye: PrimaryEye) {
        if self.primary_eye != primary_eye {
            self.primary_eye = primary_eye;
            self.right_eye.reset();
            self.left_eye.reset();
        }
    }

    /// Current primary eye
    #[must_use]
    pub const fn primary_eye(&self) -> PrimaryEye {
        self.primary_eye
    }

    /// Turn mouth twitch detection on or off
    pub fn set_mouth_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.mouth.reset();
        }
        self.mouth_enabled = enabled;
    }

    /// Whether mouth twitch detection runs
    #[must_use]
    pub const fn mouth_enabled(&self) -> bool {
        self.mouth_enabled
    }
}

fn landmark(landmarks: &LandmarkSet, index: usize) -> Result<Point> {
    landmarks
        .get(index)
        .ok_or_else(|| Error::LandmarkError(format!("Missing landmark {index}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eye_with_height(h: i32) -> [Point; 6] {
        [
            Point::new(0, 0),
            Point::new(20, -h),
            Point::new(40, -h),
            Point::new(60, 0),
            Point::new(40, h),
            Point::new(20, h),
        ]
    }

    #[test]
    fn test_eye_aspect_ratio() {
        assert!((eye_aspect_ratio(&eye_with_height(3)) - 0.1).abs() < 1e-12);
        assert!((eye_aspect_ratio(&eye_with_height(9)) - 0.3).abs() < 1e-12);
        assert_eq!(eye_aspect_ratio(&eye_with_height(0)), 0.0);
    }

    #[test]
    fn test_eye_aspect_ratio_degenerate_contour() {
        let eye = [Point::new(5, 5); 6];
        assert!(eye_aspect_ratio(&eye).is_infinite());
    }

    #[test]
    fn test_wink_fires_on_release() {
        let mut detector = EyeClosureDetector::new(0.2, 4);
        let fired: Vec<bool> = [0.1, 0.1, 0.1, 0.1, 0.3].iter().map(|&e| detector.update(e)).collect();
        assert_eq!(fired, vec![false, false, false, false, true]);
        assert_eq!(detector.closed_frames(), 0);
    }

    #[test]
    fn test_short_closure_is_ignored() {
        let mut detector = EyeClosureDetector::new(0.2, 4);
        let fired = [0.1, 0.1, 0.3].iter().filter(|&&e| detector.update(e)).count();
        assert_eq!(fired, 0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut detector = EyeClosureDetector::new(0.2, 1);
        assert!(!detector.update(0.2));
        assert_eq!(detector.closed_frames(), 0);
    }

    #[test]
    fn test_sustained_closure_fires_once() {
        let mut detector = EyeClosureDetector::new(0.2, 2);
        let mut events = 0;
        for _ in 0..50 {
            events += usize::from(detector.update(0.05));
        }
        events += usize::from(detector.update(0.3));
        events += usize::from(detector.update(0.3));
        assert_eq!(events, 1);
    }

    #[test]
    fn test_mouth_baseline_then_twitch() {
        let mut mouth = MouthTwitchDetector::new(4.0, 2.0);
        assert!(!mouth.has_baseline());
        assert!(!mouth.update(Point::new(100, 100), Point::new(120, 130)));
        assert!(mouth.has_baseline());
        // Head moves, mouth follows: no twitch.
        assert!(!mouth.update(Point::new(110, 95), Point::new(130, 125)));
        // Corner jumps away from the prediction.
        assert!(mouth.update(Point::new(110, 95), Point::new(136, 125)));
        assert!(mouth.is_twitching());
        // Still out: no repeat.
        assert!(!mouth.update(Point::new(110, 95), Point::new(137, 125)));
        // Inside the band: still latched.
        assert!(!mouth.update(Point::new(110, 95), Point::new(133, 125)));
        assert!(mouth.is_twitching());
        // Below inactive: released.
        assert!(!mouth.update(Point::new(110, 95), Point::new(131, 125)));
        assert!(!mouth.is_twitching());
        assert!(mouth.update(Point::new(110, 95), Point::new(140, 125)));
    }

    #[test]
    fn test_mouth_extreme_coordinates() {
        let mut mouth = MouthTwitchDetector::new(4.0, 2.0);
        assert!(!mouth.update(Point::new(i32::MAX, 0), Point::new(-10, 0)));
        assert!(!mouth.update(Point::new(i32::MAX, 0), Point::new(-10, 0)));
        assert!(mouth.update(Point::new(i32::MIN, i32::MAX), Point::new(i32::MAX, i32::MIN)));
    }

    #[test]
    fn test_mouth_oscillation_above_inactive_fires_once() {
        let mut mouth = MouthTwitchDetector::new(10.0, 5.0);
        let nose = Point::new(100, 100);
        mouth.update(nose, Point::new(120, 130));
        let twitches = (0..12)
            .map(|i| if i % 2 == 0 { 11 } else { 9 })
            .filter(|&drift| mouth.update(nose, Point::new(120 + drift, 130)))
            .count();
        assert_eq!(twitches, 1);
    }

    #[test]
    fn test_thresholds_validation() {
        assert!(GestureThresholds::default().validate().is_ok());

        let negative = GestureThresholds {
            ear_threshold: -0.1,
            ..GestureThresholds::default()
        };
        assert!(negative.validate().is_err());

        let zero_frames = GestureThresholds {
            ear_consec_frames: 0,
            ..GestureThresholds::default()
        };
        assert!(zero_frames.validate().is_err());

        let inverted_band = GestureThresholds {
            mouth_active_threshold: 1.0,
            mouth_inactive_threshold: 3.0,
            ..GestureThresholds::default()
        };
        assert!(inverted_band.validate().is_err());
    }

    #[test]
    fn test_primary_eye_contours() {
        assert_eq!(PrimaryEye::Right.contours(), (36..42, 42..48));
        assert_eq!(PrimaryEye::Left.contours(), (42..48, 36..42));
    }
}
