//! Constants used throughout the library

use std::ops::Range;

/// Number of facial landmarks produced by the landmark provider
pub const NUM_FACIAL_LANDMARKS: usize = 68;

/// Landmark used as the head position reference
pub const NOSE_POINT: usize = 34;

/// Eye contour of the user's right eye in a mirrored frame
pub const RIGHT_EYE_POINTS: Range<usize> = 36..42;

/// Eye contour of the user's left eye in a mirrored frame
pub const LEFT_EYE_POINTS: Range<usize> = 42..48;

/// Landmark tracked for mouth twitches
pub const MOUTH_RIGHT_CORNER_POINT: usize = 55;

/// Default eye aspect ratio below which an eye counts as closed
pub const DEFAULT_EAR_THRESHOLD: f64 = 0.2;

/// Default number of closed frames needed before a wink is recognised
pub const DEFAULT_EAR_CONSEC_FRAMES: u32 = 2;

/// Default horizontal dead-zone half width, in pixels
pub const DEFAULT_THRESHOLD_X: f64 = 5.0;

/// Default vertical dead-zone half height, in pixels
pub const DEFAULT_THRESHOLD_Y: f64 = 5.0;

/// Default shrink of the downward dead-zone bound, in pixels
pub const DEFAULT_Y_OFFSET: f64 = 0.0;

/// Default pointer sensitivity coefficient
pub const DEFAULT_SENSITIVITY: f64 = 0.3;

/// Default mouth corner drift that triggers a twitch, in pixels
pub const DEFAULT_MOUTH_ACTIVE_THRESHOLD: f64 = 4.0;

/// Default mouth corner drift below which a twitch is released, in pixels
pub const DEFAULT_MOUTH_INACTIVE_THRESHOLD: f64 = 2.0;
