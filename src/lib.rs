//! Hands-free pointer and keyboard control from facial landmarks.
//!
//! A landmark provider delivers the 68 facial landmarks of each face in a
//! camera frame. The session turns them into:
//! - directional intents, by comparing the nose tip against a calibrated
//!   center with a dead-zone around it,
//! - winks, from the eye aspect ratio of each eye staying low for a few
//!   consecutive frames,
//! - mouth twitches, from the drift of a mouth corner relative to the nose,
//!
//! and hands them to the active controller, which moves the pointer,
//! presses keys, or just logs.
//!
//! # Examples
//!
//! ## Replaying a recording
//!
//! ```no_run
//! use headmouse::{
//!     config::Config,
//!     controller::LoggingController,
//!     replay::ReplayProvider,
//!     session::Session,
//! };
//!
//! # fn main() -> headmouse::Result<()> {
//! let provider = ReplayProvider::from_file("recording.yaml")?;
//! let frames = provider.remaining();
//! let mut session = Session::new(Box::new(provider), Box::new(LoggingController::new()), &Config::default())?;
//!
//! for _ in 0..frames {
//!     if let Some(report) = session.refresh()?.report() {
//!         println!("nose at ({}, {})", report.nose.x, report.nose.y);
//!     }
//! }
//! session.quit();
//! # Ok(())
//! # }
//! ```
//!
//! ## Overriding a gesture
//!
//! ```no_run
//! use headmouse::{
//!     config::Config,
//!     replay::ReplayProvider,
//!     session::{Gesture, Session},
//!     session_handle,
//! };
//!
//! # fn main() -> headmouse::Result<()> {
//! let session = session_handle::acquire(|| {
//!     let provider = ReplayProvider::from_file("recording.yaml")?;
//!     Session::from_config(Box::new(provider), &Config::default())
//! })?;
//!
//! if let Ok(mut session) = session.lock() {
//!     session.on_gesture(Gesture::WinkLeft, || println!("left wink"));
//!     session.update_threshold(10.0, 8.0)?;
//!     session.refresh()?;
//! }
//! session_handle::release();
//! # Ok(())
//! # }
//! ```

/// Error types used throughout the library
pub mod error;

/// Landmark indices and default thresholds
pub mod constants;

/// YAML configuration
pub mod config;

/// Points, landmark sets, faces and the provider boundary
pub mod landmarks;

/// Wink and mouth twitch detection
pub mod gesture_detector;

/// Dead-zone mapping from nose position to directions
pub mod motion_mapper;

/// Output controllers
pub mod controller;

/// X11 pointer and keyboard injection
pub mod cursor_control;

/// Per-frame pipeline
pub mod session;

/// Process-wide single session
pub mod session_handle;

/// Recorded landmark playback
pub mod replay;

/// Utility functions
pub mod utils;

pub use error::{Error, Result};
