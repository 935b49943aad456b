//! Session orchestration: one frame in, controller calls out.
//!
//! Each call to [`Session::refresh`] runs the whole pipeline for one
//! frame:
//!
//! 1. ask the landmark provider for faces; a failed grab or an empty frame
//!    is skipped without touching any state,
//! 2. calibrate on the nose if no calibration center is armed,
//! 3. run the gesture detector and dispatch winks and twitches, either to
//!    a registered callback or to the controller,
//! 4. map the nose onto directional intents and dispatch them.
//!
//! Configuration setters and controller swaps are meant to be called
//! between frames; none of them resets calibration or gesture state.

use crate::{
    config::Config,
    controller::{create_controller, Controller},
    gesture_detector::{GestureDetector, GestureEvents, GestureThresholds, PrimaryEye},
    landmarks::{select_primary_face, DetectedFace, LandmarkProvider, LandmarkSet, Point},
    motion_mapper::{self, DeadZone, Intent, Motion, MotionThresholds},
    constants::NOSE_POINT,
    Error, Result,
};
use log::{debug, info, warn};

/// User callback replacing the controller for one gesture
pub type GestureCallback = Box<dyn FnMut() + Send>;

/// Discrete gestures that can be overridden with a callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// Primary eye wink
    WinkRight,
    /// Secondary eye wink
    WinkLeft,
    /// Mouth twitch
    MouthTwitch,
}

/// Why a frame produced no controller calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The provider could not deliver a frame
    AcquisitionFailed,
    /// The frame held no face
    NoFace,
}

/// What happened during one processed frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Nose position this frame
    pub nose: Point,
    /// Calibration center used for mapping
    pub center: Point,
    /// Whether this frame (re)set the calibration center
    pub calibrated: bool,
    /// Gesture detector output
    pub gestures: GestureEvents,
    /// Directional mapping, `None` while motion is disabled
    pub motion: Option<Motion>,
}

/// Result of one refresh
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Nothing was processed
    Skipped(SkipReason),
    /// The frame ran through the pipeline
    Processed(FrameReport),
}

impl FrameOutcome {
    /// The report of a processed frame
    #[must_use]
    pub const fn report(&self) -> Option<&FrameReport> {
        match self {
            Self::Processed(report) => Some(report),
            Self::Skipped(_) => None,
        }
    }
}

/// Snapshot for external visualisation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    /// Last nose position seen
    pub nose: Option<Point>,
    /// Current calibration center
    pub center: Option<Point>,
    /// Whether the center is armed for the next frame
    pub calibrated: bool,
    /// Dead-zone rectangle around the center
    pub dead_zone: Option<DeadZone>,
}

#[derive(Default)]
struct GestureHandlers {
    wink_right: Option<GestureCallback>,
    wink_left: Option<GestureCallback>,
    mouth_twitch: Option<GestureCallback>,
}

impl GestureHandlers {
    fn slot(&mut self, gesture: Gesture) -> &mut Option<GestureCallback> {
        match gesture {
            Gesture::WinkRight => &mut self.wink_right,
            Gesture::WinkLeft => &mut self.wink_left,
            Gesture::MouthTwitch => &mut self.mouth_twitch,
        }
    }
}

/// A head-tracking session bound to one landmark provider
pub struct Session {
    provider: Box<dyn LandmarkProvider>,
    controller: Box<dyn Controller>,
    detector: GestureDetector,
    gesture_thresholds: GestureThresholds,
    thresholds: MotionThresholds,
    sensitivity: f64,
    center: Option<Point>,
    calibrated: bool,
    last_nose: Option<Point>,
    motion_enabled: bool,
    handlers: GestureHandlers,
    released: bool,
}

impl Session {
    /// Create a session around a provider and an explicit controller
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the provider's
    /// capture device is not available
    pub fn new(
        provider: Box<dyn LandmarkProvider>,
        controller: Box<dyn Controller>,
        config: &Config,
    ) -> Result<Self> {
        config.validate()?;
        if !provider.is_available() {
            return Err(Error::CameraUnavailable("No camera available".to_string()));
        }

        let gesture_thresholds = config.gesture_thresholds();
        info!(
            "Starting session with {} (primary eye: {:?}, mouth twitch: {})",
            controller.name(),
            config.eyes.primary_eye,
            config.mouth.enabled
        );

        Ok(Self {
            provider,
            controller,
            detector: GestureDetector::new(&gesture_thresholds, config.eyes.primary_eye, config.mouth.enabled),
            gesture_thresholds,
            thresholds: config.motion,
            sensitivity: config.controller.sensitivity,
            center: None,
            calibrated: false,
            last_nose: None,
            motion_enabled: true,
            handlers: GestureHandlers::default(),
            released: false,
        })
    }

    /// Create a session whose controller is chosen by `config.controller.kind`
    ///
    /// # Errors
    ///
    /// Returns an error if the controller cannot be created or
    /// [`Session::new`] fails
    pub fn from_config(provider: Box<dyn LandmarkProvider>, config: &Config) -> Result<Self> {
        config.validate()?;
        let controller = create_controller(&config.controller.kind, config.controller.sensitivity)?;
        Self::new(provider, controller, config)
    }

    /// Grab the next frame from the provider and process it
    ///
    /// # Errors
    ///
    /// Returns an error only if the controller fails; acquisition failures
    /// and missing faces are reported as skipped frames
    pub fn refresh(&mut self) -> Result<FrameOutcome> {
        let faces = match self.provider.next_faces() {
            Ok(faces) => faces,
            Err(e) => {
                warn!("Frame acquisition failed, skipping frame: {e}");
                return Ok(FrameOutcome::Skipped(SkipReason::AcquisitionFailed));
            }
        };
        self.process_faces(&faces)
    }

    /// Process the faces found in one frame, using the largest one
    ///
    /// # Errors
    ///
    /// Returns an error if the controller fails
    pub fn process_faces(&mut self, faces: &[DetectedFace]) -> Result<FrameOutcome> {
        match select_primary_face(faces) {
            Some(face) => self.process_landmarks(&face.landmarks).map(FrameOutcome::Processed),
            None => {
                debug!("No face detected, skipping frame");
                Ok(FrameOutcome::Skipped(SkipReason::NoFace))
            }
        }
    }

    /// Run the pipeline on one face's landmarks
    ///
    /// # Errors
    ///
    /// Returns an error if the landmarks lack a required point or the
    /// controller fails
    pub fn process_landmarks(&mut self, landmarks: &LandmarkSet) -> Result<FrameReport> {
        let nose = landmarks
            .get(NOSE_POINT)
            .ok_or_else(|| Error::LandmarkError(format!("Missing landmark {NOSE_POINT}")))?;

        let gestures = self.detector.process(landmarks)?;
        self.last_nose = Some(nose);

        let just_calibrated = !self.calibrated;
        let center = match self.center {
            Some(center) if self.calibrated => center,
            _ => {
                info!("Calibrated center at ({}, {})", nose.x, nose.y);
                self.center = Some(nose);
                self.calibrated = true;
                nose
            }
        };

        if gestures.wink_right {
            self.dispatch_gesture(Gesture::WinkRight)?;
        }
        if gestures.wink_left {
            self.dispatch_gesture(Gesture::WinkLeft)?;
        }
        if gestures.mouth_twitch {
            self.dispatch_gesture(Gesture::MouthTwitch)?;
        }

        let motion = if self.motion_enabled {
            let motion = motion_mapper::map(nose, center, &self.thresholds);
            self.dispatch_motion(&motion, nose, center)?;
            Some(motion)
        } else {
            None
        };

        Ok(FrameReport {
            nose,
            center,
            calibrated: just_calibrated,
            gestures,
            motion,
        })
    }

    fn dispatch_gesture(&mut self, gesture: Gesture) -> Result<()> {
        if let Some(callback) = self.handlers.slot(gesture).as_mut() {
            debug!("{gesture:?} handled by user callback");
            callback();
            return Ok(());
        }
        debug!("{gesture:?} handled by {}", self.controller.name());
        match gesture {
            Gesture::WinkRight => self.controller.wink_right(),
            Gesture::WinkLeft => self.controller.wink_left(),
            Gesture::MouthTwitch => self.controller.mouth_twitch(),
        }
    }

    fn dispatch_motion(&mut self, motion: &Motion, nose: Point, center: Point) -> Result<()> {
        for intent in motion.intents() {
            match intent {
                Intent::Left => self.controller.left(nose.x, center)?,
                Intent::Right => self.controller.right(nose.x, center)?,
                Intent::Up => self.controller.up(nose.y, center)?,
                Intent::Down => self.controller.down(nose.y, center)?,
                Intent::Center => self.controller.center()?,
            }
        }
        Ok(())
    }

    /// Re-arm calibration: the next processed frame's nose becomes the center
    pub fn calibrate(&mut self) {
        info!("Recalibration requested");
        self.calibrated = false;
    }

    /// Register a callback that replaces the controller for `gesture`
    pub fn on_gesture<F>(&mut self, gesture: Gesture, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        debug!("Callback registered for {gesture:?}");
        *self.handlers.slot(gesture) = Some(Box::new(callback));
    }

    /// Hand `gesture` back to the controller
    pub fn clear_gesture_callback(&mut self, gesture: Gesture) {
        *self.handlers.slot(gesture) = None;
    }

    /// Replace the active controller, returning the previous one
    ///
    /// The new controller is handed the session's current sensitivity.
    pub fn override_controller(&mut self, mut controller: Box<dyn Controller>) -> Box<dyn Controller> {
        info!("Controller switched from {} to {}", self.controller.name(), controller.name());
        controller.update_sensitivity(self.sensitivity);
        std::mem::replace(&mut self.controller, controller)
    }

    /// Name of the active controller
    #[must_use]
    pub fn controller_name(&self) -> &str {
        self.controller.name()
    }

    /// Change the sensitivity coefficient and forward it to the controller
    ///
    /// # Errors
    ///
    /// Returns an error for a negative or non-finite value
    pub fn update_sensitivity(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidInput(format!(
                "Sensitivity must be a non-negative number, got {value}"
            )));
        }
        info!("Sensitivity set to {value}");
        self.sensitivity = value;
        self.controller.update_sensitivity(value);
        Ok(())
    }

    /// Current sensitivity coefficient
    #[must_use]
    pub const fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Set how far the nose must travel from the center on each axis
    ///
    /// # Errors
    ///
    /// Returns an error for negative or non-finite thresholds
    pub fn update_threshold(&mut self, thresh_x: f64, thresh_y: f64) -> Result<()> {
        self.set_motion_thresholds(MotionThresholds {
            thresh_x,
            thresh_y,
            ..self.thresholds
        })
    }

    /// Replace the whole dead-zone configuration
    ///
    /// # Errors
    ///
    /// Returns an error for negative or non-finite thresholds
    pub fn set_motion_thresholds(&mut self, thresholds: MotionThresholds) -> Result<()> {
        thresholds.validate()?;
        info!(
            "Dead-zone set to x: {}, y: {}, y offset: {}",
            thresholds.thresh_x, thresholds.thresh_y, thresholds.y_offset
        );
        self.thresholds = thresholds;
        Ok(())
    }

    /// Current dead-zone configuration
    #[must_use]
    pub const fn motion_thresholds(&self) -> &MotionThresholds {
        &self.thresholds
    }

    /// Replace wink and twitch thresholds, keeping running counters
    ///
    /// # Errors
    ///
    /// Returns an error if the thresholds are invalid
    pub fn set_gesture_thresholds(&mut self, thresholds: GestureThresholds) -> Result<()> {
        thresholds.validate()?;
        self.detector.set_thresholds(&thresholds);
        self.gesture_thresholds = thresholds;
        Ok(())
    }

    /// Current wink and twitch thresholds
    #[must_use]
    pub const fn gesture_thresholds(&self) -> &GestureThresholds {
        &self.gesture_thresholds
    }

    /// Choose which eye drives the primary wink
    pub fn set_primary_eye(&mut self, primary_eye: PrimaryEye) {
        info!("Primary eye set to {primary_eye:?}");
        self.detector.set_primary_eye(primary_eye);
    }

    /// Turn mouth twitch detection on or off
    pub fn set_mouth_twitch_enabled(&mut self, enabled: bool) {
        self.detector.set_mouth_enabled(enabled);
    }

    /// Pause or resume directional dispatch; gestures keep working
    pub fn set_motion_enabled(&mut self, enabled: bool) {
        self.motion_enabled = enabled;
    }

    /// Apply every tunable from a configuration; the controller stays
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, in which case
    /// nothing is changed
    pub fn apply_config(&mut self, config: &Config) -> Result<()> {
        config.validate()?;
        self.set_motion_thresholds(config.motion)?;
        self.set_gesture_thresholds(config.gesture_thresholds())?;
        self.set_primary_eye(config.eyes.primary_eye);
        self.set_mouth_twitch_enabled(config.mouth.enabled);
        self.update_sensitivity(config.controller.sensitivity)
    }

    /// Calibration center, if one has been recorded
    #[must_use]
    pub const fn center(&self) -> Option<Point> {
        self.center
    }

    /// Whether the center is armed (false until the next frame after
    /// [`Session::calibrate`])
    #[must_use]
    pub const fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Nose position of the last processed frame
    #[must_use]
    pub const fn last_nose(&self) -> Option<Point> {
        self.last_nose
    }

    /// Snapshot for overlays
    #[must_use]
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            nose: self.last_nose,
            center: self.center,
            calibrated: self.calibrated,
            dead_zone: self.center.map(|center| DeadZone::around(center, &self.thresholds)),
        }
    }

    /// Release the capture device; further refreshes are up to the provider
    pub fn quit(&mut self) {
        if !self.released {
            info!("Releasing landmark provider");
            self.provider.release();
            self.released = true;
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.quit();
    }
}
