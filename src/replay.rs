//! Landmark provider that replays a recorded session from YAML.
//!
//! A recording is a list of frames. Each frame either lists the faces
//! found in it or carries an `error` that simulates a failed grab:
//!
//! ```yaml
//! frames:
//!   - faces:
//!       - bbox: { x: 100, y: 80, width: 200, height: 220 }
//!         landmarks: [[210, 190], [212, 200], ...]  # 68 points
//!   - faces: []
//!   - error: "camera timeout"
//! ```
//!
//! Landmarks accept `[x, y]`, `[[x, y]]` and `{x, y}` shapes.

use crate::{landmarks::DetectedFace, landmarks::LandmarkProvider, Error, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, path::Path};

/// One recorded frame
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordedFrame {
    /// Faces found in the frame
    pub faces: Vec<DetectedFace>,

    /// Acquisition failure to reproduce instead of returning faces
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A complete recording
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Recording {
    /// Frames in capture order
    pub frames: Vec<RecordedFrame>,
}

impl Recording {
    /// Load a recording from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a recording from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error for malformed YAML or faces without 68 landmarks
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::ReplayError(format!("Failed to parse recording: {e}")))
    }

    /// Serialize the recording to YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::ReplayError(format!("Failed to serialize recording: {e}")))
    }
}

/// Feeds recorded frames to a session, one per refresh
#[derive(Debug)]
pub struct ReplayProvider {
    frames: VecDeque<RecordedFrame>,
    released: bool,
}

impl ReplayProvider {
    /// Create a provider over an in-memory recording
    #[must_use]
    pub fn new(recording: Recording) -> Self {
        info!("Replaying {} recorded frames", recording.frames.len());
        Self {
            frames: recording.frames.into(),
            released: false,
        }
    }

    /// Load a provider from a YAML recording on disk
    ///
    /// # Errors
    ///
    /// Returns an error if the recording cannot be loaded
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Recording::from_file(path).map(Self::new)
    }

    /// Frames not yet handed out
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    /// Whether every frame has been consumed or the provider was released
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.released || self.frames.is_empty()
    }
}

impl LandmarkProvider for ReplayProvider {
    fn next_faces(&mut self) -> Result<Vec<DetectedFace>> {
        if self.released {
            return Err(Error::ReplayError("Replay provider was released".to_string()));
        }
        let frame = self
            .frames
            .pop_front()
            .ok_or_else(|| Error::ReplayError("Recording exhausted".to_string()))?;

        match frame.error {
            Some(message) => Err(Error::ReplayError(message)),
            None => {
                debug!("Replaying frame with {} face(s)", frame.faces.len());
                Ok(frame.faces)
            }
        }
    }

    fn release(&mut self) {
        self.released = true;
        self.frames.clear();
    }
}
