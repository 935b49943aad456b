//! Helper functions and utilities for tests

#![allow(dead_code)]

use headmouse::{
    constants::{LEFT_EYE_POINTS, MOUTH_RIGHT_CORNER_POINT, NOSE_POINT, NUM_FACIAL_LANDMARKS, RIGHT_EYE_POINTS},
    landmarks::{BoundingBox, DetectedFace, LandmarkProvider, LandmarkSet, Point},
    Error, Result,
};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

/// Eye half-height giving EAR 0.3 (open)
pub const OPEN_EYE: i32 = 9;

/// Eye half-height giving EAR 0.1 (closed)
pub const CLOSED_EYE: i32 = 3;

/// Synthetic face: eyes 60 px wide, so EAR = half-height / 30
#[derive(Debug, Clone, Copy)]
pub struct FaceBuilder {
    nose: Point,
    right_eye: i32,
    left_eye: i32,
    mouth_shift: (i32, i32),
    bbox: BoundingBox,
}

impl FaceBuilder {
    /// Open-eyed face with the nose at `(x, y)`
    pub const fn at(x: i32, y: i32) -> Self {
        Self {
            nose: Point::new(x, y),
            right_eye: OPEN_EYE,
            left_eye: OPEN_EYE,
            mouth_shift: (0, 0),
            bbox: BoundingBox::new(x - 100, y - 120, 200, 240),
        }
    }

    /// Close the right eye contour
    pub const fn right_closed(mut self) -> Self {
        self.right_eye = CLOSED_EYE;
        self
    }

    /// Close the left eye contour
    pub const fn left_closed(mut self) -> Self {
        self.left_eye = CLOSED_EYE;
        self
    }

    /// Move the mouth corner away from its resting place
    pub const fn mouth_shift(mut self, dx: i32, dy: i32) -> Self {
        self.mouth_shift = (dx, dy);
        self
    }

    /// Override the bounding box
    pub const fn bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = bbox;
        self
    }

    /// The 68 landmarks
    pub fn landmarks(&self) -> LandmarkSet {
        let mut points = vec![self.nose; NUM_FACIAL_LANDMARKS];
        let Point { x, y } = self.nose;

        place_eye(&mut points[RIGHT_EYE_POINTS], Point::new(x - 40, y - 40), self.right_eye);
        place_eye(&mut points[LEFT_EYE_POINTS], Point::new(x + 40, y - 40), self.left_eye);
        points[MOUTH_RIGHT_CORNER_POINT] = Point::new(x + 20 + self.mouth_shift.0, y + 30 + self.mouth_shift.1);
        points[NOSE_POINT] = self.nose;

        LandmarkSet::try_from(points).unwrap()
    }

    /// The face as a provider would report it
    pub fn face(&self) -> DetectedFace {
        DetectedFace {
            bbox: self.bbox,
            landmarks: self.landmarks(),
        }
    }
}

fn place_eye(contour: &mut [Point], center: Point, half_height: i32) {
    let Point { x: cx, y: cy } = center;
    contour.copy_from_slice(&[
        Point::new(cx - 30, cy),
        Point::new(cx - 10, cy - half_height),
        Point::new(cx + 10, cy - half_height),
        Point::new(cx + 30, cy),
        Point::new(cx + 10, cy + half_height),
        Point::new(cx - 10, cy + half_height),
    ]);
}

/// Scripted provider: each entry is one frame
pub struct ScriptedProvider {
    frames: VecDeque<Result<Vec<DetectedFace>>>,
    released: Arc<Mutex<bool>>,
}

impl ScriptedProvider {
    /// Empty script
    pub fn new() -> Self {
        Self {
            frames: VecDeque::new(),
            released: Arc::new(Mutex::new(false)),
        }
    }

    /// Append a frame with one face
    pub fn face(mut self, face: FaceBuilder) -> Self {
        self.frames.push_back(Ok(vec![face.face()]));
        self
    }

    /// Append a frame with several faces
    pub fn faces(mut self, faces: Vec<DetectedFace>) -> Self {
        self.frames.push_back(Ok(faces));
        self
    }

    /// Append a frame that fails to arrive
    pub fn failure(mut self) -> Self {
        self.frames
            .push_back(Err(Error::CameraUnavailable("frame dropped".to_string())));
        self
    }

    /// Flag that flips once the session releases the provider
    pub fn released_flag(&self) -> Arc<Mutex<bool>> {
        Arc::clone(&self.released)
    }
}

impl LandmarkProvider for ScriptedProvider {
    fn next_faces(&mut self) -> Result<Vec<DetectedFace>> {
        self.frames.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    fn release(&mut self) {
        *self.released.lock().unwrap() = true;
    }
}
