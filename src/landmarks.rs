//! Facial landmark types and the provider boundary.
//!
//! The landmark model itself lives outside this crate. Whatever runs it
//! (a camera plus a 68-point shape predictor, or a recording) implements
//! [`LandmarkProvider`] and hands back every face it found in a frame.
//! The session picks the face with the largest bounding box.

use crate::{constants::NUM_FACIAL_LANDMARKS, Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Integer pixel coordinate of a landmark
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Coordinate", into = "[i32; 2]")]
pub struct Point {
    /// Horizontal pixel position
    pub x: i32,
    /// Vertical pixel position
    pub y: i32,
}

impl Point {
    /// Create a new point
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }
}

/// A landmark coordinate in any of the shapes landmark producers emit.
///
/// Some producers hand out plain `[x, y]` pairs, others wrap each point in
/// a one-row matrix (`[[x, y]]`), others use named fields. Every shape
/// flattens to the same [`Point`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    /// `[x, y]`
    Flat([i32; 2]),
    /// `[[x, y]]`
    Nested([[i32; 2]; 1]),
    /// `{ x: .., y: .. }`
    Named {
        /// Horizontal pixel position
        x: i32,
        /// Vertical pixel position
        y: i32,
    },
}

impl From<Coordinate> for Point {
    fn from(coordinate: Coordinate) -> Self {
        match coordinate {
            Coordinate::Flat([x, y]) | Coordinate::Nested([[x, y]]) | Coordinate::Named { x, y } => {
                Self::new(x, y)
            }
        }
    }
}

impl From<[i32; 2]> for Point {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<[[i32; 2]; 1]> for Point {
    fn from([[x, y]]: [[i32; 2]; 1]) -> Self {
        Self::new(x, y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for [i32; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

/// The 68 landmarks of one face in one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct LandmarkSet {
    points: Vec<Point>,
}

impl LandmarkSet {
    /// Build a landmark set from coordinates of any supported shape
    ///
    /// # Errors
    ///
    /// Returns an error unless exactly 68 coordinates are supplied
    pub fn from_coordinates<I, C>(coordinates: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Point>,
    {
        Self::try_from(coordinates.into_iter().map(Into::into).collect::<Vec<Point>>())
    }

    /// Landmark at `index`, if it exists
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// Six contour points of an eye, in `p1..p6` order
    ///
    /// # Errors
    ///
    /// Returns an error if the contour is not six points long or falls
    /// outside the landmark set
    pub fn eye(&self, contour: Range<usize>) -> Result<[Point; 6]> {
        let points = self.points.get(contour.clone()).ok_or_else(|| {
            Error::LandmarkError(format!("Eye contour {contour:?} out of range"))
        })?;
        <[Point; 6]>::try_from(points).map_err(|_| {
            Error::LandmarkError(format!("Eye contour {contour:?} must span six points"))
        })
    }

    /// All landmarks in index order
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl TryFrom<Vec<Point>> for LandmarkSet {
    type Error = Error;

    fn try_from(points: Vec<Point>) -> Result<Self> {
        if points.len() != NUM_FACIAL_LANDMARKS {
            return Err(Error::LandmarkError(format!(
                "Expected {NUM_FACIAL_LANDMARKS} landmarks, got {}",
                points.len()
            )));
        }
        Ok(Self { points })
    }
}

impl From<LandmarkSet> for Vec<Point> {
    fn from(set: LandmarkSet) -> Self {
        set.points
    }
}

/// Axis-aligned face bounding box in frame pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Box width
    pub width: i32,
    /// Box height
    pub height: i32,
}

impl BoundingBox {
    /// Create a new bounding box
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Box area; degenerate boxes have zero area
    #[must_use]
    pub fn area(&self) -> i64 {
        i64::from(self.width.max(0)) * i64::from(self.height.max(0))
    }
}

/// One face found by the landmark provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedFace {
    /// Face bounding box
    pub bbox: BoundingBox,
    /// Landmarks of the face
    pub landmarks: LandmarkSet,
}

/// Pick the face closest to the camera: the one with the largest box.
///
/// Ties keep the first face in scan order.
#[must_use]
pub fn select_primary_face(faces: &[DetectedFace]) -> Option<&DetectedFace> {
    let mut faces_iter = faces.iter();
    let mut best = faces_iter.next()?;
    for face in faces_iter {
        if face.bbox.area() > best.bbox.area() {
            best = face;
        }
    }
    Some(best)
}

/// Source of per-frame landmarks: camera capture plus landmark model.
pub trait LandmarkProvider: Send {
    /// Whether the capture device was opened
    fn is_available(&self) -> bool {
        true
    }

    /// Grab the next frame and return every face found in it.
    ///
    /// An empty vector means no face was detected. An error means the
    /// frame could not be acquired; callers treat both as a skipped frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame could not be captured or processed
    fn next_faces(&mut self) -> Result<Vec<DetectedFace>>;

    /// Release the capture device
    fn release(&mut self) {}
}
