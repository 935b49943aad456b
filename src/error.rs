//! Error types for the headmouse library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// The capture device could not be opened when the session was built
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    /// A session already owns the capture device
    #[error("A headmouse session is already active")]
    SessionActive,

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// `X11` window system operation failed
    #[error("X11 error: {0}")]
    X11(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Landmark set with the wrong number of points or unusable coordinates
    #[error("Landmark error: {0}")]
    LandmarkError(String),

    /// Output controller failed or could not be created
    #[error("Controller error: {0}")]
    ControllerError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Landmark recording could not be read
    #[error("Replay error: {0}")]
    ReplayError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
