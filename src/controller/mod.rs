//! Output controllers: what head motion and gestures actually do.
//!
//! The session drives exactly one [`Controller`] at a time. Concrete
//! controllers sit on top of an output device ([`PointerDevice`] or
//! [`KeyDevice`]) so the decision logic can be exercised without a
//! display server.

/// Proportional pointer movement and clicking
pub mod pointer;

/// Directional key presses with switchable layouts
pub mod keyboard;

/// Dry-run controller that only records and logs calls
pub mod logging;

pub use keyboard::{KeyLayout, KeyboardController};
pub use logging::{CallJournal, ControllerCall, LoggingController};
pub use pointer::PointerController;

use crate::{landmarks::Point, Error, Result};

/// Capability set every output controller provides.
///
/// Directional calls receive the nose coordinate on the relevant axis and
/// the calibration center. Gesture calls take no arguments.
pub trait Controller: Send {
    /// Nose left of the dead-zone
    fn left(&mut self, x: i32, center: Point) -> Result<()>;

    /// Nose right of the dead-zone
    fn right(&mut self, x: i32, center: Point) -> Result<()>;

    /// Nose above the dead-zone
    fn up(&mut self, y: i32, center: Point) -> Result<()>;

    /// Nose below the dead-zone
    fn down(&mut self, y: i32, center: Point) -> Result<()>;

    /// Nose inside the dead-zone
    fn center(&mut self) -> Result<()>;

    /// Primary eye wink
    fn wink_right(&mut self) -> Result<()>;

    /// Secondary eye wink
    fn wink_left(&mut self) -> Result<()>;

    /// Mouth twitch
    fn mouth_twitch(&mut self) -> Result<()>;

    /// New sensitivity coefficient; discrete controllers may ignore it
    fn update_sensitivity(&mut self, value: f64);

    /// Controller name for logs
    fn name(&self) -> &str;
}

/// Pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Primary button
    Left,
    /// Middle button
    Middle,
    /// Secondary button
    Right,
}

/// Device able to move and click the pointer
pub trait PointerDevice: Send {
    /// Current pointer position
    fn position(&self) -> Result<(i32, i32)>;

    /// Move the pointer to an absolute position
    fn set_position(&mut self, x: i32, y: i32) -> Result<()>;

    /// Press and release a button
    fn click(&mut self, button: MouseButton) -> Result<()>;
}

/// Device able to press and release character keys
pub trait KeyDevice: Send {
    /// Press the key producing `key`
    fn press(&mut self, key: char) -> Result<()>;

    /// Release the key producing `key`
    fn release(&mut self, key: char) -> Result<()>;
}

/// Create a controller by kind name (`mouse`, `keyboard` or `log`)
///
/// # Errors
///
/// Returns an error for an unknown kind or when the output device cannot
/// be opened
pub fn create_controller(kind: &str, sensitivity: f64) -> Result<Box<dyn Controller>> {
    match kind.to_lowercase().as_str() {
        "mouse" | "pointer" => {
            let device = crate::cursor_control::X11Device::new()?;
            Ok(Box::new(PointerController::new(device, sensitivity)))
        }
        "keyboard" | "keys" => {
            let device = crate::cursor_control::X11Device::new()?;
            Ok(Box::new(KeyboardController::new(device)))
        }
        "log" | "none" | "dry-run" => Ok(Box::new(LoggingController::new())),
        _ => Err(Error::ControllerError(format!("Unknown controller kind: {kind}"))),
    }
}
