//! Dry-run controller.
//!
//! Logs every call and appends it to a shared journal, which makes it the
//! controller of choice for replaying recordings and for tests.

use super::Controller;
use crate::{landmarks::Point, Result};
use log::info;
use std::sync::{Arc, Mutex, PoisonError};

/// One controller invocation
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerCall {
    /// `left(x, center)`
    Left(i32, Point),
    /// `right(x, center)`
    Right(i32, Point),
    /// `up(y, center)`
    Up(i32, Point),
    /// `down(y, center)`
    Down(i32, Point),
    /// `center()`
    Center,
    /// `wink_right()`
    WinkRight,
    /// `wink_left()`
    WinkLeft,
    /// `mouth_twitch()`
    MouthTwitch,
    /// `update_sensitivity(value)`
    UpdateSensitivity(f64),
}

/// Shared list of recorded calls
pub type CallJournal = Arc<Mutex<Vec<ControllerCall>>>;

/// Records and logs calls without touching any device
#[derive(Debug, Default)]
pub struct LoggingController {
    journal: CallJournal,
}

impl LoggingController {
    /// Create a new logging controller with an empty journal
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the journal; stays valid after the controller is boxed
    #[must_use]
    pub fn journal(&self) -> CallJournal {
        Arc::clone(&self.journal)
    }

    fn record(&self, call: ControllerCall) {
        info!("Controller call: {call:?}");
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl Controller for LoggingController {
    fn left(&mut self, x: i32, center: Point) -> Result<()> {
        self.record(ControllerCall::Left(x, center));
        Ok(())
    }

    fn right(&mut self, x: i32, center: Point) -> Result<()> {
        self.record(ControllerCall::Right(x, center));
        Ok(())
    }

    fn up(&mut self, y: i32, center: Point) -> Result<()> {
        self.record(ControllerCall::Up(y, center));
        Ok(())
    }

    fn down(&mut self, y: i32, center: Point) -> Result<()> {
        self.record(ControllerCall::Down(y, center));
        Ok(())
    }

    fn center(&mut self) -> Result<()> {
        self.record(ControllerCall::Center);
        Ok(())
    }

    fn wink_right(&mut self) -> Result<()> {
        self.record(ControllerCall::WinkRight);
        Ok(())
    }

    fn wink_left(&mut self) -> Result<()> {
        self.record(ControllerCall::WinkLeft);
        Ok(())
    }

    fn mouth_twitch(&mut self) -> Result<()> {
        self.record(ControllerCall::MouthTwitch);
        Ok(())
    }

    fn update_sensitivity(&mut self, value: f64) {
        self.record(ControllerCall::UpdateSensitivity(value));
    }

    fn name(&self) -> &str {
        "LoggingController"
    }
}
