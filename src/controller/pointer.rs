//! Proportional pointer controller.
//!
//! Every directional call nudges the pointer by
//! `sensitivity * (nose - center)` along that axis, so the further the head
//! leaves the dead-zone the faster the pointer travels. A primary wink
//! clicks.

use super::{Controller, MouseButton, PointerDevice};
use crate::{landmarks::Point, utils::safe_cast::f64_to_i32, Result};
use log::debug;

/// Moves and clicks the pointer
pub struct PointerController<D: PointerDevice> {
    device: D,
    sensitivity: f64,
}

impl<D: PointerDevice> PointerController<D> {
    /// Create a new pointer controller
    pub const fn new(device: D, sensitivity: f64) -> Self {
        Self { device, sensitivity }
    }

    /// Current sensitivity coefficient
    pub const fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Underlying device
    pub const fn device(&self) -> &D {
        &self.device
    }

    fn step(&self, value: i32, reference: i32) -> Result<i32> {
        f64_to_i32(self.sensitivity * (f64::from(value) - f64::from(reference)))
    }

    fn nudge(&mut self, dx: i32, dy: i32) -> Result<()> {
        if dx == 0 && dy == 0 {
            return Ok(());
        }
        let (x, y) = self.device.position()?;
        debug!("Pointer step ({dx}, {dy}) from ({x}, {y})");
        self.device
            .set_position(x.saturating_add(dx), y.saturating_add(dy))
    }
}

impl<D: PointerDevice> Controller for PointerController<D> {
    fn left(&mut self, x: i32, center: Point) -> Result<()> {
        let dx = self.step(x, center.x)?;
        self.nudge(dx, 0)
    }

    fn right(&mut self, x: i32, center: Point) -> Result<()> {
        let dx = self.step(x, center.x)?;
        self.nudge(dx, 0)
    }

    fn up(&mut self, y: i32, center: Point) -> Result<()> {
        let dy = self.step(y, center.y)?;
        self.nudge(0, dy)
    }

    fn down(&mut self, y: i32, center: Point) -> Result<()> {
        let dy = self.step(y, center.y)?;
        self.nudge(0, dy)
    }

    fn center(&mut self) -> Result<()> {
        Ok(())
    }

    fn wink_right(&mut self) -> Result<()> {
        debug!("Wink: left click");
        self.device.click(MouseButton::Left)
    }

    fn wink_left(&mut self) -> Result<()> {
        Ok(())
    }

    fn mouth_twitch(&mut self) -> Result<()> {
        Ok(())
    }

    fn update_sensitivity(&mut self, value: f64) {
        self.sensitivity = value;
    }

    fn name(&self) -> &str {
        "PointerController"
    }
}
