//! Keyboard controller: head directions become held keys.
//!
//! Leaving the dead-zone presses the key for that direction and keeps it
//! held. Swinging to the opposite side of an axis lets go of the first key,
//! and returning to the center releases everything that is held. A
//! primary wink toggles between the letter (`wasd`) and number-pad
//! (`8462`) layouts.

use super::{Controller, KeyDevice};
use crate::{landmarks::Point, Result};
use log::{debug, info};

/// Keys bound to the four directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLayout {
    /// `a`, `d`, `w`, `s`
    Letters,
    /// `4`, `6`, `8`, `2`
    Numbers,
}

impl KeyLayout {
    /// Key for the left direction
    #[must_use]
    pub const fn left(self) -> char {
        match self {
            Self::Letters => 'a',
            Self::Numbers => '4',
        }
    }

    /// Key for the right direction
    #[must_use]
    pub const fn right(self) -> char {
        match self {
            Self::Letters => 'd',
            Self::Numbers => '6',
        }
    }

    /// Key for the up direction
    #[must_use]
    pub const fn up(self) -> char {
        match self {
            Self::Letters => 'w',
            Self::Numbers => '8',
        }
    }

    /// Key for the down direction
    #[must_use]
    pub const fn down(self) -> char {
        match self {
            Self::Letters => 's',
            Self::Numbers => '2',
        }
    }

    /// The other layout
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Letters => Self::Numbers,
            Self::Numbers => Self::Letters,
        }
    }
}

/// Presses direction keys on a key device
pub struct KeyboardController<D: KeyDevice> {
    device: D,
    layout: KeyLayout,
    held: Vec<char>,
}

impl<D: KeyDevice> KeyboardController<D> {
    /// Create a new keyboard controller using the letters layout
    pub const fn new(device: D) -> Self {
        Self {
            device,
            layout: KeyLayout::Letters,
            held: Vec::new(),
        }
    }

    /// Active layout
    pub const fn layout(&self) -> KeyLayout {
        self.layout
    }

    /// Keys currently held down
    pub fn held_keys(&self) -> &[char] {
        &self.held
    }

    /// Underlying device
    pub const fn device(&self) -> &D {
        &self.device
    }

    /// Hold `key`, first letting go of `opposite` on the same axis
    fn hold(&mut self, key: char, opposite: char) -> Result<()> {
        self.release(opposite)?;
        if self.held.contains(&key) {
            return Ok(());
        }
        debug!("Pressing '{key}'");
        self.device.press(key)?;
        self.held.push(key);
        Ok(())
    }

    fn release(&mut self, key: char) -> Result<()> {
        if let Some(index) = self.held.iter().position(|&held| held == key) {
            debug!("Releasing '{key}'");
            self.device.release(key)?;
            self.held.remove(index);
        }
        Ok(())
    }

    /// Keys stay tracked until their release succeeds
    fn release_all(&mut self) -> Result<()> {
        while let Some(&key) = self.held.first() {
            debug!("Releasing '{key}'");
            self.device.release(key)?;
            self.held.remove(0);
        }
        Ok(())
    }
}

impl<D: KeyDevice> Controller for KeyboardController<D> {
    fn left(&mut self, _x: i32, _center: Point) -> Result<()> {
        self.hold(self.layout.left(), self.layout.right())
    }

    fn right(&mut self, _x: i32, _center: Point) -> Result<()> {
        self.hold(self.layout.right(), self.layout.left())
    }

    fn up(&mut self, _y: i32, _center: Point) -> Result<()> {
        self.hold(self.layout.up(), self.layout.down())
    }

    fn down(&mut self, _y: i32, _center: Point) -> Result<()> {
        self.hold(self.layout.down(), self.layout.up())
    }

    fn center(&mut self) -> Result<()> {
        self.release_all()
    }

    fn wink_right(&mut self) -> Result<()> {
        self.release_all()?;
        self.layout = self.layout.toggled();
        info!("Keyboard layout switched to {:?}", self.layout);
        Ok(())
    }

    fn wink_left(&mut self) -> Result<()> {
        Ok(())
    }

    fn mouth_twitch(&mut self) -> Result<()> {
        Ok(())
    }

    fn update_sensitivity(&mut self, _value: f64) {}

    fn name(&self) -> &str {
        "KeyboardController"
    }
}
