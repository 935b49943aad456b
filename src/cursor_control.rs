//! X11 output device for pointer and keyboard controllers.
//!
//! Pointer motion uses `WarpPointer`; clicks and key presses are injected
//! through the XTEST extension so applications see them as real input.

use crate::{
    controller::{KeyDevice, MouseButton, PointerDevice},
    error::{Error, Result},
    utils::safe_cast::{i32_to_i16_clamp, usize_to_u8},
};
use log::{debug, info};
use x11rb::{
    connection::Connection,
    protocol::{
        xproto::{
            ConnectionExt as _, Screen, BUTTON_PRESS_EVENT, BUTTON_RELEASE_EVENT, KEY_PRESS_EVENT,
            KEY_RELEASE_EVENT,
        },
        xtest::ConnectionExt as _,
    },
    rust_connection::RustConnection,
    CURRENT_TIME,
};

/// Pointer and keyboard injection on an X11 display
pub struct X11Device {
    connection: RustConnection,
    screen: Screen,
    min_keycode: u8,
    keysyms_per_keycode: usize,
    keysyms: Vec<u32>,
}

impl X11Device {
    /// Connect to the display named by `$DISPLAY`
    ///
    /// # Errors
    ///
    /// Returns an error if the display cannot be reached, the screen is
    /// missing, or the keyboard mapping cannot be read
    pub fn new() -> Result<Self> {
        info!("Initializing X11 output device");

        let (connection, screen_num) = RustConnection::connect(None)
            .map_err(|e| Error::X11(format!("Failed to connect to X11: {e}")))?;

        let setup = connection.setup();
        let screen = setup
            .roots
            .get(screen_num)
            .ok_or_else(|| Error::X11("Failed to get screen".to_string()))?
            .clone();
        let min_keycode = setup.min_keycode;
        let max_keycode = setup.max_keycode;

        let mapping = connection
            .get_keyboard_mapping(min_keycode, max_keycode.saturating_sub(min_keycode).saturating_add(1))
            .map_err(|e| Error::X11(format!("Failed to request keyboard mapping: {e}")))?
            .reply()
            .map_err(|e| Error::X11(format!("Failed to read keyboard mapping: {e}")))?;

        info!(
            "Connected to X11 display, screen: {}x{}",
            screen.width_in_pixels, screen.height_in_pixels
        );

        Ok(Self {
            connection,
            screen,
            min_keycode,
            keysyms_per_keycode: usize::from(mapping.keysyms_per_keycode),
            keysyms: mapping.keysyms,
        })
    }

    /// Screen dimensions
    pub const fn screen_size(&self) -> (u16, u16) {
        (self.screen.width_in_pixels, self.screen.height_in_pixels)
    }

    /// Keycode producing the Latin-1 character `key`
    fn keycode_for(&self, key: char) -> Result<u8> {
        let keysym = u32::from(key);
        let index = self
            .keysyms
            .chunks(self.keysyms_per_keycode.max(1))
            .position(|syms| syms.contains(&keysym))
            .ok_or_else(|| Error::X11(format!("No keycode produces '{key}'")))?;
        let offset = usize_to_u8(index)?;
        self.min_keycode
            .checked_add(offset)
            .ok_or_else(|| Error::X11(format!("Keycode for '{key}' out of range")))
    }

    fn fake_input(&self, event_type: u8, detail: u8) -> Result<()> {
        self.connection
            .xtest_fake_input(event_type, detail, CURRENT_TIME, self.screen.root, 0, 0, 0)
            .map_err(|e| Error::X11(format!("Failed to inject input: {e}")))?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.connection
            .flush()
            .map_err(|e| Error::X11(format!("Failed to flush connection: {e}")))?;
        Ok(())
    }
}

impl PointerDevice for X11Device {
    fn position(&self) -> Result<(i32, i32)> {
        let reply = self
            .connection
            .query_pointer(self.screen.root)
            .map_err(|e| Error::X11(format!("Failed to send query pointer: {e}")))?
            .reply()
            .map_err(|e| Error::X11(format!("Failed to query pointer: {e}")))?;

        Ok((i32::from(reply.root_x), i32::from(reply.root_y)))
    }

    fn set_position(&mut self, x: i32, y: i32) -> Result<()> {
        let (width, height) = self.screen_size();
        let max_x = i16::try_from(width.saturating_sub(1)).unwrap_or(i16::MAX);
        let max_y = i16::try_from(height.saturating_sub(1)).unwrap_or(i16::MAX);
        let x = i32_to_i16_clamp(x, 0, max_x);
        let y = i32_to_i16_clamp(y, 0, max_y);

        debug!("Setting cursor position to ({}, {})", x, y);

        self.connection
            .warp_pointer(x11rb::NONE, self.screen.root, 0, 0, 0, 0, x, y)
            .map_err(|e| Error::X11(format!("Failed to warp pointer: {e}")))?;

        self.flush()
    }

    fn click(&mut self, button: MouseButton) -> Result<()> {
        let detail = match button {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
        };
        debug!("Clicking {:?} button", button);
        self.fake_input(BUTTON_PRESS_EVENT, detail)?;
        self.fake_input(BUTTON_RELEASE_EVENT, detail)?;
        self.flush()
    }
}

impl KeyDevice for X11Device {
    fn press(&mut self, key: char) -> Result<()> {
        let keycode = self.keycode_for(key)?;
        self.fake_input(KEY_PRESS_EVENT, keycode)?;
        self.flush()
    }

    fn release(&mut self, key: char) -> Result<()> {
        let keycode = self.keycode_for(key)?;
        self.fake_input(KEY_RELEASE_EVENT, keycode)?;
        self.flush()
    }
}
