//! Utility functions shared by the controllers and output devices.

pub mod safe_cast;
