//! Device Drivers
//!
//! This module contains drivers for the devices the interrupt core serves:
//! - PS/2 Keyboard (IRQ1)

pub mod ps2_keyboard;

pub use ps2_keyboard::{translate, Keyboard};
