//! Hardware-specific values and boot defaults.

pub mod idt;
pub mod keyboard;
pub mod pic;
pub mod ports;
