//! PS/2 keyboard configuration.

/// Keyboard is wired to IRQ1.
pub const KEYBOARD_IRQ: u8 = 1;

/// Slots in the keyboard character buffer. One slot always stays free.
pub const KEYBOARD_BUFFER_SIZE: usize = 256;

/// Controller status: output buffer full
pub const STATUS_OUTPUT_FULL: u8 = 0x01;

/// Controller command: enable first PS/2 port
pub const CMD_ENABLE_FIRST_PORT: u8 = 0xAE;

/// Scancode bit 7 marks a key release.
pub const RELEASE_BIT: u8 = 0x80;

/// Upper bound on stale bytes discarded while bringing the keyboard up.
pub const FLUSH_LIMIT: usize = 32;
