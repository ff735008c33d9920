//! I/O port definitions.

/// Master PIC command port
pub const PIC1_COMMAND: u16 = 0x20;
/// Master PIC data (mask) port
pub const PIC1_DATA: u16 = 0x21;
/// Slave PIC command port
pub const PIC2_COMMAND: u16 = 0xA0;
/// Slave PIC data (mask) port
pub const PIC2_DATA: u16 = 0xA1;

/// PS/2 data port - one scancode per read
pub const PS2_DATA: u16 = 0x60;
/// PS/2 status port (read) / command port (write)
pub const PS2_STATUS: u16 = 0x64;
pub const PS2_COMMAND: u16 = 0x64;

/// POST diagnostic port. Writes are discarded and only cost a bus cycle.
pub const IO_WAIT_PORT: u16 = 0x80;

/// Base I/O port address for the first serial port (COM1).
pub const SERIAL_PORT: u16 = 0x3F8;
