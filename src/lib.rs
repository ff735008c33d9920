//! Interrupt core for a 32-bit protected-mode kernel: vector table, 8259
//! remapping, trap dispatch and a keyboard-fed line reader.
//!
//! Everything except [`hw::PortIo`] and `kernel::entry` is independent of
//! the target and runs under `cargo test` on the host.

#![cfg_attr(not(test), no_std)]

use spin::{Lazy, Mutex};
use uart_16550::SerialPort;

pub mod console;
pub mod constants;
pub mod data_structures;
pub mod drivers;
pub mod error;
pub mod hw;
pub mod interrupts;
pub mod kernel;
pub mod logging;

#[cfg(test)]
mod testing;

pub use console::{CharSink, SerialConsole};
pub use data_structures::RingBuffer;
pub use drivers::Keyboard;
pub use error::InitError;
pub use hw::Hardware;
pub use interrupts::dispatch::{DispatchRegistry, InterruptHandler};
pub use interrupts::idt::{GateEntry, TableDescriptor, VectorTable};
pub use interrupts::pic::ChainedPics;
pub use interrupts::registers::RegisterSnapshot;
pub use interrupts::Interrupts;
pub use kernel::{init_interrupts, BootToken, GateStubs, InitFlag, InterruptConfig};

pub static SERIAL: Lazy<Mutex<SerialPort>> = Lazy::new(|| {
    // SAFETY: COM1 is owned by the kernel and only reached through this lock.
    let mut port = unsafe { SerialPort::new(constants::ports::SERIAL_PORT) };
    port.init();
    Mutex::new(port)
});

#[macro_export]
macro_rules! println {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let mut serial = $crate::SERIAL.lock();
        let _ = writeln!(serial, $($arg)*);
    }};
}
