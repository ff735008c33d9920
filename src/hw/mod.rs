//! # Hardware Access
//!
//! Everything the interrupt core does to the machine goes through
//! [`Hardware`]: port reads and writes, loading the vector table, halting
//! until the next interrupt and turning interrupts on.
//!
//! ```text
//! ┌──────────────┐   read_port / write_port   ┌──────────────┐
//! │  ChainedPics │───────────────────────────▶│              │
//! │  Keyboard    │                            │   Hardware   │
//! │  VectorTable │──── load_table ───────────▶│  (PortIo or  │
//! │  RingBuffer  │──── halt ─────────────────▶│  a fake)     │
//! └──────────────┘                            └──────────────┘
//! ```
//!
//! The real backend is [`PortIo`] (32-bit x86 only). Tests use a fake that
//! records every call.

use crate::constants::ports::IO_WAIT_PORT;
use crate::interrupts::idt::TableDescriptor;

#[cfg(target_arch = "x86")]
mod port_io;

#[cfg(target_arch = "x86")]
pub use port_io::PortIo;

pub trait Hardware {
    fn read_port(&self, port: u16) -> u8;

    fn write_port(&self, port: u16, value: u8);

    /// Hands the descriptor to the CPU. The CPU keeps the base address, so
    /// the table behind it must never move.
    fn load_table(&self, descriptor: &TableDescriptor);

    /// Stops the processor until the next interrupt arrives.
    fn halt(&self);

    fn enable_interrupts(&self);

    /// Burns one bus cycle so slow devices can settle between writes.
    fn io_wait(&self) {
        self.write_port(IO_WAIT_PORT, 0);
    }
}
