use core::arch::asm;

use super::Hardware;
use crate::interrupts::idt::TableDescriptor;

/// Direct port I/O and privileged instructions for ring 0 on 32-bit x86.
#[derive(Debug)]
pub struct PortIo {
    _private: (),
}

impl PortIo {
    /// # Safety
    ///
    /// The caller must be running in ring 0 and must be the only party
    /// programming the PICs and the keyboard controller.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Hardware for PortIo {
    fn read_port(&self, port: u16) -> u8 {
        let value: u8;
        unsafe {
            asm!("in al, dx", out("al") value, in("dx") port, options(nomem, nostack, preserves_flags));
        }
        value
    }

    fn write_port(&self, port: u16, value: u8) {
        unsafe {
            asm!("out dx, al", in("dx") port, in("al") value, options(nomem, nostack, preserves_flags));
        }
    }

    fn load_table(&self, descriptor: &TableDescriptor) {
        unsafe {
            asm!("lidt [{}]", in(reg) descriptor, options(readonly, nostack, preserves_flags));
        }
    }

    fn halt(&self) {
        unsafe {
            asm!("hlt", options(nomem, nostack, preserves_flags));
        }
    }

    fn enable_interrupts(&self) {
        unsafe {
            asm!("sti", options(nomem, nostack));
        }
    }
}
