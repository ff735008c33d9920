//! # Interrupt Descriptor Table
//!
//! A fixed 256-entry table of 32-bit gates plus the descriptor handed to the
//! CPU with `lidt`.
//!
//! ## Gate Layout (8 bytes, packed)
//!
//! ```text
//!  0      2          4         5       6          8
//!  ├──────┼──────────┼─────────┼───────┼──────────┤
//!  │ lo16 │ selector │ always0 │ flags │   hi16   │
//!  └──────┴──────────┴─────────┴───────┴──────────┘
//! ```
//!
//! ## Vector Layout
//!
//! | Vector | Source                         |
//! |--------|--------------------------------|
//! | 0-31   | CPU exceptions                 |
//! | 32-39  | IRQ 0-7 (master PIC, remapped) |
//! | 40-47  | IRQ 8-15 (slave PIC, remapped) |
//!
//! The CPU reads the table by address on every trap. The table is only
//! installed from a `&'static` reference, so it cannot move afterwards.

use core::mem::size_of;

use x86_64::PrivilegeLevel;

use crate::constants::idt::{
    EXCEPTION_COUNT, GATE_DPL_SHIFT, GATE_INTERRUPT_32, GATE_PRESENT, IDT_ENTRIES, IRQ_LINES,
};
use crate::constants::pic::PIC_LINES;
use crate::hw::Hardware;

pub const EXCEPTION_NAMES: [&str; EXCEPTION_COUNT] = [
    "Divide Error",
    "Debug",
    "Non-Maskable Interrupt",
    "Breakpoint",
    "Overflow",
    "Bound Range Exceeded",
    "Invalid Opcode",
    "Device Not Available",
    "Double Fault",
    "Coprocessor Segment Overrun",
    "Invalid TSS",
    "Segment Not Present",
    "Stack-Segment Fault",
    "General Protection Fault",
    "Page Fault",
    "Reserved",
    "x87 Floating-Point Exception",
    "Alignment Check",
    "Machine Check",
    "SIMD Floating-Point Exception",
    "Virtualization Exception",
    "Control Protection Exception",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Hypervisor Injection Exception",
    "VMM Communication Exception",
    "Security Exception",
    "Reserved",
];

/// Name of a CPU exception vector, `None` above 31.
pub fn exception_name(vector: u8) -> Option<&'static str> {
    EXCEPTION_NAMES.get(vector as usize).copied()
}

/// Flags byte for a present 32-bit interrupt gate callable from `dpl`.
pub const fn interrupt_gate_flags(dpl: PrivilegeLevel) -> u8 {
    GATE_PRESENT | ((dpl as u8) << GATE_DPL_SHIFT) | GATE_INTERRUPT_32
}

#[repr(C, packed)]
#[derive(Clone, Copy)]
pub struct GateEntry {
    offset_low: u16,
    selector: u16,
    always0: u8,
    flags: u8,
    offset_high: u16,
}

impl GateEntry {
    pub const fn missing() -> Self {
        Self {
            offset_low: 0,
            selector: 0,
            always0: 0,
            flags: 0,
            offset_high: 0,
        }
    }

    pub const fn new(handler: u32, selector: u16, flags: u8) -> Self {
        Self {
            offset_low: (handler & 0xFFFF) as u16,
            selector,
            always0: 0,
            flags,
            offset_high: (handler >> 16) as u16,
        }
    }

    pub fn handler_address(&self) -> u32 {
        let low = self.offset_low;
        let high = self.offset_high;
        (u32::from(high) << 16) | u32::from(low)
    }

    pub fn selector(&self) -> u16 {
        self.selector
    }

    pub fn flags(&self) -> u8 {
        self.flags
    }

    pub fn is_present(&self) -> bool {
        self.flags & GATE_PRESENT != 0
    }
}

impl core::fmt::Debug for GateEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GateEntry")
            .field("handler", &format_args!("{:#010x}", self.handler_address()))
            .field("selector", &format_args!("{:#06x}", self.selector()))
            .field("flags", &format_args!("{:#04x}", self.flags()))
            .finish()
    }
}

/// Operand of `lidt`: byte limit and linear base of the table.
#[repr(C, packed)]
#[derive(Clone, Copy)]
pub struct TableDescriptor {
    limit: u16,
    base: u32,
}

impl TableDescriptor {
    pub fn limit(&self) -> u16 {
        self.limit
    }

    pub fn base(&self) -> u32 {
        self.base
    }
}

#[repr(C, align(8))]
pub struct VectorTable {
    entries: [GateEntry; IDT_ENTRIES],
}

impl VectorTable {
    pub const fn new() -> Self {
        Self {
            entries: [GateEntry::missing(); IDT_ENTRIES],
        }
    }

    /// Overwrites one gate. The flags byte is taken as given.
    pub fn set_entry(&mut self, vector: u8, handler: u32, selector: u16, flags: u8) {
        self.entries[vector as usize] = GateEntry::new(handler, selector, flags);
    }

    pub fn entry(&self, vector: u8) -> GateEntry {
        self.entries[vector as usize]
    }

    /// Gates for vectors 0-31, one trampoline stub each.
    pub fn install_exception_stubs(
        &mut self,
        stubs: &[u32; EXCEPTION_COUNT],
        selector: u16,
        flags: u8,
    ) {
        for (vector, &stub) in stubs.iter().enumerate() {
            self.set_entry(vector as u8, stub, selector, flags);
        }
    }

    /// Gates for IRQ 0-15 at their remapped vectors.
    pub fn install_irq_stubs(
        &mut self,
        stubs: &[u32; IRQ_LINES],
        master_offset: u8,
        slave_offset: u8,
        selector: u16,
        flags: u8,
    ) {
        for (line, &stub) in stubs.iter().enumerate() {
            let line = line as u8;
            let vector = if line < PIC_LINES {
                master_offset.wrapping_add(line)
            } else {
                slave_offset.wrapping_add(line - PIC_LINES)
            };
            self.set_entry(vector, stub, selector, flags);
        }
    }

    pub fn descriptor(&self) -> TableDescriptor {
        TableDescriptor {
            limit: (size_of::<GateEntry>() * IDT_ENTRIES - 1) as u16,
            // Linear addresses are 32 bits wide on the protected-mode target.
            base: self.entries.as_ptr() as usize as u32,
        }
    }

    /// Loads the table into the CPU. Loading again is harmless; the CPU
    /// re-reads the same array.
    pub fn install<H: Hardware>(&'static self, hw: &H) {
        let descriptor = self.descriptor();
        hw.load_table(&descriptor);
        log::debug!(
            "IDT: loaded {} gates at {:#010x} (limit {})",
            IDT_ENTRIES,
            descriptor.base(),
            descriptor.limit()
        );
    }
}

impl Default for VectorTable {
    fn default() -> Self {
        Self::new()
    }
}
