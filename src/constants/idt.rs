//! Interrupt Descriptor Table configuration.

pub const IDT_ENTRIES: usize = 256;

/// CPU exceptions occupy vectors 0-31.
pub const EXCEPTION_COUNT: usize = 32;

/// Hardware interrupt lines behind the chained PICs.
pub const IRQ_LINES: usize = 16;

/// Flat kernel code segment set up by the loader.
pub const KERNEL_CODE_SELECTOR: u16 = 0x08;

/// Gate is present
pub const GATE_PRESENT: u8 = 0x80;
/// 32-bit interrupt gate (IF cleared on entry)
pub const GATE_INTERRUPT_32: u8 = 0x0E;
/// Bit position of the descriptor privilege level
pub const GATE_DPL_SHIFT: u8 = 5;

/// Present, ring 0, 32-bit interrupt gate.
pub const KERNEL_INTERRUPT_GATE: u8 = 0x8E;
