//! What the trampoline targets do with the snapshot pointer they get.
//!
//! The trampolines can fire before `entry::boot` has published
//! the system, and a broken stub can hand over a null snapshot. Both cases
//! are decided here so the extern symbols only convert the raw pointer.

use core::fmt::Write;

use crate::console::{CharSink, SinkWriter};
use crate::hw::Hardware;
use crate::interrupts::registers::RegisterSnapshot;
use crate::interrupts::{report_unhandled, Interrupts};

/// Exception route. Without a snapshot the number is unknown and an empty
/// report is printed; without a system every exception is unhandled.
pub fn exception_trap<H: Hardware, C: CharSink>(
    system: Option<&Interrupts<'_, H, C>>,
    console: &C,
    regs: Option<&RegisterSnapshot>,
) {
    let Some(regs) = regs else {
        let _ = writeln!(SinkWriter::new(console), "Unhandled Interrupt: ");
        return;
    };
    match system {
        Some(system) => system.exception_entry(regs),
        None => report_unhandled(console, regs),
    }
}

/// IRQ route. Nothing is acknowledged until both a snapshot and a system
/// are there.
pub fn irq_trap<H: Hardware, C: CharSink>(
    system: Option<&Interrupts<'_, H, C>>,
    regs: Option<&RegisterSnapshot>,
) {
    if let (Some(system), Some(regs)) = (system, regs) {
        system.irq_entry(regs);
    }
}
