//! # Interrupt Handling
//!
//! Trap routing for the two interrupt classes the CPU delivers.
//!
//! ## Modules
//!
//! - [`idt`]: Vector table and the descriptor loaded with `lidt`
//! - [`pic`]: 8259 remapping, masking and end-of-interrupt
//! - [`dispatch`]: Vector to handler registry
//! - [`registers`]: Register snapshot built by the trap trampoline
//!
//! ## Trap Routes
//!
//! ```text
//!  CPU exception (0-31)            Hardware IRQ (remapped)
//!         │                                │
//!         ▼                                ▼
//!  ┌─────────────────┐             ┌─────────────────┐
//!  │ exception_entry │             │    irq_entry    │
//!  └────────┬────────┘             └────────┬────────┘
//!           │ handler?                      │ EOI (slave, master)
//!      no ──┴── yes                         ▼
//!      │         │                 ┌──────────────────┐
//!      ▼         └────────────────▶│ DispatchRegistry │
//!  "Unhandled Interrupt: N"        └──────────────────┘
//! ```
//!
//! An exception nobody handles is reported on the console. An IRQ nobody
//! handles is acknowledged and dropped without a word.

pub mod dispatch;
pub mod idt;
pub mod pic;
pub mod registers;

use core::fmt::Write;

use crate::console::{CharSink, SinkWriter};
use crate::hw::Hardware;
use dispatch::{DispatchRegistry, InterruptHandler};
use idt::VectorTable;
use pic::ChainedPics;
use registers::RegisterSnapshot;

/// The installed interrupt system: the loaded vector table, the remapped
/// controllers and the handlers bound to each vector.
///
/// Only the boot sequencer builds one, see
/// [`init_interrupts`](crate::kernel::init::init_interrupts).
pub struct Interrupts<'a, H: Hardware, C: CharSink> {
    hw: &'a H,
    console: &'a C,
    table: &'static VectorTable,
    registry: DispatchRegistry<'a>,
    pics: ChainedPics,
}

impl<'a, H: Hardware, C: CharSink> Interrupts<'a, H, C> {
    pub(crate) fn new(
        hw: &'a H,
        console: &'a C,
        table: &'static VectorTable,
        pics: ChainedPics,
    ) -> Self {
        Self {
            hw,
            console,
            table,
            registry: DispatchRegistry::new(),
            pics,
        }
    }

    pub fn register(&mut self, vector: u8, handler: &'a dyn InterruptHandler) {
        log::debug!("interrupts: handler registered for vector {}", vector);
        self.registry.register(vector, handler);
    }

    /// Binds `handler` to the vector IRQ `line` arrives on. Returns that
    /// vector, or `None` for lines past 15.
    pub fn register_line(&mut self, line: u8, handler: &'a dyn InterruptHandler) -> Option<u8> {
        let vector = self.pics.vector_for_line(line)?;
        self.register(vector, handler);
        Some(vector)
    }

    pub fn unmask_line(&self, line: u8) {
        self.pics.unmask_line(self.hw, line);
    }

    pub fn mask_line(&self, line: u8) {
        self.pics.mask_line(self.hw, line);
    }

    /// Turns interrupts on. Every handler must be registered by now.
    pub fn enable(&self) {
        log::info!("interrupts: enabled");
        self.hw.enable_interrupts();
    }

    pub fn registry(&self) -> &DispatchRegistry<'a> {
        &self.registry
    }

    pub fn pics(&self) -> &ChainedPics {
        &self.pics
    }

    pub fn vector_table(&self) -> &'static VectorTable {
        self.table
    }

    pub fn hardware(&self) -> &'a H {
        self.hw
    }

    pub fn console(&self) -> &'a C {
        self.console
    }

    /// Route for CPU exceptions. Runs the registered handler, or reports
    /// the vector when there is none and lets execution resume.
    pub fn exception_entry(&self, regs: &RegisterSnapshot) {
        let handled = regs
            .vector()
            .is_some_and(|vector| self.registry.dispatch(vector, regs));
        if !handled {
            self.report_unhandled(regs);
        }
    }

    /// Route for hardware interrupts. The controllers are acknowledged
    /// before the handler runs; an IRQ without a handler is dropped.
    pub fn irq_entry(&self, regs: &RegisterSnapshot) {
        let Some(vector) = regs.vector() else {
            return;
        };
        self.pics.acknowledge(self.hw, vector);
        self.registry.dispatch(vector, regs);
    }

    fn report_unhandled(&self, regs: &RegisterSnapshot) {
        report_unhandled(self.console, regs);
    }
}

/// Logs an exception no handler took and prints `Unhandled Interrupt: N`.
pub(crate) fn report_unhandled<C: CharSink + ?Sized>(console: &C, regs: &RegisterSnapshot) {
    let int_no = regs.interrupt_number();
    let name = regs
        .vector()
        .and_then(idt::exception_name)
        .unwrap_or("Unknown");
    log::warn!(
        "Unhandled exception {} ({}), error code {:#x}, eip {:#010x}",
        int_no,
        name,
        regs.error_code(),
        regs.instruction_pointer()
    );
    let _ = writeln!(SinkWriter::new(console), "Unhandled Interrupt: {}", int_no);
}
