//! One-time interrupt bring-up.
//!
//! The order is fixed: gates are written and the table loaded, then the
//! controllers are remapped. Handlers are registered on the returned
//! [`Interrupts`] and only then is [`Interrupts::enable`] called.

use core::sync::atomic::{AtomicBool, Ordering};

use spin::Once;
use x86_64::PrivilegeLevel;

use crate::console::CharSink;
use crate::constants::idt::{EXCEPTION_COUNT, IRQ_LINES, KERNEL_CODE_SELECTOR};
use crate::constants::pic::{PIC_1_OFFSET, PIC_2_OFFSET, PIC_LINES};
use crate::error::InitError;
use crate::hw::Hardware;
use crate::interrupts::idt::{interrupt_gate_flags, VectorTable};
use crate::interrupts::pic::ChainedPics;
use crate::interrupts::Interrupts;

/// Hands out a single [`BootToken`] for the life of the system.
#[repr(transparent)]
pub struct InitFlag {
    flag: AtomicBool,
}

impl InitFlag {
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// First call gets the token, every later call gets
    /// [`InitError::AlreadyInitialized`].
    pub fn claim(&self) -> Result<BootToken, InitError> {
        if self.flag.swap(true, Ordering::SeqCst) {
            return Err(InitError::AlreadyInitialized);
        }
        Ok(BootToken { _private: () })
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

impl Default for InitFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof that the caller won [`InitFlag::claim`]. Consumed by
/// [`init_interrupts`].
#[derive(Debug)]
pub struct BootToken {
    _private: (),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptConfig {
    pub master_offset: u8,
    pub slave_offset: u8,
    pub code_selector: u16,
    pub gate_privilege: PrivilegeLevel,
}

impl Default for InterruptConfig {
    fn default() -> Self {
        Self {
            master_offset: PIC_1_OFFSET,
            slave_offset: PIC_2_OFFSET,
            code_selector: KERNEL_CODE_SELECTOR,
            gate_privilege: PrivilegeLevel::Ring0,
        }
    }
}

impl InterruptConfig {
    /// Both IRQ windows must sit above the exception vectors, start on a
    /// multiple of 8 and stay clear of each other.
    pub fn validate(&self) -> Result<(), InitError> {
        for offset in [self.master_offset, self.slave_offset] {
            if usize::from(offset) < EXCEPTION_COUNT {
                return Err(InitError::OffsetInExceptionRange(offset));
            }
            if offset % PIC_LINES != 0 {
                return Err(InitError::MisalignedOffset(offset));
            }
        }
        if self.master_offset.abs_diff(self.slave_offset) < PIC_LINES {
            return Err(InitError::OverlappingOffsets {
                master: self.master_offset,
                slave: self.slave_offset,
            });
        }
        Ok(())
    }

    pub fn gate_flags(&self) -> u8 {
        interrupt_gate_flags(self.gate_privilege)
    }
}

/// Entry addresses of the trap trampoline stubs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateStubs {
    pub exceptions: [u32; EXCEPTION_COUNT],
    pub irqs: [u32; IRQ_LINES],
}

fn init_phase<T>(
    name: &'static str,
    init_fn: impl FnOnce() -> Result<T, InitError>,
) -> Result<T, InitError> {
    log::info!("Initializing {}...", name);
    match init_fn() {
        Ok(value) => {
            log::info!("{} initialized", name);
            Ok(value)
        }
        Err(e) => {
            log::error!("{} failed: {}", name, e);
            Err(e)
        }
    }
}

/// Builds and loads the vector table in `table_slot`, then remaps the
/// controllers. Interrupts are left disabled and no handler is registered.
pub fn init_interrupts<'a, H: Hardware, C: CharSink>(
    token: BootToken,
    config: &InterruptConfig,
    table_slot: &'static Once<VectorTable>,
    stubs: &GateStubs,
    hw: &'a H,
    console: &'a C,
) -> Result<Interrupts<'a, H, C>, InitError> {
    let BootToken { _private: () } = token;

    init_phase("interrupt configuration", || config.validate())?;

    let table = init_phase("vector table", || {
        if table_slot.is_completed() {
            return Err(InitError::AlreadyInitialized);
        }
        let flags = config.gate_flags();
        let table = table_slot.call_once(|| {
            let mut table = VectorTable::new();
            table.install_exception_stubs(&stubs.exceptions, config.code_selector, flags);
            table.install_irq_stubs(
                &stubs.irqs,
                config.master_offset,
                config.slave_offset,
                config.code_selector,
                flags,
            );
            table
        });
        table.install(hw);
        Ok(table)
    })?;

    let pics = init_phase("PIC", || {
        let mut pics = ChainedPics::legacy();
        pics.remap(hw, config.master_offset, config.slave_offset);
        Ok(pics)
    })?;

    Ok(Interrupts::new(hw, console, table, pics))
}
