//! Bare-metal wiring: the statics the kernel runs on and the symbols the
//! trap trampoline calls.
//!
//! ```text
//!  isr0..isr31 ──▶ isr_handler ──▶ trap::exception_trap ──▶ Interrupts::exception_entry
//!  irq0..irq15 ──▶ irq_handler ──▶ trap::irq_trap ───────▶ Interrupts::irq_entry
//! ```

use spin::Once;

use crate::console::SerialConsole;
use crate::constants::keyboard::KEYBOARD_BUFFER_SIZE;
use crate::data_structures::RingBuffer;
use crate::drivers::Keyboard;
use crate::error::InitError;
use crate::hw::PortIo;
use crate::interrupts::idt::VectorTable;
use crate::interrupts::registers::RegisterSnapshot;
use crate::interrupts::Interrupts;
use crate::kernel::init::{init_interrupts, GateStubs, InitFlag, InterruptConfig};
use crate::kernel::trap;
use crate::logging;

pub type System = Interrupts<'static, PortIo, SerialConsole>;

static INIT: InitFlag = InitFlag::new();
// SAFETY: entry points only run in ring 0 and nothing else touches the ports.
static PORTS: PortIo = unsafe { PortIo::new() };
static CONSOLE: SerialConsole = SerialConsole;
static VECTOR_TABLE: Once<VectorTable> = Once::new();
static KEYBOARD_BUFFER: RingBuffer<KEYBOARD_BUFFER_SIZE> = RingBuffer::new();
static KEYBOARD: Keyboard<'static, PortIo, SerialConsole> =
    Keyboard::new(&PORTS, &CONSOLE, &KEYBOARD_BUFFER);
static SYSTEM: Once<System> = Once::new();

macro_rules! stub_addresses {
    ($($stub:ident),* $(,)?) => {{
        extern "C" {
            $(fn $stub();)*
        }
        [$($stub as usize as u32),*]
    }};
}

fn gate_stubs() -> GateStubs {
    GateStubs {
        exceptions: stub_addresses![
            isr0, isr1, isr2, isr3, isr4, isr5, isr6, isr7, isr8, isr9, isr10, isr11, isr12,
            isr13, isr14, isr15, isr16, isr17, isr18, isr19, isr20, isr21, isr22, isr23, isr24,
            isr25, isr26, isr27, isr28, isr29, isr30, isr31,
        ],
        irqs: stub_addresses![
            irq0, irq1, irq2, irq3, irq4, irq5, irq6, irq7, irq8, irq9, irq10, irq11, irq12,
            irq13, irq14, irq15,
        ],
    }
}

/// Brings the interrupt system up once: table, controllers, keyboard, then
/// interrupts on. A second call fails with
/// [`InitError::AlreadyInitialized`].
pub fn boot() -> Result<&'static System, InitError> {
    logging::init();
    let token = INIT.claim()?;

    let mut system = init_interrupts(
        token,
        &InterruptConfig::default(),
        &VECTOR_TABLE,
        &gate_stubs(),
        &PORTS,
        &CONSOLE,
    )?;
    KEYBOARD.attach(&mut system);

    let system = SYSTEM.call_once(|| system);
    system.enable();
    crate::println!("Interrupts enabled, keyboard on IRQ1");
    Ok(system)
}

/// Blocks until a key is pressed.
pub fn get_char() -> u8 {
    KEYBOARD.get_char()
}

/// Blocks until a line is typed, NUL-terminates it in `buf` and returns
/// its length.
pub fn read_line(buf: &mut [u8]) -> usize {
    KEYBOARD.read_line(buf)
}

/// Called by the exception trampoline.
///
/// # Safety
///
/// `regs` is null or points to a snapshot that stays valid for the call.
#[no_mangle]
pub unsafe extern "C" fn isr_handler(regs: *const RegisterSnapshot) {
    trap::exception_trap(SYSTEM.get(), &CONSOLE, unsafe { regs.as_ref() });
}

/// Called by the IRQ trampoline.
///
/// # Safety
///
/// `regs` is null or points to a snapshot that stays valid for the call.
#[no_mangle]
pub unsafe extern "C" fn irq_handler(regs: *const RegisterSnapshot) {
    trap::irq_trap(SYSTEM.get(), unsafe { regs.as_ref() });
}
