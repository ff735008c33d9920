//! PS/2 keyboard on IRQ1.
//!
//! Each key press is translated through the US scancode set 1 table,
//! echoed to the console and queued for the foreground. Releases are
//! ignored, so there is no shift or control state.

use crate::console::CharSink;
use crate::constants::keyboard::{
    CMD_ENABLE_FIRST_PORT, FLUSH_LIMIT, KEYBOARD_BUFFER_SIZE, KEYBOARD_IRQ, RELEASE_BIT,
    STATUS_OUTPUT_FULL,
};
use crate::constants::ports::{PS2_COMMAND, PS2_DATA, PS2_STATUS};
use crate::data_structures::RingBuffer;
use crate::hw::Hardware;
use crate::interrupts::dispatch::InterruptHandler;
use crate::interrupts::registers::RegisterSnapshot;
use crate::interrupts::Interrupts;

/// US layout, scancode set 1, make codes only. Zero means no character.
#[rustfmt::skip]
pub const SCANCODE_SET1_US: [u8; 128] = [
    // 0x00
    0, 0x1B, b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'0', b'-', b'=', 0x08, b'\t',
    // 0x10
    b'q', b'w', b'e', b'r', b't', b'y', b'u', b'i', b'o', b'p', b'[', b']', b'\n', 0, b'a', b's',
    // 0x20
    b'd', b'f', b'g', b'h', b'j', b'k', b'l', b';', b'\'', b'`', 0, b'\\', b'z', b'x', b'c', b'v',
    // 0x30 (0x36 right shift, 0x38 alt, 0x3A caps lock, 0x3B.. F1)
    b'b', b'n', b'm', b',', b'.', b'/', 0, b'*', 0, b' ', 0, 0, 0, 0, 0, 0,
    // 0x40 (keypad)
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, b'-', 0, 0, 0, b'+', 0,
    // 0x50
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    // 0x60
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    // 0x70
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// Character for a make code, `None` for releases and unmapped keys.
pub fn translate(scancode: u8) -> Option<u8> {
    SCANCODE_SET1_US
        .get(scancode as usize)
        .copied()
        .filter(|&c| c != 0)
}

pub struct Keyboard<'a, H, C, const N: usize = KEYBOARD_BUFFER_SIZE> {
    hw: &'a H,
    console: &'a C,
    buffer: &'a RingBuffer<N>,
}

impl<'a, H: Hardware, C: CharSink, const N: usize> Keyboard<'a, H, C, N> {
    pub const fn new(hw: &'a H, console: &'a C, buffer: &'a RingBuffer<N>) -> Self {
        Self {
            hw,
            console,
            buffer,
        }
    }

    /// Brings the keyboard up: handler on IRQ1, stale bytes flushed, first
    /// port enabled, line unmasked. Interrupts stay globally off.
    pub fn attach<C2: CharSink>(&'a self, interrupts: &mut Interrupts<'a, H, C2>)
    where
        H: Sync,
        C: Sync,
    {
        if let Some(vector) = interrupts.register_line(KEYBOARD_IRQ, self) {
            log::debug!("keyboard: handler on vector {}", vector);
        }

        let discarded = self.flush();
        if discarded > 0 {
            log::debug!("keyboard: discarded {} stale bytes", discarded);
        }

        self.hw.write_port(PS2_COMMAND, CMD_ENABLE_FIRST_PORT);
        interrupts.unmask_line(KEYBOARD_IRQ);
    }

    fn flush(&self) -> usize {
        let mut discarded = 0;
        while discarded < FLUSH_LIMIT
            && self.hw.read_port(PS2_STATUS) & STATUS_OUTPUT_FULL != 0
        {
            self.hw.read_port(PS2_DATA);
            self.hw.io_wait();
            self.hw.io_wait();
            discarded += 1;
        }
        discarded
    }

    /// Interrupt side: one scancode in, at most one character out.
    pub fn process_scancode(&self, scancode: u8) {
        if scancode & RELEASE_BIT != 0 {
            return;
        }
        let Some(c) = translate(scancode) else {
            log::trace!("keyboard: unmapped scancode {:#04x}", scancode);
            return;
        };
        self.console.put_char(c);
        self.buffer.produce(c);
    }

    /// Blocks until a key press arrives.
    pub fn get_char(&self) -> u8 {
        self.buffer.consume(self.hw)
    }

    /// Blocks until a full line has been typed, see [`RingBuffer::read_line`].
    pub fn read_line(&self, buf: &mut [u8]) -> usize {
        self.buffer.read_line(self.hw, buf)
    }

    pub fn buffer(&self) -> &'a RingBuffer<N> {
        self.buffer
    }
}

impl<H: Hardware + Sync, C: CharSink + Sync, const N: usize> InterruptHandler
    for Keyboard<'_, H, C, N>
{
    fn handle(&self, _regs: &RegisterSnapshot) {
        let scancode = self.hw.read_port(PS2_DATA);
        self.process_scancode(scancode);
    }
}
