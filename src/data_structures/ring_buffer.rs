//! Single-producer, single-consumer byte queue shared between an interrupt
//! handler and the foreground.
//!
//! ```text
//!        read                write
//!         │                    │
//!         ▼                    ▼
//!  ┌───┬───┬───┬───┬───┬───┬───┬───┐
//!  │   │ h │ e │ l │ l │ o │   │   │
//!  └───┴───┴───┴───┴───┴───┴───┴───┘
//! ```
//!
//! Only the producer moves `write` and only the consumer moves `read`, so no
//! lock is needed. A second producer or consumer breaks this; guard the
//! queue with a lock before sharing either side.
//!
//! One slot always stays free: `read == write` means empty, and a produce
//! that would make them equal is dropped.

use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use crate::hw::Hardware;

pub struct RingBuffer<const N: usize> {
    slots: [AtomicU8; N],
    write: AtomicUsize,
    read: AtomicUsize,
}

impl<const N: usize> RingBuffer<N> {
    #[allow(clippy::declare_interior_mutable_const)]
    const EMPTY_SLOT: AtomicU8 = AtomicU8::new(0);

    const VALID: () = assert!(N >= 2, "ring buffer needs at least two slots");

    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID;
        Self {
            slots: [Self::EMPTY_SLOT; N],
            write: AtomicUsize::new(0),
            read: AtomicUsize::new(0),
        }
    }

    /// Characters the buffer can hold at once.
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Producer side. Never blocks; returns `false` and leaves the buffer
    /// untouched when it is full.
    pub fn produce(&self, c: u8) -> bool {
        let write = self.write.load(Ordering::Relaxed);
        let next = (write + 1) % N;
        if next == self.read.load(Ordering::Acquire) {
            log::trace!("ring buffer full, dropped {:#04x}", c);
            return false;
        }
        self.slots[write].store(c, Ordering::Relaxed);
        self.write.store(next, Ordering::Release);
        true
    }

    /// Consumer side. Takes the oldest character if there is one.
    pub fn try_consume(&self) -> Option<u8> {
        let read = self.read.load(Ordering::Relaxed);
        if read == self.write.load(Ordering::Acquire) {
            return None;
        }
        let c = self.slots[read].load(Ordering::Relaxed);
        self.read.store((read + 1) % N, Ordering::Release);
        Some(c)
    }

    /// Consumer side. Halts until an interrupt has produced a character.
    ///
    /// Any interrupt ends a halt, so the buffer is checked again after each
    /// one. There is no timeout and no way to cancel the wait.
    pub fn consume<H: Hardware>(&self, hw: &H) -> u8 {
        loop {
            if let Some(c) = self.try_consume() {
                return c;
            }
            hw.halt();
        }
    }

    /// Consumer side. Collects one line into `buf` and NUL-terminates it.
    ///
    /// `\n` ends the line and is not stored. `\b` drops the last stored
    /// character. Input past `buf.len() - 1` characters ends the line early.
    /// Returns the line length, not counting the NUL.
    pub fn read_line<H: Hardware>(&self, hw: &H, buf: &mut [u8]) -> usize {
        let Some(max) = buf.len().checked_sub(1) else {
            return 0;
        };
        let mut len = 0;
        while len < max {
            match self.consume(hw) {
                b'\n' => break,
                b'\x08' => len = len.saturating_sub(1),
                c => {
                    buf[len] = c;
                    len += 1;
                }
            }
        }
        buf[len] = 0;
        len
    }

    pub fn is_empty(&self) -> bool {
        self.read.load(Ordering::Acquire) == self.write.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        let write = self.write.load(Ordering::Acquire);
        let read = self.read.load(Ordering::Acquire);
        (write + N - read) % N
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
