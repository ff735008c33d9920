//! # Output Sink
//!
//! The interrupt core never draws anything itself. It emits single
//! characters into a [`CharSink`]: keyboard echo and the unhandled-exception
//! diagnostic are the only producers.

use core::fmt;

use spin::Mutex;
use uart_16550::SerialPort;

use crate::SERIAL;

/// "Emit one character" - the only thing the core assumes about the screen.
pub trait CharSink {
    fn put_char(&self, c: u8);
}

/// Lets `write!` target any [`CharSink`] without a heap.
pub struct SinkWriter<'a, S: CharSink + ?Sized> {
    sink: &'a S,
}

impl<'a, S: CharSink + ?Sized> SinkWriter<'a, S> {
    pub fn new(sink: &'a S) -> Self {
        SinkWriter { sink }
    }
}

impl<S: CharSink + ?Sized> fmt::Write for SinkWriter<'_, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.sink.put_char(byte);
        }
        Ok(())
    }
}

/// A device that takes output one byte at a time.
pub trait ByteOut {
    fn send(&mut self, byte: u8);
}

impl ByteOut for SerialPort {
    fn send(&mut self, byte: u8) {
        SerialPort::send(self, byte);
    }
}

/// Sink over a port the foreground also writes through.
///
/// Interrupt handlers echo through this sink while the code they interrupted
/// may hold the port, so it never waits for the lock. A character that
/// arrives while the port is held is dropped.
pub struct LockedSink<'a, W> {
    port: &'a Mutex<W>,
}

impl<'a, W> LockedSink<'a, W> {
    pub const fn new(port: &'a Mutex<W>) -> Self {
        Self { port }
    }
}

impl<W: ByteOut> CharSink for LockedSink<'_, W> {
    fn put_char(&self, c: u8) {
        if let Some(mut port) = self.port.try_lock() {
            port.send(c);
        }
    }
}

/// Sink backed by COM1.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialConsole;

impl CharSink for SerialConsole {
    fn put_char(&self, c: u8) {
        LockedSink::new(&*SERIAL).put_char(c);
    }
}
