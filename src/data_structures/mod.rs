//! # Data Structures Module
//!
//! Fixed-size containers that work without a heap.
//!
//! ## Modules
//!
//! - `ring_buffer`: Lock-free byte queue between one interrupt handler and
//!   one foreground reader

pub mod ring_buffer;

pub use ring_buffer::RingBuffer;
