/// Kernel initialization and bootstrap module
pub mod init;
pub mod trap;

#[cfg(all(target_arch = "x86", target_os = "none"))]
pub mod entry;

pub use init::{init_interrupts, BootToken, GateStubs, InitFlag, InterruptConfig};
