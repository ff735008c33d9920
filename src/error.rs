use core::fmt;

/// Reasons the one-time interrupt bring-up can refuse to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    AlreadyInitialized,
    OffsetInExceptionRange(u8),
    MisalignedOffset(u8),
    OverlappingOffsets { master: u8, slave: u8 },
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::AlreadyInitialized => write!(f, "Interrupts already initialized"),
            InitError::OffsetInExceptionRange(offset) => {
                write!(f, "PIC offset {} overlaps the CPU exception vectors", offset)
            }
            InitError::MisalignedOffset(offset) => {
                write!(f, "PIC offset {} is not a multiple of 8", offset)
            }
            InitError::OverlappingOffsets { master, slave } => {
                write!(f, "PIC offsets {} and {} overlap", master, slave)
            }
        }
    }
}
