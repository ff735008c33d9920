/// CPU state captured by the trap trampoline, in the order it is pushed.
///
/// Dispatch and handlers only look at the interrupt number and error code.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(dead_code)] // general registers are written by the trampoline and only dumped
pub struct RegisterSnapshot {
    ds: u32,
    // pusha
    edi: u32,
    esi: u32,
    ebp: u32,
    esp: u32,
    ebx: u32,
    edx: u32,
    ecx: u32,
    eax: u32,
    int_no: u32,
    err_code: u32,
    // pushed by the processor
    eip: u32,
    cs: u32,
    eflags: u32,
    useresp: u32,
    ss: u32,
}

impl RegisterSnapshot {
    /// Snapshot of a synthetic trap with every captured register zeroed.
    pub const fn new(int_no: u32, err_code: u32) -> Self {
        Self {
            ds: 0,
            edi: 0,
            esi: 0,
            ebp: 0,
            esp: 0,
            ebx: 0,
            edx: 0,
            ecx: 0,
            eax: 0,
            int_no,
            err_code,
            eip: 0,
            cs: 0,
            eflags: 0,
            useresp: 0,
            ss: 0,
        }
    }

    pub fn interrupt_number(&self) -> u32 {
        self.int_no
    }

    pub fn error_code(&self) -> u32 {
        self.err_code
    }

    pub fn instruction_pointer(&self) -> u32 {
        self.eip
    }

    /// The interrupt number as a table index, `None` if it is out of range.
    pub fn vector(&self) -> Option<u8> {
        u8::try_from(self.int_no).ok()
    }
}
