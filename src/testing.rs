//! Host stand-ins for the machine: a recording [`Hardware`] with two
//! emulated 8259s behind the PIC ports, and a [`CharSink`] that keeps what
//! it was given.

use std::collections::{HashMap, VecDeque};

use spin::Mutex;

use crate::console::{ByteOut, CharSink};
use crate::constants::pic::{BIOS_PIC_1_OFFSET, BIOS_PIC_2_OFFSET, ICW1_INIT, PIC_EOI, PIC_LINES};
use crate::constants::ports::{PIC1_COMMAND, PIC1_DATA, PIC2_COMMAND, PIC2_DATA};
use crate::hw::Hardware;
use crate::interrupts::idt::TableDescriptor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HwOp {
    Read(u16),
    Write(u16, u8),
    LoadTable { limit: u16, base: u32 },
    Halt,
    EnableInterrupts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InitStep {
    Ready,
    Offset,
    Cascade,
    Mode,
}

/// One 8259 as far as the initialization words, mask register and EOI go.
#[derive(Debug, Clone, Copy)]
pub struct Emulated8259 {
    offset: u8,
    mask: u8,
    cascade: u8,
    step: InitStep,
    eois: usize,
}

impl Emulated8259 {
    fn new(offset: u8) -> Self {
        Self {
            offset,
            mask: 0,
            cascade: 0,
            step: InitStep::Ready,
            eois: 0,
        }
    }

    fn command(&mut self, value: u8) {
        if value & ICW1_INIT != 0 {
            self.mask = 0;
            self.step = InitStep::Offset;
        } else if value == PIC_EOI {
            self.eois += 1;
        }
    }

    fn data(&mut self, value: u8) {
        self.step = match self.step {
            InitStep::Offset => {
                self.offset = value;
                InitStep::Cascade
            }
            InitStep::Cascade => {
                self.cascade = value;
                InitStep::Mode
            }
            InitStep::Mode => InitStep::Ready,
            InitStep::Ready => {
                self.mask = value;
                InitStep::Ready
            }
        };
    }

    pub fn cascade(&self) -> u8 {
        self.cascade
    }
}

type HaltHook = Box<dyn FnMut(usize) + Send>;

struct State {
    ops: Vec<HwOp>,
    pics: [Emulated8259; 2],
    inputs: HashMap<u16, VecDeque<u8>>,
    ports: HashMap<u16, u8>,
    halts: usize,
}

pub struct FakeHardware {
    state: Mutex<State>,
    halt_hook: Mutex<Option<HaltHook>>,
}

impl FakeHardware {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                ops: Vec::new(),
                pics: [
                    Emulated8259::new(BIOS_PIC_1_OFFSET),
                    Emulated8259::new(BIOS_PIC_2_OFFSET),
                ],
                inputs: HashMap::new(),
                ports: HashMap::new(),
                halts: 0,
            }),
            halt_hook: Mutex::new(None),
        }
    }

    pub fn ops(&self) -> Vec<HwOp> {
        self.state.lock().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.state.lock().ops.clear();
    }

    /// Bytes returned, in order, by reads of `port`. Once drained, reads
    /// fall back to the value set with [`FakeHardware::set_port`].
    pub fn queue_input(&self, port: u16, bytes: &[u8]) {
        self.state
            .lock()
            .inputs
            .entry(port)
            .or_default()
            .extend(bytes.iter().copied());
    }

    pub fn set_port(&self, port: u16, value: u8) {
        self.state.lock().ports.insert(port, value);
    }

    /// Runs on every `halt`, with the number of halts so far.
    pub fn set_halt_hook(&self, hook: impl FnMut(usize) + Send + 'static) {
        *self.halt_hook.lock() = Some(Box::new(hook));
    }

    pub fn halts(&self) -> usize {
        self.state.lock().halts
    }

    pub fn set_pic_masks(&self, master: u8, slave: u8) {
        let mut state = self.state.lock();
        state.pics[0].mask = master;
        state.pics[1].mask = slave;
    }

    pub fn pic_masks(&self) -> [u8; 2] {
        let state = self.state.lock();
        [state.pics[0].mask, state.pics[1].mask]
    }

    pub fn pic_eoi_counts(&self) -> [usize; 2] {
        let state = self.state.lock();
        [state.pics[0].eois, state.pics[1].eois]
    }

    pub fn pic(&self, index: usize) -> Emulated8259 {
        self.state.lock().pics[index]
    }

    /// Vector the emulated controllers would raise for `line`, `None` while
    /// the owning chip is mid-initialization.
    pub fn pic_vector_for_line(&self, line: u8) -> Option<u8> {
        let state = self.state.lock();
        let (pic, pin) = match line {
            0..=7 => (&state.pics[0], line),
            8..=15 => (&state.pics[1], line - PIC_LINES),
            _ => return None,
        };
        (pic.step == InitStep::Ready).then(|| pic.offset.wrapping_add(pin))
    }

    pub fn count_writes(&self, port: u16) -> usize {
        self.state
            .lock()
            .ops
            .iter()
            .filter(|op| matches!(op, HwOp::Write(p, _) if *p == port))
            .count()
    }
}

impl Default for FakeHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl Hardware for FakeHardware {
    fn read_port(&self, port: u16) -> u8 {
        let mut state = self.state.lock();
        state.ops.push(HwOp::Read(port));
        match port {
            PIC1_DATA => state.pics[0].mask,
            PIC2_DATA => state.pics[1].mask,
            _ => {
                let queued = state.inputs.get_mut(&port).and_then(VecDeque::pop_front);
                queued.unwrap_or_else(|| state.ports.get(&port).copied().unwrap_or(0))
            }
        }
    }

    fn write_port(&self, port: u16, value: u8) {
        let mut state = self.state.lock();
        state.ops.push(HwOp::Write(port, value));
        match port {
            PIC1_COMMAND => state.pics[0].command(value),
            PIC2_COMMAND => state.pics[1].command(value),
            PIC1_DATA => state.pics[0].data(value),
            PIC2_DATA => state.pics[1].data(value),
            _ => {}
        }
    }

    fn load_table(&self, descriptor: &TableDescriptor) {
        self.state.lock().ops.push(HwOp::LoadTable {
            limit: descriptor.limit(),
            base: descriptor.base(),
        });
    }

    fn halt(&self) {
        let halts = {
            let mut state = self.state.lock();
            state.ops.push(HwOp::Halt);
            state.halts += 1;
            state.halts
        };
        if let Some(hook) = self.halt_hook.lock().as_mut() {
            hook(halts);
        }
    }

    fn enable_interrupts(&self) {
        self.state.lock().ops.push(HwOp::EnableInterrupts);
    }
}

#[derive(Default)]
pub struct RecordingSink {
    output: Mutex<Vec<u8>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.output.lock()).into_owned()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.output.lock().clone()
    }
}

impl CharSink for RecordingSink {
    fn put_char(&self, c: u8) {
        self.output.lock().push(c);
    }
}

impl ByteOut for Vec<u8> {
    fn send(&mut self, byte: u8) {
        self.push(byte);
    }
}
