//! # Programmable Interrupt Controller (8259 PIC)
//!
//! Reprograms the two chained 8259 chips and acknowledges their interrupts.
//!
//! ## PIC Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐
//! │   PIC 1     │◀────│   PIC 2     │
//! │  (Master)   │ IR2 │  (Slave)    │
//! │ IRQ 0-7     │     │ IRQ 8-15    │
//! └─────────────┘     └─────────────┘
//!       │
//!       ▼
//!     CPU
//! ```
//!
//! ## Vector Remapping
//!
//! Out of the BIOS, IRQ 0-7 sit on vectors 8-15, on top of the CPU
//! exceptions. [`ChainedPics::remap`] moves them:
//! - PIC 1: vectors 32-39 (IRQ 0-7)
//! - PIC 2: vectors 40-47 (IRQ 8-15)
//!
//! ## Initialization Sequence
//!
//! | Step | Master (0x20/0x21) | Slave (0xA0/0xA1) |
//! |------|--------------------|-------------------|
//! | save | read mask          | read mask         |
//! | ICW1 | 0x11               | 0x11              |
//! | ICW2 | offset1            | offset2           |
//! | ICW3 | 0x04 (slave on IR2)| 0x02 (identity)   |
//! | ICW4 | 0x01 (8086 mode)   | 0x01 (8086 mode)  |
//! | OCW1 | saved mask         | saved mask        |
//!
//! ## End of Interrupt
//!
//! Slave vectors need an EOI on the slave and then on the master, because
//! the master also holds the cascade line. Everything else needs the master
//! only.

use crate::constants::pic::{
    BIOS_PIC_1_OFFSET, BIOS_PIC_2_OFFSET, CASCADE_LINE, ICW1_ICW4, ICW1_INIT, ICW3_MASTER_CASCADE,
    ICW3_SLAVE_IDENTITY, ICW4_8086, PIC_EOI, PIC_LINES,
};
use crate::constants::ports::{PIC1_COMMAND, PIC1_DATA, PIC2_COMMAND, PIC2_DATA};
use crate::hw::Hardware;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pic {
    offset: u8,
    command: u16,
    data: u16,
}

impl Pic {
    fn handles_vector(&self, vector: u8) -> bool {
        self.offset <= vector && vector - self.offset < PIC_LINES
    }

    fn end_of_interrupt<H: Hardware>(&self, hw: &H) {
        hw.write_port(self.command, PIC_EOI);
    }

    fn read_mask<H: Hardware>(&self, hw: &H) -> u8 {
        hw.read_port(self.data)
    }

    fn write_mask<H: Hardware>(&self, hw: &H, mask: u8) {
        hw.write_port(self.data, mask);
    }
}

/// Master and slave 8259 wired through master line 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainedPics {
    pics: [Pic; 2],
}

impl ChainedPics {
    pub const fn new(master_offset: u8, slave_offset: u8) -> Self {
        Self {
            pics: [
                Pic {
                    offset: master_offset,
                    command: PIC1_COMMAND,
                    data: PIC1_DATA,
                },
                Pic {
                    offset: slave_offset,
                    command: PIC2_COMMAND,
                    data: PIC2_DATA,
                },
            ],
        }
    }

    /// The controllers as the BIOS leaves them.
    pub const fn legacy() -> Self {
        Self::new(BIOS_PIC_1_OFFSET, BIOS_PIC_2_OFFSET)
    }

    pub fn master_offset(&self) -> u8 {
        self.pics[0].offset
    }

    pub fn slave_offset(&self) -> u8 {
        self.pics[1].offset
    }

    /// Moves IRQ 0-7 to `offset1..offset1+8` and IRQ 8-15 to
    /// `offset2..offset2+8`, keeping whatever lines were masked before.
    ///
    /// Offsets are not checked here. Overlapping windows route lines to the
    /// wrong vectors.
    pub fn remap<H: Hardware>(&mut self, hw: &H, offset1: u8, offset2: u8) {
        let saved = self.read_masks(hw);

        self.pics[0].offset = offset1;
        self.pics[1].offset = offset2;

        for pic in &self.pics {
            hw.write_port(pic.command, ICW1_INIT | ICW1_ICW4);
        }
        for pic in &self.pics {
            hw.write_port(pic.data, pic.offset);
        }
        hw.write_port(self.pics[0].data, ICW3_MASTER_CASCADE);
        hw.write_port(self.pics[1].data, ICW3_SLAVE_IDENTITY);
        for pic in &self.pics {
            hw.write_port(pic.data, ICW4_8086);
        }

        self.write_masks(hw, saved);

        log::debug!(
            "PIC: remapped to {}/{} (masks {:#04x}/{:#04x})",
            offset1,
            offset2,
            saved[0],
            saved[1]
        );
    }

    pub fn handles_vector(&self, vector: u8) -> bool {
        self.pics.iter().any(|pic| pic.handles_vector(vector))
    }

    /// Sends end-of-interrupt for `vector`: slave first when the vector is
    /// in the slave's window, then always the master.
    pub fn acknowledge<H: Hardware>(&self, hw: &H, vector: u8) {
        if self.pics[1].handles_vector(vector) {
            self.pics[1].end_of_interrupt(hw);
        }
        self.pics[0].end_of_interrupt(hw);
    }

    /// Vector an IRQ line arrives on with the current offsets.
    pub fn vector_for_line(&self, line: u8) -> Option<u8> {
        match line {
            0..=7 => Some(self.pics[0].offset.wrapping_add(line)),
            8..=15 => Some(self.pics[1].offset.wrapping_add(line - PIC_LINES)),
            _ => None,
        }
    }

    pub fn read_masks<H: Hardware>(&self, hw: &H) -> [u8; 2] {
        [self.pics[0].read_mask(hw), self.pics[1].read_mask(hw)]
    }

    pub fn write_masks<H: Hardware>(&self, hw: &H, masks: [u8; 2]) {
        self.pics[0].write_mask(hw, masks[0]);
        self.pics[1].write_mask(hw, masks[1]);
    }

    pub fn mask_line<H: Hardware>(&self, hw: &H, line: u8) {
        if let Some((pic, bit)) = self.owner(line) {
            let mask = pic.read_mask(hw);
            pic.write_mask(hw, mask | bit);
        }
    }

    /// Enables one line. A slave line also needs the cascade line open on
    /// the master.
    pub fn unmask_line<H: Hardware>(&self, hw: &H, line: u8) {
        let Some((pic, bit)) = self.owner(line) else {
            return;
        };
        let mask = pic.read_mask(hw);
        pic.write_mask(hw, mask & !bit);
        if line >= PIC_LINES {
            self.unmask_line(hw, CASCADE_LINE);
        }
    }

    fn owner(&self, line: u8) -> Option<(&Pic, u8)> {
        match line {
            0..=7 => Some((&self.pics[0], 1 << line)),
            8..=15 => Some((&self.pics[1], 1 << (line - PIC_LINES))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeHardware, HwOp};

    fn remapped(hw: &FakeHardware) -> ChainedPics {
        let mut pics = ChainedPics::legacy();
        pics.remap(hw, 32, 40);
        pics
    }

    #[test]
    fn remap_sends_init_words_in_order() {
        let hw = FakeHardware::new();
        remapped(&hw);

        assert_eq!(
            hw.ops(),
            vec![
                HwOp::Read(0x21),
                HwOp::Read(0xA1),
                HwOp::Write(0x20, 0x11),
                HwOp::Write(0xA0, 0x11),
                HwOp::Write(0x21, 32),
                HwOp::Write(0xA1, 40),
                HwOp::Write(0x21, 0x04),
                HwOp::Write(0xA1, 0x02),
                HwOp::Write(0x21, 0x01),
                HwOp::Write(0xA1, 0x01),
                HwOp::Write(0x21, 0x00),
                HwOp::Write(0xA1, 0x00),
            ]
        );
        assert_eq!(hw.pic(0).cascade(), 0x04);
        assert_eq!(hw.pic(1).cascade(), 0x02);
    }

    #[test]
    fn remapped_lines_arrive_at_offset_vectors() {
        let hw = FakeHardware::new();
        let pics = remapped(&hw);

        for line in 0..8u8 {
            assert_eq!(hw.pic_vector_for_line(line), Some(32 + line));
            assert_eq!(pics.vector_for_line(line), Some(32 + line));
        }
        for line in 8..16u8 {
            assert_eq!(hw.pic_vector_for_line(line), Some(40 + line - 8));
            assert_eq!(pics.vector_for_line(line), Some(40 + line - 8));
        }
        assert_eq!(pics.vector_for_line(16), None);
    }

    #[test]
    fn remap_preserves_masks() {
        let hw = FakeHardware::new();
        hw.set_pic_masks(0b1011_1000, 0b1000_1110);

        let pics = remapped(&hw);

        assert_eq!(hw.pic_masks(), [0b1011_1000, 0b1000_1110]);
        hw.clear_ops();
        assert_eq!(pics.read_masks(&hw), [0b1011_1000, 0b1000_1110]);
    }

    #[test]
    fn remap_uses_new_offsets_for_acknowledge() {
        let hw = FakeHardware::new();
        let mut pics = ChainedPics::legacy();
        pics.remap(&hw, 0x50, 0x58);
        hw.clear_ops();

        pics.acknowledge(&hw, 0x5A);
        assert_eq!(hw.ops(), vec![HwOp::Write(0xA0, 0x20), HwOp::Write(0x20, 0x20)]);
        assert_eq!(pics.master_offset(), 0x50);
        assert_eq!(pics.slave_offset(), 0x58);
    }

    #[test]
    fn acknowledge_slave_vector_hits_slave_then_master() {
        let hw = FakeHardware::new();
        let pics = remapped(&hw);
        hw.clear_ops();

        pics.acknowledge(&hw, 44);

        assert_eq!(hw.ops(), vec![HwOp::Write(0xA0, 0x20), HwOp::Write(0x20, 0x20)]);
        assert_eq!(hw.pic_eoi_counts(), [1, 1]);
    }

    #[test]
    fn acknowledge_master_vector_hits_master_only() {
        let hw = FakeHardware::new();
        let pics = remapped(&hw);

        for vector in 32..40u8 {
            hw.clear_ops();
            pics.acknowledge(&hw, vector);
            assert_eq!(hw.ops(), vec![HwOp::Write(0x20, 0x20)]);
        }
        assert_eq!(hw.pic_eoi_counts(), [8, 0]);
    }

    #[test]
    fn acknowledge_past_slave_window_hits_master_only() {
        let hw = FakeHardware::new();
        let pics = remapped(&hw);
        hw.clear_ops();

        pics.acknowledge(&hw, 48);

        assert_eq!(hw.ops(), vec![HwOp::Write(0x20, 0x20)]);
    }

    #[test]
    fn unmask_slave_line_opens_cascade() {
        let hw = FakeHardware::new();
        let pics = remapped(&hw);
        hw.set_pic_masks(0xFF, 0xFF);

        pics.unmask_line(&hw, 12);

        assert_eq!(hw.pic_masks(), [0xFF & !(1 << 2), 0xFF & !(1 << 4)]);
    }

    #[test]
    fn mask_and_unmask_touch_one_bit() {
        let hw = FakeHardware::new();
        let pics = remapped(&hw);
        hw.set_pic_masks(0xFF, 0xFF);

        pics.unmask_line(&hw, 1);
        assert_eq!(hw.pic_masks(), [0xFD, 0xFF]);

        pics.mask_line(&hw, 1);
        assert_eq!(hw.pic_masks(), [0xFF, 0xFF]);

        pics.mask_line(&hw, 16);
        assert_eq!(hw.pic_masks(), [0xFF, 0xFF]);
    }
}
