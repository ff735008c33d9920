//! 8259 PIC command words and default vector offsets.

/// Primary PIC handles IRQs 0-7
pub const PIC_1_OFFSET: u8 = 32;
/// Secondary PIC handles IRQs 8-15
pub const PIC_2_OFFSET: u8 = 40;

/// Offsets the BIOS leaves behind (IRQ 0-7 on top of the CPU exceptions).
pub const BIOS_PIC_1_OFFSET: u8 = 0x08;
pub const BIOS_PIC_2_OFFSET: u8 = 0x70;

/// Lines per controller
pub const PIC_LINES: u8 = 8;

/// ICW1: start initialization
pub const ICW1_INIT: u8 = 0x10;
/// ICW1: a fourth command word follows
pub const ICW1_ICW4: u8 = 0x01;
/// ICW3 for the master: slave wired on line 2
pub const ICW3_MASTER_CASCADE: u8 = 1 << CASCADE_LINE;
/// ICW3 for the slave: its cascade identity
pub const ICW3_SLAVE_IDENTITY: u8 = CASCADE_LINE;
/// ICW4: 8086/8088 mode
pub const ICW4_8086: u8 = 0x01;

/// Master line the slave is cascaded through
pub const CASCADE_LINE: u8 = 2;

/// Non-specific end of interrupt
pub const PIC_EOI: u8 = 0x20;
