//! Minimal decode of a single MIPS-I instruction word: just enough to
//! resolve an instruction's operand reference targets.

use crate::mem::Address;

/// A single 32-bit instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction(pub u32);

impl Instruction {
    /// The primary opcode, bits 26..32.
    #[inline(always)]
    pub const fn op(self) -> u32 {
        self.0 >> 26
    }

    /// The 26-bit jump target field.
    #[inline(always)]
    const fn imm26(self) -> u32 {
        self.0 & 0x03FF_FFFF
    }

    /// The signed 16-bit immediate.
    #[inline(always)]
    const fn imm16(self) -> i16 {
        self.0 as u16 as i16
    }

    /// Resolves the operand reference targets of this instruction when
    /// located at `addr`: the destination of jumps and branches. Most
    /// instructions reference no address at all.
    pub fn reference_targets(self, addr: Address) -> Vec<Address> {
        match self.op() {
            // J, JAL: target is within the 256MiB window of the delay slot
            0x02 | 0x03 => {
                let window = (addr + 4u32).value() & 0xF000_0000;
                vec![Address(window | (self.imm26() << 2))]
            }
            // BZ, BEQ, BNE, BLEZ, BGTZ: signed word offset from the delay slot
            0x01 | 0x04..=0x07 => {
                let offset = i32::from(self.imm16()) << 2;
                vec![addr + 4u32 + offset]
            }
            _ => Vec::new(),
        }
    }
}
