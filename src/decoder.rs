use serde::{Deserialize, Serialize};

use crate::encoder::MachineWord;
use crate::error::AsmError;
use crate::instructions::{Format, Opcode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    pub opcode: Opcode,
    pub reg: u8,  // bits 11..9 (formats B and C)
    pub imm: u16, // address/immediate field, unextended
}

impl Decoded {
    pub fn format(&self) -> Format {
        self.opcode.format()
    }

    /// Address/immediate field sign-extended by the width of its format.
    pub fn imm_signed(&self) -> i16 {
        let bits = match self.format() {
            Format::A | Format::D => 12,
            Format::B => 9,
            Format::C => return 0,
        };
        let s = 16 - bits;
        ((self.imm << s) as i16) >> s
    }
}

pub trait Decoder {
    fn decode(&self, word: MachineWord) -> Option<Decoded>;
}

pub struct Mc16Decoder;

impl Mc16Decoder {
    pub fn new() -> Self {
        Self
    }

    pub fn try_decode(&self, word: MachineWord) -> Result<Decoded, AsmError> {
        let raw = word as u16;
        let nibble = (raw >> 12) as u8;
        let low9 = raw & 0x1FF;
        let opcode = Opcode::from_bits(nibble, low9)?;
        let d = match opcode.format() {
            Format::A | Format::D => Decoded { opcode, reg: 0, imm: raw & 0xFFF },
            Format::B => Decoded { opcode, reg: ((raw >> 9) & 0x7) as u8, imm: low9 },
            Format::C => Decoded { opcode, reg: ((raw >> 9) & 0x7) as u8, imm: 0 },
        };
        Ok(d)
    }
}

impl Default for Mc16Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for Mc16Decoder {
    fn decode(&self, word: MachineWord) -> Option<Decoded> {
        self.try_decode(word).ok()
    }
}
