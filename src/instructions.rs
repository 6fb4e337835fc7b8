use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::AsmError;

/// Register-register operations. They all share opcode `0b1000` and are told
/// apart only by their function code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegOp {
    Add,
    Sub,
    And,
    Or,
    Not,
    Nop,
    MvTo,
    MvFrom,
}

/// Operation class. The numeric opcode identifies the word layout, not the
/// operation, so every [`RegOp`] maps onto the same 4-bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    Reg(RegOp),
    AddI,
    SubI,
    AndI,
    OrI,
    Load,
    Store,
    Jump,
    Branch,
}

/// Fixed 16-bit word layouts. The opcode always sits in the high nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    /// opc[4] adr[12]: load, store, jump
    A,
    /// opc[4] reg[3] adr[9]: branch
    B,
    /// opc[4] reg[3] func[9]: register-register ops
    C,
    /// opc[4] imm[12]: immediate ALU ops
    D,
}

bitflags! {
/// One-hot function codes of the register-register ops (low 9 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionCode: u16 {
const MV_TO = 1 << 0;
const MV_FROM = 1 << 1;
const ADD = 1 << 2;
const SUB = 1 << 3;
const AND = 1 << 4;
const OR = 1 << 5;
const NOT = 1 << 6;
const NOP = 1 << 7;
// bit 8 is unassigned
}
}

pub const REG_OPCODE: u8 = 0b1000;

impl RegOp {
    pub const ALL: [RegOp; 8] = [
        RegOp::Add,
        RegOp::Sub,
        RegOp::And,
        RegOp::Or,
        RegOp::Not,
        RegOp::Nop,
        RegOp::MvTo,
        RegOp::MvFrom,
    ];

    pub fn funct(self) -> FunctionCode {
        match self {
            RegOp::Add => FunctionCode::ADD,
            RegOp::Sub => FunctionCode::SUB,
            RegOp::And => FunctionCode::AND,
            RegOp::Or => FunctionCode::OR,
            RegOp::Not => FunctionCode::NOT,
            RegOp::Nop => FunctionCode::NOP,
            RegOp::MvTo => FunctionCode::MV_TO,
            RegOp::MvFrom => FunctionCode::MV_FROM,
        }
    }

    /// Inverse of [`RegOp::funct`]; `None` unless exactly one assigned bit is set.
    pub fn from_funct(funct: u16) -> Option<RegOp> {
        RegOp::ALL.into_iter().find(|op| op.funct().bits() == funct)
    }
}

impl Opcode {
    /// 4-bit numeric opcode placed in bits 15..12.
    pub fn bits(self) -> u8 {
        match self {
            Opcode::Reg(_) => REG_OPCODE,
            Opcode::AddI => 0b1100,
            Opcode::SubI => 0b1101,
            Opcode::AndI => 0b1110,
            Opcode::OrI => 0b1111,
            Opcode::Load => 0b0000,
            Opcode::Store => 0b0001,
            Opcode::Jump => 0b0010,
            Opcode::Branch => 0b0100,
        }
    }

    pub fn format(self) -> Format {
        match self {
            Opcode::Load | Opcode::Store | Opcode::Jump => Format::A,
            Opcode::Branch => Format::B,
            Opcode::Reg(_) => Format::C,
            Opcode::AddI | Opcode::SubI | Opcode::AndI | Opcode::OrI => Format::D,
        }
    }

    /// Rebuilds an opcode from a word's high nibble and low 9 bits.
    pub fn from_bits(nibble: u8, funct: u16) -> Result<Opcode, AsmError> {
        let op = match nibble {
            0b0000 => Opcode::Load,
            0b0001 => Opcode::Store,
            0b0010 => Opcode::Jump,
            0b0100 => Opcode::Branch,
            REG_OPCODE => {
                Opcode::Reg(RegOp::from_funct(funct).ok_or(AsmError::UnsupportedOpcode(nibble))?)
            }
            0b1100 => Opcode::AddI,
            0b1101 => Opcode::SubI,
            0b1110 => Opcode::AndI,
            0b1111 => Opcode::OrI,
            _ => return Err(AsmError::UnsupportedOpcode(nibble)),
        };
        Ok(op)
    }

    pub fn mnemonic(self) -> &'static str {
        TABLE
            .iter()
            .find(|d| d.opcode == self)
            .map(|d| d.mnemonic)
            .unwrap_or("?")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub mnemonic: &'static str,
    pub opcode: Opcode,
}

pub const TABLE: &[InstrDesc] = &[
    InstrDesc {
        mnemonic: "add",
        opcode: Opcode::Reg(RegOp::Add),
    },
    InstrDesc {
        mnemonic: "sub",
        opcode: Opcode::Reg(RegOp::Sub),
    },
    InstrDesc {
        mnemonic: "and",
        opcode: Opcode::Reg(RegOp::And),
    },
    InstrDesc {
        mnemonic: "or",
        opcode: Opcode::Reg(RegOp::Or),
    },
    InstrDesc {
        mnemonic: "not",
        opcode: Opcode::Reg(RegOp::Not),
    },
    InstrDesc {
        mnemonic: "nop",
        opcode: Opcode::Reg(RegOp::Nop),
    },
    InstrDesc {
        mnemonic: "mvto",
        opcode: Opcode::Reg(RegOp::MvTo),
    },
    InstrDesc {
        mnemonic: "mvfrom",
        opcode: Opcode::Reg(RegOp::MvFrom),
    },
    InstrDesc {
        mnemonic: "addi",
        opcode: Opcode::AddI,
    },
    InstrDesc {
        mnemonic: "subi",
        opcode: Opcode::SubI,
    },
    InstrDesc {
        mnemonic: "andi",
        opcode: Opcode::AndI,
    },
    InstrDesc {
        mnemonic: "ori",
        opcode: Opcode::OrI,
    },
    InstrDesc {
        mnemonic: "load",
        opcode: Opcode::Load,
    },
    InstrDesc {
        mnemonic: "store",
        opcode: Opcode::Store,
    },
    InstrDesc {
        mnemonic: "jump",
        opcode: Opcode::Jump,
    },
    InstrDesc {
        mnemonic: "branch",
        opcode: Opcode::Branch,
    },
];

/// Case-sensitive mnemonic lookup.
pub fn lookup_opcode(mnemonic: &str) -> Option<Opcode> {
    TABLE.iter().find(|d| d.mnemonic == mnemonic).map(|d| d.opcode)
}

/// Function code for register-register mnemonics; `None` for every other mnemonic.
pub fn lookup_funct(mnemonic: &str) -> Option<FunctionCode> {
    match lookup_opcode(mnemonic)? {
        Opcode::Reg(op) => Some(op.funct()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_codes_are_distinct_single_bits() {
        let mut seen = FunctionCode::empty();
        for op in RegOp::ALL {
            let f = op.funct();
            assert_eq!(f.bits().count_ones(), 1, "{op:?}");
            assert!(!seen.intersects(f), "{op:?} reuses a bit");
            seen |= f;
        }
        assert_eq!(seen.bits() & !0x1FF, 0);
    }

    #[test]
    fn table_covers_every_opcode_once() {
        assert_eq!(TABLE.len(), 16);
        for d in TABLE {
            assert_eq!(TABLE.iter().filter(|o| o.opcode == d.opcode).count(), 1);
            assert_eq!(d.opcode.mnemonic(), d.mnemonic);
        }
    }

    #[test]
    fn from_bits_inverts_table() {
        for d in TABLE {
            let funct = match d.opcode {
                Opcode::Reg(op) => op.funct().bits(),
                _ => 0,
            };
            assert_eq!(Opcode::from_bits(d.opcode.bits(), funct), Ok(d.opcode));
        }
        assert_eq!(Opcode::from_bits(0b0011, 0), Err(AsmError::UnsupportedOpcode(0b0011)));
        assert_eq!(
            Opcode::from_bits(REG_OPCODE, 0b000000110),
            Err(AsmError::UnsupportedOpcode(REG_OPCODE))
        );
    }
}
