use crate::decoder::Decoded;
use crate::instructions::{Opcode, RegOp};

pub fn fmt_decoded(d: &Decoded) -> String {
    let mn = d.opcode.mnemonic();
    match d.opcode {
        Opcode::Reg(RegOp::Nop) => mn.to_string(),
        Opcode::Reg(_) => format!("{} R{}", mn, d.reg),
        Opcode::Branch => format!("{} R{}, {}", mn, d.reg, d.imm_signed()),
        Opcode::Load | Opcode::Store | Opcode::Jump => format!("{} {:#05x}", mn, d.imm),
        Opcode::AddI | Opcode::SubI | Opcode::AndI | Opcode::OrI => {
            format!("{} {}", mn, d.imm_signed())
        }
    }
}
