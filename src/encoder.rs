use crate::error::AsmError;
use crate::instructions::{lookup_opcode, Format, FunctionCode, Opcode};
use crate::operand::{classify, Operand};
use crate::symbols::{resolve, SymbolTable};

/// One encoded instruction. Only the bit pattern matters.
pub type MachineWord = i16;

pub const MAX_OPERANDS: usize = 2;

const OPC_SHIFT: u32 = 12;
const REG_SHIFT: u32 = 9;
const REG_MASK: u16 = 0x7;
const ADR12_MASK: u16 = 0xFFF;
const ADR9_MASK: u16 = 0x1FF;

/// Positional numeric field slots filled from the operands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fields(pub [i16; MAX_OPERANDS]);

/// Encodes one tokenized instruction (`tokens[0]` is the mnemonic).
///
/// `_inst_index` is the position of the instruction in the program; no
/// current format is PC-relative, so it does not affect the result.
pub fn assemble<T, S>(
    tokens: &[T],
    symbols: &S,
    _inst_index: usize,
) -> Result<MachineWord, AsmError>
where
    T: AsRef<str>,
    S: SymbolTable + ?Sized,
{
    let (mnemonic, operands) = tokens.split_first().ok_or(AsmError::EmptyInstruction)?;
    let mnemonic = mnemonic.as_ref();
    let opcode =
        lookup_opcode(mnemonic).ok_or_else(|| AsmError::UnknownMnemonic(mnemonic.to_string()))?;
    if operands.len() > MAX_OPERANDS {
        return Err(AsmError::TooManyOperands(mnemonic.to_string()));
    }
    let fields = collect_fields(mnemonic, opcode, operands, symbols)?;
    Ok(encode(opcode, fields))
}

fn collect_fields<T, S>(
    mnemonic: &str,
    opcode: Opcode,
    operands: &[T],
    symbols: &S,
) -> Result<Fields, AsmError>
where
    T: AsRef<str>,
    S: SymbolTable + ?Sized,
{
    let mut slots = [0i16; MAX_OPERANDS];
    for (slot, token) in operands.iter().enumerate() {
        let token = token.as_ref();
        slots[slot] = match classify(token)? {
            Operand::Register(n) | Operand::Literal(n) => n,
            Operand::Label(name) => resolve(symbols, name)?,
            Operand::Indexed { offset, base } => {
                // offset goes in this slot, the base register in the next one
                if slot != 0 || operands.len() != 1 || opcode.format() != Format::B {
                    return Err(AsmError::IndexedNotAllowed {
                        mnemonic: mnemonic.to_string(),
                        token: token.to_string(),
                    });
                }
                slots[1] = base;
                offset
            }
        };
    }
    Ok(Fields(slots))
}

/// Packs resolved fields into the layout selected by `opcode`. Fields wider
/// than their bit range are truncated by masking.
pub fn encode(opcode: Opcode, fields: Fields) -> MachineWord {
    let opc = opcode.bits() as u16;
    let [f1, f2] = fields.0;
    let word = match opcode {
        Opcode::Load | Opcode::Store | Opcode::Jump => format_a(opc, f1),
        Opcode::Branch => format_b(opc, f1, f2),
        Opcode::Reg(op) => format_c(opc, f1, op.funct()),
        Opcode::AddI | Opcode::SubI | Opcode::AndI | Opcode::OrI => format_d(opc, f1),
    };
    word as MachineWord
}

// opc[4] adr[12]
fn format_a(opc: u16, adr: i16) -> u16 {
    (opc << OPC_SHIFT) | (adr as u16 & ADR12_MASK)
}

// opc[4] reg[3] adr[9]
fn format_b(opc: u16, reg: i16, adr: i16) -> u16 {
    (opc << OPC_SHIFT) | ((reg as u16 & REG_MASK) << REG_SHIFT) | (adr as u16 & ADR9_MASK)
}

// opc[4] reg[3] func[9]
fn format_c(opc: u16, reg: i16, funct: FunctionCode) -> u16 {
    (opc << OPC_SHIFT) | ((reg as u16 & REG_MASK) << REG_SHIFT) | (funct.bits() & ADR9_MASK)
}

// opc[4] imm[12]
fn format_d(opc: u16, imm: i16) -> u16 {
    (opc << OPC_SHIFT) | (imm as u16 & ADR12_MASK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_place_opcode_in_high_nibble() {
        assert_eq!(format_a(0b0010, 0x123), 0x2123);
        assert_eq!(format_b(0b0100, 3, 0x1F), 0x461F);
        assert_eq!(format_c(0b1000, 1, FunctionCode::ADD), 0x8204);
        assert_eq!(format_d(0b1100, -1), 0xCFFF);
    }

    #[test]
    fn register_field_is_three_bits() {
        assert_eq!(format_b(0b0100, 9, 0), format_b(0b0100, 1, 0));
    }
}
