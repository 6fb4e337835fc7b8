pub mod decoder;
pub mod disasm;
pub mod encoder;
pub mod error;
pub mod instructions;
pub mod operand;
pub mod symbols;

pub use decoder::{Decoded, Decoder, Mc16Decoder};
pub use encoder::{assemble, encode, Fields, MachineWord};
pub use error::AsmError;
pub use instructions::{Format, FunctionCode, Opcode, RegOp};
pub use symbols::SymbolTable;
