#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("Empty instruction")]
    EmptyInstruction,
    #[error("Invalid instruction: {0}")]
    UnknownMnemonic(String),
    #[error("Invalid operands for instruction: {0}")]
    TooManyOperands(String),
    #[error("Invalid label: {0}")]
    UnknownLabel(String),
    #[error("Invalid opcode: {0:#06b}")]
    UnsupportedOpcode(u8),
    #[error("Malformed operand: {0}")]
    InvalidOperand(String),
    #[error("Indexed operand {token} not accepted by {mnemonic}")]
    IndexedNotAllowed { mnemonic: String, token: String },
}
