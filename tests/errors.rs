use std::collections::HashMap;

use mc16_asm::{assemble, AsmError};

fn run(tokens: &[&str]) -> Result<i16, AsmError> {
    let labels: HashMap<String, u16> = HashMap::from([("KNOWN".to_string(), 1)]);
    assemble(tokens, &labels, 0)
}

#[test]
fn unknown_mnemonic() {
    assert_eq!(run(&["foo", "R1"]), Err(AsmError::UnknownMnemonic("foo".into())));
    // lookup is case-sensitive
    assert_eq!(run(&["ADD", "R1"]), Err(AsmError::UnknownMnemonic("ADD".into())));
}

#[test]
fn unknown_label() {
    assert_eq!(run(&["jump", "UNDEFINED"]), Err(AsmError::UnknownLabel("UNDEFINED".into())));
    assert_eq!(run(&["branch", "R1", "nowhere"]), Err(AsmError::UnknownLabel("nowhere".into())));
}

#[test]
fn ignored_reg_op_operand_is_still_resolved() {
    assert_eq!(run(&["add", "R1", "missing"]), Err(AsmError::UnknownLabel("missing".into())));
    assert!(run(&["add", "R1", "KNOWN"]).is_ok());
}

#[test]
fn too_many_operands() {
    assert_eq!(run(&["add", "R1", "R2", "R3"]), Err(AsmError::TooManyOperands("add".into())));
    // counted before any operand is looked at
    assert_eq!(run(&["jump", "x", "y", "z"]), Err(AsmError::TooManyOperands("jump".into())));
}

#[test]
fn mnemonic_checked_before_operand_count() {
    assert_eq!(run(&["bogus", "1", "2", "3"]), Err(AsmError::UnknownMnemonic("bogus".into())));
}

#[test]
fn empty_instruction() {
    assert_eq!(run(&[]), Err(AsmError::EmptyInstruction));
}

#[test]
fn malformed_literals() {
    assert_eq!(run(&["addi", "12abc"]), Err(AsmError::InvalidOperand("12abc".into())));
    assert_eq!(run(&["addi", "-"]), Err(AsmError::InvalidOperand("-".into())));
    assert_eq!(run(&["addi", "4-2"]), Err(AsmError::InvalidOperand("4-2".into())));
}

#[test]
fn malformed_indexed_references() {
    for tok in ["(R2)", "x(R2)", "4(R2", "4(2)", "4(R)", "4(Rx)"] {
        assert_eq!(run(&["branch", tok]), Err(AsmError::InvalidOperand(tok.into())), "{tok}");
    }
}

#[test]
fn indexed_reference_needs_both_slots() {
    let not_allowed = |mn: &str, tok: &str| AsmError::IndexedNotAllowed {
        mnemonic: mn.into(),
        token: tok.into(),
    };
    // format A reads one field, so the base register would be lost
    assert_eq!(run(&["load", "4(R2)"]), Err(not_allowed("load", "4(R2)")));
    assert_eq!(run(&["load", "R1", "4(R2)"]), Err(not_allowed("load", "4(R2)")));
    assert_eq!(run(&["addi", "4(R2)"]), Err(not_allowed("addi", "4(R2)")));
    assert_eq!(run(&["add", "4(R2)"]), Err(not_allowed("add", "4(R2)")));
    // second position has no slot left for the register
    assert_eq!(run(&["branch", "R1", "4(R2)"]), Err(not_allowed("branch", "4(R2)")));
    assert_eq!(run(&["branch", "4(R2)", "7"]), Err(not_allowed("branch", "4(R2)")));
}

#[test]
fn messages_carry_offending_text() {
    assert_eq!(AsmError::UnknownMnemonic("foo".into()).to_string(), "Invalid instruction: foo");
    assert_eq!(AsmError::UnknownLabel("L".into()).to_string(), "Invalid label: L");
    assert_eq!(
        AsmError::TooManyOperands("add".into()).to_string(),
        "Invalid operands for instruction: add"
    );
    assert_eq!(AsmError::UnsupportedOpcode(0b0011).to_string(), "Invalid opcode: 0b0011");
}
