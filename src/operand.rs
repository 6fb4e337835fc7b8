use crate::error::AsmError;

pub const REG_SIGIL: char = 'R';

/// Syntactic category of one operand token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand<'a> {
    /// `R<n>`
    Register(i16),
    /// `<offset>(R<n>)`; fills two field slots
    Indexed { offset: i16, base: i16 },
    /// signed decimal literal
    Literal(i16),
    /// anything else; resolved against the symbol table
    Label(&'a str),
}

/// Classifies a token. Order matters: a token that starts with `R` but is not
/// a well-formed register is taken as a label, never as a syntax error.
pub fn classify(token: &str) -> Result<Operand<'_>, AsmError> {
    if token.starts_with(REG_SIGIL) {
        return Ok(match parse_register(token) {
            Some(n) => Operand::Register(n),
            None => Operand::Label(token),
        });
    }
    if let Some(pos) = token.find('(') {
        let malformed = || AsmError::InvalidOperand(token.to_string());
        let offset = parse_literal(&token[..pos]).ok_or_else(malformed)?;
        let inner = token[pos + 1..].strip_suffix(')').ok_or_else(malformed)?;
        let base = parse_register(inner).ok_or_else(malformed)?;
        return Ok(Operand::Indexed { offset, base });
    }
    if token.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        return parse_literal(token)
            .map(Operand::Literal)
            .ok_or_else(|| AsmError::InvalidOperand(token.to_string()));
    }
    Ok(Operand::Label(token))
}

/// `R` followed by decimal digits only; no sign, no overflow.
pub fn parse_register(s: &str) -> Option<i16> {
    let digits = s.strip_prefix(REG_SIGIL)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i16>().ok()
}

/// Optional `-` then decimal digits. The value is reduced modulo 2^16, so
/// out-of-range literals wrap like every other field instead of failing.
fn parse_literal(s: &str) -> Option<i16> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let magnitude = digits
        .bytes()
        .fold(0u16, |acc, b| acc.wrapping_mul(10).wrapping_add((b - b'0') as u16));
    let bits = if negative { magnitude.wrapping_neg() } else { magnitude };
    Some(bits as i16)
}
