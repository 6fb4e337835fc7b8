use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::error::AsmError;

/// Read-only label table supplied by the caller, fully populated before encoding.
pub trait SymbolTable {
    fn address(&self, label: &str) -> Option<u16>;
}

impl<S: BuildHasher> SymbolTable for HashMap<String, u16, S> {
    fn address(&self, label: &str) -> Option<u16> {
        self.get(label).copied()
    }
}

impl SymbolTable for BTreeMap<String, u16> {
    fn address(&self, label: &str) -> Option<u16> {
        self.get(label).copied()
    }
}

impl<T: SymbolTable + ?Sized> SymbolTable for &T {
    fn address(&self, label: &str) -> Option<u16> {
        (**self).address(label)
    }
}

/// Resolves a label into a field value. Addresses are reinterpreted as 16-bit
/// two's complement so they share the slot type of literals.
pub fn resolve<S: SymbolTable + ?Sized>(symbols: &S, label: &str) -> Result<i16, AsmError> {
    symbols
        .address(label)
        .map(|addr| addr as i16)
        .ok_or_else(|| AsmError::UnknownLabel(label.to_string()))
}
