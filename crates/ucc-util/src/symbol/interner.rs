use super::{RawSymbol, Symbol};
use rustc_hash::FxHashMap;

/// The backing table behind [`Symbol`](super::Symbol).
///
/// Strings are never removed: the total number of distinct identifiers in a
/// single `.uc` file is small, and the table is thrown away with the rest of
/// the session at process exit.
pub struct Interner {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, u32>,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            strings: Vec::new(),
            lookup: FxHashMap::default(),
        }
    }

    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&index) = self.lookup.get(s) {
            return RawSymbol(index).into();
        }
        let index = self.strings.len() as u32;
        let boxed: Box<str> = s.into();
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, index);
        RawSymbol(index).into()
    }

    pub fn resolve(&self, symbol: Symbol) -> &str {
        &self.strings[symbol.as_u32() as usize]
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}
