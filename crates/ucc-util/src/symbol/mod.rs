//! String interning.
//!
//! uC source carries identifiers — class names, field names, method names,
//! parameter and local names, typedef names — and the same name is compared
//! repeatedly during resolution and type checking. [`Symbol`] interns each
//! distinct string once behind a 4-byte handle so those comparisons are
//! `u32` equality instead of byte-for-byte string comparison.
//!
//! The compiler is single-threaded and session-scoped (`ucc-drv` §5), so the
//! interner is a plain [`std::cell::RefCell`]-guarded table reset per
//! invocation rather than the lock-free, process-global table a
//! long-running multi-threaded host would want.

mod interner;

pub use interner::Interner;

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;

thread_local! {
    static TABLE: RefCell<Interner> = RefCell::new(Interner::new());
}

/// An interned string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    index: u32,
}

impl Symbol {
    /// Intern `s`, returning its (possibly freshly allocated) symbol.
    pub fn intern(s: &str) -> Self {
        TABLE.with(|t| t.borrow_mut().intern(s))
    }

    /// Look up the string behind this symbol.
    ///
    /// Every `Symbol` in circulation was produced by `intern`, which never
    /// removes entries, so this never fails for a symbol obtained from this
    /// process.
    pub fn as_str(&self) -> String {
        TABLE.with(|t| t.borrow().resolve(*self).to_string())
    }

    pub fn as_u32(self) -> u32 {
        self.index
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub(crate) struct RawSymbol(pub u32);

impl From<RawSymbol> for Symbol {
    fn from(raw: RawSymbol) -> Self {
        Symbol { index: raw.0 }
    }
}

/// Reset the thread-local interner. Only used by tests that need a clean
/// table to make index assertions deterministic.
#[cfg(test)]
pub(crate) fn reset_for_test() {
    TABLE.with(|t| *t.borrow_mut() = Interner::new());
}

#[allow(dead_code)]
pub(crate) type SymbolMap<V> = FxHashMap<Symbol, V>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_string_yields_same_symbol() {
        reset_for_test();
        let a = Symbol::intern("length");
        let b = Symbol::intern("length");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "length");
    }

    #[test]
    fn distinct_strings_get_distinct_symbols() {
        reset_for_test();
        let a = Symbol::intern("foo");
        let b = Symbol::intern("bar");
        assert_ne!(a, b);
    }
}
