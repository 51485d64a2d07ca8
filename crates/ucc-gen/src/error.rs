//! Errors raised by this crate's own fallible operations.
//!
//! These are distinct from [`ucc_util::Diagnostic`]: every diagnosable
//! defect in a uC source file is caught by `ucc-sem` before it ever reaches
//! this crate, so `ucc-drv` only invokes the emitter once `Handler::has_errors`
//! is false. A [`GenError`] therefore always means a backend invariant
//! violation (§7: "should not occur on a well-typed AST") rather than a
//! user-facing compile error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    /// A `Type::Error` or bare `Type::Null` reached the emitter - both are
    /// supposed to be impossible on a checked program free of diagnostics.
    #[error("internal invariant violation: {0}")]
    InternalInvariant(String),
}
