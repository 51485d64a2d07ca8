//! Errors raised by this crate's own fallible operations.
//!
//! These are distinct from [`crate::Diagnostic`]: a `Diagnostic` describes a
//! defect in the uC source being compiled, while the errors here describe a
//! failure in the compiler's own bookkeeping (a malformed source map lookup,
//! an out-of-range index) and are never shown to a uC author.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceMapError {
    #[error("no file registered with id {0:?}")]
    UnknownFile(usize),
}

#[derive(Debug, Error)]
pub enum IndexVecError {
    #[error("index {index} out of bounds for collection of length {len}")]
    OutOfBounds { index: usize, len: usize },
}
