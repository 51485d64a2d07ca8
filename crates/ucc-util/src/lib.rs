//! ucc-util - shared foundation types for the uC compiler.
//!
//! Every other crate in the workspace depends on this one for:
//! - [`Symbol`] - interned identifiers (`symbol` module)
//! - [`Span`] / [`SourceMap`] - source location tracking (`span` module)
//! - [`Diagnostic`] / [`Handler`] - compiler error reporting (`diagnostic` module)
//! - [`IndexVec`] / [`Idx`] - typed-index vectors (`index_vec` module)
//! - [`DefId`] - a dense handle into the class-definition arena owned by `ucc-sem`
//!
//! The compiler is a single-threaded batch process (one source file in, one
//! `.cpp` file out), so none of these types need to be thread-safe.

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

mod def_id;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, Level};
pub use def_id::DefId;
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, SourceFile, SourceMap, Span};
pub use symbol::Symbol;
