//! Recursive-descent parser for uC (§4.2).
//!
//! Consumes the token stream produced by `ucc-lex` and builds the untyped
//! AST defined in [`ast`]. Every identifier is still just a [`ucc_util::Symbol`]
//! at this stage - name resolution and typing are the job of `ucc-sem`.

pub mod ast;
mod parser;

pub use ast::*;
pub use parser::Parser;
