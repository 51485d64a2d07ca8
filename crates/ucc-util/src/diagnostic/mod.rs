//! Compiler diagnostics.
//!
//! §7 splits errors into five kinds (lexical, syntactic, symbol, type,
//! backend) with a shared propagation policy: lexical errors abort
//! compilation immediately, syntactic errors abort the current top-level
//! declaration, and symbol/type errors are collected so every declaration is
//! still checked and every error is reported in one run. This module is the
//! single place all five kinds funnel through on their way to
//! `file:line:col: kind: message` on stderr (§6).

mod builder;
mod codes;

pub use builder::DiagnosticBuilder;
pub use codes::DiagnosticCode;

use crate::Span;
use std::cell::RefCell;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub level: Level,
    pub code: DiagnosticCode,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(level: Level, code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self { level, code, message: message.into(), span }
    }
}

/// Collects diagnostics for one compilation session.
///
/// Per §7, lexical errors are still routed through the same `Handler` as
/// everything else; it's the *caller* (the lexer) that stops driving the
/// pipeline after reporting one, not the handler itself.
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    pub fn error(&self, span: Span, code: DiagnosticCode, message: impl Into<String>) {
        self.emit(Diagnostic::new(Level::Error, code, message, span));
    }

    pub fn build_error(&self, span: Span, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(Level::Error, span, message)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.borrow().iter().any(|d| d.level == Level::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.borrow().iter().filter(|d| d.level == Level::Error).count()
    }

    /// All diagnostics in emission order (source order is preserved because
    /// every pass walks declarations left to right - §4.5).
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::FileId;

    #[test]
    fn collects_errors_and_counts_them() {
        let handler = Handler::new();
        handler.error(Span::DUMMY, DiagnosticCode::TYPE_UNKNOWN, "unknown type `Foo`");
        handler.error(Span::DUMMY, DiagnosticCode::TYPE_TYPEDEF_CYCLE, "typedef cycle");
        assert!(handler.has_errors());
        assert_eq!(handler.error_count(), 2);
    }

    #[test]
    fn diagnostics_keep_emission_order() {
        let handler = Handler::new();
        handler.build_error(Span::new(0, 1, 1, 1, FileId::DUMMY), "first")
            .code(DiagnosticCode::PARSE_UNEXPECTED_EOF)
            .emit(&handler);
        handler.build_error(Span::new(1, 2, 2, 1, FileId::DUMMY), "second")
            .code(DiagnosticCode::PARSE_UNEXPECTED_TOKEN)
            .emit(&handler);
        let diags = handler.diagnostics();
        assert_eq!(diags[0].message, "first");
        assert_eq!(diags[1].message, "second");
    }
}
