use super::{Diagnostic, DiagnosticCode, Handler, Level};
use crate::Span;

/// Fluent builder for a [`Diagnostic`], so call sites in the lexer, parser
/// and type checker can attach a code before emitting without constructing
/// the struct by hand each time.
pub struct DiagnosticBuilder {
    level: Level,
    span: Span,
    message: String,
    code: Option<DiagnosticCode>,
}

impl DiagnosticBuilder {
    pub fn new(level: Level, span: Span, message: impl Into<String>) -> Self {
        Self { level, span, message: message.into(), code: None }
    }

    pub fn code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn build(self) -> Diagnostic {
        Diagnostic {
            level: self.level,
            code: self.code.unwrap_or(DiagnosticCode::BACKEND_INTERNAL),
            message: self.message,
            span: self.span,
        }
    }

    pub fn emit(self, handler: &Handler) {
        handler.emit(self.build());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::FileId;

    #[test]
    fn builder_defaults_to_backend_internal_without_a_code() {
        let d = DiagnosticBuilder::new(Level::Error, Span::new(0, 1, 1, 1, FileId::DUMMY), "oops").build();
        assert_eq!(d.code, DiagnosticCode::BACKEND_INTERNAL);
    }

    #[test]
    fn builder_keeps_the_assigned_code() {
        let d = DiagnosticBuilder::new(Level::Error, Span::DUMMY, "bad overload")
            .code(DiagnosticCode::TYPE_NO_MATCHING_OVERLOAD)
            .build();
        assert_eq!(d.code, DiagnosticCode::TYPE_NO_MATCHING_OVERLOAD);
    }
}
