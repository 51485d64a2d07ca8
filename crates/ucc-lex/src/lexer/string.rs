//! String literal lexing.
//!
//! Double-quoted, with the four backslash escapes §4.1 names: `\n`, `\t`,
//! `\\`, `\"`. Unterminated strings (end-of-file reached before the closing
//! quote) are a distinct lexical error from an unexpected character.

use crate::token::Token;
use ucc_util::{DiagnosticCode, Symbol};

use super::core::Lexer;

impl<'a> Lexer<'a> {
    pub fn lex_string(&mut self) -> Token {
        debug_assert_eq!(self.cursor.current_char(), '"');
        self.cursor.advance();

        let mut value = String::new();
        loop {
            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    return Token::StringLiteral(Symbol::intern(&value));
                },
                '\0' if self.cursor.is_at_end() => {
                    self.report_error(DiagnosticCode::LEX_UNTERMINATED_STRING, "unterminated string literal");
                    return Token::StringLiteral(Symbol::intern(&value));
                },
                '\\' => {
                    self.cursor.advance();
                    let escaped = match self.cursor.current_char() {
                        'n' => '\n',
                        't' => '\t',
                        '\\' => '\\',
                        '"' => '"',
                        other => {
                            self.report_error(
                                DiagnosticCode::LEX_UNEXPECTED_CHAR,
                                format!("unknown escape sequence '\\{other}'"),
                            );
                            other
                        },
                    };
                    value.push(escaped);
                    self.cursor.advance();
                },
                c => {
                    value.push(c);
                    self.cursor.advance();
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucc_util::{FileId, Handler};

    fn lex_one(source: &str) -> (Token, bool) {
        let handler = Handler::new();
        let mut lexer = Lexer::new(source, FileId::DUMMY, &handler);
        let token = lexer.next_token();
        (token, handler.has_errors())
    }

    #[test]
    fn plain_string() {
        let (token, errored) = lex_one("\"hello\"");
        assert_eq!(token, Token::StringLiteral(Symbol::intern("hello")));
        assert!(!errored);
    }

    #[test]
    fn escapes_are_decoded() {
        let (token, errored) = lex_one("\"a\\nb\\t\\\"\\\\\"");
        assert_eq!(token, Token::StringLiteral(Symbol::intern("a\nb\t\"\\")));
        assert!(!errored);
    }

    #[test]
    fn unterminated_string_reports_a_distinct_error() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("\"oops", FileId::DUMMY, &handler);
        lexer.next_token();
        assert!(handler.has_errors());
        let diags = handler.diagnostics();
        assert_eq!(diags[0].code, ucc_util::DiagnosticCode::LEX_UNTERMINATED_STRING);
    }
}
