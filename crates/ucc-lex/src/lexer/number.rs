//! Numeric literal lexing.
//!
//! §4.1 only specifies decimal integers and floats (a digit sequence
//! containing a `.` or an exponent) - no hex/octal/binary forms and no digit
//! separators.

use crate::token::Token;
use ucc_util::DiagnosticCode;

use super::core::Lexer;

impl<'a> Lexer<'a> {
    pub fn lex_number(&mut self) -> Token {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        let mut is_float = false;

        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            is_float = true;
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        if matches!(self.cursor.current_char(), 'e' | 'E') {
            let save = self.cursor.position();
            let mut has_digits = false;
            let mut lookahead = 1;
            if matches!(self.cursor.peek_char(1), '+' | '-') {
                lookahead = 2;
            }
            let mut probe = lookahead;
            while self.cursor.peek_char(probe).is_ascii_digit() {
                has_digits = true;
                probe += 1;
            }
            if has_digits {
                is_float = true;
                self.cursor.advance();
                if matches!(self.cursor.current_char(), '+' | '-') {
                    self.cursor.advance();
                }
                while self.cursor.current_char().is_ascii_digit() {
                    self.cursor.advance();
                }
            } else {
                debug_assert_eq!(self.cursor.position(), save);
            }
        }

        let text = self.cursor.slice_from(self.token_start);

        if is_float {
            match text.parse::<f64>() {
                Ok(v) => Token::FloatLiteral(v),
                Err(_) => {
                    self.report_error(DiagnosticCode::LEX_UNEXPECTED_CHAR, format!("malformed float literal '{text}'"));
                    Token::FloatLiteral(0.0)
                },
            }
        } else {
            match text.parse::<i64>() {
                Ok(v) => Token::IntLiteral(v),
                Err(_) => {
                    self.report_error(DiagnosticCode::LEX_UNEXPECTED_CHAR, format!("integer literal '{text}' out of range"));
                    Token::IntLiteral(0)
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucc_util::{FileId, Handler};

    fn lex_one(source: &str) -> Token {
        let handler = Handler::new();
        let mut lexer = Lexer::new(source, FileId::DUMMY, &handler);
        lexer.next_token()
    }

    #[test]
    fn plain_integer() {
        assert_eq!(lex_one("42"), Token::IntLiteral(42));
    }

    #[test]
    fn decimal_float() {
        assert_eq!(lex_one("3.14"), Token::FloatLiteral(3.14));
    }

    #[test]
    fn exponent_without_dot_is_still_a_float() {
        assert_eq!(lex_one("1e10"), Token::FloatLiteral(1e10));
    }

    #[test]
    fn signed_exponent() {
        assert_eq!(lex_one("2.5e-3"), Token::FloatLiteral(2.5e-3));
    }

    #[test]
    fn trailing_dot_without_a_following_digit_is_not_part_of_the_number() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("1.length", FileId::DUMMY, &handler);
        assert_eq!(lexer.next_token(), Token::IntLiteral(1));
        assert_eq!(lexer.next_token(), Token::Dot);
    }
}
