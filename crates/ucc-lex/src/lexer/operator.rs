//! Multi-character operator lexing.
//!
//! §4.1's punctuation set only admits `&&` and `||`, never bare `&` or `|` -
//! a single `&` or `|` is an unrecognized character.

use crate::token::Token;
use ucc_util::DiagnosticCode;

use super::core::Lexer;

impl<'a> Lexer<'a> {
    pub fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.advance_if('=') {
            Token::EqEq
        } else {
            Token::Assign
        }
    }

    pub fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.advance_if('=') {
            Token::NotEq
        } else {
            Token::Bang
        }
    }

    pub fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.advance_if('=') {
            Token::LtEq
        } else {
            Token::Lt
        }
    }

    pub fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.advance_if('=') {
            Token::GtEq
        } else {
            Token::Gt
        }
    }

    pub fn lex_ampersand(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.advance_if('&') {
            Token::AndAnd
        } else {
            self.report_error(DiagnosticCode::LEX_UNEXPECTED_CHAR, "unexpected character '&'");
            Token::Invalid('&')
        }
    }

    pub fn lex_pipe(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.advance_if('|') {
            Token::OrOr
        } else {
            self.report_error(DiagnosticCode::LEX_UNEXPECTED_CHAR, "unexpected character '|'");
            Token::Invalid('|')
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucc_util::{FileId, Handler};

    fn lex_all(source: &str) -> Vec<Token> {
        let handler = Handler::new();
        let mut lexer = Lexer::new(source, FileId::DUMMY, &handler);
        lexer.by_ref().collect()
    }

    #[test]
    fn distinguishes_eq_from_eqeq() {
        assert_eq!(lex_all("= =="), vec![Token::Assign, Token::EqEq]);
    }

    #[test]
    fn distinguishes_bang_from_noteq() {
        assert_eq!(lex_all("! !="), vec![Token::Bang, Token::NotEq]);
    }

    #[test]
    fn relational_operators() {
        assert_eq!(lex_all("< <= > >="), vec![Token::Lt, Token::LtEq, Token::Gt, Token::GtEq]);
    }

    #[test]
    fn logical_and_or() {
        assert_eq!(lex_all("&& ||"), vec![Token::AndAnd, Token::OrOr]);
    }

    #[test]
    fn bare_ampersand_is_an_error() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("&", FileId::DUMMY, &handler);
        lexer.next_token();
        assert!(handler.has_errors());
    }
}
