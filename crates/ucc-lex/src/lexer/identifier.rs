//! Identifier and keyword lexing.

use crate::token::{keyword_from_ident, Token};
use ucc_util::Symbol;

use super::core::Lexer;

pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'a> Lexer<'a> {
    /// Lexes `[A-Za-z_][A-Za-z0-9_]*` (§4.1), then checks whether the text
    /// names a keyword.
    pub fn lex_identifier(&mut self) -> Token {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(self.token_start);
        keyword_from_ident(text).unwrap_or_else(|| Token::Ident(Symbol::intern(text)))
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
    fn plain_identifier() {
        assert_eq!(lex_one("count"), Token::Ident(Symbol::intern("count")));
    }

    #[test]
    fn keyword_class() {
        assert_eq!(lex_one("class"), Token::Class);
    }

    #[test]
    fn keyword_and_primitive_type_names() {
        assert_eq!(lex_one("int"), Token::Int);
        assert_eq!(lex_one("boolean"), Token::Boolean);
        assert_eq!(lex_one("void"), Token::Void);
    }

    #[test]
    fn identifier_that_starts_with_a_keyword_prefix_is_not_a_keyword() {
        assert_eq!(lex_one("intensity"), Token::Ident(Symbol::intern("intensity")));
    }
}
