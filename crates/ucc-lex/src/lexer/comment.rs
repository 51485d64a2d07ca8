//! Whitespace and comment skipping.

use ucc_util::DiagnosticCode;

use super::core::Lexer;

impl<'a> Lexer<'a> {
    pub(crate) fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current_char() {
                c if c.is_whitespace() => {
                    self.cursor.advance();
                },
                '/' if self.cursor.peek_char(1) == '/' => {
                    while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                        self.cursor.advance();
                    }
                },
                '/' if self.cursor.peek_char(1) == '*' => {
                    self.skip_block_comment();
                },
                _ => return,
            }
        }
    }

    fn skip_block_comment(&mut self) {
        let start = self.cursor.position();
        let start_line = self.cursor.line();
        let start_column = self.cursor.column();
        self.cursor.advance();
        self.cursor.advance();
        loop {
            if self.cursor.is_at_end() {
                self.token_start = start;
                self.token_start_line = start_line;
                self.token_start_column = start_column;
                self.report_error(DiagnosticCode::LEX_UNTERMINATED_COMMENT, "unterminated block comment");
                return;
            }
            if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/' {
                self.cursor.advance();
                self.cursor.advance();
                return;
            }
            self.cursor.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;
    use ucc_util::{FileId, Handler};

    #[test]
    fn line_comments_are_discarded() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("int // a comment\nlong", FileId::DUMMY, &handler);
        assert_eq!(lexer.next_token(), Token::Int);
        assert_eq!(lexer.next_token(), Token::Long);
    }

    #[test]
    fn block_comments_are_discarded() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("int /* skip\nthis */ long", FileId::DUMMY, &handler);
        assert_eq!(lexer.next_token(), Token::Int);
        assert_eq!(lexer.next_token(), Token::Long);
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("/* never closed", FileId::DUMMY, &handler);
        assert_eq!(lexer.next_token(), Token::Eof);
        assert!(handler.has_errors());
        let diags = handler.diagnostics();
        assert_eq!(diags[0].code, ucc_util::DiagnosticCode::LEX_UNTERMINATED_COMMENT);
    }
}
