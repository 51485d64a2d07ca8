//! Lexical analyzer for uC.
//!
//! Turns raw source text into a lazy sequence of [`Token`]s terminated by
//! [`Token::Eof`]. Whitespace and comments (`//` and `/* */`) are discarded;
//! everything else is preserved, including the exact text of identifiers and
//! string escapes, so later passes never need to re-read the source.

pub mod cursor;
pub mod lexer;
pub mod token;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::Token;
