//! Semantic analysis: symbol collection, type resolution, and type checking
//! (§4.3-§4.5). Produces the typed [`hir`] - this compiler's only
//! intermediate representation - for `ucc-gen` to emit as C++.

pub mod check;
pub mod collect;
pub mod hir;
pub mod resolve;
pub mod types;

use ucc_util::Handler;

pub use resolve::ResolvedTypedef;
pub use types::ClassArena;

/// Everything `ucc-gen` needs to emit C++ for one compilation: the class
/// arena (names, inheritance, field/method signatures), the resolved
/// typedefs, and the typed bodies from pass C.
pub struct CompiledProgram {
    pub arena: ClassArena,
    pub typedefs: Vec<ResolvedTypedef>,
    pub hir: hir::Program,
}

/// Runs passes A, B, and C over a parsed program in sequence (§4: "each pass
/// consumes the previous pass's output; a pass that reports any error still
/// lets later top-level declarations run, but does not hand its output to
/// the next pass" - the driver decides whether to proceed to code
/// generation by checking `handler.has_errors()` itself).
pub fn compile(program: &ucc_par::Program, handler: &Handler) -> CompiledProgram {
    let collected = collect::collect(program, handler);
    let resolved = resolve::resolve(&collected, handler);
    let checked = check::check(&resolved.arena, &resolved.functions, handler);
    CompiledProgram { arena: resolved.arena, typedefs: resolved.typedefs, hir: checked.program }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucc_util::{FileId, Handler};

    fn parse(source: &str) -> ucc_par::Program {
        let handler = Handler::new();
        let mut lexer = ucc_lex::Lexer::new(source, FileId::DUMMY, &handler);
        let mut tokens = Vec::new();
        loop {
            let (token, span) = lexer.next_spanned();
            let is_eof = token == ucc_lex::Token::Eof;
            tokens.push((token, span));
            if is_eof {
                break;
            }
        }
        let mut parser = ucc_par::Parser::new(tokens, &handler);
        parser.parse_program()
    }

    #[test]
    fn compiles_a_small_program_end_to_end() {
        let program = parse(
            "class Animal { string name; string speak() { return \"...\"; } } \
             class Dog : Animal { string speak() { return \"woof\"; } } \
             int main() { Dog d; d = new Dog(\"Rex\"); return 0; }",
        );
        let handler = Handler::new();
        let checked = compile(&program, &handler);
        assert!(!handler.has_errors());
        assert_eq!(checked.hir.classes.len(), 2);
        assert_eq!(checked.hir.functions.len(), 1);
    }
}
