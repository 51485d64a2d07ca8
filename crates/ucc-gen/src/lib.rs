//! The backend emitter (§4.6): a deterministic pretty-printer from
//! `ucc-sem`'s typed AST to C++17 source text.
//!
//! `ucc-drv` is the only expected caller: it runs the front end (`ucc-sem`),
//! confirms there were no diagnostics, and hands the resulting
//! [`ucc_sem::CompiledProgram`] to [`emit`] along with the requested
//! [`Phase`]. Everything this crate raises on its own is an internal
//! invariant violation ([`GenError`]) - a uC program that type-checks is
//! guaranteed emittable, so a [`GenError`] means this crate or `ucc-sem`
//! disagree about that guarantee, not that the user's program is invalid.

pub mod classes;
pub mod error;
pub mod exprs;
pub mod names;
pub mod phase;
pub mod signatures;
pub mod stmts;

use ucc_sem::CompiledProgram;

pub use error::GenError;
pub use phase::Phase;

const RUNTIME_INCLUDES: &[&str] = &["defs.h", "ref.h", "array.h", "library.h", "expr.h"];

/// Emits one C++ translation unit for `program`, stopping at `phase` (§4.6).
/// The output always opens with the runtime header includes and the `uc`
/// namespace (§6 "Output"), even at `Phase::Types`, so every phase's output
/// is independently compilable against the runtime headers.
pub fn emit(program: &CompiledProgram, phase: Phase) -> Result<String, GenError> {
    let mut out = String::new();
    emit_preamble(&mut out);

    classes::emit_typedefs(&program.typedefs, &program.arena, &mut out)?;
    classes::emit_forward_declarations(&program.arena, &mut out);

    for (id, class) in program.arena.iter_enumerated() {
        classes::emit_class(id, class, &program.arena, &program.hir.classes, phase, &mut out)?;
    }

    if phase.emits_signatures() {
        for function in &program.hir.functions {
            emit_free_function(function, &program.arena, phase, &mut out)?;
        }
    }

    out.push_str("} // namespace uc\n");
    Ok(out)
}

fn emit_preamble(out: &mut String) {
    for header in RUNTIME_INCLUDES {
        out.push_str(&format!("#include \"{header}\"\n"));
    }
    out.push_str("\nnamespace uc {\n\n");
}

fn emit_free_function(function: &ucc_sem::hir::Function, arena: &ucc_sem::types::ClassArena, phase: Phase, out: &mut String) -> Result<(), GenError> {
    out.push_str(&signatures::emit_free_function_signature(function, arena)?);
    if phase.emits_bodies() {
        out.push_str(" {\n");
        stmts::emit_block(&function.body, arena, 1, out)?;
        out.push_str("}\n\n");
    } else {
        out.push_str(";\n\n");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucc_util::{FileId, Handler};

    fn compile(source: &str) -> (CompiledProgram, Handler) {
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
        let program = parser.parse_program();
        let compiled = ucc_sem::compile(&program, &handler);
        (compiled, handler)
    }

    #[test]
    fn phase_one_omits_every_method_body() {
        let (compiled, handler) = compile("class Foo { int x; int get() { return x; } }");
        assert!(!handler.has_errors());
        let text = emit(&compiled, Phase::Types).unwrap();
        assert!(text.contains("UC_REFERENCE(Foo)"));
        assert!(!text.contains("UC_VAR(get)"), "phase 1 should not emit method signatures:\n{text}");
    }

    #[test]
    fn phase_two_emits_signatures_but_not_bodies() {
        let (compiled, handler) = compile("class Foo { int x; int get() { return x; } }");
        assert!(!handler.has_errors());
        let text = emit(&compiled, Phase::Signatures).unwrap();
        // the method's own signature is a bare declaration, even though the
        // class's always-emitted equality operators have their own bodies
        assert!(text.contains("UC_VAR(get)();"), "expected a bodiless method declaration:\n{text}");
        assert!(!text.contains("return UC_VAR(x);"), "phase 2 should not emit method bodies:\n{text}");
    }

    #[test]
    fn phase_three_emits_full_bodies() {
        let (compiled, handler) = compile("class Foo { int x; int get() { return x; } }");
        assert!(!handler.has_errors());
        let text = emit(&compiled, Phase::Bodies).unwrap();
        assert!(text.contains("return UC_VAR(x);"), "expected the method body to reference its receiver field unqualified:\n{text}");
    }

    #[test]
    fn emission_is_idempotent() {
        let (compiled, handler) = compile(
            "class Animal { string name; string speak() { return name; } } \
             class Dog : Animal { } \
             int main() { Dog d; d = new Dog(\"Rex\"); return 0; }",
        );
        assert!(!handler.has_errors());
        let first = emit(&compiled, Phase::Bodies).unwrap();
        let second = emit(&compiled, Phase::Bodies).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn output_opens_the_uc_namespace_and_includes_runtime_headers() {
        let (compiled, handler) = compile("int main() { return 0; }");
        assert!(!handler.has_errors());
        let text = emit(&compiled, Phase::Bodies).unwrap();
        assert!(text.starts_with("#include \"defs.h\"\n"));
        assert!(text.contains("namespace uc {"));
        assert!(text.trim_end().ends_with("} // namespace uc"));
    }
}
