//! Symbol collector (pass A, §4.3).
//!
//! A single left-to-right traversal over top-level declarations that interns
//! every class and typedef name into the file-scope symbol table, so later
//! passes may reference a class or typedef before its declaration (the
//! "forward reference" scenario of §8). Member lookup does not happen here -
//! only names are reserved.

use indexmap::IndexMap;
use ucc_par::{ClassDecl, TopLevelDecl, TypedefDecl};
use ucc_util::{DefId, DiagnosticCode, Handler, Symbol};

/// What a top-level name was declared as, so pass B can tell a class
/// reference from a typedef reference by name alone.
#[derive(Debug, Clone, Copy)]
pub enum TopLevelName {
    Class(DefId),
    Typedef,
}

/// The result of pass A: every top-level class/typedef name, plus the raw
/// declarations in source order for pass B to walk.
pub struct CollectedProgram<'ast> {
    pub names: IndexMap<Symbol, TopLevelName>,
    pub classes: Vec<(DefId, &'ast ClassDecl)>,
    pub typedefs: Vec<&'ast TypedefDecl>,
    pub functions: Vec<&'ast ucc_par::FunctionDecl>,
}

/// Run pass A over `program`. Duplicate top-level names are reported and the
/// later declaration is ignored for symbol purposes (§4.3, §7).
pub fn collect<'ast>(program: &'ast [TopLevelDecl], handler: &Handler) -> CollectedProgram<'ast> {
    let mut names = IndexMap::new();
    let mut classes = Vec::new();
    let mut typedefs = Vec::new();
    let mut functions = Vec::new();
    let mut next_id = 0u32;

    for decl in program {
        match decl {
            TopLevelDecl::Class(class) => {
                if names.contains_key(&class.name) {
                    report_duplicate(handler, class.name, class.span);
                    continue;
                }
                let id = DefId(next_id);
                next_id += 1;
                names.insert(class.name, TopLevelName::Class(id));
                classes.push((id, class));
            },
            TopLevelDecl::Typedef(typedef) => {
                if names.contains_key(&typedef.name) {
                    report_duplicate(handler, typedef.name, typedef.span);
                    continue;
                }
                names.insert(typedef.name, TopLevelName::Typedef);
                typedefs.push(typedef);
            },
            TopLevelDecl::Function(func) => {
                functions.push(func);
            },
        }
    }

    CollectedProgram { names, classes, typedefs, functions }
}

fn report_duplicate(handler: &Handler, name: Symbol, span: ucc_util::Span) {
    handler
        .build_error(span, format!("duplicate top-level declaration `{name}`"))
        .code(DiagnosticCode::SYM_DUPLICATE_TOP_LEVEL)
        .emit(handler);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucc_util::Handler;

    fn parse(source: &str) -> ucc_par::Program {
        let handler = Handler::new();
        let mut lexer = ucc_lex::Lexer::new(source, ucc_util::FileId::DUMMY, &handler);
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
    fn forward_reference_registers_both_class_names_regardless_of_order() {
        let program = parse("class foo { baz b; } class baz { string s; }");
        let handler = Handler::new();
        let collected = collect(&program, &handler);
        assert!(!handler.has_errors());
        assert_eq!(collected.classes.len(), 2);
        assert!(matches!(collected.names.get(&Symbol::intern("foo")), Some(TopLevelName::Class(_))));
        assert!(matches!(collected.names.get(&Symbol::intern("baz")), Some(TopLevelName::Class(_))));
    }

    #[test]
    fn duplicate_top_level_name_is_an_error() {
        let program = parse("class Foo { } class Foo { }");
        let handler = Handler::new();
        let collected = collect(&program, &handler);
        assert!(handler.has_errors());
        assert_eq!(collected.classes.len(), 1);
    }

    #[test]
    fn typedef_and_class_share_one_namespace() {
        let program = parse("typedef int Foo; class Foo { }");
        let handler = Handler::new();
        let collected = collect(&program, &handler);
        assert!(handler.has_errors());
    }
}
