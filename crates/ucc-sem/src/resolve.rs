//! Type resolver (pass B, §4.4).
//!
//! Walks every syntactic [`ucc_par::TypeRef`] produced by the parser and
//! replaces it with a semantic [`Type`]. Typedefs are transparent (a
//! reference to a typedef resolves to the typedef's fully unwrapped aliased
//! type) and resolution is memoized so a typedef chain is only walked once;
//! entering an in-progress typedef is reported as a cycle. After every type
//! reference is resolved, this pass computes each class's field table
//! (inherited first, shadowing disallowed) and method-signature list, and
//! establishes the superclass link.

use rustc_hash::FxHashMap;
use ucc_par::{ClassDecl, TypeRef};
use ucc_util::{DefId, DiagnosticCode, Handler, Span, Symbol};

use crate::collect::{CollectedProgram, TopLevelName};
use crate::types::{ClassArena, ClassDef, FieldInfo, FunctionSig, MethodSig, Primitive, Type};

enum TypedefState {
    InProgress,
    Resolved(Type),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ClassState {
    Unresolved,
    InProgress,
    Done,
}

pub struct Resolver<'ast, 'h> {
    collected: &'ast CollectedProgram<'ast>,
    handler: &'h Handler,
    typedefs: FxHashMap<Symbol, TypedefState>,
}

/// One `typedef name aliased;` at file scope, with its aliased type fully
/// resolved (§4.4: typedefs are transparent, so the backend only needs the
/// final aliased type to emit a `using` declaration - §4.6).
pub struct ResolvedTypedef {
    pub name: Symbol,
    pub aliased: Type,
}

/// The output of pass B: every class fully resolved, plus free function
/// signatures ready for pass C.
pub struct ResolvedProgram {
    pub arena: ClassArena,
    pub functions: Vec<FunctionSig>,
    pub typedefs: Vec<ResolvedTypedef>,
}

pub fn resolve(collected: &CollectedProgram<'_>, handler: &Handler) -> ResolvedProgram {
    let mut resolver = Resolver { collected, handler, typedefs: FxHashMap::default() };
    resolver.run()
}

impl<'ast, 'h> Resolver<'ast, 'h> {
    fn run(&mut self) -> ResolvedProgram {
        let mut arena: ClassArena = ClassArena::new();
        // Pre-size the arena so every DefId from pass A is valid before any
        // class body is resolved - a field of class type may name a class
        // declared later in the file.
        for _ in 0..self.collected.classes.len() {
            arena.push(placeholder_class());
        }

        // A class's superclass may itself be declared later in the file (§3:
        // "a class may be referenced before its definition"), so a class
        // must be resolved only after its superclass is - resolving in raw
        // declaration order would silently read an unresolved placeholder
        // for a forward-referenced superclass's inherited fields/methods.
        // Walk the inheritance graph depth-first instead, memoizing on
        // `ClassState` and reporting a cycle rather than recursing forever.
        let mut state = vec![ClassState::Unresolved; self.collected.classes.len()];
        for (id, _) in &self.collected.classes {
            self.resolve_class_ordered(*id, &mut arena, &mut state);
        }

        let functions = self
            .collected
            .functions
            .iter()
            .map(|f| FunctionSig {
                name: f.name,
                params: f.params.iter().map(|p| self.resolve_type(&p.ty)).collect(),
                param_names: f.params.iter().map(|p| p.name).collect(),
                ret: self.resolve_type(&f.ret_type),
                body: f.body.clone(),
                span: f.span,
            })
            .collect();

        let typedef_names: Vec<Symbol> = self.collected.typedefs.iter().map(|t| t.name).collect();
        let typedefs = typedef_names
            .into_iter()
            .map(|name| ResolvedTypedef { aliased: self.resolve_typedef(name), name })
            .collect();

        ResolvedProgram { arena, functions, typedefs }
    }

    /// Resolves class `id`, first resolving its superclass (recursively) if
    /// it hasn't been resolved yet. `state[id]` is `InProgress` for the
    /// duration of this call so a cycle in the inheritance graph (`class A :
    /// B` / `class B : A`) is caught rather than looping forever (§3
    /// invariant: "a class's superclass chain is finite and acyclic").
    fn resolve_class_ordered(&mut self, id: DefId, arena: &mut ClassArena, state: &mut [ClassState]) {
        if state[id.0 as usize] == ClassState::Done {
            return;
        }
        state[id.0 as usize] = ClassState::InProgress;

        let decl = self.collected.classes.iter().find(|(cid, _)| *cid == id).map(|(_, d)| *d).expect("DefId from pass A");

        if let Some(super_name) = decl.superclass {
            if let Some(TopLevelName::Class(super_id)) = self.collected.names.get(&super_name).copied() {
                match state[super_id.0 as usize] {
                    ClassState::InProgress => {
                        self.handler
                            .build_error(decl.span, format!("inheritance cycle involving `{}`", decl.name))
                            .code(DiagnosticCode::SYM_INHERITANCE_CYCLE)
                            .emit(self.handler);
                    },
                    ClassState::Unresolved => self.resolve_class_ordered(super_id, arena, state),
                    ClassState::Done => {},
                }
            }
        }

        let class_def = self.resolve_class(decl, id, arena);
        arena[id] = class_def;
        state[id.0 as usize] = ClassState::Done;
    }

    fn resolve_class(&mut self, decl: &ClassDecl, id: DefId, arena: &ClassArena) -> ClassDef {
        let superclass = decl.superclass.map(|name| self.resolve_class_name(name, decl.span)).flatten();

        let (ancestors, mut fields, mut methods) = if let Some(super_id) = superclass {
            let super_def = &arena[super_id];
            let mut ancestors = vec![super_id];
            ancestors.extend(super_def.ancestors.iter().copied());
            (ancestors, super_def.fields.clone(), self.non_overridden_methods(decl, &super_def.methods))
        } else {
            (Vec::new(), Vec::new(), Vec::new())
        };

        for field in &decl.fields {
            let ty = self.resolve_type(&field.ty);
            if fields.iter().any(|f: &FieldInfo| f.name == field.name) {
                self.handler
                    .build_error(field.span, format!("field `{}` redeclares an inherited or earlier field", field.name))
                    .code(DiagnosticCode::SYM_DUPLICATE_FIELD)
                    .emit(self.handler);
                continue;
            }
            fields.push(FieldInfo { name: field.name, ty, owner: id, default: field.default.clone(), span: field.span });
        }

        for method in &decl.methods {
            methods.push(MethodSig {
                name: method.name,
                params: method.params.iter().map(|p| self.resolve_type(&p.ty)).collect(),
                param_names: method.params.iter().map(|p| p.name).collect(),
                ret: self.resolve_type(&method.ret_type),
                owner: id,
                body: method.body.clone(),
                span: method.span,
            });
        }

        ClassDef { name: decl.name, superclass, ancestors, fields, methods, span: decl.span }
    }

    /// Inherited methods are kept unless this class declares a method with
    /// the exact same name and parameter types, in which case the
    /// declaration here overrides it (§4.5: "inherited methods are visible").
    fn non_overridden_methods(&self, decl: &ClassDecl, inherited: &[MethodSig]) -> Vec<MethodSig> {
        inherited
            .iter()
            .filter(|m| {
                !decl.methods.iter().any(|own| {
                    own.name == m.name
                        && own.params.len() == m.params.len()
                        && own.params.iter().zip(&m.params).all(|(p, ty)| self.resolve_type(&p.ty) == *ty)
                })
            })
            .cloned()
            .collect()
    }

    fn resolve_class_name(&mut self, name: Symbol, span: Span) -> Option<DefId> {
        match self.collected.names.get(&name) {
            Some(TopLevelName::Class(id)) => Some(*id),
            Some(TopLevelName::Typedef) | None => {
                self.handler
                    .build_error(span, format!("unknown superclass `{name}`"))
                    .code(DiagnosticCode::SYM_UNKNOWN_SUPERCLASS)
                    .emit(self.handler);
                None
            },
        }
    }

    /// Resolve a syntactic type reference to a semantic [`Type`] (§4.4).
    pub fn resolve_type(&mut self, type_ref: &TypeRef) -> Type {
        match type_ref {
            TypeRef::Primitive(p) => Type::Primitive(resolve_primitive(*p)),
            TypeRef::Array(elem) => Type::Array(Box::new(self.resolve_type(elem))),
            TypeRef::Function(ret, params) => {
                Type::Function(params.iter().map(|p| self.resolve_type(p)).collect(), Box::new(self.resolve_type(ret)))
            },
            TypeRef::Named(name) => self.resolve_named(*name),
        }
    }

    fn resolve_named(&mut self, name: Symbol) -> Type {
        match self.collected.names.get(&name) {
            Some(TopLevelName::Class(id)) => Type::Class(*id),
            Some(TopLevelName::Typedef) => self.resolve_typedef(name),
            None => {
                self.handler
                    .build_error(Span::DUMMY, format!("unknown type `{name}`"))
                    .code(DiagnosticCode::TYPE_UNKNOWN)
                    .emit(self.handler);
                Type::Primitive(Primitive::Void)
            },
        }
    }

    /// Resolve a typedef name to its fully unwrapped aliased type, memoizing
    /// the result and detecting cycles (`typedef A B; typedef B A;`, §8).
    fn resolve_typedef(&mut self, name: Symbol) -> Type {
        if let Some(state) = self.typedefs.get(&name) {
            return match state {
                TypedefState::InProgress => {
                    self.handler
                        .build_error(Span::DUMMY, format!("typedef cycle involving `{name}`"))
                        .code(DiagnosticCode::TYPE_TYPEDEF_CYCLE)
                        .emit(self.handler);
                    Type::Primitive(Primitive::Void)
                },
                TypedefState::Resolved(ty) => ty.clone(),
            };
        }

        let Some(decl) = self.collected.typedefs.iter().find(|t| t.name == name) else {
            return Type::Primitive(Primitive::Void);
        };

        self.typedefs.insert(name, TypedefState::InProgress);
        let resolved = self.resolve_type(&decl.aliased.clone());
        self.typedefs.insert(name, TypedefState::Resolved(resolved.clone()));
        resolved
    }
}

fn resolve_primitive(p: ucc_par::PrimitiveTypeName) -> Primitive {
    match p {
        ucc_par::PrimitiveTypeName::Int => Primitive::Int,
        ucc_par::PrimitiveTypeName::Long => Primitive::Long,
        ucc_par::PrimitiveTypeName::Float => Primitive::Float,
        ucc_par::PrimitiveTypeName::Boolean => Primitive::Boolean,
        ucc_par::PrimitiveTypeName::String => Primitive::String,
        ucc_par::PrimitiveTypeName::Void => Primitive::Void,
    }
}

fn placeholder_class() -> ClassDef {
    ClassDef {
        name: Symbol::intern(""),
        superclass: None,
        ancestors: Vec::new(),
        fields: Vec::new(),
        methods: Vec::new(),
        span: Span::DUMMY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::collect;
    use ucc_util::Handler;

    fn parse_and_resolve(source: &str) -> (ResolvedProgram, bool) {
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
        let program = parser.parse_program();
        let collected = collect(&program, &handler);
        let resolved = resolve(&collected, &handler);
        (resolved, handler.has_errors())
    }

    #[test]
    fn forward_referenced_field_type_resolves() {
        let (resolved, errored) = parse_and_resolve("class foo { baz b; } class baz { string s; }");
        assert!(!errored);
        let foo = resolved.arena.iter().find(|c| c.name == Symbol::intern("foo")).unwrap();
        assert!(matches!(foo.fields[0].ty, Type::Class(_)));
    }

    #[test]
    fn typedef_cycle_is_an_error() {
        let (_resolved, errored) = parse_and_resolve("typedef A B; typedef B A; class C { A x; }");
        assert!(errored);
    }

    #[test]
    fn typedef_transparency_unwraps_to_the_underlying_type() {
        let (resolved, errored) = parse_and_resolve("typedef int Meters; class C { Meters m; }");
        assert!(!errored);
        let c = &resolved.arena[DefId(0)];
        assert_eq!(c.fields[0].ty, Type::Primitive(Primitive::Int));
    }

    #[test]
    fn subclass_inherits_fields_before_its_own() {
        let (resolved, errored) = parse_and_resolve("class Animal { string name; } class Dog : Animal { int age; }");
        assert!(!errored);
        let dog = resolved.arena.iter().find(|c| c.name == Symbol::intern("Dog")).unwrap();
        assert_eq!(dog.fields.len(), 2);
        assert_eq!(dog.fields[0].name, Symbol::intern("name"));
        assert_eq!(dog.fields[1].name, Symbol::intern("age"));
    }

    #[test]
    fn redeclaring_an_inherited_field_name_is_an_error() {
        let (_resolved, errored) = parse_and_resolve("class Animal { int x; } class Dog : Animal { int x; }");
        assert!(errored);
    }

    #[test]
    fn forward_referenced_superclass_still_contributes_inherited_fields() {
        let (resolved, errored) = parse_and_resolve("class Dog : Animal { int age; } class Animal { string name; }");
        assert!(!errored);
        let dog = resolved.arena.iter().find(|c| c.name == Symbol::intern("Dog")).unwrap();
        assert_eq!(dog.fields.len(), 2);
        assert_eq!(dog.fields[0].name, Symbol::intern("name"));
        assert_eq!(dog.fields[1].name, Symbol::intern("age"));
    }

    #[test]
    fn inheritance_cycle_is_an_error() {
        let (_resolved, errored) = parse_and_resolve("class A : B { } class B : A { }");
        assert!(errored);
    }

    #[test]
    fn unknown_superclass_is_an_error() {
        let (_resolved, errored) = parse_and_resolve("class Dog : Ghost { }");
        assert!(errored);
    }

    #[test]
    fn method_override_replaces_the_inherited_signature_not_duplicates_it() {
        let (resolved, errored) =
            parse_and_resolve("class Animal { string speak() { return \"...\"; } } class Dog : Animal { string speak() { return \"woof\"; } }");
        assert!(!errored);
        let dog = resolved.arena.iter().find(|c| c.name == Symbol::intern("Dog")).unwrap();
        assert_eq!(dog.methods_named(Symbol::intern("speak")).count(), 1);
    }
}
