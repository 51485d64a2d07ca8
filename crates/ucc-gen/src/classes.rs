//! Class and typedef emission (§4.6 phases 1-3).
//!
//! Each uC class becomes one self-contained C++ class: pass B already
//! flattens declared-plus-inherited fields and methods into `ClassDef`
//! (inherited first, no shadowing), so the emitted class needs no
//! `: public Base` relationship of its own - every member it can reach is
//! already in its own field/method table. uC has no assignment-level
//! upcasting (a superclass-typed slot can only ever hold that class, per
//! `is_assignable`), so this flat, non-polymorphic rendering loses nothing
//! the checker would have allowed anyway (documented in DESIGN.md).

use ucc_sem::hir;
use ucc_sem::resolve::ResolvedTypedef;
use ucc_sem::types::{ClassArena, ClassDef, Type};
use ucc_util::{DefId, IndexVec, Symbol};

use crate::error::GenError;
use crate::exprs::{emit_default_value, emit_equality_between, emit_expr};
use crate::names::{reference_name, type_name, var};
use crate::phase::Phase;
use crate::signatures::emit_method_signature;
use crate::stmts::emit_block;

/// The typed bodies pass C produced, keyed by the same `DefId` space as the
/// class arena (`hir::Program::classes`).
pub type HirClasses = IndexVec<DefId, hir::ClassBody>;

pub fn emit_typedefs(typedefs: &[ResolvedTypedef], arena: &ClassArena, out: &mut String) -> Result<(), GenError> {
    for td in typedefs {
        out.push_str(&format!("using UC_TYPEDEF({}) = {};\n", td.name.as_str(), type_name(&td.aliased, arena)?));
    }
    if !typedefs.is_empty() {
        out.push('\n');
    }
    Ok(())
}

pub fn emit_forward_declarations(arena: &ClassArena, out: &mut String) {
    for (_, class) in arena.iter_enumerated() {
        out.push_str(&format!("class UC_REFERENCE({});\n", class.name.as_str()));
    }
    if arena.len() > 0 {
        out.push('\n');
    }
}

pub fn emit_class(id: DefId, class: &ClassDef, arena: &ClassArena, hir_classes: &HirClasses, phase: Phase, out: &mut String) -> Result<(), GenError> {
    let tag = reference_name(arena, id);
    out.push_str(&format!("class {tag} {{\npublic:\n"));

    for field in &class.fields {
        out.push_str(&format!("    {} {};\n", type_name(&field.ty, arena)?, var(field.name)));
    }
    out.push('\n');

    emit_default_constructor(&tag, class, arena, hir_classes, out)?;
    emit_positional_constructor(&tag, class, arena, out)?;
    emit_equality_operators(&tag, class, out);

    if phase.emits_signatures() {
        out.push('\n');
        for method in &class.methods {
            out.push_str("    ");
            out.push_str(&emit_method_signature(method, arena)?);
            match phase.emits_bodies().then(|| find_method_body(hir_classes, method.owner, method.name, &method.params)).flatten() {
                Some(function) => {
                    out.push_str(" {\n");
                    emit_block(&function.body, arena, 2, out)?;
                    out.push_str("    }\n");
                },
                None => out.push_str(";\n"),
            }
        }
    }

    out.push_str("};\n\n");
    Ok(())
}

fn emit_default_constructor(tag: &str, class: &ClassDef, arena: &ClassArena, hir_classes: &HirClasses, out: &mut String) -> Result<(), GenError> {
    out.push_str(&format!("    {tag}()"));
    if !class.fields.is_empty() {
        out.push_str(" : ");
        let mut inits = Vec::with_capacity(class.fields.len());
        for field in &class.fields {
            let value = match find_field_default(hir_classes, field.owner, field.name) {
                Some(expr) => emit_expr(expr, arena)?,
                None => emit_default_value(&field.ty, arena)?,
            };
            inits.push(format!("{}({value})", var(field.name)));
        }
        out.push_str(&inits.join(", "));
    }
    out.push_str(" {}\n");
    Ok(())
}

fn emit_positional_constructor(tag: &str, class: &ClassDef, arena: &ClassArena, out: &mut String) -> Result<(), GenError> {
    if class.fields.is_empty() {
        return Ok(());
    }
    let mut params = Vec::with_capacity(class.fields.len());
    let mut inits = Vec::with_capacity(class.fields.len());
    for field in &class.fields {
        let param_name = format!("{}_", field.name.as_str());
        params.push(format!("{} {param_name}", type_name(&field.ty, arena)?));
        inits.push(format!("{}({param_name})", var(field.name)));
    }
    out.push_str(&format!("    {tag}({}) : {} {{}}\n", params.join(", "), inits.join(", ")));
    Ok(())
}

/// §3 glossary "Structural equality": same object identity, or same class
/// and every field equal. Since each emitted class is its own concrete C++
/// type, "same class" is automatic for any expression that type-checks as
/// this class in uC (this backend's non-polymorphic design, see the module
/// doc comment); a cross-class comparison never reaches this operator and is
/// lowered to plain `uc_id` identity at the call site instead (see
/// `exprs::emit_equality_between`).
fn emit_equality_operators(tag: &str, class: &ClassDef, out: &mut String) {
    let mut field_checks = Vec::with_capacity(class.fields.len());
    for field in &class.fields {
        let this_field = var(field.name);
        let other_field = format!("uc_other.{this_field}");
        field_checks.push(emit_equality_between(&this_field, &other_field, &field.ty));
    }
    let fields_equal = if field_checks.is_empty() { "true".to_string() } else { field_checks.join(" && ") };

    out.push_str(&format!("    bool operator==(const {tag}& uc_other) const {{\n"));
    out.push_str(&format!("        return uc_id(*this) == uc_id(uc_other) || ({fields_equal});\n"));
    out.push_str("    }\n");
    out.push_str(&format!("    bool operator!=(const {tag}& uc_other) const {{\n        return !(*this == uc_other);\n    }}\n"));
}

fn find_field_default(hir_classes: &HirClasses, owner: DefId, name: Symbol) -> Option<&hir::Expr> {
    hir_classes[owner].fields.iter().find(|f| f.name == name).and_then(|f| f.default.as_ref())
}

fn find_method_body<'a>(hir_classes: &'a HirClasses, owner: DefId, name: Symbol, params: &[Type]) -> Option<&'a hir::Function> {
    hir_classes[owner].methods.iter().find(|m| m.name == name && m.params.len() == params.len() && m.params.iter().map(|(_, t)| t).eq(params.iter()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucc_util::Span;

    fn leaf_class(name: &str) -> ClassDef {
        ClassDef { name: Symbol::intern(name), superclass: None, ancestors: vec![], fields: vec![], methods: vec![], span: Span::DUMMY }
    }

    #[test]
    fn empty_class_gets_a_parameterless_default_constructor() {
        let mut arena: ClassArena = IndexVec::new();
        arena.push(leaf_class("Empty"));
        let mut hir_classes: HirClasses = IndexVec::new();
        hir_classes.push(hir::ClassBody { fields: vec![], methods: vec![] });
        let mut out = String::new();
        emit_class(DefId(0), &arena[DefId(0)], &arena, &hir_classes, Phase::Types, &mut out).unwrap();
        assert!(out.contains("UC_REFERENCE(Empty)() {}"), "missing default ctor in: {out}");
    }

    #[test]
    fn forward_declarations_list_every_class_once() {
        let mut arena: ClassArena = IndexVec::new();
        arena.push(leaf_class("A"));
        arena.push(leaf_class("B"));
        let mut out = String::new();
        emit_forward_declarations(&arena, &mut out);
        assert_eq!(out, "class UC_REFERENCE(A);\nclass UC_REFERENCE(B);\n\n");
    }
}
