//! Expression lowering (§4.6 phase 3).
//!
//! Every `hir::Expr` shape lowers to one line of C++ text; there is no
//! statement-level buffering here, so nested expressions just recurse and
//! interpolate their child's rendered text.

use ucc_sem::hir::{AddKind, BinOp, Expr, UnOp};
use ucc_sem::types::{ClassArena, Type};

use crate::error::GenError;
use crate::names::{reference_name, type_name, var};

pub fn emit_expr(expr: &Expr, arena: &ClassArena) -> Result<String, GenError> {
    Ok(match expr {
        Expr::IntLiteral(v, _) => v.to_string(),
        Expr::FloatLiteral(v, _) => format_float_literal(*v),
        Expr::StringLiteral(s, _) => format!("\"{}\"", escape_string_literal(&s.as_str())),
        Expr::BoolLiteral(b, _) => b.to_string(),
        Expr::Null { ty, .. } => emit_default_value(ty, arena)?,
        Expr::Var { name, .. } | Expr::FuncRef { name, .. } => var(*name),
        Expr::FieldAccess { receiver, field, .. } => {
            let receiver = emit_expr(receiver, arena)?;
            // A class field literally named `length` resolves through the
            // same header overload as an array's length (§4.5 "the class
            // field wins", §4.6 `uc_length_field`) rather than plain member
            // access, so the runtime - not this emitter - decides which
            // interpretation a given receiver type gets.
            if field.as_str() == "length" {
                format!("uc_length_field({receiver})")
            } else {
                format!("{receiver}.{}", var(*field))
            }
        },
        Expr::ArrayLength { receiver, .. } => format!("uc_length_field({})", emit_expr(receiver, arena)?),
        Expr::Index { receiver, index, .. } => {
            format!("{}[{}]", emit_expr(receiver, arena)?, emit_expr(index, arena)?)
        },
        Expr::Call { callee, args, .. } => format!("{}({})", var(*callee), emit_arg_list(args, arena)?),
        Expr::MethodCall { receiver, method, args, .. } => {
            format!("{}.{}({})", emit_expr(receiver, arena)?, var(*method), emit_arg_list(args, arena)?)
        },
        Expr::Binary { op, left, right, add_kind, .. } => emit_binary(*op, left, right, *add_kind, arena)?,
        Expr::Unary { op, operand, .. } => {
            let operand = emit_expr(operand, arena)?;
            match op {
                UnOp::Neg => format!("(-{operand})"),
                UnOp::Not => format!("(!{operand})"),
            }
        },
        Expr::Assign { target, value, .. } => {
            format!("({} = {})", emit_expr(target, arena)?, emit_expr(value, arena)?)
        },
        Expr::NewObject { class, args, .. } => {
            format!("uc_make_object<{}>({})", reference_name(arena, *class), emit_arg_list(args, arena)?)
        },
        Expr::NewArray { elem_ty, size, .. } => {
            format!("uc_make_array_of<{}>({})", type_name(elem_ty, arena)?, emit_expr(size, arena)?)
        },
        Expr::Cast { target_ty, operand, .. } => {
            format!("static_cast<{}>({})", type_name(target_ty, arena)?, emit_expr(operand, arena)?)
        },
    })
}

fn emit_binary(op: BinOp, left: &Expr, right: &Expr, add_kind: Option<AddKind>, arena: &ClassArena) -> Result<String, GenError> {
    let l = emit_expr(left, arena)?;
    let r = emit_expr(right, arena)?;
    Ok(match op {
        // `uc_add` is overloaded over every combination §6 lists (numeric+
        // numeric included), so the numeric-vs-concat `AddKind` the checker
        // recorded on the node doesn't change which call we emit - it's
        // informative for a reader of the typed AST, not for this lowering.
        BinOp::Add => {
            let _ = add_kind;
            format!("uc_add({l}, {r})")
        },
        BinOp::Sub => format!("({l} - {r})"),
        BinOp::Mul => format!("({l} * {r})"),
        BinOp::Div => format!("({l} / {r})"),
        BinOp::Mod => format!("({l} % {r})"),
        BinOp::Eq => emit_equality(&l, &r, left, right, "=="),
        BinOp::Ne => emit_equality(&l, &r, left, right, "!="),
        BinOp::Lt => format!("({l} < {r})"),
        BinOp::Le => format!("({l} <= {r})"),
        BinOp::Gt => format!("({l} > {r})"),
        BinOp::Ge => format!("({l} >= {r})"),
        BinOp::And => format!("({l} && {r})"),
        BinOp::Or => format!("({l} || {r})"),
    })
}

/// `==`/`!=` (§3 glossary "Structural equality", §4.5): two class-typed
/// operands of the *same* class compare through the class's own
/// `operator==`, which is structural-or-identity. Operands whose static
/// types are merely related through a common ancestor (§4.5 equatable rule)
/// can never be the same dynamic class under the flat, non-polymorphic
/// emission this backend uses, so that half of the structural-or-identity
/// disjunction is always false - the comparison reduces to `uc_id` identity.
/// Array operands are likewise compared by `uc_id`, since uC arrays are
/// reference handles rather than value-equatable containers.
fn emit_equality(l: &str, r: &str, left: &Expr, right: &Expr, op: &str) -> String {
    match (left.ty(), right.ty()) {
        (Type::Class(a), Type::Class(b)) if a == b => format!("({l} {op} {r})"),
        (Type::Class(_), Type::Class(_)) | (Type::Array(_), Type::Array(_)) => {
            format!("(uc_id({l}) {op} uc_id({r}))")
        },
        _ => format!("({l} {op} {r})"),
    }
}

/// Renders one field-by-field `==` comparison inside a generated
/// `operator==` body (see `classes::emit_equality_operators`). Both operands
/// share the field's declared type, so - unlike `emit_equality` above, which
/// has to account for two expressions of possibly different static types -
/// this only has to decide the lowering for one type.
pub fn emit_equality_between(l: &str, r: &str, ty: &Type) -> String {
    match ty {
        Type::Class(_) => format!("({l} == {r})"),
        Type::Array(_) => format!("(uc_id({l}) == uc_id({r}))"),
        _ => format!("({l} == {r})"),
    }
}

fn emit_arg_list(args: &[Expr], arena: &ClassArena) -> Result<String, GenError> {
    let mut parts = Vec::with_capacity(args.len());
    for arg in args {
        parts.push(emit_expr(arg, arena)?);
    }
    Ok(parts.join(", "))
}

/// Lowers a `null` literal (coerced by pass C to a concrete class or array
/// type, §4.5's `coerce_null`) to a freshly default-constructed value of
/// that type - uC has no notion of a nullable empty handle distinct from a
/// default instance (§8 "default construction" scenario).
pub fn emit_default_value(ty: &Type, arena: &ClassArena) -> Result<String, GenError> {
    match ty {
        Type::Class(id) => Ok(format!("uc_make_object<{}>()", reference_name(arena, *id))),
        Type::Array(elem) => Ok(format!("uc_make_array_of<{}>(0)", type_name(elem, arena)?)),
        _ => Err(GenError::InternalInvariant("a `null` literal reached the backend with a non-reference type".to_string())),
    }
}

/// A whole-valued float still needs a `.0` so the C++ literal isn't read as
/// an `int`.
fn format_float_literal(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

fn escape_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucc_util::{IndexVec, Span};

    fn empty_arena() -> ClassArena {
        IndexVec::new()
    }

    #[test]
    fn integer_literal_renders_as_is() {
        let arena = empty_arena();
        assert_eq!(emit_expr(&Expr::IntLiteral(42, Span::DUMMY), &arena).unwrap(), "42");
    }

    #[test]
    fn whole_float_literal_keeps_a_decimal_point() {
        let arena = empty_arena();
        assert_eq!(emit_expr(&Expr::FloatLiteral(3.0, Span::DUMMY), &arena).unwrap(), "3.0");
    }

    #[test]
    fn string_literal_escapes_quotes_and_backslashes() {
        assert_eq!(escape_string_literal("a\"b\\c"), "a\\\"b\\\\c");
    }

    #[test]
    fn addition_always_lowers_through_uc_add() {
        let arena = empty_arena();
        let left = Expr::IntLiteral(1, Span::DUMMY);
        let right = Expr::IntLiteral(2, Span::DUMMY);
        let text = emit_binary(BinOp::Add, &left, &right, Some(AddKind::Numeric), &arena).unwrap();
        assert_eq!(text, "uc_add(1, 2)");
    }

    #[test]
    fn same_class_equality_uses_the_member_operator() {
        let arena = empty_arena();
        let ty = Type::Class(ucc_util::DefId(0));
        let left = Expr::Var { name: ucc_util::Symbol::intern("a"), ty: ty.clone(), span: Span::DUMMY };
        let right = Expr::Var { name: ucc_util::Symbol::intern("b"), ty, span: Span::DUMMY };
        let text = emit_binary(BinOp::Eq, &left, &right, None, &arena).unwrap();
        assert_eq!(text, "(UC_VAR(a) == UC_VAR(b))");
    }

    #[test]
    fn unrelated_class_equality_falls_back_to_identity() {
        let arena = empty_arena();
        let left = Expr::Var { name: ucc_util::Symbol::intern("a"), ty: Type::Class(ucc_util::DefId(0)), span: Span::DUMMY };
        let right = Expr::Var { name: ucc_util::Symbol::intern("b"), ty: Type::Class(ucc_util::DefId(1)), span: Span::DUMMY };
        let text = emit_binary(BinOp::Eq, &left, &right, None, &arena).unwrap();
        assert_eq!(text, "(uc_id(UC_VAR(a)) == uc_id(UC_VAR(b)))");
    }
}
