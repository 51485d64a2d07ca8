//! Statement lowering (§4.6 phase 3).
//!
//! Each statement is written at its caller-supplied indentation level, with
//! four spaces per level, so the emitted function bodies read like
//! hand-written C++ rather than a single unindented line per statement.

use ucc_sem::hir::{Block, ElseBranch, Expr, Stmt};
use ucc_sem::types::ClassArena;

use crate::error::GenError;
use crate::exprs::emit_expr;
use crate::names::{type_name, var};

fn push_indent(level: usize, out: &mut String) {
    for _ in 0..level {
        out.push_str("    ");
    }
}

pub fn emit_block(block: &Block, arena: &ClassArena, level: usize, out: &mut String) -> Result<(), GenError> {
    for stmt in &block.stmts {
        push_indent(level, out);
        emit_stmt(stmt, arena, level, out)?;
    }
    Ok(())
}

/// Emits one statement's text at `level`. The caller has already written
/// this line's leading indentation (so an `else if` chain can continue
/// right after the prior branch's closing brace on the same line).
fn emit_stmt(stmt: &Stmt, arena: &ClassArena, level: usize, out: &mut String) -> Result<(), GenError> {
    match stmt {
        Stmt::VarDecl { name, ty, init } => {
            let ty_name = type_name(ty, arena)?;
            match init {
                Some(e) => out.push_str(&format!("{ty_name} {} = {};\n", var(*name), emit_expr(e, arena)?)),
                None => out.push_str(&format!("{ty_name} {};\n", var(*name))),
            }
        },
        Stmt::Assign { target, value } => {
            out.push_str(&format!("{} = {};\n", emit_expr(target, arena)?, emit_expr(value, arena)?));
        },
        Stmt::Expr(e) => out.push_str(&format!("{};\n", emit_expr(e, arena)?)),
        Stmt::If { cond, then_branch, else_branch } => {
            emit_if(cond, then_branch, else_branch.as_deref(), arena, level, out)?;
        },
        Stmt::While { cond, body } => {
            out.push_str(&format!("while ({}) {{\n", emit_expr(cond, arena)?));
            emit_block(body, arena, level + 1, out)?;
            push_indent(level, out);
            out.push_str("}\n");
        },
        Stmt::For { init, cond, step, body } => {
            out.push_str("for (");
            if let Some(s) = init {
                emit_inline_clause(s, arena, out)?;
            }
            out.push_str("; ");
            if let Some(c) = cond {
                out.push_str(&emit_expr(c, arena)?);
            }
            out.push_str("; ");
            if let Some(s) = step {
                emit_inline_clause(s, arena, out)?;
            }
            out.push_str(") {\n");
            emit_block(body, arena, level + 1, out)?;
            push_indent(level, out);
            out.push_str("}\n");
        },
        Stmt::Return(value) => match value {
            Some(e) => out.push_str(&format!("return {};\n", emit_expr(e, arena)?)),
            None => out.push_str("return;\n"),
        },
        Stmt::Block(b) => {
            out.push_str("{\n");
            emit_block(b, arena, level + 1, out)?;
            push_indent(level, out);
            out.push_str("}\n");
        },
    }
    Ok(())
}

fn emit_if(
    cond: &Expr,
    then_branch: &Block,
    else_branch: Option<&ElseBranch>,
    arena: &ClassArena,
    level: usize,
    out: &mut String,
) -> Result<(), GenError> {
    out.push_str(&format!("if ({}) {{\n", emit_expr(cond, arena)?));
    emit_block(then_branch, arena, level + 1, out)?;
    push_indent(level, out);
    out.push('}');
    match else_branch {
        None => out.push('\n'),
        Some(ElseBranch::Block(b)) => {
            out.push_str(" else {\n");
            emit_block(b, arena, level + 1, out)?;
            push_indent(level, out);
            out.push_str("}\n");
        },
        Some(ElseBranch::If(Stmt::If { cond, then_branch, else_branch })) => {
            out.push_str(" else ");
            emit_if(cond, then_branch, else_branch.as_deref(), arena, level, out)?;
        },
        Some(ElseBranch::If(other)) => {
            return Err(GenError::InternalInvariant(format!("else-if branch held a non-if statement: {other:?}")));
        },
    }
    Ok(())
}

/// Renders a `for`-loop's init/step clause inline: no trailing `;` or
/// newline, since the loop header supplies its own separators (§4.2 only
/// allows a var-decl, assignment, or expression-statement there).
fn emit_inline_clause(stmt: &Stmt, arena: &ClassArena, out: &mut String) -> Result<(), GenError> {
    match stmt {
        Stmt::VarDecl { name, ty, init } => {
            let ty_name = type_name(ty, arena)?;
            match init {
                Some(e) => out.push_str(&format!("{ty_name} {} = {}", var(*name), emit_expr(e, arena)?)),
                None => out.push_str(&format!("{ty_name} {}", var(*name))),
            }
        },
        Stmt::Assign { target, value } => {
            out.push_str(&format!("{} = {}", emit_expr(target, arena)?, emit_expr(value, arena)?));
        },
        Stmt::Expr(e) => out.push_str(&emit_expr(e, arena)?),
        other => return Err(GenError::InternalInvariant(format!("unsupported for-loop clause: {other:?}"))),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucc_sem::types::Primitive;
    use ucc_util::{IndexVec, Span};

    fn empty_arena() -> ClassArena {
        IndexVec::new()
    }

    #[test]
    fn return_statement_is_indented_at_its_level() {
        let arena = empty_arena();
        let block = Block { stmts: vec![Stmt::Return(Some(Expr::IntLiteral(1, Span::DUMMY)))] };
        let mut out = String::new();
        emit_block(&block, &arena, 1, &mut out).unwrap();
        assert_eq!(out, "    return 1;\n");
    }

    #[test]
    fn var_decl_without_initializer_has_no_equals_sign() {
        let arena = empty_arena();
        let block = Block {
            stmts: vec![Stmt::VarDecl { name: ucc_util::Symbol::intern("x"), ty: ucc_sem::types::Type::Primitive(Primitive::Int), init: None }],
        };
        let mut out = String::new();
        emit_block(&block, &arena, 0, &mut out).unwrap();
        assert_eq!(out, "UC_PRIMITIVE(int) UC_VAR(x);\n");
    }

    #[test]
    fn else_if_chains_continue_on_the_closing_brace_line() {
        let arena = empty_arena();
        let inner_if = Stmt::If {
            cond: Expr::BoolLiteral(false, Span::DUMMY),
            then_branch: Block { stmts: vec![] },
            else_branch: None,
        };
        let outer = Stmt::If {
            cond: Expr::BoolLiteral(true, Span::DUMMY),
            then_branch: Block { stmts: vec![] },
            else_branch: Some(Box::new(ElseBranch::If(inner_if))),
        };
        let mut out = String::new();
        emit_stmt(&outer, &arena, 0, &mut out).unwrap();
        assert!(out.contains("} else if"), "expected an else-if chain, got: {out}");
    }
}
