//! Type checker (pass C, §4.5).
//!
//! Walks the untyped `ucc_par` tree one more time, now against the resolved
//! class arena and function table from pass B, and re-expresses it as the
//! typed [`crate::hir`]. Each top-level declaration is checked independently:
//! a fatal error in one function or method body aborts *that* declaration
//! (the rest of its statements are skipped) but later declarations are still
//! checked (§4.5, §7).

use rustc_hash::FxHashMap;
use ucc_par as ast;
use ucc_util::{DefId, DiagnosticCode, Handler, Span, Symbol};

use crate::hir;
use crate::types::{is_assignable, numeric_promotion, ClassArena, FunctionSig, Primitive, Type};

pub struct CheckedProgram {
    pub program: hir::Program,
}

pub fn check(arena: &ClassArena, functions: &[FunctionSig], handler: &Handler) -> CheckedProgram {
    let function_index = index_by_name(functions.iter().map(|f| f.name));
    let checker = Checker { arena, functions, function_index, handler };

    let mut classes = ucc_util::IndexVec::new();
    for (id, class) in arena.iter_enumerated() {
        classes.push(checker.check_class(id, class));
    }

    let functions = functions.iter().map(|f| checker.check_function(f, None)).collect();

    CheckedProgram { program: hir::Program { classes, functions } }
}

/// Groups items by name so overload resolution can look up every candidate
/// sharing a call site's name in one step.
fn index_by_name(names: impl Iterator<Item = Symbol>) -> FxHashMap<Symbol, Vec<usize>> {
    let mut map: FxHashMap<Symbol, Vec<usize>> = FxHashMap::default();
    for (i, name) in names.enumerate() {
        map.entry(name).or_default().push(i);
    }
    map
}

enum OverloadResult {
    NoMatch,
    WrongArgCount,
    Ambiguous,
    Match(usize),
}

/// Picks the most specific candidate whose parameters all accept the call's
/// argument types (§4.5: "the overload requiring the fewest widenings wins;
/// a tie between two distinct candidates is an error").
fn pick_overload(candidate_params: &[&[Type]], args: &[Type]) -> OverloadResult {
    let mut best: Option<(usize, u32)> = None;
    let mut tie = false;
    let mut any_same_arity = false;

    for (i, params) in candidate_params.iter().enumerate() {
        if params.len() != args.len() {
            continue;
        }
        any_same_arity = true;

        let mut score = 0u32;
        let mut ok = true;
        for (p, a) in params.iter().zip(args) {
            if p == a {
                continue;
            }
            if is_assignable(a, p) {
                score += 1;
            } else {
                ok = false;
                break;
            }
        }
        if !ok {
            continue;
        }

        match best {
            None => best = Some((i, score)),
            Some((_, b)) if score < b => {
                best = Some((i, score));
                tie = false;
            },
            Some((_, b)) if score == b => tie = true,
            _ => {},
        }
    }

    match best {
        Some(_) if tie => OverloadResult::Ambiguous,
        Some((i, _)) => OverloadResult::Match(i),
        None if any_same_arity => OverloadResult::NoMatch,
        None => OverloadResult::WrongArgCount,
    }
}

struct Checker<'a> {
    arena: &'a ClassArena,
    functions: &'a [FunctionSig],
    function_index: FxHashMap<Symbol, Vec<usize>>,
    handler: &'a Handler,
}

/// Per-function checking state: the lexical scope stack, the enclosing
/// class (for implicit field/method lookup inside a method body), and the
/// declared return type (for `return` checking).
struct FnCtx {
    scopes: Vec<FxHashMap<Symbol, Type>>,
    receiver: Option<DefId>,
    ret: Type,
}

impl FnCtx {
    fn push(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    fn pop(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: Symbol, ty: Type) {
        self.scopes.last_mut().expect("at least one scope").insert(name, ty);
    }

    fn lookup(&self, name: Symbol) -> Option<Type> {
        self.scopes.iter().rev().find_map(|s| s.get(&name).cloned())
    }
}

impl<'a> Checker<'a> {
    fn check_class(&self, id: DefId, class: &crate::types::ClassDef) -> hir::ClassBody {
        let fields = class
            .fields
            .iter()
            .filter(|f| f.owner == id)
            .map(|f| self.check_field_default(f))
            .collect();
        let methods = class
            .methods
            .iter()
            .filter(|m| m.owner == id)
            .map(|m| self.check_method(m, id))
            .collect();
        hir::ClassBody { fields, methods }
    }

    /// Checks one declared field's default-value expression, if any, against
    /// its declared type (§3 invariant) and coerces a bare `null` default to
    /// the field's concrete class/array type so the backend can lower it
    /// without re-deriving the target type.
    fn check_field_default(&self, field: &crate::types::FieldInfo) -> hir::FieldDefault {
        let default = field.default.as_ref().map(|expr| {
            let ctx_receiver = None;
            let mut ctx = FnCtx { scopes: vec![Default::default()], receiver: ctx_receiver, ret: Type::Primitive(Primitive::Void) };
            let mut checked = self.check_expr(&mut ctx, expr);
            coerce_null(&mut checked, &field.ty);
            self.expect_assignable(&checked, &field.ty, field.span, "field default value");
            checked
        });
        hir::FieldDefault { name: field.name, default }
    }

    fn check_method(&self, sig: &crate::types::MethodSig, owner: DefId) -> hir::Function {
        self.check_function_like(sig.name, &sig.param_names, &sig.params, &sig.ret, &sig.body, sig.span, Some(owner))
    }

    fn check_function(&self, sig: &FunctionSig, receiver: Option<DefId>) -> hir::Function {
        self.check_function_like(sig.name, &sig.param_names, &sig.params, &sig.ret, &sig.body, sig.span, receiver)
    }

    fn check_function_like(
        &self,
        name: Symbol,
        param_names: &[Symbol],
        param_types: &[Type],
        ret: &Type,
        body: &ast::Block,
        span: Span,
        receiver: Option<DefId>,
    ) -> hir::Function {
        let mut ctx = FnCtx { scopes: Vec::new(), receiver, ret: ret.clone() };
        ctx.push();
        for (n, t) in param_names.iter().zip(param_types) {
            ctx.declare(*n, t.clone());
        }

        let checked_body = self.check_block(&mut ctx, body);
        ctx.pop();

        if !ret.is_void() && !block_returns(&checked_body) {
            self.handler
                .build_error(span, format!("function `{name}` does not return a value on every path"))
                .code(DiagnosticCode::TYPE_MISSING_RETURN)
                .emit(self.handler);
        }

        let params = param_names.iter().cloned().zip(param_types.iter().cloned()).collect();
        hir::Function { name, params, ret: ret.clone(), body: checked_body, span }
    }

    fn check_block(&self, ctx: &mut FnCtx, block: &ast::Block) -> hir::Block {
        ctx.push();
        let stmts = block.stmts.iter().map(|s| self.check_stmt(ctx, s)).collect();
        ctx.pop();
        hir::Block { stmts }
    }

    fn check_stmt(&self, ctx: &mut FnCtx, stmt: &ast::Stmt) -> hir::Stmt {
        match stmt {
            ast::Stmt::VarDecl(decl) => {
                let declared = self.resolve_local_type(&decl.ty);
                let init = decl.init.as_ref().map(|e| {
                    let mut checked = self.check_expr(ctx, e);
                    coerce_null(&mut checked, &declared);
                    self.expect_assignable(&checked, &declared, decl.span, "variable initializer");
                    checked
                });
                ctx.declare(decl.name, declared.clone());
                hir::Stmt::VarDecl { name: decl.name, ty: declared, init }
            },
            ast::Stmt::Assign(assign) => {
                let target = self.check_expr(ctx, &assign.target);
                let mut value = self.check_expr(ctx, &assign.value);
                coerce_null(&mut value, &target.ty());
                self.expect_assignable(&value, &target.ty(), assign.span, "assignment");
                hir::Stmt::Assign { target, value }
            },
            ast::Stmt::Expr(e) => hir::Stmt::Expr(self.check_expr(ctx, e)),
            ast::Stmt::If(i) => {
                let cond = self.check_expr(ctx, &i.cond);
                self.expect_boolean(&cond, i.span);
                let then_branch = self.check_block(ctx, &i.then_branch);
                let else_branch = i.else_branch.as_ref().map(|e| Box::new(self.check_else(ctx, e)));
                hir::Stmt::If { cond, then_branch, else_branch }
            },
            ast::Stmt::While(w) => {
                let cond = self.check_expr(ctx, &w.cond);
                self.expect_boolean(&cond, w.span);
                let body = self.check_block(ctx, &w.body);
                hir::Stmt::While { cond, body }
            },
            ast::Stmt::For(f) => {
                ctx.push();
                let init = f.init.as_ref().map(|s| Box::new(self.check_stmt(ctx, s)));
                let cond = f.cond.as_ref().map(|c| {
                    let checked = self.check_expr(ctx, c);
                    self.expect_boolean(&checked, f.span);
                    checked
                });
                let step = f.step.as_ref().map(|s| Box::new(self.check_stmt(ctx, s)));
                let body = self.check_block(ctx, &f.body);
                ctx.pop();
                hir::Stmt::For { init, cond, step, body }
            },
            ast::Stmt::Return(r) => {
                let value = r.value.as_ref().map(|e| {
                    let mut checked = self.check_expr(ctx, e);
                    coerce_null(&mut checked, &ctx.ret);
                    checked
                });
                match &value {
                    Some(_) if ctx.ret.is_void() => {
                        self.handler
                            .build_error(r.span, "void function returns a value")
                            .code(DiagnosticCode::TYPE_VOID_RETURNS_VALUE)
                            .emit(self.handler);
                    },
                    Some(v) => self.expect_assignable(v, &ctx.ret, r.span, "return value"),
                    None if !ctx.ret.is_void() => {
                        self.handler
                            .build_error(r.span, format!("expected a return value of type `{}`", ctx.ret))
                            .code(DiagnosticCode::TYPE_INCOMPATIBLE_ASSIGN)
                            .emit(self.handler);
                    },
                    None => {},
                }
                hir::Stmt::Return(value)
            },
            ast::Stmt::Block(b) => hir::Stmt::Block(self.check_block(ctx, b)),
        }
    }

    fn check_else(&self, ctx: &mut FnCtx, branch: &ast::ElseBranch) -> hir::ElseBranch {
        match branch {
            ast::ElseBranch::Block(b) => hir::ElseBranch::Block(self.check_block(ctx, b)),
            ast::ElseBranch::If(i) => hir::ElseBranch::If(self.check_stmt(ctx, &ast::Stmt::If(i.clone()))),
        }
    }

    fn check_expr(&self, ctx: &mut FnCtx, expr: &ast::Expr) -> hir::Expr {
        match expr {
            ast::Expr::IntLiteral(v, s) => hir::Expr::IntLiteral(*v, *s),
            ast::Expr::FloatLiteral(v, s) => hir::Expr::FloatLiteral(*v, *s),
            ast::Expr::StringLiteral(v, s) => hir::Expr::StringLiteral(*v, *s),
            ast::Expr::BoolLiteral(v, s) => hir::Expr::BoolLiteral(*v, *s),
            ast::Expr::Null(s) => hir::Expr::Null { ty: Type::Null, span: *s },
            ast::Expr::Var(name, s) => self.check_var(ctx, *name, *s),
            ast::Expr::Field { receiver, name, span } => self.check_field(ctx, receiver, *name, *span),
            ast::Expr::Index { receiver, index, span } => self.check_index(ctx, receiver, index, *span),
            ast::Expr::Call { callee, args, span } => self.check_call(ctx, *callee, args, *span),
            ast::Expr::MethodCall { receiver, method, args, span } => {
                self.check_method_call(ctx, receiver, *method, args, *span)
            },
            ast::Expr::Binary { op, left, right, span } => self.check_binary(ctx, *op, left, right, *span),
            ast::Expr::Unary { op, operand, span } => self.check_unary(ctx, *op, operand, *span),
            ast::Expr::Assign { target, value, span } => {
                let target = Box::new(self.check_expr(ctx, target));
                let mut value = Box::new(self.check_expr(ctx, value));
                coerce_null(&mut value, &target.ty());
                self.expect_assignable(&value, &target.ty(), *span, "assignment");
                let ty = target.ty();
                hir::Expr::Assign { target, value, ty, span: *span }
            },
            ast::Expr::NewObject { class, args, span } => self.check_new_object(ctx, *class, args, *span),
            ast::Expr::NewArray { elem_ty, size, span } => {
                let elem = self.resolve_local_type(elem_ty);
                let size = Box::new(self.check_expr(ctx, size));
                if size.ty() != Type::Primitive(Primitive::Int) && !matches!(size.ty(), Type::Error) {
                    self.handler
                        .build_error(*span, "array size must be an int")
                        .code(DiagnosticCode::TYPE_BAD_OPERAND)
                        .emit(self.handler);
                }
                let ty = Type::Array(Box::new(elem.clone()));
                hir::Expr::NewArray { elem_ty: elem, size, ty, span: *span }
            },
            ast::Expr::Cast { target_ty, operand, span } => {
                let target_ty = self.resolve_local_type(target_ty);
                let operand = Box::new(self.check_expr(ctx, operand));
                hir::Expr::Cast { target_ty, operand, span: *span }
            },
        }
    }

    fn check_var(&self, ctx: &FnCtx, name: Symbol, span: Span) -> hir::Expr {
        if let Some(ty) = ctx.lookup(name) {
            return hir::Expr::Var { name, ty, span };
        }
        if let Some(receiver) = ctx.receiver {
            if let Some(field) = self.arena[receiver].field(name) {
                return hir::Expr::Var { name, ty: field.ty.clone(), span };
            }
        }
        if let Some(candidates) = self.function_index.get(&name) {
            if candidates.len() == 1 {
                let f = &self.functions[candidates[0]];
                let ty = Type::Function(f.params.clone(), Box::new(f.ret.clone()));
                return hir::Expr::FuncRef { name, ty, span };
            }
            self.handler
                .build_error(span, format!("`{name}` names an overloaded function; give it arguments to disambiguate"))
                .code(DiagnosticCode::TYPE_AMBIGUOUS_OVERLOAD)
                .emit(self.handler);
            return hir::Expr::Var { name, ty: Type::Error, span };
        }
        self.handler
            .build_error(span, format!("undefined name `{name}`"))
            .code(DiagnosticCode::TYPE_UNDEFINED_NAME)
            .emit(self.handler);
        hir::Expr::Var { name, ty: Type::Error, span }
    }

    fn check_field(&self, ctx: &mut FnCtx, receiver: &ast::Expr, name: Symbol, span: Span) -> hir::Expr {
        let receiver = Box::new(self.check_expr(ctx, receiver));
        match receiver.ty() {
            Type::Class(id) => {
                if let Some(field) = self.arena[id].field(name) {
                    let ty = field.ty.clone();
                    hir::Expr::FieldAccess { receiver, field: name, ty, span }
                } else {
                    self.handler
                        .build_error(span, format!("`{}` has no field named `{name}`", self.arena[id].name))
                        .code(DiagnosticCode::TYPE_UNDEFINED_NAME)
                        .emit(self.handler);
                    hir::Expr::FieldAccess { receiver, field: name, ty: Type::Error, span }
                }
            },
            Type::Array(_) if name == Symbol::intern("length") => hir::Expr::ArrayLength { receiver, span },
            Type::Error => hir::Expr::FieldAccess { receiver, field: name, ty: Type::Error, span },
            other => {
                self.handler
                    .build_error(span, format!("`{other}` has no field named `{name}`"))
                    .code(DiagnosticCode::TYPE_BAD_OPERAND)
                    .emit(self.handler);
                hir::Expr::FieldAccess { receiver, field: name, ty: Type::Error, span }
            },
        }
    }

    fn check_index(&self, ctx: &mut FnCtx, receiver: &ast::Expr, index: &ast::Expr, span: Span) -> hir::Expr {
        let receiver = Box::new(self.check_expr(ctx, receiver));
        let index = Box::new(self.check_expr(ctx, index));
        if index.ty() != Type::Primitive(Primitive::Int) && !matches!(index.ty(), Type::Error) {
            self.handler
                .build_error(span, "array index must be an int")
                .code(DiagnosticCode::TYPE_BAD_OPERAND)
                .emit(self.handler);
        }
        let ty = match receiver.ty() {
            Type::Array(elem) => *elem,
            Type::Error => Type::Error,
            other => {
                self.handler
                    .build_error(span, format!("cannot index into `{other}`"))
                    .code(DiagnosticCode::TYPE_BAD_OPERAND)
                    .emit(self.handler);
                Type::Error
            },
        };
        hir::Expr::Index { receiver, index, ty, span }
    }

    fn check_call(&self, ctx: &mut FnCtx, callee: Symbol, args: &[ast::Expr], span: Span) -> hir::Expr {
        // A local variable or parameter shadows a free function of the same
        // name (§4.5: ordinary lexical scoping).
        if let Some(var_ty) = ctx.lookup(callee) {
            return self.check_function_value_call(callee, var_ty, ctx, args, span);
        }

        let mut checked_args: Vec<hir::Expr> = args.iter().map(|a| self.check_expr(ctx, a)).collect();
        let arg_types: Vec<Type> = checked_args.iter().map(|a| a.ty()).collect();

        let Some(candidates) = self.function_index.get(&callee) else {
            self.handler
                .build_error(span, format!("undefined function `{callee}`"))
                .code(DiagnosticCode::TYPE_UNDEFINED_NAME)
                .emit(self.handler);
            return hir::Expr::Call { callee, args: checked_args, ty: Type::Error, span };
        };

        let param_lists: Vec<&[Type]> = candidates.iter().map(|&i| self.functions[i].params.as_slice()).collect();
        match pick_overload(&param_lists, &arg_types) {
            OverloadResult::Match(i) => {
                let f = &self.functions[candidates[i]];
                for (arg, param_ty) in checked_args.iter_mut().zip(&f.params) {
                    coerce_null(arg, param_ty);
                }
                hir::Expr::Call { callee, args: checked_args, ty: f.ret.clone(), span }
            },
            OverloadResult::Ambiguous => {
                self.handler
                    .build_error(span, format!("call to `{callee}` is ambiguous"))
                    .code(DiagnosticCode::TYPE_AMBIGUOUS_OVERLOAD)
                    .emit(self.handler);
                hir::Expr::Call { callee, args: checked_args, ty: Type::Error, span }
            },
            OverloadResult::WrongArgCount => {
                self.handler
                    .build_error(span, format!("`{callee}` does not take {} argument(s)", args.len()))
                    .code(DiagnosticCode::TYPE_WRONG_ARG_COUNT)
                    .emit(self.handler);
                hir::Expr::Call { callee, args: checked_args, ty: Type::Error, span }
            },
            OverloadResult::NoMatch => {
                self.handler
                    .build_error(span, format!("no overload of `{callee}` accepts these argument types"))
                    .code(DiagnosticCode::TYPE_NO_MATCHING_OVERLOAD)
                    .emit(self.handler);
                hir::Expr::Call { callee, args: checked_args, ty: Type::Error, span }
            },
        }
    }

    /// `f(args)` where `f` names a local/parameter of function type rather
    /// than a free function (§3: "first-class function types").
    fn check_function_value_call(
        &self,
        callee: Symbol,
        var_ty: Type,
        ctx: &mut FnCtx,
        args: &[ast::Expr],
        span: Span,
    ) -> hir::Expr {
        let mut checked_args: Vec<hir::Expr> = args.iter().map(|a| self.check_expr(ctx, a)).collect();
        match var_ty {
            Type::Function(params, ret) => {
                if params.len() != args.len() {
                    self.handler
                        .build_error(span, format!("`{callee}` does not take {} argument(s)", args.len()))
                        .code(DiagnosticCode::TYPE_WRONG_ARG_COUNT)
                        .emit(self.handler);
                    return hir::Expr::Call { callee, args: checked_args, ty: Type::Error, span };
                }
                for (arg, param_ty) in checked_args.iter_mut().zip(&params) {
                    coerce_null(arg, param_ty);
                    if !is_assignable(&arg.ty(), param_ty) {
                        self.handler
                            .build_error(arg.span(), format!("expected `{param_ty}`, found `{}`", arg.ty()))
                            .code(DiagnosticCode::TYPE_INCOMPATIBLE_ASSIGN)
                            .emit(self.handler);
                    }
                }
                hir::Expr::Call { callee, args: checked_args, ty: *ret, span }
            },
            Type::Error => hir::Expr::Call { callee, args: checked_args, ty: Type::Error, span },
            other => {
                self.handler
                    .build_error(span, format!("`{other}` is not callable"))
                    .code(DiagnosticCode::TYPE_BAD_OPERAND)
                    .emit(self.handler);
                hir::Expr::Call { callee, args: checked_args, ty: Type::Error, span }
            },
        }
    }

    fn check_method_call(
        &self,
        ctx: &mut FnCtx,
        receiver: &ast::Expr,
        method: Symbol,
        args: &[ast::Expr],
        span: Span,
    ) -> hir::Expr {
        let receiver = Box::new(self.check_expr(ctx, receiver));
        let mut checked_args: Vec<hir::Expr> = args.iter().map(|a| self.check_expr(ctx, a)).collect();
        let arg_types: Vec<Type> = checked_args.iter().map(|a| a.ty()).collect();

        let id = match receiver.ty() {
            Type::Class(id) => id,
            Type::Error => return hir::Expr::MethodCall { receiver, method, args: checked_args, ty: Type::Error, span },
            other => {
                self.handler
                    .build_error(span, format!("`{other}` has no method named `{method}`"))
                    .code(DiagnosticCode::TYPE_BAD_OPERAND)
                    .emit(self.handler);
                return hir::Expr::MethodCall { receiver, method, args: checked_args, ty: Type::Error, span };
            },
        };

        let candidates: Vec<&crate::types::MethodSig> = self.arena[id].methods_named(method).collect();
        if candidates.is_empty() {
            self.handler
                .build_error(span, format!("`{}` has no method named `{method}`", self.arena[id].name))
                .code(DiagnosticCode::TYPE_UNDEFINED_NAME)
                .emit(self.handler);
            return hir::Expr::MethodCall { receiver, method, args: checked_args, ty: Type::Error, span };
        }

        let param_lists: Vec<&[Type]> = candidates.iter().map(|m| m.params.as_slice()).collect();
        match pick_overload(&param_lists, &arg_types) {
            OverloadResult::Match(i) => {
                let m = candidates[i];
                for (arg, param_ty) in checked_args.iter_mut().zip(&m.params) {
                    coerce_null(arg, param_ty);
                }
                hir::Expr::MethodCall { receiver, method, args: checked_args, ty: m.ret.clone(), span }
            },
            OverloadResult::Ambiguous => {
                self.handler
                    .build_error(span, format!("call to `{method}` is ambiguous"))
                    .code(DiagnosticCode::TYPE_AMBIGUOUS_OVERLOAD)
                    .emit(self.handler);
                hir::Expr::MethodCall { receiver, method, args: checked_args, ty: Type::Error, span }
            },
            OverloadResult::WrongArgCount => {
                self.handler
                    .build_error(span, format!("`{method}` does not take {} argument(s)", args.len()))
                    .code(DiagnosticCode::TYPE_WRONG_ARG_COUNT)
                    .emit(self.handler);
                hir::Expr::MethodCall { receiver, method, args: checked_args, ty: Type::Error, span }
            },
            OverloadResult::NoMatch => {
                self.handler
                    .build_error(span, format!("no overload of `{method}` accepts these argument types"))
                    .code(DiagnosticCode::TYPE_NO_MATCHING_OVERLOAD)
                    .emit(self.handler);
                hir::Expr::MethodCall { receiver, method, args: checked_args, ty: Type::Error, span }
            },
        }
    }

    fn check_new_object(&self, ctx: &mut FnCtx, class: Symbol, args: &[ast::Expr], span: Span) -> hir::Expr {
        let Some(id) = self.arena.iter_enumerated().find(|(_, c)| c.name == class).map(|(id, _)| id) else {
            self.handler
                .build_error(span, format!("unknown class `{class}`"))
                .code(DiagnosticCode::TYPE_UNKNOWN)
                .emit(self.handler);
            let args = args.iter().map(|a| self.check_expr(ctx, a)).collect();
            return hir::Expr::NewObject { class: DefId::DUMMY, args, ty: Type::Error, span };
        };

        let mut checked_args: Vec<hir::Expr> = args.iter().map(|a| self.check_expr(ctx, a)).collect();
        let field_types: Vec<Type> = self.arena[id].fields.iter().map(|f| f.ty.clone()).collect();

        // uC has no declared constructors (§3): `new C()` default-constructs
        // every field, `new C(v1, v2, ...)` assigns positionally to the
        // declared + inherited field list in order.
        if !checked_args.is_empty() {
            if checked_args.len() != field_types.len() {
                self.handler
                    .build_error(span, format!("`{class}` has {} field(s), found {} constructor argument(s)", field_types.len(), checked_args.len()))
                    .code(DiagnosticCode::TYPE_WRONG_ARG_COUNT)
                    .emit(self.handler);
            } else {
                for (arg, field_ty) in checked_args.iter_mut().zip(&field_types) {
                    coerce_null(arg, field_ty);
                    if !is_assignable(&arg.ty(), field_ty) {
                        self.handler
                            .build_error(arg.span(), format!("expected `{field_ty}`, found `{}`", arg.ty()))
                            .code(DiagnosticCode::TYPE_INCOMPATIBLE_ASSIGN)
                            .emit(self.handler);
                    }
                }
            }
        }

        hir::Expr::NewObject { class: id, args: checked_args, ty: Type::Class(id), span }
    }

    fn check_binary(&self, ctx: &mut FnCtx, op: ast::BinOp, left: &ast::Expr, right: &ast::Expr, span: Span) -> hir::Expr {
        let mut left = Box::new(self.check_expr(ctx, left));
        let mut right = Box::new(self.check_expr(ctx, right));

        let hir_op = to_hir_binop(op);
        match op {
            ast::BinOp::Add => {
                let (ty, add_kind) = self.check_add(&left, &right, span);
                hir::Expr::Binary { op: hir_op, left, right, add_kind: Some(add_kind), ty, span }
            },
            ast::BinOp::Sub | ast::BinOp::Mul | ast::BinOp::Div | ast::BinOp::Mod => {
                let ty = self.check_numeric(&left, &right, span);
                hir::Expr::Binary { op: hir_op, left, right, add_kind: None, ty, span }
            },
            ast::BinOp::Lt | ast::BinOp::Le | ast::BinOp::Gt | ast::BinOp::Ge => {
                self.check_relational(&left, &right, span);
                hir::Expr::Binary { op: hir_op, left, right, add_kind: None, ty: Type::Primitive(Primitive::Boolean), span }
            },
            ast::BinOp::Eq | ast::BinOp::Ne => {
                coerce_null(&mut left, &right.ty());
                coerce_null(&mut right, &left.ty());
                self.check_equatable(&left, &right, span);
                hir::Expr::Binary { op: hir_op, left, right, add_kind: None, ty: Type::Primitive(Primitive::Boolean), span }
            },
            ast::BinOp::And | ast::BinOp::Or => {
                self.expect_boolean(&left, span);
                self.expect_boolean(&right, span);
                hir::Expr::Binary { op: hir_op, left, right, add_kind: None, ty: Type::Primitive(Primitive::Boolean), span }
            },
        }
    }

    /// `+` is overloaded (§4.5): numeric on both numeric operands, string
    /// concatenation if either operand is a string (or boolean, which always
    /// converts to its string form when paired with a string).
    fn check_add(&self, left: &hir::Expr, right: &hir::Expr, span: Span) -> (Type, hir::AddKind) {
        let (lt, rt) = (left.ty(), right.ty());
        if lt.is_numeric() && rt.is_numeric() {
            return (numeric_promotion(&lt, &rt), hir::AddKind::Numeric);
        }
        if (lt.is_string() || lt.is_boolean()) && (rt.is_string() || rt.is_boolean()) && (lt.is_string() || rt.is_string()) {
            return (Type::Primitive(Primitive::String), hir::AddKind::Concat);
        }
        if matches!(lt, Type::Error) || matches!(rt, Type::Error) {
            return (Type::Error, hir::AddKind::Numeric);
        }
        self.handler
            .build_error(span, format!("cannot apply `+` to `{lt}` and `{rt}`"))
            .code(DiagnosticCode::TYPE_BAD_OPERAND)
            .emit(self.handler);
        (Type::Error, hir::AddKind::Numeric)
    }

    fn check_numeric(&self, left: &hir::Expr, right: &hir::Expr, span: Span) -> Type {
        let (lt, rt) = (left.ty(), right.ty());
        if lt.is_numeric() && rt.is_numeric() {
            return numeric_promotion(&lt, &rt);
        }
        if matches!(lt, Type::Error) || matches!(rt, Type::Error) {
            return Type::Error;
        }
        self.handler
            .build_error(span, format!("expected numeric operands, found `{lt}` and `{rt}`"))
            .code(DiagnosticCode::TYPE_BAD_OPERAND)
            .emit(self.handler);
        Type::Error
    }

    /// `< <= > >=` (§4.5 Relational): both operands numeric, or both
    /// `string` (lexicographic comparison, left to the runtime's `<`
    /// overload) - not just the numeric case `check_numeric` covers.
    fn check_relational(&self, left: &hir::Expr, right: &hir::Expr, span: Span) -> Type {
        let (lt, rt) = (left.ty(), right.ty());
        if lt.is_string() && rt.is_string() {
            return Type::Primitive(Primitive::Boolean);
        }
        self.check_numeric(left, right, span)
    }

    /// `==`/`!=` (§4.5 Equality): both operands numeric, both `string`, both
    /// `boolean`, both arrays of the same element type, both the same
    /// class, or two classes with a common ancestor (including identical) -
    /// the backend lowers that last case to `uc_id` identity rather than the
    /// generated `operator==`, since a common-but-not-identical ancestor can
    /// never be the same dynamic class under this backend's design.
    fn check_equatable(&self, left: &hir::Expr, right: &hir::Expr, span: Span) {
        let (lt, rt) = (left.ty(), right.ty());
        if matches!(lt, Type::Error) || matches!(rt, Type::Error) {
            return;
        }
        if is_assignable(&lt, &rt) || is_assignable(&rt, &lt) {
            return;
        }
        if let (Type::Class(a), Type::Class(b)) = (&lt, &rt) {
            if self.share_ancestry(*a, *b) {
                return;
            }
        }
        self.handler
            .build_error(span, format!("cannot compare `{lt}` with `{rt}`"))
            .code(DiagnosticCode::TYPE_BAD_OPERAND)
            .emit(self.handler);
    }

    /// Whether `a` and `b` are the same class or share any ancestor -
    /// `is_or_descends_from` alone only covers one being a direct ancestor
    /// of the other, which misses siblings under a common base class.
    fn share_ancestry(&self, a: DefId, b: DefId) -> bool {
        if a == b {
            return true;
        }
        self.arena[a].is_or_descends_from(b, a) || self.arena[b].is_or_descends_from(a, b) || self.arena[a].ancestors.iter().any(|anc| self.arena[b].is_or_descends_from(*anc, b))
    }

    fn check_unary(&self, ctx: &mut FnCtx, op: ast::UnOp, operand: &ast::Expr, span: Span) -> hir::Expr {
        let operand = Box::new(self.check_expr(ctx, operand));
        let ty = match op {
            ast::UnOp::Neg if operand.ty().is_numeric() => operand.ty(),
            ast::UnOp::Not if operand.ty().is_boolean() => Type::Primitive(Primitive::Boolean),
            _ if matches!(operand.ty(), Type::Error) => Type::Error,
            _ => {
                self.handler
                    .build_error(span, format!("cannot apply unary operator to `{}`", operand.ty()))
                    .code(DiagnosticCode::TYPE_BAD_OPERAND)
                    .emit(self.handler);
                Type::Error
            },
        };
        hir::Expr::Unary { op: to_hir_unop(op), operand, ty, span }
    }

    fn expect_assignable(&self, value: &hir::Expr, target: &Type, span: Span, what: &str) {
        if matches!(value.ty(), Type::Error) {
            return;
        }
        if !is_assignable(&value.ty(), target) {
            self.handler
                .build_error(span, format!("{what}: expected `{target}`, found `{}`", value.ty()))
                .code(DiagnosticCode::TYPE_INCOMPATIBLE_ASSIGN)
                .emit(self.handler);
        }
    }

    fn expect_boolean(&self, expr: &hir::Expr, span: Span) {
        if matches!(expr.ty(), Type::Error) {
            return;
        }
        if !expr.ty().is_boolean() {
            self.handler
                .build_error(span, format!("expected a boolean condition, found `{}`", expr.ty()))
                .code(DiagnosticCode::TYPE_NON_BOOLEAN_CONDITION)
                .emit(self.handler);
        }
    }

    /// Resolves a syntactic type reference encountered inside a function body
    /// (a local declaration's type, a cast target, `new T[n]`'s element
    /// type). Pass B has already resolved every top-level-reachable type, so
    /// this performs the same lookup over the arena/typedef table without
    /// re-running cycle detection (§4.4 runs once, globally).
    fn resolve_local_type(&self, type_ref: &ast::TypeRef) -> Type {
        match type_ref {
            ast::TypeRef::Primitive(p) => Type::Primitive(resolve_primitive(*p)),
            ast::TypeRef::Array(elem) => Type::Array(Box::new(self.resolve_local_type(elem))),
            ast::TypeRef::Function(ret, params) => Type::Function(
                params.iter().map(|p| self.resolve_local_type(p)).collect(),
                Box::new(self.resolve_local_type(ret)),
            ),
            ast::TypeRef::Named(name) => {
                if let Some((id, _)) = self.arena.iter_enumerated().find(|(_, c)| c.name == *name) {
                    return Type::Class(id);
                }
                self.handler
                    .build_error(Span::DUMMY, format!("unknown type `{name}`"))
                    .code(DiagnosticCode::TYPE_UNKNOWN)
                    .emit(self.handler);
                Type::Error
            },
        }
    }
}

/// If `expr` is an unresolved `null` literal, binds it to `target` so the
/// backend can default-construct the concrete reference or array type
/// (§4.6). Leaves any other expression untouched.
fn coerce_null(expr: &mut hir::Expr, target: &Type) {
    if let hir::Expr::Null { ty, .. } = expr {
        if matches!(ty, Type::Null) && (target.is_class() || target.is_array()) {
            *ty = target.clone();
        }
    }
}

fn resolve_primitive(p: ast::PrimitiveTypeName) -> Primitive {
    match p {
        ast::PrimitiveTypeName::Int => Primitive::Int,
        ast::PrimitiveTypeName::Long => Primitive::Long,
        ast::PrimitiveTypeName::Float => Primitive::Float,
        ast::PrimitiveTypeName::Boolean => Primitive::Boolean,
        ast::PrimitiveTypeName::String => Primitive::String,
        ast::PrimitiveTypeName::Void => Primitive::Void,
    }
}

fn to_hir_binop(op: ast::BinOp) -> hir::BinOp {
    match op {
        ast::BinOp::Add => hir::BinOp::Add,
        ast::BinOp::Sub => hir::BinOp::Sub,
        ast::BinOp::Mul => hir::BinOp::Mul,
        ast::BinOp::Div => hir::BinOp::Div,
        ast::BinOp::Mod => hir::BinOp::Mod,
        ast::BinOp::Eq => hir::BinOp::Eq,
        ast::BinOp::Ne => hir::BinOp::Ne,
        ast::BinOp::Lt => hir::BinOp::Lt,
        ast::BinOp::Le => hir::BinOp::Le,
        ast::BinOp::Gt => hir::BinOp::Gt,
        ast::BinOp::Ge => hir::BinOp::Ge,
        ast::BinOp::And => hir::BinOp::And,
        ast::BinOp::Or => hir::BinOp::Or,
    }
}

fn to_hir_unop(op: ast::UnOp) -> hir::UnOp {
    match op {
        ast::UnOp::Neg => hir::UnOp::Neg,
        ast::UnOp::Not => hir::UnOp::Not,
    }
}

/// A block returns on every path iff its last statement does (§4.5: "a
/// block returns if its last statement returns; an if/else returns iff both
/// branches return; a loop body is never presumed to execute").
fn block_returns(block: &hir::Block) -> bool {
    block.stmts.last().is_some_and(stmt_returns)
}

fn stmt_returns(stmt: &hir::Stmt) -> bool {
    match stmt {
        hir::Stmt::Return(_) => true,
        hir::Stmt::Block(b) => block_returns(b),
        hir::Stmt::If { then_branch, else_branch: Some(else_branch), .. } => {
            block_returns(then_branch) && else_branch_returns(else_branch)
        },
        _ => false,
    }
}

fn else_branch_returns(branch: &hir::ElseBranch) -> bool {
    match branch {
        hir::ElseBranch::Block(b) => block_returns(b),
        hir::ElseBranch::If(s) => stmt_returns(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucc_util::Handler;

    fn parse_check(source: &str) -> (CheckedProgram, bool) {
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
        let collected = crate::collect::collect(&program, &handler);
        let resolved = crate::resolve::resolve(&collected, &handler);
        let checked = check(&resolved.arena, &resolved.functions, &handler);
        (checked, handler.has_errors())
    }

    #[test]
    fn well_typed_function_checks_clean() {
        let (_checked, errored) = parse_check("int add(int a, int b) { return a + b; }");
        assert!(!errored);
    }

    #[test]
    fn missing_return_on_one_path_is_an_error() {
        let (_checked, errored) = parse_check("int f(boolean b) { if (b) { return 1; } }");
        assert!(errored);
    }

    #[test]
    fn missing_return_is_fine_when_every_branch_returns() {
        let (_checked, errored) = parse_check("int f(boolean b) { if (b) { return 1; } else { return 2; } }");
        assert!(!errored);
    }

    #[test]
    fn assigning_incompatible_types_is_an_error() {
        let (_checked, errored) = parse_check("int f() { int x; x = \"hi\"; return x; }");
        assert!(errored);
    }

    #[test]
    fn int_widens_into_a_long_variable() {
        let (_checked, errored) = parse_check("long f() { long x; x = 1; return x; }");
        assert!(!errored);
    }

    #[test]
    fn string_plus_boolean_is_concatenation() {
        let (_checked, errored) = parse_check("string f() { string s; s = \"x\" + true; return s; }");
        assert!(!errored);
    }

    #[test]
    fn numeric_plus_numeric_is_addition() {
        let (_checked, errored) = parse_check("float f() { float x; x = 1 + 2.0; return x; }");
        assert!(!errored);
    }

    #[test]
    fn array_length_and_class_field_length_both_resolve() {
        let (_checked, errored) = parse_check(
            "class Box { int length; } int f(int[] a, Box b) { int x; x = a.length; int y; y = b.length; return x + y; }",
        );
        assert!(!errored);
    }

    #[test]
    fn non_boolean_condition_is_an_error() {
        let (_checked, errored) = parse_check("void f() { if (1) { } }");
        assert!(errored);
    }

    #[test]
    fn calling_an_undefined_function_is_an_error() {
        let (_checked, errored) = parse_check("void f() { ghost(); }");
        assert!(errored);
    }

    #[test]
    fn ambiguous_overload_is_an_error() {
        let (_checked, errored) = parse_check(
            "void f(int a, long b) { } void f(long a, int b) { } void g() { f(1, 2); }",
        );
        assert!(errored);
    }

    #[test]
    fn unique_overload_by_arg_count_resolves() {
        let (_checked, errored) = parse_check("void f(int a) { } void f(int a, int b) { } void g() { f(1); f(1, 2); }");
        assert!(!errored);
    }

    #[test]
    fn new_object_with_no_args_default_constructs() {
        let (_checked, errored) = parse_check("class C { int x; } C f() { C c; c = new C(); return c; }");
        assert!(!errored);
    }

    #[test]
    fn new_object_with_positional_args_checks_field_types() {
        let (_checked, errored) = parse_check("class C { int x; string s; } C f() { return new C(1, \"hi\"); }");
        assert!(!errored);
    }

    #[test]
    fn null_is_assignable_to_a_class_variable() {
        let (_checked, errored) = parse_check("class C { } C f() { C c; c = null; return c; }");
        assert!(!errored);
    }

    #[test]
    fn relational_comparison_accepts_two_strings() {
        let (_checked, errored) = parse_check("boolean f(string a, string b) { return a < b; }");
        assert!(!errored);
    }

    #[test]
    fn relational_comparison_rejects_a_string_and_a_number() {
        let (_checked, errored) = parse_check("boolean f(string a, int b) { return a < b; }");
        assert!(errored);
    }

    #[test]
    fn sibling_classes_with_a_common_ancestor_are_equatable() {
        let (_checked, errored) = parse_check("class A { } class B : A { } class C : A { } boolean cmp(B b, C c) { return b == c; }");
        assert!(!errored);
    }

    #[test]
    fn unrelated_classes_are_not_equatable() {
        let (_checked, errored) = parse_check("class A { } class Z { } boolean cmp(A a, Z z) { return a == z; }");
        assert!(errored);
    }
}
