//! Typed AST (§3, §9 Design Notes: "dynamic typing of expression-node
//! attributes"). Pass C re-expresses the untyped `ucc_par` tree as this HIR
//! rather than mutating it in place, so every expression node carries its
//! inferred [`Type`] in a field instead of a runtime-attached attribute -
//! the only intermediate representation this compiler has (§1 Non-goals).

use ucc_util::{Span, Symbol};

use crate::types::Type;

pub struct Program {
    pub classes: ucc_util::IndexVec<ucc_util::DefId, ClassBody>,
    pub functions: Vec<Function>,
}

/// The method bodies and field defaults declared directly on one class
/// (not its inherited ones - those live in the `ClassBody` of the owning
/// ancestor, looked up by `FieldInfo::owner`/`MethodSig::owner`), checked
/// against its (already-resolved) signature in the type arena.
pub struct ClassBody {
    pub fields: Vec<FieldDefault>,
    pub methods: Vec<Function>,
}

/// A declared field's type-checked default-value expression, if it has one
/// (§3 invariant: "field default-value expressions' declared types are
/// assignable to the field type").
pub struct FieldDefault {
    pub name: Symbol,
    pub default: Option<Expr>,
}

pub struct Function {
    pub name: Symbol,
    pub params: Vec<(Symbol, Type)>,
    pub ret: Type,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    VarDecl { name: Symbol, ty: Type, init: Option<Expr> },
    Assign { target: Expr, value: Expr },
    Expr(Expr),
    If { cond: Expr, then_branch: Block, else_branch: Option<Box<ElseBranch>> },
    While { cond: Expr, body: Block },
    For { init: Option<Box<Stmt>>, cond: Option<Expr>, step: Option<Box<Stmt>>, body: Block },
    Return(Option<Expr>),
    Block(Block),
}

#[derive(Debug, Clone)]
pub enum ElseBranch {
    Block(Block),
    If(Stmt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// The winning overload for `+` (§4.5, §4.6): the backend always lowers `+`
/// through `uc_add`, but records which shape was checked so a reviewer can
/// see the overload pass C picked without re-deriving it from the operand
/// types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddKind {
    Numeric,
    Concat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

/// A typed expression node. Every variant carries the `ty: Type` pass C
/// attached to it (§8 invariant 1: "every expression node in the post-pass-C
/// AST has a defined semantic type").
#[derive(Debug, Clone)]
pub enum Expr {
    IntLiteral(i64, Span),
    FloatLiteral(f64, Span),
    StringLiteral(Symbol, Span),
    BoolLiteral(bool, Span),
    Null { ty: Type, span: Span },
    Var { name: Symbol, ty: Type, span: Span },
    /// A free function named as a first-class value rather than called
    /// directly (§3: "first-class function types") - kept distinct from
    /// [`Expr::Var`] because the backend names a free function and a local
    /// binding through different macro wrappers (§4.6).
    FuncRef { name: Symbol, ty: Type, span: Span },
    /// A class field access, including `x.length` when the receiver class
    /// declares a field literally named `length` (§4.5: "the class field
    /// wins").
    FieldAccess { receiver: Box<Expr>, field: Symbol, ty: Type, span: Span },
    /// `a.length` where `a`'s static type is an array (§4.5, §4.6:
    /// `uc_length_field`).
    ArrayLength { receiver: Box<Expr>, span: Span },
    Index { receiver: Box<Expr>, index: Box<Expr>, ty: Type, span: Span },
    Call { callee: Symbol, args: Vec<Expr>, ty: Type, span: Span },
    MethodCall { receiver: Box<Expr>, method: Symbol, args: Vec<Expr>, ty: Type, span: Span },
    Binary { op: BinOp, left: Box<Expr>, right: Box<Expr>, add_kind: Option<AddKind>, ty: Type, span: Span },
    Unary { op: UnOp, operand: Box<Expr>, ty: Type, span: Span },
    Assign { target: Box<Expr>, value: Box<Expr>, ty: Type, span: Span },
    NewObject { class: ucc_util::DefId, args: Vec<Expr>, ty: Type, span: Span },
    NewArray { elem_ty: Type, size: Box<Expr>, ty: Type, span: Span },
    Cast { target_ty: Type, operand: Box<Expr>, span: Span },
}

impl Expr {
    pub fn ty(&self) -> Type {
        match self {
            Expr::IntLiteral(..) => Type::Primitive(crate::types::Primitive::Int),
            Expr::FloatLiteral(..) => Type::Primitive(crate::types::Primitive::Float),
            Expr::StringLiteral(..) => Type::Primitive(crate::types::Primitive::String),
            Expr::BoolLiteral(..) => Type::Primitive(crate::types::Primitive::Boolean),
            Expr::Null { ty, .. }
            | Expr::Var { ty, .. }
            | Expr::FuncRef { ty, .. }
            | Expr::FieldAccess { ty, .. }
            | Expr::Index { ty, .. }
            | Expr::Call { ty, .. }
            | Expr::MethodCall { ty, .. }
            | Expr::Binary { ty, .. }
            | Expr::Unary { ty, .. }
            | Expr::Assign { ty, .. }
            | Expr::NewObject { ty, .. }
            | Expr::NewArray { ty, .. } => ty.clone(),
            Expr::ArrayLength { .. } => Type::Primitive(crate::types::Primitive::Int),
            Expr::Cast { target_ty, .. } => target_ty.clone(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Expr::IntLiteral(_, s) | Expr::FloatLiteral(_, s) | Expr::StringLiteral(_, s) | Expr::BoolLiteral(_, s) => *s,
            Expr::Null { span, .. }
            | Expr::Var { span, .. }
            | Expr::FuncRef { span, .. }
            | Expr::FieldAccess { span, .. }
            | Expr::ArrayLength { span, .. }
            | Expr::Index { span, .. }
            | Expr::Call { span, .. }
            | Expr::MethodCall { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Assign { span, .. }
            | Expr::NewObject { span, .. }
            | Expr::NewArray { span, .. }
            | Expr::Cast { span, .. } => *span,
        }
    }
}
