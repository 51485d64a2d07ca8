//! Untyped AST node definitions (§3, §4.2).

use ucc_util::{Span, Symbol};

/// A whole compilation unit: an ordered list of top-level declarations, in
/// source order (§4.6 emission preserves this order; forward references
/// among them are legal, §4.3).
pub type Program = Vec<TopLevelDecl>;

#[derive(Debug, Clone)]
pub enum TopLevelDecl {
    Typedef(TypedefDecl),
    Class(ClassDecl),
    Function(FunctionDecl),
}

#[derive(Debug, Clone)]
pub struct TypedefDecl {
    pub name: Symbol,
    pub aliased: TypeRef,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: Symbol,
    pub superclass: Option<Symbol>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<FunctionDecl>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: Symbol,
    pub ty: TypeRef,
    pub default: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: Symbol,
    pub params: Vec<Param>,
    pub ret_type: TypeRef,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: Symbol,
    pub ty: TypeRef,
}

/// A syntactic type reference, as written by the programmer (§4.2). Resolved
/// to a semantic type by `ucc-sem`'s type resolver (pass B).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Primitive(PrimitiveTypeName),
    Named(Symbol),
    Array(Box<TypeRef>),
    /// `R(P1, P2, ...)` - a function-type annotation (§4.4).
    Function(Box<TypeRef>, Vec<TypeRef>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTypeName {
    Int,
    Long,
    Float,
    Boolean,
    String,
    Void,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    VarDecl(VarDeclStmt),
    Assign(AssignStmt),
    Expr(Expr),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Return(ReturnStmt),
    Block(Block),
}

#[derive(Debug, Clone)]
pub struct VarDeclStmt {
    pub name: Symbol,
    pub ty: TypeRef,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct AssignStmt {
    pub target: Expr,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_branch: Block,
    pub else_branch: Option<Box<ElseBranch>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ElseBranch {
    Block(Block),
    If(IfStmt),
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub step: Option<Box<Stmt>>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// An untyped expression node (§3). `ucc-sem`'s type checker (pass C)
/// re-expresses each of these as a typed node in its own HIR rather than
/// mutating this tree in place - see `ucc_sem::hir`.
#[derive(Debug, Clone)]
pub enum Expr {
    IntLiteral(i64, Span),
    FloatLiteral(f64, Span),
    StringLiteral(Symbol, Span),
    BoolLiteral(bool, Span),
    Null(Span),
    Var(Symbol, Span),
    Field {
        receiver: Box<Expr>,
        name: Symbol,
        span: Span,
    },
    Index {
        receiver: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },
    Call {
        callee: Symbol,
        args: Vec<Expr>,
        span: Span,
    },
    MethodCall {
        receiver: Box<Expr>,
        method: Symbol,
        args: Vec<Expr>,
        span: Span,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
        span: Span,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
        span: Span,
    },
    /// `new C(args)` (§4.5).
    NewObject {
        class: Symbol,
        args: Vec<Expr>,
        span: Span,
    },
    /// `new T[n]` (§4.5).
    NewArray {
        elem_ty: TypeRef,
        size: Box<Expr>,
        span: Span,
    },
    /// `(T) expr` - a C-style cast (§3 lists "cast" as a node shape; the
    /// surface syntax is this crate's own choice, documented in DESIGN.md).
    Cast {
        target_ty: TypeRef,
        operand: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::IntLiteral(_, s)
            | Expr::FloatLiteral(_, s)
            | Expr::StringLiteral(_, s)
            | Expr::BoolLiteral(_, s)
            | Expr::Null(s)
            | Expr::Var(_, s) => *s,
            Expr::Field { span, .. }
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}
