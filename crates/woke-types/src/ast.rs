//! AST node types for WokeLang.
//!
//! Every node carries a [`Span`] for error reporting. The tree is owned
//! top-down: recursive positions are boxed and no node refers back to an
//! ancestor. Source order is preserved everywhere.

use crate::Span;
use serde::Serialize;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete program: top-level items in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub items: Vec<Item>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Item {
    Function(FunctionDecl),
    Gratitude(GratitudeBlock),
    Worker(WorkerDecl),
    Const(ConstDecl),
}

/// `[@emote] to name(params) [-> Type] { [hello ".."] stmts [goodbye ".."] }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDecl {
    pub emote: Option<EmoteTag>,
    pub name: Ident,
    pub params: Vec<Param>,
    pub return_type: Option<TypeAnnotation>,
    pub hello: Option<String>,
    pub body: Block,
    pub goodbye: Option<String>,
    pub span: Span,
}

/// A function parameter: `name` or `name: Type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: Ident,
    pub type_ann: Option<TypeAnnotation>,
    pub span: Span,
}

/// `thanks to { "contributor" → "contribution"; ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GratitudeBlock {
    pub entries: Vec<GratitudeEntry>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GratitudeEntry {
    pub contributor: String,
    pub contribution: String,
    pub span: Span,
}

/// Whether a background declaration was written as `worker` or `side quest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkerKind {
    Worker,
    SideQuest,
}

/// `worker name { ... }` or `side quest name { ... }`.
///
/// Only registered by name; the body is kept but never run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerDecl {
    pub kind: WorkerKind,
    pub name: Ident,
    pub body: Block,
    pub span: Span,
}

/// `const NAME [: Type] = expr;`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstDecl {
    pub name: Ident,
    pub type_ann: Option<TypeAnnotation>,
    pub value: Expr,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Identifiers & Emotes
// ══════════════════════════════════════════════════════════════════════════════

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// `@name` or `@name(key = expr, ...)`. Decorative only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmoteTag {
    pub name: Ident,
    pub params: Vec<EmoteParam>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmoteParam {
    pub name: Ident,
    pub value: Expr,
}

// ══════════════════════════════════════════════════════════════════════════════
// Type Annotations
// ══════════════════════════════════════════════════════════════════════════════

/// A type annotation. Recorded by the parser, never checked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeAnnotation {
    pub kind: TypeKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeKind {
    String,
    Int,
    Float,
    Bool,
    /// `[T]`
    Array(Box<TypeAnnotation>),
    /// `Maybe T`
    Maybe(Box<TypeAnnotation>),
    /// Any other identifier.
    Named(String),
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A braced statement list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StmtKind {
    /// `remember name = expr [measured in unit];`
    Remember {
        name: Ident,
        value: Expr,
        unit: Option<Ident>,
    },
    /// `name = expr;`
    Assign { name: Ident, value: Expr },
    /// `give back expr;`
    GiveBack(Expr),
    /// `when cond { ... } [otherwise { ... }]`
    When {
        condition: Expr,
        then_block: Block,
        otherwise_block: Option<Block>,
    },
    /// `repeat count times { ... }`
    Repeat { count: Expr, body: Block },
    /// `attempt safely { ... } or reassure "msg";`
    Attempt { body: Block, reassurance: String },
    /// `only if okay "permission" { ... }`
    Consent { permission: String, body: Block },
    /// `complain "msg";`
    Complain(String),
    /// `@emote stmt`
    Emote { tag: EmoteTag, stmt: Box<Stmt> },
    /// `spawn worker name;`
    Spawn(Ident),
    /// A bare expression followed by `;`.
    Expr(Expr),
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    IntLit(i64),
    FloatLit(f64),
    /// Raw contents between the quotes; escapes are left as written.
    StringLit(String),
    BoolLit(bool),
    Identifier(String),
    ArrayLit(Vec<Expr>),
    /// `name(args)`. `say expr;` is parsed into one of these too.
    Call { name: Ident, args: Vec<Expr> },
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// `expr measured in unit`
    Measured { value: Box<Expr>, unit: Ident },
    /// `thanks("contributor")`
    Thanks(String),
}

/// Binary operators, listed loosest-binding first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOp {
    Or,
    And,
    Eq,
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Or => "or",
            BinOp::And => "and",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Less => "<",
            BinOp::Greater => ">",
            BinOp::LessEq => "<=",
            BinOp::GreaterEq => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `not x`
    Not,
}
