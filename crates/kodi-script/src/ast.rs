//! Abstract syntax tree for KodiScript.

/// A complete program: a sequence of statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `let name = value`
    Let { name: String, value: Expr },
    /// `target = value` where target is an identifier, member or index.
    Assign { target: Expr, value: Expr },
    /// A bare expression, usually a call.
    Expr(Expr),
    If(IfStmt),
    For(ForLoop),
    While(WhileLoop),
    /// `return` with an optional value.
    Return(Option<Expr>),
}

/// `if (cond) { ... } else { ... }`
///
/// `else if` chains nest an `If` as the sole statement of the else branch.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Vec<Stmt>,
    pub else_branch: Option<Vec<Stmt>>,
}

/// `for (item in items) { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub variable: String,
    pub iterable: Expr,
    pub body: Vec<Stmt>,
}

/// `while (cond) { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileLoop {
    pub condition: Expr,
    pub body: Vec<Stmt>,
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Ident(String),
    Array(Vec<Expr>),
    /// `{ key: value, ... }` with identifier or string keys.
    Object(Vec<(String, Expr)>),
    /// `fn(a, b) { ... }`
    Function { params: Vec<String>, body: Vec<Stmt> },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    /// `cond ? then : otherwise`
    Ternary {
        condition: Box<Expr>,
        then_value: Box<Expr>,
        else_value: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `object.property`, or `object?.property` when `optional`.
    Member {
        object: Box<Expr>,
        property: String,
        optional: bool,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `!x` or `not x`
    Not,
    /// `-x`
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    /// `&&` or `and`
    And,
    /// `||` or `or`
    Or,
    /// `??`
    Coalesce,
    /// `?:`
    Elvis,
}
