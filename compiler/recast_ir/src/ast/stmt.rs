//! Statement nodes.

use super::Expr;
use crate::{Span, SymbolId};

/// Local variable declaration: `[final] ty name [= init]`.
///
/// Also used for method parameters and enhanced-for loop variables.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct VarDecl {
    pub name: String,
    /// Declared type, as type syntax.
    pub ty: Expr,
    pub init: Option<Expr>,
    pub sym: Option<SymbolId>,
    pub is_final: bool,
}

impl VarDecl {
    pub fn new(
        name: impl Into<String>,
        ty: Expr,
        init: Option<Expr>,
        sym: Option<SymbolId>,
    ) -> Self {
        VarDecl {
            name: name.into(),
            ty,
            init,
            sym,
            is_final: false,
        }
    }
}

/// Statement node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
    /// Line comments written directly above the statement, without the
    /// `//` marker.
    pub leading_comments: Vec<String>,
}

/// Statement variants.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum StmtKind {
    Block(Vec<Stmt>),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
    },
    /// `for (init; cond; update) body`; `init` holds variable declarations
    /// or expression statements.
    For {
        init: Vec<Stmt>,
        cond: Option<Expr>,
        update: Vec<Expr>,
        body: Box<Stmt>,
    },
    /// `for (var : iterable) body`
    ForEach {
        var: VarDecl,
        iterable: Expr,
        body: Box<Stmt>,
    },
    Return(Option<Expr>),
    Throw(Expr),
    Synchronized {
        lock: Expr,
        body: Box<Stmt>,
    },
    Expr(Expr),
    Empty,
    Var(VarDecl),
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Stmt {
            kind,
            span: Span::DUMMY,
            leading_comments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.leading_comments.push(comment.into());
        self
    }

    pub fn expr(expr: Expr) -> Self {
        Stmt::new(StmtKind::Expr(expr))
    }

    pub fn var(decl: VarDecl) -> Self {
        Stmt::new(StmtKind::Var(decl))
    }

    pub fn block(stmts: Vec<Stmt>) -> Self {
        Stmt::new(StmtKind::Block(stmts))
    }

    pub fn ret(value: Option<Expr>) -> Self {
        Stmt::new(StmtKind::Return(value))
    }

    /// Statements owned by a block, if this is one.
    pub fn as_block(&self) -> Option<&[Stmt]> {
        match &self.kind {
            StmtKind::Block(stmts) => Some(stmts),
            _ => None,
        }
    }
}
