//! Pattern trees.
//!
//! [`UExpr`], [`UStmt`] and [`UVarDecl`] mirror the host tree with
//! pattern variables in place of concrete subtrees. Each is a closed sum
//! type; matching (`unify`), rebuilding (`inline`) and negation are
//! exhaustive matches over it, one file per operation.

mod inline;
mod negate;
mod unify;

use recast_ir::{BinaryOp, ExprTag, Literal, PrimitiveKind, UnaryOp};

use crate::imports::top_level_class;
use crate::types::UType;

/// A reference to a class by qualified name.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct UClassIdent {
    pub qualified: String,
}

impl UClassIdent {
    pub fn new(qualified: impl Into<String>) -> Self {
        UClassIdent {
            qualified: qualified.into(),
        }
    }

    /// The outermost class enclosing this one (itself, for top-level
    /// classes).
    pub fn top_level(&self) -> &str {
        top_level_class(&self.qualified)
    }
}

/// Expression pattern.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum UExpr {
    Literal(Literal),

    /// Binds to any expression; re-encounters must print identically.
    FreeIdent(String),

    /// A local variable declared by the pattern itself.
    LocalVarIdent(String),

    /// A type parameter used as an expression (`T.class`, `E.valueOf`).
    TypeVarIdent(String),

    ClassIdent(UClassIdent),

    /// `Class.member`, however the target writes it.
    StaticIdent {
        class: UClassIdent,
        member: String,
        ty: UType,
    },

    Binary {
        op: BinaryOp,
        left: Box<UExpr>,
        right: Box<UExpr>,
    },

    Unary {
        op: UnaryOp,
        operand: Box<UExpr>,
    },

    Assign {
        target: Box<UExpr>,
        value: Box<UExpr>,
    },

    CompoundAssign {
        op: BinaryOp,
        target: Box<UExpr>,
        value: Box<UExpr>,
    },

    Conditional {
        cond: Box<UExpr>,
        then_expr: Box<UExpr>,
        else_expr: Box<UExpr>,
    },

    Cast {
        ty: Box<UExpr>,
        expr: Box<UExpr>,
    },

    InstanceOf {
        expr: Box<UExpr>,
        ty: Box<UExpr>,
    },

    MethodInvocation {
        callee: Box<UExpr>,
        args: Vec<UExpr>,
    },

    /// `receiver.name`, with the member's declared type.
    MemberSelect {
        receiver: Box<UExpr>,
        name: String,
        ty: UType,
    },

    ArrayAccess {
        array: Box<UExpr>,
        index: Box<UExpr>,
    },

    NewArray {
        elem_ty: Option<Box<UExpr>>,
        dims: Vec<UExpr>,
        init: Option<Vec<UExpr>>,
    },

    NewClass {
        class: Box<UExpr>,
        args: Vec<UExpr>,
    },

    /// Optional in the target.
    Parens(Box<UExpr>),

    PrimitiveType(PrimitiveKind),

    TypeApply {
        base: Box<UExpr>,
        args: Vec<UExpr>,
    },

    ArrayType(Box<UExpr>),

    /// Matches if any alternative matches; the first success wins.
    AnyOf(Vec<UExpr>),

    /// A variadic free identifier; only valid as the last element of an
    /// argument or initializer list.
    Repeated(String),

    /// Restricts the syntactic kinds the inner pattern may match.
    OfKind {
        expr: Box<UExpr>,
        allowed: Vec<ExprTag>,
    },
}

// ==========================================================================
// Constructors
// ==========================================================================

impl UExpr {
    pub fn free(name: impl Into<String>) -> Self {
        UExpr::FreeIdent(name.into())
    }

    pub fn local(name: impl Into<String>) -> Self {
        UExpr::LocalVarIdent(name.into())
    }

    pub fn type_var(name: impl Into<String>) -> Self {
        UExpr::TypeVarIdent(name.into())
    }

    pub fn repeated(name: impl Into<String>) -> Self {
        UExpr::Repeated(name.into())
    }

    pub fn class(qualified: impl Into<String>) -> Self {
        UExpr::ClassIdent(UClassIdent::new(qualified))
    }

    pub fn int(value: i32) -> Self {
        UExpr::Literal(Literal::Int(value))
    }

    pub fn bool(value: bool) -> Self {
        UExpr::Literal(Literal::Bool(value))
    }

    pub fn static_ident(class: impl Into<String>, member: impl Into<String>, ty: UType) -> Self {
        UExpr::StaticIdent {
            class: UClassIdent::new(class),
            member: member.into(),
            ty,
        }
    }

    pub fn binary(op: BinaryOp, left: UExpr, right: UExpr) -> Self {
        UExpr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: UExpr) -> Self {
        UExpr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn not(operand: UExpr) -> Self {
        UExpr::unary(UnaryOp::Not, operand)
    }

    pub fn conditional(cond: UExpr, then_expr: UExpr, else_expr: UExpr) -> Self {
        UExpr::Conditional {
            cond: Box::new(cond),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        }
    }

    pub fn call(callee: UExpr, args: Vec<UExpr>) -> Self {
        UExpr::MethodInvocation {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn select(receiver: UExpr, name: impl Into<String>, ty: UType) -> Self {
        UExpr::MemberSelect {
            receiver: Box::new(receiver),
            name: name.into(),
            ty,
        }
    }

    pub fn parens(inner: UExpr) -> Self {
        UExpr::Parens(Box::new(inner))
    }

    pub fn any_of(alternatives: Vec<UExpr>) -> Self {
        UExpr::AnyOf(alternatives)
    }

    pub fn of_kind(expr: UExpr, allowed: Vec<ExprTag>) -> Self {
        UExpr::OfKind {
            expr: Box::new(expr),
            allowed,
        }
    }
}

/// Variable declaration pattern. Binds the declared local under its
/// pattern name.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct UVarDecl {
    pub name: String,
    pub ty: UExpr,
    pub init: Option<UExpr>,
}

impl UVarDecl {
    pub fn new(name: impl Into<String>, ty: UExpr, init: Option<UExpr>) -> Self {
        UVarDecl {
            name: name.into(),
            ty,
            init,
        }
    }
}

/// Statement pattern.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum UStmt {
    Block(Vec<UStmt>),
    If {
        cond: UExpr,
        then_branch: Box<UStmt>,
        else_branch: Option<Box<UStmt>>,
    },
    While {
        cond: UExpr,
        body: Box<UStmt>,
    },
    DoWhile {
        body: Box<UStmt>,
        cond: UExpr,
    },
    For {
        init: Vec<UStmt>,
        cond: Option<UExpr>,
        update: Vec<UExpr>,
        body: Box<UStmt>,
    },
    ForEach {
        var: UVarDecl,
        iterable: UExpr,
        body: Box<UStmt>,
    },
    Return(Option<UExpr>),
    Throw(UExpr),
    Synchronized {
        lock: UExpr,
        body: Box<UStmt>,
    },
    Expr(UExpr),
    Empty,
    Var(UVarDecl),
}
