//! Typed host syntax tree.
//!
//! Every node owns its children. Expressions carry their resolved type and
//! (for identifiers and member selects) the resolved symbol.

mod expr;
mod operators;
mod stmt;

pub use expr::{Expr, ExprKind, ExprTag, Literal};
pub use operators::{BinaryOp, UnaryOp};
pub use stmt::{Stmt, StmtKind, VarDecl};

/// Precedence of the conditional operator `?:`.
pub const CONDITIONAL_PRECEDENCE: u8 = 13;

/// Precedence of assignment forms; the loosest level.
pub const ASSIGN_PRECEDENCE: u8 = 14;
