//! Boolean negation of expression patterns.

use recast_ir::{Literal, UnaryOp};

use super::UExpr;

impl UExpr {
    /// The logical negation of this pattern.
    ///
    /// Comparisons flip to their complement, `&&`/`||` (and `&`/`|`) go
    /// through De Morgan, `!e` becomes `e` and boolean literals flip.
    /// Anything else is wrapped in `!`.
    #[must_use]
    pub fn negate(&self) -> UExpr {
        match self {
            UExpr::Literal(Literal::Bool(value)) => UExpr::bool(!value),
            UExpr::Unary {
                op: UnaryOp::Not,
                operand,
            } => (**operand).clone(),
            UExpr::Binary { op, left, right } => match (op.complement(), op.de_morgan()) {
                (Some(complement), _) => UExpr::Binary {
                    op: complement,
                    left: left.clone(),
                    right: right.clone(),
                },
                (None, Some(dual)) => UExpr::binary(dual, left.negate(), right.negate()),
                (None, None) => UExpr::not(self.clone()),
            },
            UExpr::Parens(inner) => UExpr::parens(inner.negate()),
            UExpr::Conditional {
                cond,
                then_expr,
                else_expr,
            } => UExpr::conditional((**cond).clone(), then_expr.negate(), else_expr.negate()),
            _ => UExpr::not(self.clone()),
        }
    }
}
