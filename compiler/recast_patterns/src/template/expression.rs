use recast_ir::printer::render_expr_in;
use recast_ir::{Expr, TextEdit};

use super::TemplateInfo;
use crate::bindings::Bindings;
use crate::fix::Fix;
use crate::imports::ImportPolicy;
use crate::inliner::Inliner;
use crate::tree::UExpr;
use crate::types::UType;
use crate::unifier::Unifier;
use crate::{InlineError, MatchContext, RuleError};

/// A template whose pattern is a single expression.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpressionTemplate {
    pub info: TemplateInfo,
    pub expr: UExpr,
    pub result_type: UType,
}

impl ExpressionTemplate {
    /// With `also_reverse_ternary`, a conditional pattern `c ? a : b` also
    /// matches `!c ? b : a`.
    pub fn new(info: TemplateInfo, expr: UExpr, result_type: UType) -> Self {
        let expr = match expr {
            UExpr::Conditional {
                cond,
                then_expr,
                else_expr,
            } if info.annotations.also_reverse_ternary => {
                let reversed =
                    UExpr::conditional(cond.negate(), (*else_expr).clone(), (*then_expr).clone());
                let original = UExpr::Conditional {
                    cond,
                    then_expr,
                    else_expr,
                };
                UExpr::any_of(vec![original, reversed])
            }
            expr => expr,
        };
        ExpressionTemplate {
            info,
            expr,
            result_type,
        }
    }

    /// Structural match only; see [`match_expr`](Self::match_expr).
    pub fn unify<'t>(&self, target: &'t Expr, unifier: Unifier<'t>) -> Option<Unifier<'t>> {
        self.expr.unify_expr(target, unifier)
    }

    /// Match `target` with a fresh unifier: structure, then comments, then
    /// types.
    pub fn match_expr<'t>(&self, target: &'t Expr, ctx: MatchContext<'t>) -> Option<Unifier<'t>> {
        let unifier = self.unify(target, Unifier::new(ctx))?;
        if ctx.unit.has_comment_within(target.span) {
            tracing::trace!(span = %target.span, "rejecting match containing a comment");
            return None;
        }
        self.info.typecheck(unifier, Some((&self.result_type, &target.ty)))
    }

    /// The fix replacing `target` with this template inlined under
    /// `bindings`. `max_precedence` is the loosest precedence the slot
    /// `target` occupies can hold without parentheses.
    pub fn replace<'t>(
        &self,
        target: &Expr,
        bindings: &Bindings<'t>,
        ctx: MatchContext<'t>,
        policy: ImportPolicy,
        max_precedence: u8,
    ) -> Result<Fix, InlineError> {
        let mut inliner = Inliner::new(ctx, bindings, policy);
        let replacement = self.expr.inline(&mut inliner)?;
        let text = render_expr_in(&replacement, &ctx.unit.source, max_precedence);
        let (imports, static_imports) = inliner.into_imports();
        let edits = vec![TextEdit::replace(target.span, text)];
        Ok(Fix::new(edits).with_imports(imports, static_imports))
    }

    /// The same template with its expression negated.
    pub fn negation(&self) -> Result<ExpressionTemplate, RuleError> {
        if !self.result_type.is_boolean() {
            return Err(RuleError::NonBooleanNegation(format!("{:?}", self.result_type)));
        }
        let mut info = self.info.clone();
        info.annotations.also_negation = false;
        Ok(ExpressionTemplate {
            info,
            expr: self.expr.negate(),
            result_type: self.result_type.clone(),
        })
    }
}
