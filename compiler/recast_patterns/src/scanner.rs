//! Rule Scanner
//!
//! Walks a compilation unit and applies one rule everywhere it can.
//!
//! Expression rules are tried at every expression, outermost first. Once an
//! expression matches, nothing inside it is tried again, so the edits of a
//! single rule never overlap. Block rules are tried against every block's
//! statement list with the same greedy, left-to-right scan as
//! [`BlockTemplate::scan`](crate::template::BlockTemplate::scan), trying the
//! before-templates in order at each position.

use recast_ir::ast::{ASSIGN_PRECEDENCE, CONDITIONAL_PRECEDENCE};
use recast_ir::visitor::{walk_stmt, Visitor};
use recast_ir::{CompilationUnit, Expr, ExprKind, Span, Stmt, StmtKind};
use recast_types::ClassTable;

use crate::error::InlineError;
use crate::fix::Fix;
use crate::rule::RefasterRule;
use crate::template::{BlockMatch, Template};
use crate::MatchContext;

/// One place a rule matched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RuleMatch {
    /// Display name of the rule.
    pub rule: String,
    pub span: Span,
    /// `None` when the rule has no after-template or its replacement could
    /// not be built.
    pub fix: Option<Fix>,
}

impl RefasterRule {
    /// Every match of this rule in `unit`, in source order.
    pub fn apply(&self, unit: &CompilationUnit, classes: &ClassTable) -> Vec<RuleMatch> {
        let mut scanner = RuleScanner {
            rule: self,
            name: self.to_string(),
            ctx: MatchContext::new(unit, classes),
            matches: Vec::new(),
        };
        for ty in &unit.types {
            for field in &ty.fields {
                scanner.visit_var_decl(field);
            }
            for method in &ty.methods {
                scanner.visit_stmt(&method.body);
            }
        }
        tracing::debug!(rule = %scanner.name, matches = scanner.matches.len(), "scanned unit");
        scanner.matches
    }
}

/// Apply every rule to `unit` and fold the fixes together.
///
/// Rules run independently, so fixes from different rules may overlap;
/// applying the result reports that as an edit conflict.
pub fn fix_unit(
    rules: &[RefasterRule],
    unit: &CompilationUnit,
    classes: &ClassTable,
) -> (Vec<RuleMatch>, Fix) {
    let mut matches = Vec::new();
    let mut fix = Fix::default();
    for rule in rules {
        for found in rule.apply(unit, classes) {
            if let Some(rule_fix) = &found.fix {
                fix.merge(rule_fix.clone());
            }
            matches.push(found);
        }
    }
    (matches, fix)
}

struct RuleScanner<'r, 't> {
    rule: &'r RefasterRule,
    name: String,
    ctx: MatchContext<'t>,
    matches: Vec<RuleMatch>,
}

impl<'t> RuleScanner<'_, 't> {
    /// Try the rule at `expr`, which sits in a slot that holds expressions
    /// binding no looser than `max_precedence`; descend if it does not
    /// match.
    fn scan_expr(&mut self, expr: &'t Expr, max_precedence: u8) {
        for template in self.rule.before_templates() {
            let Template::Expression(template) = template else {
                continue;
            };
            tracing::trace!(rule = %self.name, span = %expr.span, "trying expression template");
            let Some(unifier) = template.match_expr(expr, self.ctx) else {
                continue;
            };
            let fix = match self.rule.after_template() {
                Some(Template::Expression(after)) => self.built(after.replace(
                    expr,
                    unifier.bindings(),
                    self.ctx,
                    self.rule.import_policy(),
                    max_precedence,
                )),
                _ => None,
            };
            self.matches.push(RuleMatch {
                rule: self.name.clone(),
                span: expr.span,
                fix,
            });
            return;
        }
        for (child, slot) in child_slots(expr) {
            self.scan_expr(child, slot);
        }
    }

    /// A built replacement, or `None` after logging why it could not be built.
    fn built(&self, replacement: Result<Fix, InlineError>) -> Option<Fix> {
        replacement
            .map_err(|err| tracing::error!(rule = %self.name, %err, "failed to build replacement"))
            .ok()
    }

    fn scan_block(&mut self, stmts: &'t [Stmt]) {
        let mut start = 0;
        while start < stmts.len() {
            match self.match_at(stmts, start) {
                Some(found) => {
                    let fix = match self.rule.after_template() {
                        Some(Template::Block(after)) => {
                            self.built(after.replace(&found, self.rule.import_policy()))
                        }
                        _ => None,
                    };
                    self.matches.push(RuleMatch {
                        rule: self.name.clone(),
                        span: found.span(),
                        fix,
                    });
                    start = found.end;
                }
                None => {
                    if let Some(stmt) = stmts.get(start) {
                        self.visit_stmt(stmt);
                    }
                    start += 1;
                }
            }
        }
    }

    /// The first before-template matching the statements from `start`.
    fn match_at(&self, stmts: &'t [Stmt], start: usize) -> Option<BlockMatch<'t>> {
        self.rule.before_templates().iter().find_map(|template| {
            let Template::Block(template) = template else {
                return None;
            };
            let end = start + template.stmts.len();
            let window = stmts.get(start..end).filter(|window| !window.is_empty())?;
            tracing::trace!(rule = %self.name, start, end, "trying block template");
            let unifier = template.match_window(window, self.ctx)?;
            Some(BlockMatch {
                start,
                end,
                stmts: window,
                unifier,
            })
        })
    }
}

impl<'t> Visitor<'t> for RuleScanner<'_, 't> {
    fn visit_expr(&mut self, expr: &'t Expr) {
        if self.rule.is_expression_rule() {
            self.scan_expr(expr, ASSIGN_PRECEDENCE);
        }
    }

    fn visit_stmt(&mut self, stmt: &'t Stmt) {
        match &stmt.kind {
            StmtKind::Block(stmts) if !self.rule.is_expression_rule() => self.scan_block(stmts),
            _ => walk_stmt(self, stmt),
        }
    }
}

/// Children of `expr`, each with the loosest precedence its position holds
/// without parentheses.
fn child_slots(expr: &Expr) -> Vec<(&Expr, u8)> {
    match &expr.kind {
        ExprKind::Literal(_)
        | ExprKind::Ident { .. }
        | ExprKind::This
        | ExprKind::Super
        | ExprKind::PrimitiveType(_) => Vec::new(),
        ExprKind::Select { receiver, .. } => vec![(&**receiver, 0)],
        ExprKind::Binary { op, left, right } => {
            let prec = op.precedence();
            vec![(&**left, prec), (&**right, prec.saturating_sub(1))]
        }
        ExprKind::Unary { op, operand } => vec![(&**operand, op.precedence())],
        ExprKind::Assign { target, value } | ExprKind::CompoundAssign { target, value, .. } => {
            vec![(&**target, 1), (&**value, ASSIGN_PRECEDENCE)]
        }
        ExprKind::Conditional {
            cond,
            then_expr,
            else_expr,
        } => vec![
            (&**cond, CONDITIONAL_PRECEDENCE - 1),
            (&**then_expr, CONDITIONAL_PRECEDENCE),
            (&**else_expr, CONDITIONAL_PRECEDENCE),
        ],
        ExprKind::Cast { ty, expr } => vec![(&**ty, ASSIGN_PRECEDENCE), (&**expr, 2)],
        ExprKind::InstanceOf { expr, ty } => vec![(&**expr, 6), (&**ty, ASSIGN_PRECEDENCE)],
        ExprKind::Call { callee, args } => {
            let mut slots = vec![(&**callee, 0)];
            slots.extend(list_slots(args));
            slots
        }
        ExprKind::Index { array, index } => vec![(&**array, 0), (&**index, ASSIGN_PRECEDENCE)],
        ExprKind::NewArray { elem_ty, dims, init } => {
            let mut slots: Vec<(&Expr, u8)> =
                elem_ty.iter().map(|e| (&**e, ASSIGN_PRECEDENCE)).collect();
            slots.extend(list_slots(dims));
            if let Some(init) = init {
                slots.extend(list_slots(init));
            }
            slots
        }
        ExprKind::NewClass { class, args } => {
            let mut slots = vec![(&**class, ASSIGN_PRECEDENCE)];
            slots.extend(list_slots(args));
            slots
        }
        ExprKind::Paren(inner) | ExprKind::ArrayType(inner) => vec![(&**inner, ASSIGN_PRECEDENCE)],
        ExprKind::TypeApply { base, args } => {
            let mut slots = vec![(&**base, ASSIGN_PRECEDENCE)];
            slots.extend(list_slots(args));
            slots
        }
    }
}

fn list_slots(exprs: &[Expr]) -> Vec<(&Expr, u8)> {
    exprs.iter().map(|expr| (expr, ASSIGN_PRECEDENCE)).collect()
}
