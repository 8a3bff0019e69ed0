//! Templates
//!
//! A template is a before- or after-pattern together with its declared
//! type parameters and argument types. Expression templates match single
//! expressions; block templates match runs of consecutive statements.
//!
//! # Type checking
//!
//! Structural unification never solves type variables. After a template
//! unifies, [`TemplateInfo::typecheck`] runs generic method inference over
//! the template's arguments:
//!
//! 1. Expected types are the declared argument types, with type variables
//!    already bound by the match substituted; actual types are the types of
//!    the captured expressions. A repeated argument that captured nothing
//!    contributes no constraint; one that captured several contributes the
//!    least upper bound of their types.
//! 2. Every type variable still unbound is solved and bound.
//! 3. Every type variable's binding must be an unchecked subtype of its
//!    declared upper bound, with all bindings substituted into the bound.
//!
//! Any failure is a no-match.

mod block;
mod expression;

pub use block::{BlockMatch, BlockTemplate};
pub use expression::ExpressionTemplate;

use recast_ir::Type;
use recast_types::{InferenceContext, InferenceError, ResolveError};

use crate::bindings::{FreeIdentKey, RepeatedKey, TypeVarKey, TypeWithExpression};
use crate::imports::ImportPolicy;
use crate::inliner::Inliner;
use crate::types::{TypeVars, UType};
use crate::unifier::Unifier;

/// Per-template options, as written on the template method.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateAnnotations {
    /// Inference may not box or unbox arguments.
    pub no_autoboxing: bool,
    /// Derive a second rule matching the negated templates.
    pub also_negation: bool,
    /// A conditional before-pattern also matches with its condition negated
    /// and its branches swapped.
    pub also_reverse_ternary: bool,
    /// Only read from after-templates.
    pub import_policy: Option<ImportPolicy>,
}

/// Declarations shared by every template kind.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateInfo {
    pub annotations: TemplateAnnotations,
    pub type_vars: TypeVars,
    /// Expression arguments in declaration order. A repeated argument is
    /// declared with its element type.
    pub args: Vec<(String, UType)>,
}

impl TemplateInfo {
    pub fn new(type_vars: TypeVars, args: Vec<(String, UType)>) -> Self {
        TemplateInfo {
            annotations: TemplateAnnotations::default(),
            type_vars,
            args,
        }
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: TemplateAnnotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// Solve the free type variables of a successful structural match.
    ///
    /// `result` pairs the template's declared result type with the matched
    /// expression's type, for expression templates.
    pub(crate) fn typecheck<'t>(
        &self,
        unifier: Unifier<'t>,
        result: Option<(&UType, &Type)>,
    ) -> Option<Unifier<'t>> {
        match self.try_typecheck(unifier, result) {
            Ok(unifier) => unifier,
            Err(TypecheckError::Resolve(err)) => {
                tracing::debug!(%err, "failure to resolve a type during type checking");
                None
            }
            Err(TypecheckError::Inference(err)) => {
                tracing::debug!(%err, "no valid instantiation found");
                None
            }
        }
    }

    fn try_typecheck<'t>(
        &self,
        mut unifier: Unifier<'t>,
        result: Option<(&UType, &Type)>,
    ) -> Result<Option<Unifier<'t>>, TypecheckError> {
        let ctx = unifier.ctx();
        let free: Vec<String> = self
            .type_vars
            .iter()
            .filter(|var| unifier.get_binding(&TypeVarKey::new(&var.name)).is_none())
            .map(|var| var.name.clone())
            .collect();

        let mut expected = Vec::with_capacity(self.args.len() + 1);
        let mut actual = Vec::with_capacity(self.args.len() + 1);
        {
            let inliner = Inliner::new(ctx, unifier.bindings(), ImportPolicy::default());
            if let Some((result_ty, target_ty)) = result {
                expected.push(result_ty.inline(&inliner)?);
                actual.push(target_ty.clone());
            }
            for (name, ty) in &self.args {
                let single = inliner.optional_binding(&FreeIdentKey::new(name));
                let actual_ty = if let Some(expr) = single {
                    expr.ty.clone()
                } else {
                    let exprs = match inliner.optional_binding(&RepeatedKey::new(name)) {
                        Some(exprs) if !exprs.is_empty() => exprs,
                        // Unused, or a repeated argument that matched nothing.
                        _ => continue,
                    };
                    let types: Vec<Type> = exprs.iter().map(|expr| expr.ty.clone()).collect();
                    let Some(lub) = ctx.types().lub(&types) else {
                        tracing::debug!(arg = %name, "no least upper bound for repeated argument");
                        return Ok(None);
                    };
                    lub
                };
                expected.push(ty.inline(&inliner)?);
                actual.push(actual_ty);
            }
        }

        let inference = InferenceContext::new(ctx.classes, !self.annotations.no_autoboxing);
        let instantiation = inference.instantiate(&free, &expected, &Type::VOID, &actual)?;
        for var in free {
            let ty = instantiation
                .substitution
                .get(&var)
                .cloned()
                .unwrap_or_else(Type::object);
            if unifier
                .put_binding(&TypeVarKey::new(var), TypeWithExpression::new(ty))
                .is_err()
            {
                return Ok(None);
            }
        }

        Ok(self.check_bounds(&unifier)?.then_some(unifier))
    }

    fn check_bounds(&self, unifier: &Unifier<'_>) -> Result<bool, ResolveError> {
        let inliner = Inliner::new(unifier.ctx(), unifier.bindings(), ImportPolicy::default());
        let types = unifier.types();
        for var in &self.type_vars {
            let Some(binding) = unifier.get_binding(&TypeVarKey::new(&var.name)) else {
                continue;
            };
            let bound = var.upper.inline(&inliner)?;
            if !types.is_subtype_unchecked(&binding.ty, &bound) {
                tracing::debug!(
                    var = %var.name,
                    ty = %binding.ty,
                    %bound,
                    "type variable binding violates its bound"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }
}

enum TypecheckError {
    Resolve(ResolveError),
    Inference(InferenceError),
}

impl From<ResolveError> for TypecheckError {
    fn from(err: ResolveError) -> Self {
        TypecheckError::Resolve(err)
    }
}

impl From<InferenceError> for TypecheckError {
    fn from(err: InferenceError) -> Self {
        TypecheckError::Inference(err)
    }
}

/// A before- or after-template of either kind.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Template {
    Expression(ExpressionTemplate),
    Block(BlockTemplate),
}

impl Template {
    pub fn info(&self) -> &TemplateInfo {
        match self {
            Template::Expression(template) => &template.info,
            Template::Block(template) => &template.info,
        }
    }

    pub fn annotations(&self) -> &TemplateAnnotations {
        &self.info().annotations
    }

    /// Human-readable kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Template::Expression(_) => "expression",
            Template::Block(_) => "block",
        }
    }
}

impl From<ExpressionTemplate> for Template {
    fn from(template: ExpressionTemplate) -> Self {
        Template::Expression(template)
    }
}

impl From<BlockTemplate> for Template {
    fn from(template: BlockTemplate) -> Self {
        Template::Block(template)
    }
}

#[cfg(test)]
mod tests;
