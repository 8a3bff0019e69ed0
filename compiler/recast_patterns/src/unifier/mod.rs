//! Unification engine.
//!
//! A [`Unifier`] is the state of one match attempt: the context it runs
//! in and the bindings collected so far. Unify functions take a unifier by
//! value and hand it back on success, so a failed attempt simply drops its
//! state. Speculation is a clone: [`Unifier::fork`] copies the bindings and
//! the copy can be mutated and discarded without affecting the original.
//!
//! # Repeated variables
//!
//! A repeated pattern must be the last element of an argument or
//! initializer list. It absorbs every remaining target: each target is
//! unified on its own fork as a single free identifier, and only if every
//! target succeeds is the ordered list committed under the repeated key.

use std::borrow::Cow;

use recast_ir::printer::print_expr;
use recast_ir::Expr;
use recast_types::Types;

use crate::bindings::{Bindings, FreeIdentKey, Key, RepeatedKey};
use crate::{BindingError, MatchContext};

/// A pattern that can be matched against target nodes of type `T`.
pub trait Unifiable<'t, T: ?Sized> {
    /// Match `target`, extending `unifier`. `None` is a no-match.
    fn unify(&self, target: &'t T, unifier: Unifier<'t>) -> Option<Unifier<'t>>;
}

/// State of one match attempt.
#[derive(Clone, Debug)]
pub struct Unifier<'t> {
    ctx: MatchContext<'t>,
    bindings: Bindings<'t>,
}

impl<'t> Unifier<'t> {
    pub fn new(ctx: MatchContext<'t>) -> Self {
        Unifier {
            ctx,
            bindings: Bindings::new(),
        }
    }

    /// An independent copy of this unifier.
    #[must_use]
    pub fn fork(&self) -> Self {
        self.clone()
    }

    #[inline]
    pub fn ctx(&self) -> MatchContext<'t> {
        self.ctx
    }

    #[inline]
    pub fn types(&self) -> Types<'t> {
        self.ctx.types()
    }

    pub fn bindings(&self) -> &Bindings<'t> {
        &self.bindings
    }

    pub fn into_bindings(self) -> Bindings<'t> {
        self.bindings
    }

    pub fn get_binding<K: Key<'t>>(&self, key: &K) -> Option<&K::Value> {
        self.bindings.get(key)
    }

    /// Bind a key that must not be bound yet.
    pub fn put_binding<K: Key<'t>>(
        &mut self,
        key: &K,
        value: K::Value,
    ) -> Result<(), BindingError> {
        self.bindings.insert(key, value)
    }

    /// Overwrite a key that must already be bound.
    pub fn replace_binding<K: Key<'t>>(
        &mut self,
        key: &K,
        value: K::Value,
    ) -> Result<(), BindingError> {
        self.bindings.replace(key, value)
    }

    /// `put_binding` inside a unify chain.
    ///
    /// Patterns check a key is free before binding it, so a violation here
    /// is a malformed pattern; it is logged and the attempt fails.
    pub(crate) fn bind<K: Key<'t>>(mut self, key: &K, value: K::Value) -> Option<Self> {
        match self.put_binding(key, value) {
            Ok(()) => Some(self),
            Err(err) => {
                tracing::error!(%err, "malformed pattern");
                None
            }
        }
    }
}

/// Unify two sequences pairwise. Lengths must agree.
pub fn unify_seq<'t, P, T>(
    unifier: Unifier<'t>,
    patterns: &[P],
    targets: &'t [T],
) -> Option<Unifier<'t>>
where
    P: Unifiable<'t, T>,
{
    if patterns.len() != targets.len() {
        return None;
    }
    patterns
        .iter()
        .zip(targets)
        .try_fold(unifier, |unifier, (pattern, target)| pattern.unify(target, unifier))
}

/// Unify an optional pattern with an optional target: both absent
/// succeeds, one absent fails.
pub fn unify_nullable<'t, P, T>(
    unifier: Unifier<'t>,
    pattern: Option<&P>,
    target: Option<&'t T>,
) -> Option<Unifier<'t>>
where
    P: Unifiable<'t, T>,
{
    match (pattern, target) {
        (None, None) => Some(unifier),
        (Some(pattern), Some(target)) => pattern.unify(target, unifier),
        _ => None,
    }
}

/// Patterns that can appear in an expression list, where a trailing
/// repeated variable absorbs the rest of the targets.
pub trait ListPattern<'t>: Unifiable<'t, Expr> {
    /// Name of the repeated variable, if this is one.
    fn as_repeated(&self) -> Option<&str>;
}

/// Unify an argument or initializer list.
///
/// Without a repeated pattern the lengths must agree. A repeated pattern
/// must come last; anything after it is a no-match.
pub fn unify_list<'t, P>(
    unifier: Unifier<'t>,
    patterns: &[P],
    targets: &'t [Expr],
) -> Option<Unifier<'t>>
where
    P: ListPattern<'t>,
{
    let mut unifier = unifier;
    for (i, pattern) in patterns.iter().enumerate() {
        if let Some(name) = pattern.as_repeated() {
            if i + 1 != patterns.len() {
                return None;
            }
            return unify_repeated(unifier, pattern, name, targets.get(i..)?);
        }
        unifier = pattern.unify(targets.get(i)?, unifier)?;
    }
    (patterns.len() == targets.len()).then_some(unifier)
}

/// The speculative scan behind a repeated variable.
fn unify_repeated<'t, P>(
    unifier: Unifier<'t>,
    pattern: &P,
    name: &str,
    targets: &'t [Expr],
) -> Option<Unifier<'t>>
where
    P: Unifiable<'t, Expr>,
{
    let single = FreeIdentKey::new(name);
    let mut exprs: Vec<Cow<'t, Expr>> = Vec::with_capacity(targets.len());
    for target in targets {
        let forked = pattern.unify(target, unifier.fork())?;
        exprs.push(forked.get_binding(&single)?.clone());
    }
    tracing::trace!(var = name, count = exprs.len(), "bound repeated variable");
    unifier.bind(&RepeatedKey::new(name), exprs)
}

/// The re-encounter rule for free variables: the same type and the same
/// printed form.
pub(crate) fn same_expression(bound: &Expr, candidate: &Expr) -> bool {
    Types::is_same_type(&bound.ty, &candidate.ty) && print_expr(bound) == print_expr(candidate)
}
