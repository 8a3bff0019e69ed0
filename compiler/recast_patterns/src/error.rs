//! Pattern engine errors.
//!
//! A failed match is never an error: every unify function returns `None`.
//! The types here report authoring defects and resolution failures.

use recast_types::ResolveError;

use crate::bindings::BindingKey;

/// A binding store contract violation.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum BindingError {
    #[error("cannot bind {0} more than once")]
    AlreadyBound(BindingKey),

    #[error("binding for {0} does not exist")]
    Missing(BindingKey),
}

/// Inlining a pattern into a replacement tree failed.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum InlineError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("no binding for {0}")]
    Unbound(BindingKey),

    #[error("{0} cannot be inlined")]
    NotInlineable(&'static str),

    #[error("repeated variable `{0}` used outside an argument list")]
    RepeatedOutsideList(String),
}

/// A rule could not be constructed from its templates.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RuleError {
    #[error("no before-template found in `{0}`")]
    NoBeforeTemplate(String),

    #[error("templates of `{rule}` must all be {expected} templates, found a {found} one")]
    MixedTemplateKinds {
        rule: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("cannot negate a template whose result type is `{0}`")]
    NonBooleanNegation(String),
}
