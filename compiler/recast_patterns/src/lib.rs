//! recast patterns - matching and rewriting typed program trees
//!
//! A rewrite rule is a set of before-templates and an optional
//! after-template. This crate holds everything between a rule and the text
//! edit it produces:
//! - Pattern trees (`UExpr`, `UStmt`, `UType`) mirroring the host tree
//! - The binding store and the unifier that fills it
//! - Template type checking through generic method inference
//! - The inliner, which rebuilds host trees and collects imports
//! - Rules, their derived negations and the scanner that applies them
//!
//! # Matching
//!
//! Unification is a recursive structural match. Every unify function takes
//! a [`Unifier`] by value and returns `Some` with the extended bindings or
//! `None` for a no-match; a no-match is never an error. Speculative matches
//! (any-of alternatives, repeated variables) run on forks, which are plain
//! clones.
//!
//! # Lifetimes
//!
//! `'t` is the lifetime of the target: the compilation unit and class table
//! being searched. Bindings borrow matched expressions from the target.

pub mod bindings;
mod context;
mod error;
mod fix;
pub mod helpers;
mod imports;
mod inliner;
mod rule;
mod scanner;
pub mod template;
pub mod tree;
pub mod types;
pub mod unifier;

#[cfg(test)]
mod test_helpers;

pub use bindings::{
    Binding, BindingKey, Bindings, FreeIdentKey, Key, LocalVarBinding, LocalVarKey, RepeatedKey,
    TypeVarKey, TypeWithExpression,
};
pub use context::MatchContext;
pub use error::{BindingError, InlineError, RuleError};
pub use fix::Fix;
pub use helpers::Helper;
pub use imports::{top_level_class, ImportPolicy};
pub use inliner::Inliner;
pub use rule::RefasterRule;
pub use scanner::{fix_unit, RuleMatch};
pub use template::{
    BlockMatch, BlockTemplate, ExpressionTemplate, Template, TemplateAnnotations, TemplateInfo,
};
pub use tree::{UClassIdent, UExpr, UStmt, UVarDecl};
pub use types::{TypeVars, TypeVarsBuilder, UType, UTypeVar};
pub use unifier::{Unifiable, Unifier};
