//! Type oracle errors.

use recast_ir::Type;

/// A qualified class name that the class table does not know.
///
/// Recoverable: matching treats it as a no-match.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum ResolveError {
    #[error("could not resolve class `{0}`")]
    UnknownClass(String),
}

/// Generic method instantiation failed.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum InferenceError {
    #[error("expected {expected} arguments, found {found}")]
    Arity { expected: usize, found: usize },

    #[error("argument of type `{found}` is not compatible with `{expected}`")]
    Incompatible { expected: Type, found: Type },

    #[error("type variable `{var}` has conflicting instantiations `{first}` and `{second}`")]
    Conflict { var: String, first: Type, second: Type },

    #[error("no instantiation of `{var}` satisfies its bounds")]
    Unsatisfiable { var: String },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
