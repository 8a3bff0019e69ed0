//! Host type oracle for recast.
//!
//! Supplies the type utilities pattern matching needs from the host
//! compiler:
//! - A class table of qualified class names, type parameters and supertypes
//! - Subtyping (checked and unchecked), assignability with boxing, erasure
//!   and least upper bounds (`Types`)
//! - Generic method instantiation from argument types (`InferenceContext`)
//!
//! All operations are pure functions of the class table, which is immutable
//! once built and can be shared between threads.

mod class_table;
mod error;
mod infer;
mod relations;

pub use class_table::{ClassDecl, ClassTable, OBJECT};
pub use error::{InferenceError, ResolveError};
pub use infer::{InferenceContext, Instantiation, Substitution};
pub use relations::Types;
