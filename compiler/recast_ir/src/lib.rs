//! recast IR - the host program model
//!
//! This crate holds the fully type-checked program trees that rewrite rules
//! are matched against:
//! - Spans for source locations
//! - Host types (`Type`) and resolved symbols (`Symbol`, `SymbolTable`)
//! - Expression and statement trees (`Expr`, `Stmt`) carrying resolved types
//! - Compilation units with their laid-out source text and comments
//! - A printer that lays a unit out and renders replacement trees
//! - Text edits (`TextEdit`, `ChangeTracker`) over a unit's source
//!
//! # Design Philosophy
//!
//! - **Boxed trees**: replacement trees are assembled from fresh nodes and
//!   captured subtrees of the target, so nodes own their children.
//! - **Spans are the link to source**: a node whose span is non-empty came
//!   from the unit's source and is re-emitted byte-for-byte; a node with an
//!   empty span was synthesized and is printed.

pub mod ast;
pub mod edit;
pub mod printer;
mod span;
mod symbol;
mod types;
mod unit;
pub mod visitor;

pub use ast::{BinaryOp, Expr, ExprKind, ExprTag, Literal, Stmt, StmtKind, UnaryOp, VarDecl};
pub use edit::{ChangeTracker, EditConflict, TextEdit};
pub use span::Span;
pub use symbol::{Symbol, SymbolId, SymbolKind, SymbolTable, SymbolTableFull};
pub use types::{BoundKind, PrimitiveKind, Type};
pub use unit::{CompilationUnit, Import, MethodDecl, TypeDecl};
