//! Text edits over a compilation unit's source.

mod tracker;

pub use tracker::{ChangeTracker, EditConflict, TextEdit};
