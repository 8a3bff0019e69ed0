//! What a match runs against.

use recast_ir::CompilationUnit;
use recast_types::{ClassTable, Types};

/// The compilation unit being searched and the class table that resolves
/// its types. Both are shared, immutable and outlive every binding taken
/// from the unit.
#[derive(Copy, Clone, Debug)]
pub struct MatchContext<'t> {
    pub unit: &'t CompilationUnit,
    pub classes: &'t ClassTable,
}

impl<'t> MatchContext<'t> {
    pub fn new(unit: &'t CompilationUnit, classes: &'t ClassTable) -> Self {
        MatchContext { unit, classes }
    }

    #[inline]
    pub fn types(&self) -> Types<'t> {
        Types::new(self.classes)
    }
}
