//! Resolved symbols.
//!
//! Identifiers and member selects of a checked program point at the symbol
//! they resolve to. Symbols live in a per-unit [`SymbolTable`] and are
//! referenced by [`SymbolId`].

use std::ops::Index;

use rustc_hash::FxHashMap;

use crate::Type;

/// Handle to a symbol in a [`SymbolTable`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct SymbolId(u32);

impl SymbolId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        SymbolId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum SymbolKind {
    /// Local variable or parameter.
    Local,
    Field,
    Method,
    Class,
}

/// A resolved declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Symbol {
    pub id: SymbolId,
    pub kind: SymbolKind,
    /// Simple name.
    pub name: String,
    /// Qualified name of the enclosing class (members, nested classes) or
    /// package (top-level classes).
    pub owner: Option<String>,
    /// Declared type; a method or generic method signature for methods.
    pub ty: Type,
    pub is_static: bool,
    /// Methods only: last parameter is variadic.
    pub is_varargs: bool,
}

impl Symbol {
    /// `owner.name`, or just `name` when there is no owner.
    pub fn qualified_name(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{owner}.{}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn is_member(&self) -> bool {
        matches!(self.kind, SymbolKind::Field | SymbolKind::Method)
    }
}

/// A symbol table has no ids left to hand out.
#[derive(Copy, Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("symbol table is full: {0} symbols")]
pub struct SymbolTableFull(pub usize);

/// The id of the symbol stored at `len`.
fn next_id(len: usize) -> Result<SymbolId, SymbolTableFull> {
    u32::try_from(len)
        .map(SymbolId::new)
        .map_err(|_| SymbolTableFull(len))
}

/// Symbols of one compilation unit.
#[derive(Clone, Default, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    classes: FxHashMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn try_push(
        &mut self,
        kind: SymbolKind,
        name: &str,
        owner: Option<&str>,
        ty: Type,
    ) -> Result<SymbolId, SymbolTableFull> {
        let id = next_id(self.symbols.len())?;
        self.symbols.push(Symbol {
            id,
            kind,
            name: name.to_string(),
            owner: owner.map(str::to_string),
            ty,
            is_static: false,
            is_varargs: false,
        });
        Ok(id)
    }

    fn push(&mut self, kind: SymbolKind, name: &str, owner: Option<&str>, ty: Type) -> SymbolId {
        self.try_push(kind, name, owner, ty).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Declare a local variable.
    ///
    /// # Panics
    /// Panics if the table already holds `u32::MAX` symbols.
    /// Use `try_add_local` for fallible declaration.
    pub fn add_local(&mut self, name: &str, ty: Type) -> SymbolId {
        self.push(SymbolKind::Local, name, None, ty)
    }

    /// Declare a local variable, failing once the table is full.
    pub fn try_add_local(&mut self, name: &str, ty: Type) -> Result<SymbolId, SymbolTableFull> {
        self.try_push(SymbolKind::Local, name, None, ty)
    }

    /// # Panics
    /// Panics if the table already holds `u32::MAX` symbols.

    pub fn add_field(&mut self, owner: &str, name: &str, ty: Type, is_static: bool) -> SymbolId {
        let id = self.push(SymbolKind::Field, name, Some(owner), ty);
        self.symbols[id.index()].is_static = is_static;
        id
    }

    /// # Panics
    /// Panics if the table already holds `u32::MAX` symbols.
    pub fn add_method(
        &mut self,
        owner: &str,
        name: &str,
        ty: Type,
        is_static: bool,
        is_varargs: bool,
    ) -> SymbolId {
        let id = self.push(SymbolKind::Method, name, Some(owner), ty);
        let symbol = &mut self.symbols[id.index()];
        symbol.is_static = is_static;
        symbol.is_varargs = is_varargs;
        id
    }

    /// Symbol for a class by qualified name, interned.
    ///
    /// # Panics
    /// Panics if the class is new and the table already holds `u32::MAX`
    /// symbols.
    pub fn class(&mut self, qualified: &str) -> SymbolId {
        if let Some(&id) = self.classes.get(qualified) {
            return id;
        }
        let (owner, name) = match qualified.rsplit_once('.') {
            Some((owner, name)) => (Some(owner), name),
            None => (None, qualified),
        };
        let id = self.push(SymbolKind::Class, name, owner, Type::class(qualified));
        self.symbols[id.index()].is_static = true;
        self.classes.insert(qualified.to_string(), id);
        id
    }

    pub fn lookup_class(&self, qualified: &str) -> Option<SymbolId> {
        self.classes.get(qualified).copied()
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Index<SymbolId> for SymbolTable {
    type Output = Symbol;

    fn index(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }
}
