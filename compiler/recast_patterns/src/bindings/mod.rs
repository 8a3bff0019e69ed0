//! Binding store.
//!
//! Maps pattern-variable identities to what they matched. There are four
//! key families, each with its own value type:
//!
//! | Key | Value |
//! |---|---|
//! | [`FreeIdentKey`] | the matched expression |
//! | [`LocalVarKey`] | [`LocalVarBinding`] |
//! | [`TypeVarKey`] | [`TypeWithExpression`] |
//! | [`RepeatedKey`] | the matched expressions, in order |
//!
//! Values are stored type-erased as [`Binding`]; the typed [`Key`] trait
//! wraps and unwraps them so callers never see the erased form.
//!
//! Matched expressions are borrowed from the target tree. Synthesized ones
//! (the implicit `this` of a bare member reference) are owned, so a store
//! clones cheaply and a fork is just a clone.

use std::borrow::Cow;
use std::collections::hash_map;
use std::fmt;

use recast_ir::{Expr, SymbolId, Type};
use rustc_hash::FxHashMap;

use crate::BindingError;

/// Type-erased key.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum BindingKey {
    FreeIdent(String),
    LocalVar(String),
    TypeVar(String),
    Repeated(String),
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingKey::FreeIdent(name) => write!(f, "free identifier `{name}`"),
            BindingKey::LocalVar(name) => write!(f, "local variable `{name}`"),
            BindingKey::TypeVar(name) => write!(f, "type variable `{name}`"),
            BindingKey::Repeated(name) => write!(f, "repeated variable `{name}`"),
        }
    }
}

/// A local variable declared inside the matched region.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LocalVarBinding {
    pub symbol: SymbolId,
    /// Name to emit when the variable is inlined.
    pub name: String,
}

/// A type variable's instantiation, with the expression it was read from
/// when a type-variable identifier matched one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeWithExpression<'t> {
    pub ty: Type,
    pub expr: Option<Cow<'t, Expr>>,
}

impl<'t> TypeWithExpression<'t> {
    pub fn new(ty: Type) -> Self {
        TypeWithExpression { ty, expr: None }
    }

    pub fn with_expression(ty: Type, expr: Cow<'t, Expr>) -> Self {
        TypeWithExpression {
            ty,
            expr: Some(expr),
        }
    }
}

/// Type-erased value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Binding<'t> {
    Expr(Cow<'t, Expr>),
    LocalVar(LocalVarBinding),
    Type(TypeWithExpression<'t>),
    Exprs(Vec<Cow<'t, Expr>>),
}

/// A typed binding key.
pub trait Key<'t> {
    type Value;

    fn erase(&self) -> BindingKey;

    fn wrap(value: Self::Value) -> Binding<'t>;

    fn unwrap<'a>(binding: &'a Binding<'t>) -> Option<&'a Self::Value>;
}

macro_rules! binding_key {
    ($(#[$meta:meta])* $key:ident => $erased:ident, <$lt:lifetime> $variant:ident($value:ty)) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Eq, PartialEq, Hash)]
        pub struct $key(pub String);

        impl $key {
            pub fn new(name: impl Into<String>) -> Self {
                $key(name.into())
            }

            pub fn name(&self) -> &str {
                &self.0
            }
        }

        impl<$lt> Key<$lt> for $key {
            type Value = $value;

            fn erase(&self) -> BindingKey {
                BindingKey::$erased(self.0.clone())
            }

            fn wrap(value: Self::Value) -> Binding<$lt> {
                Binding::$variant(value)
            }

            fn unwrap<'a>(binding: &'a Binding<$lt>) -> Option<&'a Self::Value> {
                match binding {
                    Binding::$variant(value) => Some(value),
                    _ => None,
                }
            }
        }
    };
}

binding_key!(
    /// A free identifier: binds to any expression.
    FreeIdentKey => FreeIdent, <'t> Expr(Cow<'t, Expr>)
);
binding_key!(
    /// A local variable declared by the pattern.
    LocalVarKey => LocalVar, <'t> LocalVar(LocalVarBinding)
);
binding_key!(
    /// A template type parameter.
    TypeVarKey => TypeVar, <'t> Type(TypeWithExpression<'t>)
);
binding_key!(
    /// A repeated (variadic) free identifier.
    RepeatedKey => Repeated, <'t> Exprs(Vec<Cow<'t, Expr>>)
);

/// The store itself.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bindings<'t> {
    map: FxHashMap<BindingKey, Binding<'t>>,
}

impl<'t> Bindings<'t> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<K: Key<'t>>(&self, key: &K) -> Option<&K::Value> {
        self.map.get(&key.erase()).and_then(K::unwrap)
    }

    pub fn contains<K: Key<'t>>(&self, key: &K) -> bool {
        self.map.contains_key(&key.erase())
    }

    /// Bind a key that is not yet bound.
    pub fn insert<K: Key<'t>>(&mut self, key: &K, value: K::Value) -> Result<(), BindingError> {
        let erased = key.erase();
        if self.map.contains_key(&erased) {
            return Err(BindingError::AlreadyBound(erased));
        }
        self.map.insert(erased, K::wrap(value));
        Ok(())
    }

    /// Overwrite a key that is already bound.
    pub fn replace<K: Key<'t>>(&mut self, key: &K, value: K::Value) -> Result<(), BindingError> {
        let erased = key.erase();
        match self.map.get_mut(&erased) {
            Some(slot) => {
                *slot = K::wrap(value);
                Ok(())
            }
            None => Err(BindingError::Missing(erased)),
        }
    }

    /// Symbols of every local variable the pattern has declared so far.
    pub fn local_var_symbols(&self) -> Vec<SymbolId> {
        self.map
            .values()
            .filter_map(|binding| match binding {
                Binding::LocalVar(local) => Some(local.symbol),
                _ => None,
            })
            .collect()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, BindingKey, Binding<'t>> {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests;
