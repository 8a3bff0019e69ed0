//! Pattern types.
//!
//! [`UType`] mirrors the host [`Type`] with class names left unresolved
//! until inlining. Unifying a pattern type never binds anything: type
//! variables accept any reference type and their bounds are checked after
//! inference (see `template`).
//!
//! # Type variables
//!
//! A bound may mention the variable it bounds (`E extends Enum<E>`), so
//! type variables are declared in two phases: [`TypeVarsBuilder`] declares
//! every name first, then bounds are patched in, then [`TypeVarsBuilder::freeze`]
//! yields immutable [`TypeVars`]. Bounds refer to variables by name.

use recast_ir::{BoundKind, PrimitiveKind, Type};
use recast_types::{ResolveError, OBJECT};

use crate::inliner::Inliner;
use crate::unifier::{unify_seq, Unifiable, Unifier};

/// A type in a pattern.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum UType {
    Primitive(PrimitiveKind),
    Class { name: String, args: Vec<UType> },
    Array(Box<UType>),
    /// A template type parameter, by name.
    Var(String),
    Wildcard {
        kind: BoundKind,
        bound: Option<Box<UType>>,
    },
    Method {
        params: Vec<UType>,
        ret: Box<UType>,
    },
    ForAll {
        vars: Vec<String>,
        method: Box<UType>,
    },
}

impl UType {
    pub const BOOLEAN: UType = UType::Primitive(PrimitiveKind::Boolean);
    pub const INT: UType = UType::Primitive(PrimitiveKind::Int);
    pub const VOID: UType = UType::Primitive(PrimitiveKind::Void);

    pub fn class(name: impl Into<String>) -> Self {
        UType::Class {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<UType>) -> Self {
        UType::Class {
            name: name.into(),
            args,
        }
    }

    pub fn var(name: impl Into<String>) -> Self {
        UType::Var(name.into())
    }

    pub fn array(element: UType) -> Self {
        UType::Array(Box::new(element))
    }

    pub fn method(params: Vec<UType>, ret: UType) -> Self {
        UType::Method {
            params,
            ret: Box::new(ret),
        }
    }

    pub fn object() -> Self {
        UType::class(OBJECT)
    }

    pub fn string() -> Self {
        UType::class("java.lang.String")
    }

    /// `boolean` or `Boolean`.
    pub fn is_boolean(&self) -> bool {
        match self {
            UType::Primitive(PrimitiveKind::Boolean) => true,
            UType::Class { name, .. } => name == "java.lang.Boolean",
            _ => false,
        }
    }

    /// Rebuild as a host type.
    ///
    /// Class names are resolved against the class table. A type variable
    /// becomes its binding, or stays a variable when unbound.
    pub fn inline(&self, inliner: &Inliner<'_, '_>) -> Result<Type, ResolveError> {
        Ok(match self {
            UType::Primitive(kind) => Type::Primitive(*kind),
            UType::Class { name, args } => {
                let decl = inliner.classes().resolve(name)?;
                Type::Class {
                    name: decl.name.clone(),
                    args: inline_all(args, inliner)?,
                }
            }
            UType::Array(elem) => Type::array(elem.inline(inliner)?),
            UType::Var(name) => inliner.type_var(name),
            UType::Wildcard { kind, bound } => Type::Wildcard {
                kind: *kind,
                bound: match bound {
                    Some(bound) => Some(Box::new(bound.inline(inliner)?)),
                    None => None,
                },
            },
            UType::Method { params, ret } => Type::Method {
                params: inline_all(params, inliner)?,
                ret: Box::new(ret.inline(inliner)?),
            },
            UType::ForAll { vars, method } => Type::ForAll {
                vars: vars.clone(),
                method: Box::new(method.inline(inliner)?),
            },
        })
    }
}

fn inline_all(types: &[UType], inliner: &Inliner<'_, '_>) -> Result<Vec<Type>, ResolveError> {
    types.iter().map(|ty| ty.inline(inliner)).collect()
}

impl<'t> Unifiable<'t, Type> for UType {
    fn unify(&self, target: &'t Type, unifier: Unifier<'t>) -> Option<Unifier<'t>> {
        self.unify_type(target, unifier)
    }
}

impl UType {
    /// Match a host type. Never binds; see the module docs.
    pub fn unify_type<'t>(&self, target: &'t Type, unifier: Unifier<'t>) -> Option<Unifier<'t>> {
        match (self, target) {
            (UType::Primitive(a), Type::Primitive(b)) => (a == b).then_some(unifier),
            (
                UType::Class { name, args },
                Type::Class {
                    name: target_name,
                    args: target_args,
                },
            ) if name == target_name => unify_seq(unifier, args, target_args),
            (UType::Array(elem), Type::Array(target_elem)) => elem.unify_type(target_elem, unifier),
            // Bounds are enforced after inference.
            (UType::Var(_), ty) => (!ty.is_primitive()).then_some(unifier),
            (
                UType::Wildcard { kind, bound },
                Type::Wildcard {
                    kind: target_kind,
                    bound: target_bound,
                },
            ) if kind == target_kind => match (bound, target_bound) {
                (None, None) => Some(unifier),
                (Some(bound), Some(target_bound)) => bound.unify_type(target_bound, unifier),
                _ => None,
            },
            (
                UType::Method { params, ret },
                Type::Method {
                    params: target_params,
                    ret: target_ret,
                },
            ) => {
                let unifier = unify_seq(unifier, params, target_params)?;
                ret.unify_type(target_ret, unifier)
            }
            (
                UType::ForAll { method, .. },
                Type::ForAll {
                    method: target_method,
                    ..
                },
            ) => method.unify_type(target_method, unifier),
            (
                UType::Method { .. },
                Type::ForAll {
                    method: target_method,
                    ..
                },
            ) => self.unify_type(target_method, unifier),
            (UType::ForAll { method, .. }, Type::Method { .. }) => {
                method.unify_type(target, unifier)
            }
            _ => None,
        }
    }
}

/// A declared template type parameter.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct UTypeVar {
    pub name: String,
    /// `None` is the null type: no lower bound.
    pub lower: Option<UType>,
    pub upper: UType,
}

/// Frozen, ordered type parameters of a template.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeVars {
    vars: Vec<UTypeVar>,
}

impl TypeVars {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&UTypeVar> {
        self.vars.iter().find(|var| var.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UTypeVar> {
        self.vars.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.vars.iter().map(|var| var.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<'a> IntoIterator for &'a TypeVars {
    type Item = &'a UTypeVar;
    type IntoIter = std::slice::Iter<'a, UTypeVar>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter()
    }
}

/// Builds [`TypeVars`]: declare, patch bounds, freeze.
#[derive(Debug, Default)]
pub struct TypeVarsBuilder {
    vars: Vec<UTypeVar>,
}

impl TypeVarsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a variable bounded by `Object`. Redeclaring a name is a
    /// no-op.
    #[must_use]
    pub fn declare(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.vars.iter().any(|var| var.name == name) {
            self.vars.push(UTypeVar {
                name,
                lower: None,
                upper: UType::object(),
            });
        }
        self
    }

    /// Set the upper bound of a declared variable; the bound may mention
    /// any declared variable, including this one.
    #[must_use]
    pub fn upper_bound(mut self, name: &str, bound: UType) -> Self {
        if let Some(var) = self.vars.iter_mut().find(|var| var.name == name) {
            var.upper = bound;
        }
        self
    }

    #[must_use]
    pub fn lower_bound(mut self, name: &str, bound: UType) -> Self {
        if let Some(var) = self.vars.iter_mut().find(|var| var.name == name) {
            var.lower = Some(bound);
        }
        self
    }

    pub fn freeze(self) -> TypeVars {
        TypeVars { vars: self.vars }
    }
}
