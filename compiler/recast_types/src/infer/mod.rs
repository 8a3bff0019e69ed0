//! Generic method instantiation.
//!
//! Given a synthetic method signature `<vars...> (expected...) ret` and the
//! types of the actual arguments, solve each free type variable so that
//! every argument is compatible with its instantiated parameter.
//!
//! # Algorithm
//!
//! 1. Reduce each `actual -> expected` compatibility constraint into
//!    equality, lower and upper bounds on the free variables.
//! 2. Resolve every variable: an equality bound wins, then the least upper
//!    bound of its lower bounds, then its most specific upper bound, then
//!    `Object`.
//! 3. Check the resolution against all bounds and re-check every argument
//!    against its instantiated parameter.

use recast_ir::{BoundKind, Type};
use rustc_hash::FxHashMap;

use crate::{ClassTable, InferenceError, Types};

/// Solved type variables by name.
pub type Substitution = FxHashMap<String, Type>;

/// An instantiated method signature.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Instantiation {
    pub params: Vec<Type>,
    pub ret: Type,
    pub substitution: Substitution,
}

/// How an actual type must relate to a formal type.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Relation {
    /// Loose invocation context: subtyping plus optional boxing.
    Compatible,
    /// `actual <: formal`
    Subtype,
    /// `actual == formal`
    Equal,
    /// `formal <: actual`
    Supertype,
}

#[derive(Default, Debug)]
struct Bounds {
    eq: Vec<Type>,
    lower: Vec<Type>,
    upper: Vec<Type>,
}

pub struct InferenceContext<'a> {
    types: Types<'a>,
    autoboxing: bool,
}

impl<'a> InferenceContext<'a> {
    pub fn new(classes: &'a ClassTable, autoboxing: bool) -> Self {
        InferenceContext {
            types: Types::new(classes),
            autoboxing,
        }
    }

    /// Instantiate `<free_vars> (expected) ret` against `actual` argument
    /// types.
    pub fn instantiate(
        &self,
        free_vars: &[String],
        expected: &[Type],
        ret: &Type,
        actual: &[Type],
    ) -> Result<Instantiation, InferenceError> {
        if expected.len() != actual.len() {
            return Err(InferenceError::Arity {
                expected: expected.len(),
                found: actual.len(),
            });
        }

        let mut solver = Solver {
            types: self.types,
            autoboxing: self.autoboxing,
            free_vars,
            bounds: FxHashMap::default(),
        };
        for (formal, actual) in expected.iter().zip(actual) {
            solver.reduce(formal, actual, Relation::Compatible)?;
        }

        let mut substitution = Substitution::default();
        for var in free_vars {
            let solution = solver.resolve(var)?;
            tracing::trace!(var = %var, solution = %solution, "resolved type variable");
            substitution.insert(var.clone(), solution);
        }

        let params: Vec<Type> = expected
            .iter()
            .map(|p| Types::subst(p, &substitution))
            .collect();
        for (param, actual) in params.iter().zip(actual) {
            if !self.types.is_assignable(actual, param, self.autoboxing) {
                return Err(InferenceError::Incompatible {
                    expected: param.clone(),
                    found: actual.clone(),
                });
            }
        }

        Ok(Instantiation {
            params,
            ret: Types::subst(ret, &substitution),
            substitution,
        })
    }
}

struct Solver<'a, 'v> {
    types: Types<'a>,
    autoboxing: bool,
    free_vars: &'v [String],
    bounds: FxHashMap<String, Bounds>,
}

impl Solver<'_, '_> {
    fn is_free(&self, name: &str) -> bool {
        self.free_vars.iter().any(|v| v == name)
    }

    fn incompatible(formal: &Type, actual: &Type) -> InferenceError {
        InferenceError::Incompatible {
            expected: formal.clone(),
            found: actual.clone(),
        }
    }

    fn reduce(
        &mut self,
        formal: &Type,
        actual: &Type,
        rel: Relation,
    ) -> Result<(), InferenceError> {
        if !formal.mentions_any(self.free_vars) {
            let ok = match rel {
                Relation::Compatible => self.types.is_assignable(actual, formal, self.autoboxing),
                Relation::Subtype => self.types.is_subtype_unchecked(actual, formal),
                Relation::Equal => Types::is_same_type(actual, formal),
                Relation::Supertype => self.types.is_subtype_unchecked(formal, actual),
            };
            return if ok {
                Ok(())
            } else {
                Err(Self::incompatible(formal, actual))
            };
        }

        if actual.is_null() && rel != Relation::Equal {
            return Ok(());
        }
        let boxed;
        let actual = if actual.is_primitive() {
            if rel != Relation::Compatible || !self.autoboxing {
                return Err(Self::incompatible(formal, actual));
            }
            boxed = Types::boxed(actual).ok_or_else(|| Self::incompatible(formal, actual))?;
            &boxed
        } else {
            actual
        };

        match formal {
            Type::TypeVar { name, .. } if self.is_free(name) => {
                if matches!(actual, Type::Wildcard { .. }) {
                    return Ok(());
                }
                let bounds = self.bounds.entry(name.clone()).or_default();
                match rel {
                    Relation::Compatible | Relation::Subtype => bounds.lower.push(actual.clone()),
                    Relation::Equal => bounds.eq.push(actual.clone()),
                    Relation::Supertype => bounds.upper.push(actual.clone()),
                }
                Ok(())
            }
            Type::Class { name, args } => match rel {
                Relation::Compatible | Relation::Subtype => {
                    let view = self.types.as_super(actual, name);
                    let Some(Type::Class { args: view_args, .. }) = view else {
                        return Err(Self::incompatible(formal, actual));
                    };
                    if view_args.is_empty() {
                        return Ok(());
                    }
                    self.reduce_args(formal, actual, args, &view_args)
                }
                Relation::Equal => match actual {
                    Type::Class {
                        name: actual_name,
                        args: actual_args,
                    } if actual_name == name && actual_args.len() == args.len() => {
                        for (f, a) in args.iter().zip(actual_args) {
                            self.reduce_equal_arg(f, a)?;
                        }
                        Ok(())
                    }
                    _ => Err(Self::incompatible(formal, actual)),
                },
                Relation::Supertype => {
                    let Some(actual_name) = actual.class_name() else {
                        return Err(Self::incompatible(formal, actual));
                    };
                    let Some(Type::Class { args: view_args, .. }) =
                        self.types.as_super(formal, actual_name)
                    else {
                        return Err(Self::incompatible(formal, actual));
                    };
                    let Type::Class {
                        args: actual_args, ..
                    } = actual
                    else {
                        return Ok(());
                    };
                    if view_args.is_empty() || actual_args.len() != view_args.len() {
                        return Ok(());
                    }
                    for (f, a) in view_args.iter().zip(actual_args) {
                        if !matches!(a, Type::Wildcard { .. }) {
                            self.reduce(f, a, Relation::Equal)?;
                        }
                    }
                    Ok(())
                }
            },
            Type::Array(formal_elem) => match actual {
                Type::Array(actual_elem) => {
                    let rel = if actual_elem.is_primitive() || rel == Relation::Equal {
                        Relation::Equal
                    } else {
                        Relation::Subtype
                    };
                    self.reduce(formal_elem, actual_elem, rel)
                }
                _ => Err(Self::incompatible(formal, actual)),
            },
            _ => Ok(()),
        }
    }

    /// Reduce type arguments of a parameterized formal against the
    /// corresponding arguments of the actual type's supertype view.
    fn reduce_args(
        &mut self,
        formal: &Type,
        actual: &Type,
        formal_args: &[Type],
        actual_args: &[Type],
    ) -> Result<(), InferenceError> {
        if formal_args.len() != actual_args.len() {
            return Err(Self::incompatible(formal, actual));
        }
        for (f, a) in formal_args.iter().zip(actual_args) {
            match (f, a) {
                (
                    Type::Wildcard {
                        kind: BoundKind::Extends,
                        bound: Some(bound),
                    },
                    Type::Wildcard {
                        kind: BoundKind::Extends,
                        bound: Some(actual_bound),
                    },
                ) => self.reduce(bound, actual_bound, Relation::Subtype)?,
                (
                    Type::Wildcard {
                        kind: BoundKind::Super,
                        bound: Some(bound),
                    },
                    Type::Wildcard {
                        kind: BoundKind::Super,
                        bound: Some(actual_bound),
                    },
                ) => self.reduce(bound, actual_bound, Relation::Supertype)?,
                (Type::Wildcard { .. }, Type::Wildcard { .. }) => {}
                (
                    Type::Wildcard {
                        kind: BoundKind::Extends,
                        bound: Some(bound),
                    },
                    a,
                ) => self.reduce(bound, a, Relation::Subtype)?,
                (
                    Type::Wildcard {
                        kind: BoundKind::Super,
                        bound: Some(bound),
                    },
                    a,
                ) => self.reduce(bound, a, Relation::Supertype)?,
                (Type::Wildcard { .. }, _) | (_, Type::Wildcard { .. }) => {}
                (f, a) => self.reduce(f, a, Relation::Equal)?,
            }
        }
        Ok(())
    }

    fn reduce_equal_arg(&mut self, formal: &Type, actual: &Type) -> Result<(), InferenceError> {
        match (formal, actual) {
            (
                Type::Wildcard {
                    kind: fk,
                    bound: Some(fb),
                },
                Type::Wildcard {
                    kind: ak,
                    bound: Some(ab),
                },
            ) if fk == ak => self.reduce(fb, ab, Relation::Equal),
            (Type::Wildcard { .. }, _) | (_, Type::Wildcard { .. }) => Ok(()),
            _ => self.reduce(formal, actual, Relation::Equal),
        }
    }

    fn resolve(&self, var: &str) -> Result<Type, InferenceError> {
        let Some(bounds) = self.bounds.get(var) else {
            return Ok(Type::object());
        };

        let solution = if let Some(first) = bounds.eq.first() {
            if let Some(other) = bounds.eq.iter().find(|t| *t != first) {
                return Err(InferenceError::Conflict {
                    var: var.to_string(),
                    first: first.clone(),
                    second: other.clone(),
                });
            }
            first.clone()
        } else if !bounds.lower.is_empty() {
            self.types
                .lub(&bounds.lower)
                .ok_or_else(|| InferenceError::Unsatisfiable {
                    var: var.to_string(),
                })?
        } else if let Some(most_specific) = bounds.upper.iter().find(|candidate| {
            bounds
                .upper
                .iter()
                .all(|other| self.types.is_subtype_unchecked(candidate, other))
        }) {
            most_specific.clone()
        } else if let Some(first) = bounds.upper.first() {
            first.clone()
        } else {
            Type::object()
        };

        let satisfied = bounds
            .lower
            .iter()
            .all(|lower| self.types.is_subtype_unchecked(lower, &solution))
            && bounds
                .upper
                .iter()
                .all(|upper| self.types.is_subtype_unchecked(&solution, upper));
        if satisfied {
            Ok(solution)
        } else {
            Err(InferenceError::Unsatisfiable {
                var: var.to_string(),
            })
        }
    }
}
