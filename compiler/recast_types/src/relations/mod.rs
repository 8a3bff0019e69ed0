//! Type relations.
//!
//! Subtyping, assignability, boxing, erasure, supertype projection and
//! least upper bounds over host types, answered against a [`ClassTable`].

use recast_ir::{BoundKind, PrimitiveKind, Type};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::class_table::OBJECT;
use crate::ClassTable;

/// Type utilities bound to one class table.
#[derive(Copy, Clone, Debug)]
pub struct Types<'a> {
    classes: &'a ClassTable,
}

impl<'a> Types<'a> {
    pub fn new(classes: &'a ClassTable) -> Self {
        Types { classes }
    }

    pub fn classes(&self) -> &'a ClassTable {
        self.classes
    }

    // ==========================================================================
    // Substitution and erasure
    // ==========================================================================

    /// Replace type variables named in `map`.
    pub fn subst(ty: &Type, map: &FxHashMap<String, Type>) -> Type {
        if map.is_empty() {
            return ty.clone();
        }
        match ty {
            Type::TypeVar { name, upper, lower } => match map.get(name) {
                Some(replacement) => replacement.clone(),
                None => Type::TypeVar {
                    name: name.clone(),
                    upper: Box::new(Self::subst(upper, map)),
                    lower: lower.as_ref().map(|l| Box::new(Self::subst(l, map))),
                },
            },
            Type::Class { name, args } => Type::Class {
                name: name.clone(),
                args: args.iter().map(|a| Self::subst(a, map)).collect(),
            },
            Type::Array(elem) => Type::array(Self::subst(elem, map)),
            Type::Wildcard { kind, bound } => Type::Wildcard {
                kind: *kind,
                bound: bound.as_ref().map(|b| Box::new(Self::subst(b, map))),
            },
            Type::Method { params, ret } => Type::method(
                params.iter().map(|p| Self::subst(p, map)).collect(),
                Self::subst(ret, map),
            ),
            Type::ForAll { vars, method } => {
                let inner: FxHashMap<String, Type> = map
                    .iter()
                    .filter(|(k, _)| !vars.contains(k))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                Type::ForAll {
                    vars: vars.clone(),
                    method: Box::new(Self::subst(method, &inner)),
                }
            }
            Type::Primitive(_) | Type::Unknown => ty.clone(),
        }
    }

    /// Type erasure: drop type arguments, type variables become the erasure
    /// of their upper bound.
    pub fn erasure(ty: &Type) -> Type {
        match ty {
            Type::Class { name, .. } => Type::class(name.clone()),
            Type::Array(elem) => Type::array(Self::erasure(elem)),
            Type::TypeVar { upper, .. } => Self::erasure(upper),
            Type::Wildcard { kind, bound } => match (kind, bound) {
                (BoundKind::Extends, Some(bound)) => Self::erasure(bound),
                _ => Type::object(),
            },
            Type::Method { params, ret } => {
                Type::method(params.iter().map(Self::erasure).collect(), Self::erasure(ret))
            }
            Type::ForAll { method, .. } => Self::erasure(method),
            Type::Primitive(_) | Type::Unknown => ty.clone(),
        }
    }

    /// The nearest non-variable upper bound of `ty`.
    fn upper_bound(ty: Type) -> Type {
        match ty {
            Type::TypeVar { upper, .. } => Self::upper_bound(*upper),
            other => other,
        }
    }

    // ==========================================================================
    // Boxing
    // ==========================================================================

    /// Boxing conversion of a primitive type.
    pub fn boxed(ty: &Type) -> Option<Type> {
        match ty {
            Type::Primitive(kind) => kind.box_class().map(Type::class),
            _ => None,
        }
    }

    /// Unboxing conversion of a wrapper class type.
    pub fn unboxed(ty: &Type) -> Option<Type> {
        ty.class_name()
            .and_then(PrimitiveKind::unboxed_from)
            .map(Type::Primitive)
    }

    // ==========================================================================
    // Supertypes
    // ==========================================================================

    /// View `ty` as an instance of class `target`, substituting type
    /// arguments along the way. A raw `ty` yields a raw supertype.
    pub fn as_super(&self, ty: &Type, target: &str) -> Option<Type> {
        match ty {
            Type::Class { name, args } => {
                if name == target {
                    return Some(ty.clone());
                }
                if target == OBJECT {
                    return Some(Type::object());
                }
                let decl = self.classes.get(name)?;
                let raw = args.is_empty() && !decl.type_params.is_empty();
                let map: FxHashMap<String, Type> = decl
                    .type_params
                    .iter()
                    .cloned()
                    .zip(args.iter().cloned())
                    .collect();
                decl.supertypes.iter().find_map(|sup| {
                    let sup = if raw {
                        Self::erasure(sup)
                    } else {
                        Self::subst(sup, &map)
                    };
                    self.as_super(&sup, target)
                })
            }
            Type::Array(_) => matches!(
                target,
                OBJECT | "java.lang.Cloneable" | "java.io.Serializable"
            )
            .then(|| Type::class(target)),
            Type::TypeVar { upper, .. } => self.as_super(upper, target),
            _ => None,
        }
    }

    /// Erased names of `ty` and all its supertypes, nearest first, ending
    /// with `Object`.
    fn erased_supertypes(&self, ty: &Type) -> Vec<String> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        let mut queue = std::collections::VecDeque::new();
        if let Some(name) = ty.class_name() {
            queue.push_back(name.to_string());
        }
        while let Some(name) = queue.pop_front() {
            if name == OBJECT || !seen.insert(name.clone()) {
                continue;
            }
            if let Some(decl) = self.classes.get(&name) {
                for sup in &decl.supertypes {
                    if let Some(sup_name) = sup.class_name() {
                        queue.push_back(sup_name.to_string());
                    }
                }
            }
            out.push(name);
        }
        out.push(OBJECT.to_string());
        out
    }

    // ==========================================================================
    // Subtyping
    // ==========================================================================

    /// Structural type identity. Type variables are identified by name,
    /// whatever bounds each occurrence carries.
    pub fn is_same_type(a: &Type, b: &Type) -> bool {
        let all_same = |xs: &[Type], ys: &[Type]| {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| Self::is_same_type(x, y))
        };
        match (a, b) {
            (Type::TypeVar { name: x, .. }, Type::TypeVar { name: y, .. }) => x == y,
            (Type::Class { name: x, args: xs }, Type::Class { name: y, args: ys }) => {
                x == y && all_same(xs, ys)
            }
            (Type::Array(x), Type::Array(y)) => Self::is_same_type(x, y),
            (
                Type::Wildcard { kind: k1, bound: b1 },
                Type::Wildcard { kind: k2, bound: b2 },
            ) => {
                k1 == k2
                    && match (b1, b2) {
                        (Some(x), Some(y)) => Self::is_same_type(x, y),
                        (None, None) => true,
                        _ => false,
                    }
            }
            (Type::Method { params: p1, ret: r1 }, Type::Method { params: p2, ret: r2 }) => {
                all_same(p1, p2) && Self::is_same_type(r1, r2)
            }
            (Type::ForAll { vars: v1, method: m1 }, Type::ForAll { vars: v2, method: m2 }) => {
                v1 == v2 && Self::is_same_type(m1, m2)
            }
            _ => a == b,
        }
    }

    /// Checked subtyping: a raw type is not a subtype of a parameterized one.
    pub fn is_subtype(&self, sub: &Type, sup: &Type) -> bool {
        self.subtype(sub, sup, false)
    }

    /// Subtyping that allows unchecked conversion from raw types.
    pub fn is_subtype_unchecked(&self, sub: &Type, sup: &Type) -> bool {
        self.subtype(sub, sup, true)
    }

    fn subtype(&self, sub: &Type, sup: &Type, unchecked: bool) -> bool {
        if Self::is_same_type(sub, sup) {
            return true;
        }
        match (sub, sup) {
            (Type::Primitive(PrimitiveKind::Null), sup) => sup.is_reference(),
            (Type::Primitive(a), Type::Primitive(b)) => a.widens_to(*b),
            (Type::Primitive(_), _) | (_, Type::Primitive(_)) => false,
            (_, Type::Class { name, .. }) if name == OBJECT => sub.is_reference(),
            (_, Type::TypeVar { lower: Some(lower), .. }) => self.subtype(sub, lower, unchecked),
            (Type::TypeVar { upper, .. }, _) => self.subtype(upper, sup, unchecked),
            (Type::Array(a), Type::Array(b)) => {
                if a.is_primitive() || b.is_primitive() {
                    a == b
                } else {
                    self.subtype(a, b, unchecked)
                }
            }
            (Type::Array(_), Type::Class { name, .. }) => self.as_super(sub, name).is_some(),
            (Type::Class { .. }, Type::Class { name, args }) => {
                let Some(Type::Class { args: sub_args, .. }) = self.as_super(sub, name) else {
                    return false;
                };
                if args.is_empty() {
                    return true;
                }
                if sub_args.is_empty() {
                    return unchecked;
                }
                sub_args.len() == args.len()
                    && args
                        .iter()
                        .zip(&sub_args)
                        .all(|(formal, actual)| self.contains(formal, actual, unchecked))
            }
            (Type::Wildcard { kind, bound }, _) => match (kind, bound) {
                (BoundKind::Extends, Some(bound)) => self.subtype(bound, sup, unchecked),
                _ => self.subtype(&Type::object(), sup, unchecked),
            },
            _ => false,
        }
    }

    /// Type argument containment: does the argument `formal` contain `actual`?
    fn contains(&self, formal: &Type, actual: &Type, unchecked: bool) -> bool {
        match formal {
            Type::Wildcard { kind, bound } => match (kind, bound, actual) {
                (BoundKind::Unbound, _, _) | (_, None, _) => true,
                (
                    BoundKind::Extends,
                    Some(bound),
                    Type::Wildcard {
                        kind: BoundKind::Extends,
                        bound: Some(actual),
                    },
                ) => self.subtype(actual, bound, unchecked),
                (
                    BoundKind::Super,
                    Some(bound),
                    Type::Wildcard {
                        kind: BoundKind::Super,
                        bound: Some(actual),
                    },
                ) => self.subtype(bound, actual, unchecked),
                (_, _, Type::Wildcard { .. }) => false,
                (BoundKind::Extends, Some(bound), actual) => self.subtype(actual, bound, unchecked),
                (BoundKind::Super, Some(bound), actual) => self.subtype(bound, actual, unchecked),
            },
            _ => Self::is_same_type(formal, actual),
        }
    }

    /// Assignment compatibility, optionally through boxing or unboxing.
    pub fn is_assignable(&self, from: &Type, to: &Type, autoboxing: bool) -> bool {
        if self.is_subtype_unchecked(from, to) {
            return true;
        }
        if !autoboxing {
            return false;
        }
        if from.is_primitive() {
            return Self::boxed(from).is_some_and(|boxed| self.is_subtype(&boxed, to));
        }
        if to.is_primitive() {
            return Self::unboxed(from).is_some_and(|unboxed| self.is_subtype(&unboxed, to));
        }
        false
    }

    // ==========================================================================
    // Least upper bound
    // ==========================================================================

    /// Least upper bound of a non-empty list of types.
    ///
    /// Intersections are approximated by their first class candidate (or
    /// first interface if no class candidate remains). Differing
    /// parameterizations of the chosen candidate become an unbounded
    /// wildcard per differing argument.
    pub fn lub(&self, types: &[Type]) -> Option<Type> {
        let first = types.first()?;
        if types.iter().all(|t| t == first) {
            return Some(first.clone());
        }

        if types.iter().all(Type::is_primitive) {
            return types
                .iter()
                .find(|candidate| {
                    types.iter().all(|t| match (t, candidate) {
                        (Type::Primitive(a), Type::Primitive(b)) => a.widens_to(*b),
                        _ => false,
                    })
                })
                .cloned()
                .or_else(|| {
                    let boxed: Vec<Type> = types.iter().filter_map(Self::boxed).collect();
                    self.lub(&boxed)
                });
        }

        let refs: Vec<Type> = types
            .iter()
            .filter(|t| !t.is_null())
            .map(|t| Self::boxed(t).unwrap_or_else(|| t.clone()))
            .collect();
        if refs.is_empty() {
            return Some(Type::NULL);
        }
        if refs.iter().all(|t| Self::is_same_type(t, &refs[0])) {
            return Some(refs[0].clone());
        }
        let refs: Vec<Type> = refs.into_iter().map(Self::upper_bound).collect();

        if refs.iter().all(|t| matches!(t, Type::Array(_))) {
            let elems: Vec<Type> = refs
                .iter()
                .filter_map(|t| match t {
                    Type::Array(elem) => Some((**elem).clone()),
                    _ => None,
                })
                .collect();
            if elems.iter().all(Type::is_reference) {
                return self.lub(&elems).map(Type::array);
            }
            return Some(Type::object());
        }

        if !refs.iter().all(|t| matches!(t, Type::Class { .. })) {
            return Some(Type::object());
        }

        let mut candidates = self.erased_supertypes(&refs[0]);
        for ty in &refs[1..] {
            let supers: FxHashSet<String> = self.erased_supertypes(ty).into_iter().collect();
            candidates.retain(|c| supers.contains(c));
        }
        let minimal: Vec<&String> = candidates
            .iter()
            .filter(|c| {
                !candidates.iter().any(|d| {
                    d != *c && self.is_subtype(&Type::class(d.as_str()), &Type::class(c.as_str()))
                })
            })
            .collect();
        let chosen = minimal
            .iter()
            .find(|c| !self.classes.is_interface(c))
            .or_else(|| minimal.first())
            .map_or_else(|| OBJECT.to_string(), |c| (*c).clone());

        let views: Vec<Type> = refs
            .iter()
            .filter_map(|t| self.as_super(t, &chosen))
            .collect();
        let Some(Type::Class { args: first_args, .. }) = views.first() else {
            return Some(Type::class(chosen));
        };
        let args = (0..first_args.len())
            .map(|i| {
                let arg = &first_args[i];
                let same = views.iter().all(|v| match v {
                    Type::Class { args, .. } => args.get(i) == Some(arg),
                    _ => false,
                });
                if same {
                    arg.clone()
                } else {
                    Type::wildcard(BoundKind::Unbound, None)
                }
            })
            .collect();
        Some(Type::generic(chosen, args))
    }
}
