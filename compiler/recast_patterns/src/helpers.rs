//! Built-in helper forms.
//!
//! Templates are written against a small helper class whose static methods
//! stand for pattern constructs that have no syntax of their own:
//!
//! | Helper call | Pattern |
//! |---|---|
//! | `anyOf(a, b, ...)` | matches any of the alternatives |
//! | `<T>isInstance(x)` | `x instanceof T` |
//! | `<T>clazz()` | `T.class` |
//! | `<T>newArray(n)` | `new T[n]` |
//! | `<E>enumValueOf(s)` | `E.valueOf(s)` |
//!
//! The helper table is built once per process.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::tree::UExpr;
use crate::types::UType;

/// Qualified name of the helper class.
pub const HELPER_CLASS: &str = "recast.Refaster";

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Helper {
    AnyOf,
    IsInstance,
    Clazz,
    NewArray,
    EnumValueOf,
}

fn table() -> &'static FxHashMap<&'static str, Helper> {
    static TABLE: OnceLock<FxHashMap<&'static str, Helper>> = OnceLock::new();
    TABLE.get_or_init(|| Helper::ALL.iter().map(|helper| (helper.member(), *helper)).collect())
}

impl Helper {
    pub const ALL: [Helper; 5] = [
        Helper::AnyOf,
        Helper::IsInstance,
        Helper::Clazz,
        Helper::NewArray,
        Helper::EnumValueOf,
    ];

    pub const fn member(self) -> &'static str {
        match self {
            Helper::AnyOf => "anyOf",
            Helper::IsInstance => "isInstance",
            Helper::Clazz => "clazz",
            Helper::NewArray => "newArray",
            Helper::EnumValueOf => "enumValueOf",
        }
    }

    /// The helper a call to `class.member` names, if any.
    pub fn lookup(class: &str, member: &str) -> Option<Helper> {
        if class != HELPER_CLASS {
            return None;
        }
        table().get(member).copied()
    }

    /// The pattern a helper call stands for. `type_arg` names the call's
    /// explicit type argument; `None` if the arity is wrong.
    pub fn expand(self, type_arg: &str, args: Vec<UExpr>) -> Option<UExpr> {
        match self {
            Helper::AnyOf => (!args.is_empty()).then(|| UExpr::any_of(args)),
            Helper::IsInstance => {
                let [expr] = <[UExpr; 1]>::try_from(args).ok()?;
                Some(UExpr::InstanceOf {
                    expr: Box::new(expr),
                    ty: Box::new(UExpr::type_var(type_arg)),
                })
            }
            Helper::Clazz => args.is_empty().then(|| {
                UExpr::select(
                    UExpr::type_var(type_arg),
                    "class",
                    UType::generic("java.lang.Class", vec![UType::var(type_arg)]),
                )
            }),
            Helper::NewArray => {
                let [size] = <[UExpr; 1]>::try_from(args).ok()?;
                Some(UExpr::NewArray {
                    elem_ty: Some(Box::new(UExpr::type_var(type_arg))),
                    dims: vec![size],
                    init: None,
                })
            }
            Helper::EnumValueOf => {
                let [name] = <[UExpr; 1]>::try_from(args).ok()?;
                let value_of = UType::method(vec![UType::string()], UType::var(type_arg));
                Some(UExpr::call(
                    UExpr::select(UExpr::type_var(type_arg), "valueOf", value_of),
                    vec![name],
                ))
            }
        }
    }
}
