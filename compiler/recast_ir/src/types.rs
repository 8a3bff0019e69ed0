//! Host types.
//!
//! The resolved type attached to every expression of a checked program.
//! Class types are identified by their fully qualified name; generic
//! instantiations carry their type arguments in declaration order.

use std::fmt;

/// Primitive type kinds, including the `void` and `null` pseudo-types.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
    Void,
    /// The type of the `null` literal.
    Null,
}

impl PrimitiveKind {
    /// Source keyword for this kind.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Char => "char",
            Self::Float => "float",
            Self::Double => "double",
            Self::Void => "void",
            Self::Null => "null",
        }
    }

    /// Qualified name of the wrapper class used by boxing conversion.
    pub const fn box_class(self) -> Option<&'static str> {
        match self {
            Self::Boolean => Some("java.lang.Boolean"),
            Self::Byte => Some("java.lang.Byte"),
            Self::Short => Some("java.lang.Short"),
            Self::Int => Some("java.lang.Integer"),
            Self::Long => Some("java.lang.Long"),
            Self::Char => Some("java.lang.Character"),
            Self::Float => Some("java.lang.Float"),
            Self::Double => Some("java.lang.Double"),
            Self::Void | Self::Null => None,
        }
    }

    /// Inverse of [`PrimitiveKind::box_class`].
    pub fn unboxed_from(class: &str) -> Option<Self> {
        let kind = match class {
            "java.lang.Boolean" => Self::Boolean,
            "java.lang.Byte" => Self::Byte,
            "java.lang.Short" => Self::Short,
            "java.lang.Integer" => Self::Int,
            "java.lang.Long" => Self::Long,
            "java.lang.Character" => Self::Char,
            "java.lang.Float" => Self::Float,
            "java.lang.Double" => Self::Double,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether `self` converts to `other` by identity or widening primitive
    /// conversion.
    pub fn widens_to(self, other: Self) -> bool {
        use PrimitiveKind::{Byte, Char, Double, Float, Int, Long, Short};
        if self == other {
            return true;
        }
        match self {
            Byte => matches!(other, Short | Int | Long | Float | Double),
            Short | Char => matches!(other, Int | Long | Float | Double),
            Int => matches!(other, Long | Float | Double),
            Long => matches!(other, Float | Double),
            Float => other == Double,
            _ => false,
        }
    }
}

/// Wildcard bound kinds: `?`, `? extends T`, `? super T`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundKind {
    Unbound,
    Extends,
    Super,
}

/// A resolved host type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    Primitive(PrimitiveKind),
    /// Class or interface type; an empty argument list is a raw or
    /// non-generic type.
    Class { name: String, args: Vec<Type> },
    Array(Box<Type>),
    /// A type variable with its declared bounds.
    ///
    /// A bound that mentions the variable itself (`T extends Comparable<T>`)
    /// refers to it through an unbounded `TypeVar` of the same name. Two
    /// variables with one name denote the same variable.
    TypeVar {
        name: String,
        upper: Box<Type>,
        lower: Option<Box<Type>>,
    },
    Wildcard {
        kind: BoundKind,
        bound: Option<Box<Type>>,
    },
    Method {
        params: Vec<Type>,
        ret: Box<Type>,
    },
    /// A generic method signature: `<T...> (params) ret`.
    ForAll { vars: Vec<String>, method: Box<Type> },
    /// Type of a synthesized node whose type was never computed.
    Unknown,
}

impl Type {
    pub const BOOLEAN: Type = Type::Primitive(PrimitiveKind::Boolean);
    pub const INT: Type = Type::Primitive(PrimitiveKind::Int);
    pub const LONG: Type = Type::Primitive(PrimitiveKind::Long);
    pub const CHAR: Type = Type::Primitive(PrimitiveKind::Char);
    pub const DOUBLE: Type = Type::Primitive(PrimitiveKind::Double);
    pub const VOID: Type = Type::Primitive(PrimitiveKind::Void);
    pub const NULL: Type = Type::Primitive(PrimitiveKind::Null);

    /// A non-generic (or raw) class type.
    pub fn class(name: impl Into<String>) -> Self {
        Type::Class {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A parameterized class type.
    pub fn generic(name: impl Into<String>, args: Vec<Type>) -> Self {
        Type::Class {
            name: name.into(),
            args,
        }
    }

    pub fn array(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    /// A type variable bounded only by `Object`.
    pub fn var(name: impl Into<String>) -> Self {
        Type::bounded_var(name, Type::object())
    }

    /// `name extends upper`.
    pub fn bounded_var(name: impl Into<String>, upper: Type) -> Self {
        Type::TypeVar {
            name: name.into(),
            upper: Box::new(upper),
            lower: None,
        }
    }

    /// The same variable, additionally bounded from below.
    #[must_use]
    pub fn with_lower_bound(self, bound: Type) -> Self {
        match self {
            Type::TypeVar { name, upper, .. } => Type::TypeVar {
                name,
                upper,
                lower: Some(Box::new(bound)),
            },
            other => other,
        }
    }

    pub fn method(params: Vec<Type>, ret: Type) -> Self {
        Type::Method {
            params,
            ret: Box::new(ret),
        }
    }

    pub fn object() -> Self {
        Type::class("java.lang.Object")
    }

    pub fn string() -> Self {
        Type::class("java.lang.String")
    }

    /// `?`, `? extends bound` or `? super bound`.
    pub fn wildcard(kind: BoundKind, bound: Option<Type>) -> Self {
        Type::Wildcard {
            kind,
            bound: bound.map(Box::new),
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(kind) if !matches!(kind, PrimitiveKind::Null))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveKind::Null))
    }

    pub fn is_boolean(&self) -> bool {
        match self {
            Type::Primitive(PrimitiveKind::Boolean) => true,
            Type::Class { name, .. } => name == "java.lang.Boolean",
            _ => false,
        }
    }

    /// Reference types: classes, arrays, type variables and `null`.
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Type::Class { .. } | Type::Array(_) | Type::TypeVar { .. } | Type::Wildcard { .. }
        ) || self.is_null()
    }

    /// Qualified class name, for class types.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Type::Class { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Check whether the type mentions a type variable from `vars`.
    pub fn mentions_any(&self, vars: &[String]) -> bool {
        match self {
            Type::TypeVar { name, .. } => vars.iter().any(|v| v == name),
            Type::Class { args, .. } => args.iter().any(|a| a.mentions_any(vars)),
            Type::Array(elem) => elem.mentions_any(vars),
            Type::Wildcard { bound, .. } => bound.as_ref().is_some_and(|b| b.mentions_any(vars)),
            Type::Method { params, ret } => {
                params.iter().any(|p| p.mentions_any(vars)) || ret.mentions_any(vars)
            }
            Type::ForAll { method, .. } => method.mentions_any(vars),
            Type::Primitive(_) | Type::Unknown => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(kind) => f.write_str(kind.keyword()),
            Type::Class { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    write_joined(f, args)?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            Type::Array(elem) => write!(f, "{elem}[]"),
            Type::TypeVar { name, .. } => f.write_str(name),
            Type::Wildcard { kind, bound } => match (kind, bound) {
                (BoundKind::Extends, Some(b)) => write!(f, "? extends {b}"),
                (BoundKind::Super, Some(b)) => write!(f, "? super {b}"),
                _ => f.write_str("?"),
            },
            Type::Method { params, ret } => {
                f.write_str("(")?;
                write_joined(f, params)?;
                write!(f, "){ret}")
            }
            Type::ForAll { vars, method } => write!(f, "<{}>{method}", vars.join(",")),
            Type::Unknown => f.write_str("<unknown>"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, types: &[Type]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}
