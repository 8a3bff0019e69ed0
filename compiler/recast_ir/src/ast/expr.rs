//! Expression nodes.

use std::fmt;

use super::{BinaryOp, UnaryOp, ASSIGN_PRECEDENCE, CONDITIONAL_PRECEDENCE};
use crate::{PrimitiveKind, Span, SymbolId, Type};

/// Literal values.
///
/// Floating point literals are stored as bits so literals stay `Eq + Hash`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    Int(i32),
    Long(i64),
    Float(u32),
    Double(u64),
    Char(char),
    Bool(bool),
    String(String),
    Null,
}

impl Literal {
    pub fn float(value: f32) -> Self {
        Literal::Float(value.to_bits())
    }

    pub fn double(value: f64) -> Self {
        Literal::Double(value.to_bits())
    }

    /// The host type of this literal.
    pub fn ty(&self) -> Type {
        match self {
            Literal::Int(_) => Type::INT,
            Literal::Long(_) => Type::LONG,
            Literal::Float(_) => Type::Primitive(PrimitiveKind::Float),
            Literal::Double(_) => Type::DOUBLE,
            Literal::Char(_) => Type::CHAR,
            Literal::Bool(_) => Type::BOOLEAN,
            Literal::String(_) => Type::string(),
            Literal::Null => Type::NULL,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Long(v) => write!(f, "{v}L"),
            Literal::Float(bits) => write!(f, "{:?}f", f32::from_bits(*bits)),
            Literal::Double(bits) => write!(f, "{:?}", f64::from_bits(*bits)),
            Literal::Char(c) => write!(f, "'{}'", c.escape_default()),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::String(s) => write!(f, "\"{}\"", s.escape_default()),
            Literal::Null => f.write_str("null"),
        }
    }
}

/// Expression node.
///
/// `ty` is the resolved host type. For a method-name expression (the callee
/// of a call) it is the method's signature.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
    pub span: Span,
}

/// Expression variants.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    Literal(Literal),

    /// Identifier: local variable, parameter, field, method or class name.
    Ident { name: String, sym: Option<SymbolId> },

    /// Member select: `receiver.name`. Also used for qualified class names.
    Select {
        receiver: Box<Expr>,
        name: String,
        sym: Option<SymbolId>,
    },

    This,
    Super,

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    Unary { op: UnaryOp, operand: Box<Expr> },

    Assign { target: Box<Expr>, value: Box<Expr> },

    /// `target op= value`
    CompoundAssign {
        op: BinaryOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },

    Conditional {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },

    /// `(ty) expr`; `ty` is a type expression.
    Cast { ty: Box<Expr>, expr: Box<Expr> },

    /// `expr instanceof ty`
    InstanceOf { expr: Box<Expr>, ty: Box<Expr> },

    /// Method invocation. `callee` is an `Ident` or `Select` naming the
    /// method.
    Call { callee: Box<Expr>, args: Vec<Expr> },

    /// `array[index]`
    Index { array: Box<Expr>, index: Box<Expr> },

    /// `new T[d1][d2]`, `new T[] {..}` or a bare initializer `{..}`.
    NewArray {
        elem_ty: Option<Box<Expr>>,
        dims: Vec<Expr>,
        init: Option<Vec<Expr>>,
    },

    /// `new C(args)`
    NewClass { class: Box<Expr>, args: Vec<Expr> },

    Paren(Box<Expr>),

    /// Type syntax: `int`, `boolean`, ...
    PrimitiveType(PrimitiveKind),

    /// Type syntax: `Base<Args>`.
    TypeApply { base: Box<Expr>, args: Vec<Expr> },

    /// Type syntax: `Elem[]`.
    ArrayType(Box<Expr>),
}

/// Fieldless mirror of [`ExprKind`], for kind filters.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprTag {
    Literal,
    Ident,
    Select,
    This,
    Super,
    Binary,
    Unary,
    Assign,
    CompoundAssign,
    Conditional,
    Cast,
    InstanceOf,
    Call,
    Index,
    NewArray,
    NewClass,
    Paren,
    PrimitiveType,
    TypeApply,
    ArrayType,
}

impl Expr {
    /// Create a synthesized expression (no source span).
    pub fn new(kind: ExprKind, ty: Type) -> Self {
        Expr {
            kind,
            ty,
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn tag(&self) -> ExprTag {
        match &self.kind {
            ExprKind::Literal(_) => ExprTag::Literal,
            ExprKind::Ident { .. } => ExprTag::Ident,
            ExprKind::Select { .. } => ExprTag::Select,
            ExprKind::This => ExprTag::This,
            ExprKind::Super => ExprTag::Super,
            ExprKind::Binary { .. } => ExprTag::Binary,
            ExprKind::Unary { .. } => ExprTag::Unary,
            ExprKind::Assign { .. } => ExprTag::Assign,
            ExprKind::CompoundAssign { .. } => ExprTag::CompoundAssign,
            ExprKind::Conditional { .. } => ExprTag::Conditional,
            ExprKind::Cast { .. } => ExprTag::Cast,
            ExprKind::InstanceOf { .. } => ExprTag::InstanceOf,
            ExprKind::Call { .. } => ExprTag::Call,
            ExprKind::Index { .. } => ExprTag::Index,
            ExprKind::NewArray { .. } => ExprTag::NewArray,
            ExprKind::NewClass { .. } => ExprTag::NewClass,
            ExprKind::Paren(_) => ExprTag::Paren,
            ExprKind::PrimitiveType(_) => ExprTag::PrimitiveType,
            ExprKind::TypeApply { .. } => ExprTag::TypeApply,
            ExprKind::ArrayType(_) => ExprTag::ArrayType,
        }
    }

    /// Binding strength for the printer: lower binds tighter.
    ///
    /// Primary expressions are 0; see [`BinaryOp::precedence`] for the
    /// binary levels.
    pub fn precedence(&self) -> u8 {
        match &self.kind {
            ExprKind::Binary { op, .. } => op.precedence(),
            ExprKind::Unary { op, .. } => op.precedence(),
            ExprKind::Cast { .. } => 2,
            ExprKind::InstanceOf { .. } => 6,
            ExprKind::Conditional { .. } => CONDITIONAL_PRECEDENCE,
            ExprKind::Assign { .. } | ExprKind::CompoundAssign { .. } => ASSIGN_PRECEDENCE,
            _ => 0,
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn skip_parens(&self) -> &Expr {
        let mut expr = self;
        while let ExprKind::Paren(inner) = &expr.kind {
            expr = inner;
        }
        expr
    }

    /// The symbol an identifier or member select resolves to.
    pub fn symbol(&self) -> Option<SymbolId> {
        match &self.kind {
            ExprKind::Ident { sym, .. } | ExprKind::Select { sym, .. } => *sym,
            _ => None,
        }
    }

    /// Whether `sym` is referenced anywhere inside this expression.
    pub fn references(&self, sym: SymbolId) -> bool {
        if self.symbol() == Some(sym) {
            return true;
        }
        let mut found = false;
        self.for_each_child(|child| found = found || child.references(sym));
        found
    }

    /// Call `f` on each direct child, in source order.
    pub fn for_each_child<'a>(&'a self, mut f: impl FnMut(&'a Expr)) {
        match &self.kind {
            ExprKind::Literal(_)
            | ExprKind::Ident { .. }
            | ExprKind::This
            | ExprKind::Super
            | ExprKind::PrimitiveType(_) => {}
            ExprKind::Select { receiver, .. } => f(receiver),
            ExprKind::Unary { operand, .. } => f(operand),
            ExprKind::Paren(inner) | ExprKind::ArrayType(inner) => f(inner),
            ExprKind::Binary { left, right, .. } => {
                f(left);
                f(right);
            }
            ExprKind::Assign { target, value } | ExprKind::CompoundAssign { target, value, .. } => {
                f(target);
                f(value);
            }
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                f(cond);
                f(then_expr);
                f(else_expr);
            }
            ExprKind::Cast { ty, expr } => {
                f(ty);
                f(expr);
            }
            ExprKind::InstanceOf { expr, ty } => {
                f(expr);
                f(ty);
            }
            ExprKind::Call { callee, args } => {
                f(callee);
                args.iter().for_each(f);
            }
            ExprKind::Index { array, index } => {
                f(array);
                f(index);
            }
            ExprKind::NewArray {
                elem_ty,
                dims,
                init,
            } => {
                if let Some(elem_ty) = elem_ty {
                    f(elem_ty);
                }
                dims.iter().for_each(&mut f);
                if let Some(init) = init {
                    init.iter().for_each(f);
                }
            }
            ExprKind::NewClass { class, args } => {
                f(class);
                args.iter().for_each(f);
            }
            ExprKind::TypeApply { base, args } => {
                f(base);
                args.iter().for_each(f);
            }
        }
    }

    // ==========================================================================
    // Constructors
    // ==========================================================================

    pub fn literal(lit: Literal) -> Self {
        let ty = lit.ty();
        Expr::new(ExprKind::Literal(lit), ty)
    }

    pub fn int(value: i32) -> Self {
        Expr::literal(Literal::Int(value))
    }

    pub fn bool(value: bool) -> Self {
        Expr::literal(Literal::Bool(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::literal(Literal::String(value.into()))
    }

    pub fn null() -> Self {
        Expr::literal(Literal::Null)
    }

    pub fn ident(name: impl Into<String>, sym: Option<SymbolId>, ty: Type) -> Self {
        Expr::new(
            ExprKind::Ident {
                name: name.into(),
                sym,
            },
            ty,
        )
    }

    pub fn select(
        receiver: Expr,
        name: impl Into<String>,
        sym: Option<SymbolId>,
        ty: Type,
    ) -> Self {
        Expr::new(
            ExprKind::Select {
                receiver: Box::new(receiver),
                name: name.into(),
                sym,
            },
            ty,
        )
    }

    /// Qualified class reference, printed as written: `java.util.List`.
    pub fn qualified_class(qualified: &str, ty: Type) -> Self {
        let mut parts = qualified.split('.');
        let first = parts.next().unwrap_or_default();
        let mut expr = Expr::ident(first, None, Type::Unknown);
        for part in parts {
            expr = Expr::select(expr, part, None, Type::Unknown);
        }
        expr.ty = ty;
        expr
    }

    pub fn this(ty: Type) -> Self {
        Expr::new(ExprKind::This, ty)
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr, ty: Type) -> Self {
        Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty,
        )
    }

    pub fn unary(op: UnaryOp, operand: Expr, ty: Type) -> Self {
        Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            ty,
        )
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        let ty = target.ty.clone();
        Expr::new(
            ExprKind::Assign {
                target: Box::new(target),
                value: Box::new(value),
            },
            ty,
        )
    }

    pub fn conditional(cond: Expr, then_expr: Expr, else_expr: Expr, ty: Type) -> Self {
        Expr::new(
            ExprKind::Conditional {
                cond: Box::new(cond),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            },
            ty,
        )
    }

    pub fn call(callee: Expr, args: Vec<Expr>, ty: Type) -> Self {
        Expr::new(
            ExprKind::Call {
                callee: Box::new(callee),
                args,
            },
            ty,
        )
    }

    pub fn paren(inner: Expr) -> Self {
        let ty = inner.ty.clone();
        Expr::new(ExprKind::Paren(Box::new(inner)), ty)
    }

    pub fn primitive_type(kind: PrimitiveKind) -> Self {
        Expr::new(ExprKind::PrimitiveType(kind), Type::Primitive(kind))
    }
}
