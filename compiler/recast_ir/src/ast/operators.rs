//! Operators
//!
//! Java's infix and prefix/postfix operators, with the precedence table
//! the printer consults and the complement/De Morgan tables that negation
//! relies on.

/// Infix operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    // Additive and multiplicative
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Relational and equality
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Conditional
    And,
    Or,

    // Bit and shift
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
}

impl BinaryOp {
    /// The token as written in Java source.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::UShr => ">>>",
        }
    }

    /// Binding level; a larger number binds more loosely.
    ///
    /// See [`Expr::precedence`](super::Expr::precedence) for the levels of
    /// the non-binary forms.
    ///
    /// - 3: `*` `/` `%`
    /// - 4: `+` `-`
    /// - 5: `<<` `>>` `>>>`
    /// - 6: `<` `>` `<=` `>=` (and `instanceof`)
    /// - 7: `==` `!=`
    /// - 8: `&`
    /// - 9: `^`
    /// - 10: `|`
    /// - 11: `&&`
    /// - 12: `||`
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Mul | Self::Div | Self::Mod => 3,
            Self::Add | Self::Sub => 4,
            Self::Shl | Self::Shr | Self::UShr => 5,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => 6,
            Self::Eq | Self::NotEq => 7,
            Self::BitAnd => 8,
            Self::BitXor => 9,
            Self::BitOr => 10,
            Self::And => 11,
            Self::Or => 12,
        }
    }

    /// The complementary comparison: `!(a < b)` is `a >= b`.
    pub const fn complement(self) -> Option<Self> {
        match self {
            Self::Eq => Some(Self::NotEq),
            Self::NotEq => Some(Self::Eq),
            Self::Lt => Some(Self::GtEq),
            Self::LtEq => Some(Self::Gt),
            Self::Gt => Some(Self::LtEq),
            Self::GtEq => Some(Self::Lt),
            _ => None,
        }
    }

    /// The De Morgan dual: `!(a && b)` is `!a || !b`.
    pub const fn de_morgan(self) -> Option<Self> {
        match self {
            Self::And => Some(Self::Or),
            Self::Or => Some(Self::And),
            Self::BitAnd => Some(Self::BitOr),
            Self::BitOr => Some(Self::BitAnd),
            _ => None,
        }
    }

    /// `a op b == b op a` for every operand pair.
    pub const fn is_commutative(self) -> bool {
        matches!(
            self,
            Self::Add
                | Self::Mul
                | Self::Eq
                | Self::NotEq
                | Self::And
                | Self::Or
                | Self::BitAnd
                | Self::BitOr
                | Self::BitXor
        )
    }
}

/// Prefix and postfix operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    PreInc,
    PreDec,
    PostInc,
    PostDec,
    Plus,
    Neg,
    BitNot,
    Not,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::PreInc | Self::PostInc => "++",
            Self::PreDec | Self::PostDec => "--",
            Self::Plus => "+",
            Self::Neg => "-",
            Self::BitNot => "~",
            Self::Not => "!",
        }
    }

    /// Postfix operators print after their operand.
    pub const fn is_postfix(self) -> bool {
        matches!(self, Self::PostInc | Self::PostDec)
    }

    pub const fn precedence(self) -> u8 {
        if self.is_postfix() {
            1
        } else {
            2
        }
    }
}
