//! Rebuilding host trees from pattern trees.

use recast_ir::{BinaryOp, Expr, ExprKind, Stmt, StmtKind, Type, UnaryOp, VarDecl};

use super::{UExpr, UStmt, UVarDecl};
use crate::bindings::{FreeIdentKey, LocalVarKey, TypeVarKey};
use crate::inliner::Inliner;
use crate::InlineError;

/// Result type of `left op right`, as far as the printer and later
/// matching care.
fn binary_type(op: BinaryOp, left: &Expr, right: &Expr) -> Type {
    match op {
        BinaryOp::Eq
        | BinaryOp::NotEq
        | BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq
        | BinaryOp::And
        | BinaryOp::Or => Type::BOOLEAN,
        BinaryOp::Add if left.ty == Type::string() || right.ty == Type::string() => Type::string(),
        _ => left.ty.clone(),
    }
}

fn return_type(callee: &Type) -> Type {
    match callee {
        Type::Method { ret, .. } => (**ret).clone(),
        Type::ForAll { method, .. } => return_type(method),
        _ => Type::Unknown,
    }
}

/// A `this` synthesized for a bare member reference; it has no source.
fn is_implicit_this(expr: &Expr) -> bool {
    matches!(expr.kind, ExprKind::This) && expr.span.is_empty()
}

fn inline_boxed(expr: &UExpr, inliner: &mut Inliner<'_, '_>) -> Result<Box<Expr>, InlineError> {
    expr.inline(inliner).map(Box::new)
}

impl UExpr {
    /// Rebuild a host expression from this pattern and the inliner's
    /// bindings.
    pub fn inline(&self, inliner: &mut Inliner<'_, '_>) -> Result<Expr, InlineError> {
        let expr = match self {
            UExpr::Literal(lit) => Expr::literal(lit.clone()),
            UExpr::FreeIdent(name) => Expr::clone(inliner.get_binding(&FreeIdentKey::new(name))?),
            UExpr::LocalVarIdent(name) => match inliner.optional_binding(&LocalVarKey::new(name)) {
                Some(bound) => {
                    let ty = inliner
                        .unit()
                        .symbol(bound.symbol)
                        .map_or(Type::Unknown, |symbol| symbol.ty.clone());
                    Expr::ident(bound.name.clone(), Some(bound.symbol), ty)
                }
                None => Expr::ident(name.clone(), None, Type::Unknown),
            },
            UExpr::TypeVarIdent(name) => match inliner.optional_binding(&TypeVarKey::new(name)) {
                Some(bound) => match &bound.expr {
                    Some(witness) => Expr::clone(witness),
                    None => inliner.type_expr(&bound.ty),
                },
                None => Expr::ident(name.clone(), None, Type::var(name)),
            },
            UExpr::ClassIdent(class) => {
                inliner.class_reference(class.top_level(), &class.qualified)
            }
            UExpr::StaticIdent { class, member, ty } => {
                let ty = inliner.inline_type(ty)?;
                inliner.static_reference(class.top_level(), &class.qualified, member, ty)
            }
            UExpr::Binary { op, left, right } => {
                let left = left.inline(inliner)?;
                let right = right.inline(inliner)?;
                let ty = binary_type(*op, &left, &right);
                Expr::binary(*op, left, right, ty)
            }
            UExpr::Unary { op, operand } => {
                let operand = operand.inline(inliner)?;
                let ty = match op {
                    UnaryOp::Not => Type::BOOLEAN,
                    _ => operand.ty.clone(),
                };
                Expr::unary(*op, operand, ty)
            }
            UExpr::Assign { target, value } => {
                Expr::assign(target.inline(inliner)?, value.inline(inliner)?)
            }
            UExpr::CompoundAssign { op, target, value } => {
                let target = inline_boxed(target, inliner)?;
                let ty = target.ty.clone();
                Expr::new(
                    ExprKind::CompoundAssign {
                        op: *op,
                        target,
                        value: inline_boxed(value, inliner)?,
                    },
                    ty,
                )
            }
            UExpr::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                let cond = cond.inline(inliner)?;
                let then_expr = then_expr.inline(inliner)?;
                let else_expr = else_expr.inline(inliner)?;
                let ty = then_expr.ty.clone();
                Expr::conditional(cond, then_expr, else_expr, ty)
            }
            UExpr::Cast { ty, expr } => {
                let ty = inline_boxed(ty, inliner)?;
                let cast_to = ty.ty.clone();
                Expr::new(
                    ExprKind::Cast {
                        ty,
                        expr: inline_boxed(expr, inliner)?,
                    },
                    cast_to,
                )
            }
            UExpr::InstanceOf { expr, ty } => Expr::new(
                ExprKind::InstanceOf {
                    expr: inline_boxed(expr, inliner)?,
                    ty: inline_boxed(ty, inliner)?,
                },
                Type::BOOLEAN,
            ),
            UExpr::MethodInvocation { callee, args } => {
                let callee = callee.inline(inliner)?;
                let ty = return_type(&callee.ty);
                Expr::call(callee, inliner.inline_list(args)?, ty)
            }
            UExpr::MemberSelect { receiver, name, ty } => {
                let receiver = receiver.inline(inliner)?;
                let ty = inliner.inline_type(ty)?;
                if is_implicit_this(&receiver) {
                    Expr::ident(name.clone(), None, ty)
                } else {
                    Expr::select(receiver, name.clone(), None, ty)
                }
            }
            UExpr::ArrayAccess { array, index } => {
                let array = inline_boxed(array, inliner)?;
                let ty = match &array.ty {
                    Type::Array(elem) => (**elem).clone(),
                    _ => Type::Unknown,
                };
                Expr::new(
                    ExprKind::Index {
                        array,
                        index: inline_boxed(index, inliner)?,
                    },
                    ty,
                )
            }
            UExpr::NewArray { elem_ty, dims, init } => {
                let elem_ty = match elem_ty {
                    Some(elem_ty) => Some(inline_boxed(elem_ty, inliner)?),
                    None => None,
                };
                let dims = inliner.inline_list(dims)?;
                let init = match init {
                    Some(init) => Some(inliner.inline_list(init)?),
                    None => None,
                };
                let ty = match &elem_ty {
                    Some(elem) => {
                        (0..dims.len().max(1)).fold(elem.ty.clone(), |ty, _| Type::array(ty))
                    }
                    None => Type::Unknown,
                };
                Expr::new(ExprKind::NewArray { elem_ty, dims, init }, ty)
            }
            UExpr::NewClass { class, args } => {
                let class = inline_boxed(class, inliner)?;
                let ty = class.ty.clone();
                Expr::new(
                    ExprKind::NewClass {
                        class,
                        args: inliner.inline_list(args)?,
                    },
                    ty,
                )
            }
            UExpr::Parens(inner) => Expr::paren(inner.inline(inliner)?),
            UExpr::PrimitiveType(kind) => Expr::primitive_type(*kind),
            UExpr::TypeApply { base, args } => {
                let base = inline_boxed(base, inliner)?;
                let args = args
                    .iter()
                    .map(|arg| arg.inline(inliner))
                    .collect::<Result<Vec<_>, _>>()?;
                let ty = match base.ty.class_name() {
                    Some(name) => {
                        Type::generic(name, args.iter().map(|arg| arg.ty.clone()).collect())
                    }
                    None => Type::Unknown,
                };
                Expr::new(ExprKind::TypeApply { base, args }, ty)
            }
            UExpr::ArrayType(elem) => {
                let elem = inline_boxed(elem, inliner)?;
                let ty = Type::array(elem.ty.clone());
                Expr::new(ExprKind::ArrayType(elem), ty)
            }
            UExpr::AnyOf(_) => return Err(InlineError::NotInlineable("an any-of pattern")),
            UExpr::Repeated(name) => return Err(InlineError::RepeatedOutsideList(name.clone())),
            UExpr::OfKind { expr, .. } => expr.inline(inliner)?,
        };
        Ok(expr)
    }
}

impl UVarDecl {
    /// A declaration matched by this pattern keeps its original name.
    pub fn inline(&self, inliner: &mut Inliner<'_, '_>) -> Result<VarDecl, InlineError> {
        let (name, sym) = match inliner.optional_binding(&LocalVarKey::new(&self.name)) {
            Some(bound) => (bound.name.clone(), Some(bound.symbol)),
            None => (self.name.clone(), None),
        };
        let ty = self.ty.inline(inliner)?;
        let init = match &self.init {
            Some(init) => Some(init.inline(inliner)?),
            None => None,
        };
        Ok(VarDecl::new(name, ty, init, sym))
    }
}

fn inline_stmt_boxed(
    stmt: &UStmt,
    inliner: &mut Inliner<'_, '_>,
) -> Result<Box<Stmt>, InlineError> {
    stmt.inline(inliner).map(Box::new)
}

impl UStmt {
    pub fn inline(&self, inliner: &mut Inliner<'_, '_>) -> Result<Stmt, InlineError> {
        let kind = match self {
            UStmt::Block(stmts) => StmtKind::Block(inliner.inline_stmts(stmts)?),
            UStmt::If {
                cond,
                then_branch,
                else_branch,
            } => StmtKind::If {
                cond: cond.inline(inliner)?,
                then_branch: inline_stmt_boxed(then_branch, inliner)?,
                else_branch: match else_branch {
                    Some(else_branch) => Some(inline_stmt_boxed(else_branch, inliner)?),
                    None => None,
                },
            },
            UStmt::While { cond, body } => StmtKind::While {
                cond: cond.inline(inliner)?,
                body: inline_stmt_boxed(body, inliner)?,
            },
            UStmt::DoWhile { body, cond } => StmtKind::DoWhile {
                body: inline_stmt_boxed(body, inliner)?,
                cond: cond.inline(inliner)?,
            },
            UStmt::For {
                init,
                cond,
                update,
                body,
            } => StmtKind::For {
                init: inliner.inline_stmts(init)?,
                cond: match cond {
                    Some(cond) => Some(cond.inline(inliner)?),
                    None => None,
                },
                update: inliner.inline_list(update)?,
                body: inline_stmt_boxed(body, inliner)?,
            },
            UStmt::ForEach {
                var,
                iterable,
                body,
            } => StmtKind::ForEach {
                var: var.inline(inliner)?,
                iterable: iterable.inline(inliner)?,
                body: inline_stmt_boxed(body, inliner)?,
            },
            UStmt::Return(value) => StmtKind::Return(match value {
                Some(value) => Some(value.inline(inliner)?),
                None => None,
            }),
            UStmt::Throw(expr) => StmtKind::Throw(expr.inline(inliner)?),
            UStmt::Synchronized { lock, body } => StmtKind::Synchronized {
                lock: lock.inline(inliner)?,
                body: inline_stmt_boxed(body, inliner)?,
            },
            UStmt::Expr(expr) => StmtKind::Expr(expr.inline(inliner)?),
            UStmt::Empty => StmtKind::Empty,
            UStmt::Var(decl) => StmtKind::Var(decl.inline(inliner)?),
        };
        Ok(Stmt::new(kind))
    }
}
