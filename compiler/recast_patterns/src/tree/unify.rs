//! Matching pattern trees against host trees.

use std::borrow::Cow;

use recast_ir::{Expr, ExprKind, Stmt, StmtKind, Symbol, SymbolKind, Type, VarDecl};
use recast_types::Types;

use super::{UClassIdent, UExpr, UStmt, UVarDecl};
use crate::bindings::{FreeIdentKey, LocalVarBinding, LocalVarKey, TypeVarKey, TypeWithExpression};
use crate::unifier::{
    same_expression, unify_list, unify_nullable, unify_seq, ListPattern, Unifiable, Unifier,
};

impl<'t> Unifiable<'t, Expr> for UExpr {
    fn unify(&self, target: &'t Expr, unifier: Unifier<'t>) -> Option<Unifier<'t>> {
        self.unify_expr(target, unifier)
    }
}

impl<'t> ListPattern<'t> for UExpr {
    fn as_repeated(&self) -> Option<&str> {
        match self {
            UExpr::Repeated(name) => Some(name),
            _ => None,
        }
    }
}

impl<'t> Unifiable<'t, Stmt> for UStmt {
    fn unify(&self, target: &'t Stmt, unifier: Unifier<'t>) -> Option<Unifier<'t>> {
        self.unify_stmt(target, unifier)
    }
}

impl<'t> Unifiable<'t, VarDecl> for UVarDecl {
    fn unify(&self, target: &'t VarDecl, unifier: Unifier<'t>) -> Option<Unifier<'t>> {
        self.unify_decl(target, unifier)
    }
}

/// The symbol an identifier or member select resolves to.
fn target_symbol<'t>(target: &Expr, unifier: &Unifier<'t>) -> Option<&'t Symbol> {
    let id = target.symbol()?;
    unifier.ctx().unit.symbol(id)
}

/// Bind or re-check a free identifier.
///
/// `super` never matches, and neither does an expression that mentions a
/// local the pattern itself declared.
fn unify_free_ident<'t>(
    name: &str,
    expr: Cow<'t, Expr>,
    unifier: Unifier<'t>,
) -> Option<Unifier<'t>> {
    if matches!(expr.kind, ExprKind::Super) {
        return None;
    }
    if unifier
        .bindings()
        .local_var_symbols()
        .into_iter()
        .any(|sym| expr.references(sym))
    {
        return None;
    }
    let key = FreeIdentKey::new(name);
    let same = unifier
        .get_binding(&key)
        .map(|bound| same_expression(bound, &expr));
    match same {
        None => unifier.bind(&key, expr),
        Some(same) => same.then_some(unifier),
    }
}

fn unify_class_ident<'t>(
    class: &UClassIdent,
    target: &'t Expr,
    unifier: Unifier<'t>,
) -> Option<Unifier<'t>> {
    if !matches!(target.kind, ExprKind::Ident { .. } | ExprKind::Select { .. }) {
        return None;
    }
    let matches = match target_symbol(target, &unifier) {
        Some(symbol) => {
            symbol.kind == SymbolKind::Class && symbol.qualified_name() == class.qualified
        }
        None => {
            target.symbol().is_none()
                && target.ty.class_name() == Some(class.qualified.as_str())
        }
    };
    matches.then_some(unifier)
}

impl UExpr {
    /// Match a host expression.
    pub fn unify_expr<'t>(&self, target: &'t Expr, unifier: Unifier<'t>) -> Option<Unifier<'t>> {
        match self {
            UExpr::Literal(lit) => match &target.kind {
                ExprKind::Literal(target_lit) if target_lit == lit => Some(unifier),
                _ => None,
            },
            UExpr::FreeIdent(name) | UExpr::Repeated(name) => {
                unify_free_ident(name, Cow::Borrowed(target), unifier)
            }
            UExpr::LocalVarIdent(name) => {
                let ExprKind::Ident { sym: Some(sym), .. } = &target.kind else {
                    return None;
                };
                let bound = unifier.get_binding(&LocalVarKey::new(name))?;
                (bound.symbol == *sym).then_some(unifier)
            }
            UExpr::TypeVarIdent(name) => {
                let key = TypeVarKey::new(name);
                let same = unifier
                    .get_binding(&key)
                    .map(|bound| Types::is_same_type(&bound.ty, &target.ty));
                match same {
                    None => {
                        let witness = Cow::Borrowed(target);
                        let value = TypeWithExpression::with_expression(target.ty.clone(), witness);
                        unifier.bind(&key, value)
                    }
                    Some(same) => same.then_some(unifier),
                }
            }
            UExpr::ClassIdent(class) => unify_class_ident(class, target, unifier),
            UExpr::StaticIdent { class, member, ty } => {
                let symbol = target_symbol(target, &unifier)?;
                let owner = symbol.owner.as_deref();
                if owner != Some(class.qualified.as_str()) || symbol.name != *member {
                    return None;
                }
                ty.unify_type(&symbol.ty, unifier)
            }
            UExpr::Binary { op, left, right } => {
                let ExprKind::Binary {
                    op: target_op,
                    left: target_left,
                    right: target_right,
                } = &target.kind
                else {
                    return None;
                };
                if op != target_op {
                    return None;
                }
                let unifier = left.unify_expr(target_left, unifier)?;
                right.unify_expr(target_right, unifier)
            }
            UExpr::Unary { op, operand } => match &target.kind {
                ExprKind::Unary {
                    op: target_op,
                    operand: target_operand,
                } if op == target_op => operand.unify_expr(target_operand.skip_parens(), unifier),
                _ => None,
            },
            UExpr::Assign { target: lhs, value } => match &target.kind {
                ExprKind::Assign {
                    target: target_lhs,
                    value: target_value,
                } => {
                    let unifier = lhs.unify_expr(target_lhs, unifier)?;
                    value.unify_expr(target_value, unifier)
                }
                _ => None,
            },
            UExpr::CompoundAssign {
                op,
                target: lhs,
                value,
            } => match &target.kind {
                ExprKind::CompoundAssign {
                    op: target_op,
                    target: target_lhs,
                    value: target_value,
                } if op == target_op => {
                    let unifier = lhs.unify_expr(target_lhs, unifier)?;
                    value.unify_expr(target_value, unifier)
                }
                _ => None,
            },
            UExpr::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                let ExprKind::Conditional {
                    cond: target_cond,
                    then_expr: target_then,
                    else_expr: target_else,
                } = &target.kind
                else {
                    return None;
                };
                let unifier = cond.unify_expr(target_cond, unifier)?;
                let unifier = then_expr.unify_expr(target_then, unifier)?;
                else_expr.unify_expr(target_else, unifier)
            }
            UExpr::Cast { ty, expr } => {
                let ExprKind::Cast {
                    ty: target_ty,
                    expr: target_expr,
                } = &target.kind
                else {
                    return None;
                };
                let unifier = ty.unify_expr(target_ty, unifier)?;
                expr.unify_expr(target_expr, unifier)
            }
            UExpr::InstanceOf { expr, ty } => {
                let ExprKind::InstanceOf {
                    expr: target_expr,
                    ty: target_ty,
                } = &target.kind
                else {
                    return None;
                };
                let unifier = expr.unify_expr(target_expr, unifier)?;
                ty.unify_expr(target_ty, unifier)
            }
            UExpr::MethodInvocation { callee, args } => {
                let ExprKind::Call {
                    callee: target_callee,
                    args: target_args,
                } = &target.kind
                else {
                    return None;
                };
                let unifier = callee.unify_expr(target_callee, unifier)?;
                unify_list(unifier, args, target_args)
            }
            UExpr::MemberSelect { receiver, name, ty } => match &target.kind {
                ExprKind::Select {
                    receiver: target_receiver,
                    name: target_name,
                    sym: Some(_),
                } if target_name == name => {
                    let symbol = target_symbol(target, &unifier)?;
                    let unifier = receiver.unify_expr(target_receiver, unifier)?;
                    ty.unify_type(&symbol.ty, unifier)
                }
                // A bare member reference: the receiver is an implicit `this`.
                ExprKind::Ident {
                    name: target_name,
                    sym: Some(_),
                } if target_name == name => {
                    let symbol = target_symbol(target, &unifier)?;
                    if !symbol.is_member() {
                        return None;
                    }
                    let this = Expr::this(Type::class(symbol.owner.as_deref()?));
                    let unifier = receiver.unify_implicit_this(this, unifier)?;
                    ty.unify_type(&symbol.ty, unifier)
                }
                _ => None,
            },
            UExpr::ArrayAccess { array, index } => {
                let ExprKind::Index {
                    array: target_array,
                    index: target_index,
                } = &target.kind
                else {
                    return None;
                };
                let unifier = array.unify_expr(target_array, unifier)?;
                index.unify_expr(target_index, unifier)
            }
            UExpr::NewArray {
                elem_ty,
                dims,
                init,
            } => {
                let ExprKind::NewArray {
                    elem_ty: target_elem_ty,
                    dims: target_dims,
                    init: target_init,
                } = &target.kind
                else {
                    return None;
                };
                let unifier =
                    unify_nullable(unifier, elem_ty.as_deref(), target_elem_ty.as_deref())?;
                let unifier = unify_list(unifier, dims, target_dims)?;
                match (init, target_init) {
                    (None, None) => Some(unifier),
                    (Some(init), Some(target_init)) => unify_list(unifier, init, target_init),
                    _ => None,
                }
            }
            UExpr::NewClass { class, args } => {
                let ExprKind::NewClass {
                    class: target_class,
                    args: target_args,
                } = &target.kind
                else {
                    return None;
                };
                let unifier = class.unify_expr(target_class, unifier)?;
                unify_list(unifier, args, target_args)
            }
            UExpr::Parens(inner) => match &target.kind {
                ExprKind::Paren(target_inner) => inner.unify_expr(target_inner, unifier),
                _ => inner.unify_expr(target, unifier),
            },
            UExpr::PrimitiveType(kind) => match &target.kind {
                ExprKind::PrimitiveType(target_kind) if target_kind == kind => Some(unifier),
                _ => None,
            },
            UExpr::TypeApply { base, args } => {
                let ExprKind::TypeApply {
                    base: target_base,
                    args: target_args,
                } = &target.kind
                else {
                    return None;
                };
                let unifier = base.unify_expr(target_base, unifier)?;
                unify_list(unifier, args, target_args)
            }
            UExpr::ArrayType(elem) => match &target.kind {
                ExprKind::ArrayType(target_elem) => elem.unify_expr(target_elem, unifier),
                _ => None,
            },
            UExpr::AnyOf(alternatives) => alternatives
                .iter()
                .find_map(|alternative| alternative.unify_expr(target, unifier.fork())),
            UExpr::OfKind { expr, allowed } => {
                if !allowed.contains(&target.tag()) {
                    return None;
                }
                expr.unify_expr(target, unifier)
            }
        }
    }

    /// Match the synthetic `this` of a bare member reference. Only patterns
    /// that can bind an arbitrary expression accept it.
    fn unify_implicit_this<'t>(&self, this: Expr, unifier: Unifier<'t>) -> Option<Unifier<'t>> {
        match self {
            UExpr::FreeIdent(name) => unify_free_ident(name, Cow::Owned(this), unifier),
            UExpr::Parens(inner) => inner.unify_implicit_this(this, unifier),
            UExpr::AnyOf(alternatives) => alternatives.iter().find_map(|alternative| {
                alternative.unify_implicit_this(this.clone(), unifier.fork())
            }),
            _ => None,
        }
    }
}

impl UVarDecl {
    /// Match a declaration and bind the declared local. The pattern's
    /// local must not be bound yet.
    pub fn unify_decl<'t>(&self, target: &'t VarDecl, unifier: Unifier<'t>) -> Option<Unifier<'t>> {
        let key = LocalVarKey::new(&self.name);
        if unifier.get_binding(&key).is_some() {
            return None;
        }
        let symbol = target.sym?;
        let unifier = self.ty.unify_expr(&target.ty, unifier)?;
        let unifier = unify_nullable(unifier, self.init.as_ref(), target.init.as_ref())?;
        unifier.bind(
            &key,
            LocalVarBinding {
                symbol,
                name: target.name.clone(),
            },
        )
    }
}

impl UStmt {
    /// Match a host statement.
    pub fn unify_stmt<'t>(&self, target: &'t Stmt, unifier: Unifier<'t>) -> Option<Unifier<'t>> {
        match (self, &target.kind) {
            (UStmt::Block(stmts), StmtKind::Block(target_stmts)) => {
                unify_seq(unifier, stmts, target_stmts)
            }
            (
                UStmt::If {
                    cond,
                    then_branch,
                    else_branch,
                },
                StmtKind::If {
                    cond: target_cond,
                    then_branch: target_then,
                    else_branch: target_else,
                },
            ) => {
                let unifier = cond.unify_expr(target_cond, unifier)?;
                let unifier = then_branch.unify_stmt(target_then, unifier)?;
                unify_nullable(unifier, else_branch.as_deref(), target_else.as_deref())
            }
            (
                UStmt::While { cond, body },
                StmtKind::While {
                    cond: target_cond,
                    body: target_body,
                },
            ) => {
                let unifier = cond.unify_expr(target_cond, unifier)?;
                body.unify_stmt(target_body, unifier)
            }
            (
                UStmt::DoWhile { body, cond },
                StmtKind::DoWhile {
                    body: target_body,
                    cond: target_cond,
                },
            ) => {
                let unifier = body.unify_stmt(target_body, unifier)?;
                cond.unify_expr(target_cond, unifier)
            }
            (
                UStmt::For {
                    init,
                    cond,
                    update,
                    body,
                },
                StmtKind::For {
                    init: target_init,
                    cond: target_cond,
                    update: target_update,
                    body: target_body,
                },
            ) => {
                let unifier = unify_seq(unifier, init, target_init)?;
                let unifier = unify_nullable(unifier, cond.as_ref(), target_cond.as_ref())?;
                let unifier = unify_list(unifier, update, target_update)?;
                body.unify_stmt(target_body, unifier)
            }
            (
                UStmt::ForEach {
                    var,
                    iterable,
                    body,
                },
                StmtKind::ForEach {
                    var: target_var,
                    iterable: target_iterable,
                    body: target_body,
                },
            ) => {
                let unifier = var.unify_decl(target_var, unifier)?;
                let unifier = iterable.unify_expr(target_iterable, unifier)?;
                body.unify_stmt(target_body, unifier)
            }
            (UStmt::Return(value), StmtKind::Return(target_value)) => {
                unify_nullable(unifier, value.as_ref(), target_value.as_ref())
            }
            (UStmt::Throw(expr), StmtKind::Throw(target_expr))
            | (UStmt::Expr(expr), StmtKind::Expr(target_expr)) => {
                expr.unify_expr(target_expr, unifier)
            }
            (
                UStmt::Synchronized { lock, body },
                StmtKind::Synchronized {
                    lock: target_lock,
                    body: target_body,
                },
            ) => {
                let unifier = lock.unify_expr(target_lock, unifier)?;
                body.unify_stmt(target_body, unifier)
            }
            (UStmt::Empty, StmtKind::Empty) => Some(unifier),
            (UStmt::Var(decl), StmtKind::Var(target_decl)) => decl.unify_decl(target_decl, unifier),
            _ => None,
        }
    }
}
