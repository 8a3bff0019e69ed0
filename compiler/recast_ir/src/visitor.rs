//! Tree Visitors
//!
//! `Visitor` walks a tree immutably; `VisitorMut` walks it mutably. Both
//! visit children in source order, the same order the printer emits them,
//! so a pre-order list of spans recorded while printing can be written back
//! with a `VisitorMut`.
//!
//! Default implementations call `walk_*` functions that traverse children.
//! Override `visit_*` methods to add custom behavior at specific nodes.

use crate::ast::{Expr, ExprKind, Stmt, StmtKind, VarDecl};

// ==========================================================================
// Visitor
// ==========================================================================

pub trait Visitor<'ast> {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_var_decl(&mut self, decl: &'ast VarDecl) {
        walk_var_decl(self, decl);
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, expr: &'ast Expr) {
    expr.for_each_child(|child| visitor.visit_expr(child));
}

pub fn walk_var_decl<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, decl: &'ast VarDecl) {
    visitor.visit_expr(&decl.ty);
    if let Some(init) = &decl.init {
        visitor.visit_expr(init);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, stmt: &'ast Stmt) {
    match &stmt.kind {
        StmtKind::Block(stmts) => {
            for s in stmts {
                visitor.visit_stmt(s);
            }
        }
        StmtKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(cond);
            visitor.visit_stmt(then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_stmt(else_branch);
            }
        }
        StmtKind::While { cond, body } => {
            visitor.visit_expr(cond);
            visitor.visit_stmt(body);
        }
        StmtKind::DoWhile { body, cond } => {
            visitor.visit_stmt(body);
            visitor.visit_expr(cond);
        }
        StmtKind::For {
            init,
            cond,
            update,
            body,
        } => {
            for s in init {
                visitor.visit_stmt(s);
            }
            if let Some(cond) = cond {
                visitor.visit_expr(cond);
            }
            for e in update {
                visitor.visit_expr(e);
            }
            visitor.visit_stmt(body);
        }
        StmtKind::ForEach {
            var,
            iterable,
            body,
        } => {
            visitor.visit_var_decl(var);
            visitor.visit_expr(iterable);
            visitor.visit_stmt(body);
        }
        StmtKind::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        StmtKind::Throw(expr) | StmtKind::Expr(expr) => visitor.visit_expr(expr),
        StmtKind::Synchronized { lock, body } => {
            visitor.visit_expr(lock);
            visitor.visit_stmt(body);
        }
        StmtKind::Var(decl) => visitor.visit_var_decl(decl),
        StmtKind::Empty => {}
    }
}

// ==========================================================================
// VisitorMut
// ==========================================================================

pub trait VisitorMut {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);
    }

    fn visit_stmt_mut(&mut self, stmt: &mut Stmt) {
        walk_stmt_mut(self, stmt);
    }

    fn visit_var_decl_mut(&mut self, decl: &mut VarDecl) {
        walk_var_decl_mut(self, decl);
    }
}

pub fn walk_expr_mut<V: VisitorMut + ?Sized>(visitor: &mut V, expr: &mut Expr) {
    match &mut expr.kind {
        ExprKind::Literal(_)
        | ExprKind::Ident { .. }
        | ExprKind::This
        | ExprKind::Super
        | ExprKind::PrimitiveType(_) => {}
        ExprKind::Select { receiver, .. } => visitor.visit_expr_mut(receiver),
        ExprKind::Unary { operand, .. } => visitor.visit_expr_mut(operand),
        ExprKind::Paren(inner) | ExprKind::ArrayType(inner) => visitor.visit_expr_mut(inner),
        ExprKind::Binary { left, right, .. } => {
            visitor.visit_expr_mut(left);
            visitor.visit_expr_mut(right);
        }
        ExprKind::Assign { target, value } | ExprKind::CompoundAssign { target, value, .. } => {
            visitor.visit_expr_mut(target);
            visitor.visit_expr_mut(value);
        }
        ExprKind::Conditional {
            cond,
            then_expr,
            else_expr,
        } => {
            visitor.visit_expr_mut(cond);
            visitor.visit_expr_mut(then_expr);
            visitor.visit_expr_mut(else_expr);
        }
        ExprKind::Cast { ty, expr } => {
            visitor.visit_expr_mut(ty);
            visitor.visit_expr_mut(expr);
        }
        ExprKind::InstanceOf { expr, ty } => {
            visitor.visit_expr_mut(expr);
            visitor.visit_expr_mut(ty);
        }
        ExprKind::Call { callee: head, args }
        | ExprKind::NewClass { class: head, args }
        | ExprKind::TypeApply { base: head, args } => {
            visitor.visit_expr_mut(head);
            for arg in args {
                visitor.visit_expr_mut(arg);
            }
        }
        ExprKind::Index { array, index } => {
            visitor.visit_expr_mut(array);
            visitor.visit_expr_mut(index);
        }
        ExprKind::NewArray {
            elem_ty,
            dims,
            init,
        } => {
            if let Some(elem_ty) = elem_ty {
                visitor.visit_expr_mut(elem_ty);
            }
            for dim in dims {
                visitor.visit_expr_mut(dim);
            }
            for elem in init.iter_mut().flatten() {
                visitor.visit_expr_mut(elem);
            }
        }
    }
}

pub fn walk_var_decl_mut<V: VisitorMut + ?Sized>(visitor: &mut V, decl: &mut VarDecl) {
    visitor.visit_expr_mut(&mut decl.ty);
    if let Some(init) = &mut decl.init {
        visitor.visit_expr_mut(init);
    }
}

pub fn walk_stmt_mut<V: VisitorMut + ?Sized>(visitor: &mut V, stmt: &mut Stmt) {
    match &mut stmt.kind {
        StmtKind::Block(stmts) => {
            for s in stmts {
                visitor.visit_stmt_mut(s);
            }
        }
        StmtKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr_mut(cond);
            visitor.visit_stmt_mut(then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_stmt_mut(else_branch);
            }
        }
        StmtKind::While { cond, body } => {
            visitor.visit_expr_mut(cond);
            visitor.visit_stmt_mut(body);
        }
        StmtKind::DoWhile { body, cond } => {
            visitor.visit_stmt_mut(body);
            visitor.visit_expr_mut(cond);
        }
        StmtKind::For {
            init,
            cond,
            update,
            body,
        } => {
            for s in init {
                visitor.visit_stmt_mut(s);
            }
            if let Some(cond) = cond {
                visitor.visit_expr_mut(cond);
            }
            for e in update {
                visitor.visit_expr_mut(e);
            }
            visitor.visit_stmt_mut(body);
        }
        StmtKind::ForEach {
            var,
            iterable,
            body,
        } => {
            visitor.visit_var_decl_mut(var);
            visitor.visit_expr_mut(iterable);
            visitor.visit_stmt_mut(body);
        }
        StmtKind::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expr_mut(value);
            }
        }
        StmtKind::Throw(expr) | StmtKind::Expr(expr) => visitor.visit_expr_mut(expr),
        StmtKind::Synchronized { lock, body } => {
            visitor.visit_expr_mut(lock);
            visitor.visit_stmt_mut(body);
        }
        StmtKind::Var(decl) => visitor.visit_var_decl_mut(decl),
        StmtKind::Empty => {}
    }
}
