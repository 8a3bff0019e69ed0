//! Inlining Engine
//!
//! Rebuilds a host tree from an after-pattern and the bindings of a
//! successful match. Captured subtrees are copied with their spans, so the
//! printer re-emits them byte-for-byte from the unit's source; everything
//! else is synthesized and printed.
//!
//! Class and static-member references go through the rule's
//! [`ImportPolicy`], which records the imports the replacement needs.

use std::collections::BTreeSet;

use recast_ir::printer::print_expr;
use recast_ir::{BoundKind, CompilationUnit, Expr, ExprKind, Stmt, Type};
use recast_types::ClassTable;

use crate::bindings::{Bindings, Key, RepeatedKey, TypeVarKey};
use crate::imports::{top_level_class, ImportPolicy};
use crate::tree::{UExpr, UStmt};
use crate::types::UType;
use crate::{InlineError, MatchContext};

pub struct Inliner<'a, 't> {
    ctx: MatchContext<'t>,
    bindings: &'a Bindings<'t>,
    policy: ImportPolicy,
    imports: BTreeSet<String>,
    static_imports: BTreeSet<String>,
}

impl<'a, 't> Inliner<'a, 't> {
    pub fn new(ctx: MatchContext<'t>, bindings: &'a Bindings<'t>, policy: ImportPolicy) -> Self {
        Inliner {
            ctx,
            bindings,
            policy,
            imports: BTreeSet::new(),
            static_imports: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn ctx(&self) -> MatchContext<'t> {
        self.ctx
    }

    #[inline]
    pub fn unit(&self) -> &'t CompilationUnit {
        self.ctx.unit
    }

    #[inline]
    pub fn classes(&self) -> &'t ClassTable {
        self.ctx.classes
    }

    pub fn bindings(&self) -> &'a Bindings<'t> {
        self.bindings
    }

    pub fn import_policy(&self) -> ImportPolicy {
        self.policy
    }

    pub fn optional_binding<K: Key<'t>>(&self, key: &K) -> Option<&'a K::Value> {
        self.bindings.get(key)
    }

    pub fn get_binding<K: Key<'t>>(&self, key: &K) -> Result<&'a K::Value, InlineError> {
        self.bindings
            .get(key)
            .ok_or_else(|| InlineError::Unbound(key.erase()))
    }

    /// The instantiation of a type variable; an unbound variable stays a
    /// variable.
    pub fn type_var(&self, name: &str) -> Type {
        match self.bindings.get(&TypeVarKey::new(name)) {
            Some(bound) => bound.ty.clone(),
            None => Type::var(name),
        }
    }

    pub fn inline_type(&self, ty: &UType) -> Result<Type, InlineError> {
        Ok(ty.inline(self)?)
    }

    pub fn inline_expr(&mut self, expr: &UExpr) -> Result<Expr, InlineError> {
        expr.inline(self)
    }

    /// Inline an argument list. A repeated variable expands in place to
    /// everything it matched.
    pub fn inline_list(&mut self, exprs: &[UExpr]) -> Result<Vec<Expr>, InlineError> {
        let mut out = Vec::with_capacity(exprs.len());
        for expr in exprs {
            match expr {
                UExpr::Repeated(name) => {
                    let bound = self.get_binding(&RepeatedKey::new(name))?;
                    out.extend(bound.iter().map(|e| Expr::clone(e)));
                }
                _ => out.push(expr.inline(self)?),
            }
        }
        Ok(out)
    }

    pub fn inline_stmts(&mut self, stmts: &[UStmt]) -> Result<Vec<Stmt>, InlineError> {
        stmts.iter().map(|stmt| stmt.inline(self)).collect()
    }

    // ==========================================================================
    // Imports
    // ==========================================================================

    /// Record a class import the replacement needs.
    pub fn add_import(&mut self, qualified: &str) {
        self.imports.insert(qualified.to_string());
    }

    /// Record a static member import the replacement needs.
    pub fn add_static_import(&mut self, path: &str) {
        self.static_imports.insert(path.to_string());
    }

    pub fn pending_imports(&self) -> &BTreeSet<String> {
        &self.imports
    }

    pub fn pending_static_imports(&self) -> &BTreeSet<String> {
        &self.static_imports
    }

    /// Import additions collected so far: `(imports, static imports)`.
    pub fn into_imports(self) -> (BTreeSet<String>, BTreeSet<String>) {
        (self.imports, self.static_imports)
    }

    pub fn class_reference(&mut self, top_level: &str, qualified: &str) -> Expr {
        self.policy.class_reference(self, top_level, qualified)
    }

    pub fn static_reference(
        &mut self,
        top_level: &str,
        class: &str,
        member: &str,
        ty: Type,
    ) -> Expr {
        self.policy.static_reference(self, top_level, class, member, ty)
    }

    /// Type syntax for a host type, importing the classes it names.
    pub fn type_expr(&mut self, ty: &Type) -> Expr {
        match ty {
            Type::Primitive(kind) => Expr::primitive_type(*kind),
            Type::Class { name, args } => {
                let base = self.class_reference(top_level_class(name), name);
                if args.is_empty() {
                    return base;
                }
                let args = args.iter().map(|arg| self.type_expr(arg)).collect();
                Expr::new(
                    ExprKind::TypeApply {
                        base: Box::new(base),
                        args,
                    },
                    ty.clone(),
                )
            }
            Type::Array(elem) => {
                let elem = self.type_expr(elem);
                Expr::new(ExprKind::ArrayType(Box::new(elem)), ty.clone())
            }
            Type::Wildcard { kind, bound } => {
                let text = match bound {
                    Some(bound) => {
                        let bound = self.type_expr(bound);
                        format!("? {} {}", wildcard_keyword(*kind), print_expr(&bound))
                    }
                    None => "?".to_string(),
                };
                Expr::ident(text, None, ty.clone())
            }
            Type::TypeVar { .. } | Type::Method { .. } | Type::ForAll { .. } | Type::Unknown => {
                Expr::ident(ty.to_string(), None, ty.clone())
            }
        }
    }
}

fn wildcard_keyword(kind: BoundKind) -> &'static str {
    match kind {
        BoundKind::Super => "super",
        BoundKind::Extends | BoundKind::Unbound => "extends",
    }
}

#[cfg(test)]
mod tests;
