//! Test helpers for matching and rewriting.
//!
//! Builds small compilation units from typed locals, the way a checked
//! host program would hand them over: every identifier carries its symbol
//! and type, and the unit's source is laid out by the printer.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use recast_ir::{
    BinaryOp, CompilationUnit, Expr, Import, MethodDecl, PrimitiveKind, Stmt, StmtKind, SymbolId,
    SymbolTable, Type, TypeDecl, VarDecl,
};
use recast_types::ClassTable;

use crate::types::{TypeVars, TypeVarsBuilder, UType};
use crate::{ExpressionTemplate, MatchContext, TemplateInfo, UExpr};

/// Collects symbols while a test assembles the body of `Main.run`.
#[derive(Default)]
pub struct UnitBuilder {
    package: Option<String>,
    imports: Vec<Import>,
    fields: Vec<VarDecl>,
    symbols: SymbolTable,
}

impl UnitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn package(mut self, package: &str) -> Self {
        self.package = Some(package.to_string());
        self
    }

    pub fn import(mut self, import: Import) -> Self {
        self.imports.push(import);
        self
    }

    /// A local variable and an identifier referring to it.
    pub fn local(&mut self, name: &str, ty: Type) -> Expr {
        let sym = self.symbols.add_local(name, ty.clone());
        Expr::ident(name, Some(sym), ty)
    }

    /// A declaration of a fresh local.
    pub fn declare(&mut self, name: &str, ty_expr: Expr, init: Option<Expr>) -> (Stmt, Expr) {
        let ty = ty_expr.ty.clone();
        let sym = self.symbols.add_local(name, ty.clone());
        let decl = Stmt::var(VarDecl::new(name, ty_expr, init, Some(sym)));
        (decl, Expr::ident(name, Some(sym), ty))
    }

    /// A field of `Main`, referenced by its bare name.
    pub fn field(&mut self, name: &str, ty_expr: Expr) -> Expr {
        let ty = ty_expr.ty.clone();
        let owner = self.main_class();
        let sym = self.symbols.add_field(&owner, name, ty.clone(), false);
        self.fields.push(VarDecl::new(name, ty_expr, None, Some(sym)));
        Expr::ident(name, Some(sym), ty)
    }

    /// A static method symbol on `owner`.
    pub fn static_method(&mut self, owner: &str, name: &str, ty: Type) -> SymbolId {
        self.symbols.add_method(owner, name, ty, true, false)
    }

    /// A reference to a class by simple name, resolved to `qualified`.
    pub fn class_ref(&mut self, simple: &str, qualified: &str) -> Expr {
        let sym = self.symbols.class(qualified);
        Expr::ident(simple, Some(sym), Type::class(qualified))
    }

    pub fn main_class(&self) -> String {
        match &self.package {
            Some(package) => format!("{package}.Main"),
            None => "Main".to_string(),
        }
    }

    /// The unit `class Main { void run() { body } }`.
    pub fn build(self, body: Vec<Stmt>) -> CompilationUnit {
        let void = Expr::primitive_type(PrimitiveKind::Void);
        let method = MethodDecl::new("run", void, Vec::new(), body);
        CompilationUnit::new(
            self.package,
            self.imports,
            vec![TypeDecl::new("Main", self.fields, vec![method])],
            self.symbols,
        )
    }
}

pub fn classes() -> ClassTable {
    ClassTable::java_lang()
}

pub fn ctx<'t>(unit: &'t CompilationUnit, classes: &'t ClassTable) -> MatchContext<'t> {
    MatchContext::new(unit, classes)
}

/// Statements of `Main.run`.
pub fn body(unit: &CompilationUnit) -> &[Stmt] {
    unit.types[0].methods[0].body.as_block().unwrap_or_default()
}

/// The expression a statement evaluates: an expression statement, a
/// return value or a variable initializer.
pub fn stmt_expr(stmt: &Stmt) -> &Expr {
    match &stmt.kind {
        StmtKind::Expr(expr) | StmtKind::Return(Some(expr)) => expr,
        StmtKind::Var(decl) => decl.init.as_ref().expect("initialized declaration"),
        other => panic!("statement has no expression: {other:?}"),
    }
}

/// The expression of statement `index` of `Main.run`.
pub fn body_expr(unit: &CompilationUnit, index: usize) -> &Expr {
    stmt_expr(&body(unit)[index])
}

pub fn int_binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let ty = if op.complement().is_some() { Type::BOOLEAN } else { Type::INT };
    Expr::binary(op, left, right, ty)
}

pub fn assign_stmt(target: &Expr, value: Expr) -> Stmt {
    Stmt::expr(Expr::assign(target.clone(), value))
}

/// Template info declaring `args` with no type variables.
pub fn args_info(args: &[(&str, UType)]) -> TemplateInfo {
    TemplateInfo::new(
        TypeVars::empty(),
        args.iter().map(|(name, ty)| ((*name).to_string(), ty.clone())).collect(),
    )
}

/// Template info declaring the type variables `vars`, each bounded by
/// `Object`.
pub fn generic_info(vars: &[&str], args: &[(&str, UType)]) -> TemplateInfo {
    let type_vars = vars
        .iter()
        .fold(TypeVarsBuilder::new(), |builder, var| builder.declare(*var))
        .freeze();
    TemplateInfo::new(
        type_vars,
        args.iter().map(|(name, ty)| ((*name).to_string(), ty.clone())).collect(),
    )
}

/// `int`-typed expression template over the free identifiers `args`.
pub fn int_template(args: &[&str], expr: UExpr) -> ExpressionTemplate {
    let args: Vec<(&str, UType)> = args.iter().map(|name| (*name, UType::INT)).collect();
    ExpressionTemplate::new(args_info(&args), expr, UType::INT)
}
