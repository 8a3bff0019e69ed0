//! Shared fixtures for the integration tests.
//!
//! Units are assembled from typed identifiers and laid out by the printer,
//! so every node carries a real span into the unit's source.

#![allow(dead_code, reason = "Each test binary uses a subset")]

use recast_ir::{
    BinaryOp, CompilationUnit, Expr, MethodDecl, PrimitiveKind, Stmt, SymbolId, SymbolTable, Type,
    TypeDecl,
};
use recast_patterns::{TemplateInfo, TypeVars, UType};
use recast_types::ClassTable;

#[derive(Default)]
pub struct Program {
    symbols: SymbolTable,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn local(&mut self, name: &str, ty: Type) -> Expr {
        let sym = self.symbols.add_local(name, ty.clone());
        Expr::ident(name, Some(sym), ty)
    }

    pub fn method(&mut self, name: &str, ty: Type) -> (SymbolId, Type) {
        let sym = self.symbols.add_method("Main", name, ty.clone(), true, true);
        (sym, ty)
    }

    /// `class Main { void run() { body } }`
    pub fn unit(self, body: Vec<Stmt>) -> CompilationUnit {
        let void = Expr::primitive_type(PrimitiveKind::Void);
        let run = MethodDecl::new("run", void, Vec::new(), body);
        let main = TypeDecl::new("Main", Vec::new(), vec![run]);
        CompilationUnit::new(None, Vec::new(), vec![main], self.symbols)
    }
}

pub fn classes() -> ClassTable {
    ClassTable::java_lang()
}

pub fn body(unit: &CompilationUnit) -> &[Stmt] {
    unit.types[0].methods[0].body.as_block().unwrap_or_default()
}

pub fn assign(target: &Expr, value: Expr) -> Stmt {
    Stmt::expr(Expr::assign(target.clone(), value))
}

/// A binary expression typed the way the checker would: comparisons are
/// `boolean`, arithmetic on `int`s is `int`.
pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let ty = if op.complement().is_some() { Type::BOOLEAN } else { Type::INT };
    Expr::binary(op, left, right, ty)
}

pub fn info(args: &[(&str, UType)]) -> TemplateInfo {
    TemplateInfo::new(
        TypeVars::empty(),
        args.iter().map(|(name, ty)| ((*name).to_string(), ty.clone())).collect(),
    )
}
