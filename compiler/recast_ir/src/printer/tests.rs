use pretty_assertions::assert_eq;

use super::*;
use crate::ast::{BinaryOp, Literal};
use crate::{CompilationUnit, PrimitiveKind, StmtKind, SymbolTable, Type, TypeDecl};

fn ident(name: &str) -> Expr {
    Expr::ident(name, None, Type::INT)
}

fn add(left: Expr, right: Expr) -> Expr {
    Expr::binary(BinaryOp::Add, left, right, Type::INT)
}

fn adder_unit() -> CompilationUnit {
    let int = || Expr::primitive_type(PrimitiveKind::Int);
    let mut method = MethodDecl::new(
        "add",
        int(),
        vec![
            VarDecl::new("a", int(), None, None),
            VarDecl::new("b", int(), None, None),
        ],
        vec![
            Stmt::ret(Some(add(ident("a"), ident("b")))).with_comment("sum"),
        ],
    );
    method.is_static = true;
    CompilationUnit::new(
        Some("demo".to_string()),
        vec![Import::new("java.util.List")],
        vec![TypeDecl::new("Demo", Vec::new(), vec![method])],
        SymbolTable::new(),
    )
}

fn returned_expr(unit: &CompilationUnit) -> &Expr {
    let body = unit.types[0].methods[0].body.as_block().unwrap_or_default();
    match &body[0].kind {
        StmtKind::Return(Some(expr)) => expr,
        other => panic!("expected return, got {other:?}"),
    }
}

#[test]
fn layout_prints_unit() {
    let unit = adder_unit();
    assert_eq!(
        unit.source,
        "package demo;\n\
         \n\
         import java.util.List;\n\
         \n\
         public class Demo {\n\
         \x20   public static int add(int a, int b) {\n\
         \x20       // sum\n\
         \x20       return a + b;\n\
         \x20   }\n\
         }\n"
    );
}

#[test]
fn layout_assigns_spans() {
    let unit = adder_unit();
    let expr = returned_expr(&unit);
    assert_eq!(expr.span.slice(&unit.source), Some("a + b"));
    if let ExprKind::Binary { right, .. } = &expr.kind {
        assert_eq!(right.span.slice(&unit.source), Some("b"));
    }
    assert_eq!(unit.imports[0].span.slice(&unit.source), Some("import java.util.List;"));
    assert_eq!(unit.package_span.slice(&unit.source), Some("package demo;"));
    let method = &unit.types[0].methods[0];
    assert_eq!(method.params[1].ty.span.slice(&unit.source), Some("int"));
    assert_eq!(unit.comments.len(), 1);
    assert_eq!(unit.comments[0].slice(&unit.source), Some("// sum"));
}

#[test]
fn canonical_print_adds_required_parens() {
    let product = Expr::binary(BinaryOp::Mul, add(ident("x"), Expr::int(1)), ident("y"), Type::INT);
    assert_eq!(print_expr(&product), "(x + 1) * y");

    let nested = Expr::binary(
        BinaryOp::Sub,
        ident("a"),
        Expr::binary(BinaryOp::Sub, ident("b"), ident("c"), Type::INT),
        Type::INT,
    );
    assert_eq!(print_expr(&nested), "a - (b - c)");

    let left_assoc = add(add(ident("a"), ident("b")), ident("c"));
    assert_eq!(print_expr(&left_assoc), "a + b + c");
}

#[test]
fn canonical_print_unary_forms() {
    let lt = Expr::binary(BinaryOp::Lt, ident("a"), ident("b"), Type::BOOLEAN);
    let not = Expr::unary(UnaryOp::Not, lt, Type::BOOLEAN);
    assert_eq!(print_expr(&not), "!(a < b)");

    let inner = Expr::unary(UnaryOp::Neg, ident("x"), Type::INT);
    let neg = Expr::unary(UnaryOp::Neg, inner, Type::INT);
    assert_eq!(print_expr(&neg), "- -x");

    let post = Expr::unary(UnaryOp::PostInc, ident("i"), Type::INT);
    assert_eq!(print_expr(&post), "i++");
}

#[test]
fn canonical_print_literals_and_calls() {
    let call = Expr::call(
        Expr::select(ident("list"), "add", None, Type::Unknown),
        vec![Expr::literal(Literal::String("a\"b".into())), Expr::literal(Literal::Long(3))],
        Type::BOOLEAN,
    );
    assert_eq!(print_expr(&call), "list.add(\"a\\\"b\", 3L)");

    let cond = Expr::conditional(Expr::bool(true), Expr::null(), Expr::string("s"), Type::string());
    assert_eq!(print_expr(&cond), "true ? null : \"s\"");
}

#[test]
fn render_copies_captured_text_and_parenthesizes() {
    let unit = adder_unit();
    let captured = returned_expr(&unit).clone();
    let product = Expr::binary(BinaryOp::Mul, captured, ident("c"), Type::INT);
    assert_eq!(render_expr(&product, &unit.source), "(a + b) * c");
    assert_eq!(render_expr_in(returned_expr(&unit), &unit.source, 3), "(a + b)");
}

#[test]
fn render_stmts_indents_following_lines() {
    let stmts = vec![
        Stmt::expr(Expr::assign(ident("x"), Expr::int(1))),
        Stmt::new(StmtKind::If {
            cond: Expr::bool(true),
            then_branch: Box::new(Stmt::block(vec![Stmt::ret(None)])),
            else_branch: None,
        }),
    ];
    assert_eq!(
        render_stmts(&stmts, "", "        "),
        "x = 1;\n        if (true) {\n            return;\n        }"
    );
}
