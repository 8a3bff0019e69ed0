use pretty_assertions::assert_eq;
use recast_ir::ast::ASSIGN_PRECEDENCE;
use recast_ir::{BinaryOp, Expr, ExprKind, Stmt, Type};

use super::*;
use crate::bindings::{FreeIdentKey, TypeVarKey};
use crate::test_helpers::{
    args_info, assign_stmt, body, body_expr, classes, ctx, generic_info, int_binary, int_template,
    UnitBuilder,
};
use crate::tree::UExpr;
use crate::tree::UStmt;
use crate::types::TypeVarsBuilder;
use crate::RuleError;

fn add(left: UExpr, right: UExpr) -> UExpr {
    UExpr::binary(BinaryOp::Add, left, right)
}

fn assign(target: UExpr, value: UExpr) -> UStmt {
    UStmt::Expr(UExpr::Assign {
        target: Box::new(target),
        value: Box::new(value),
    })
}

// ==========================================================================
// Expression templates
// ==========================================================================

#[test]
fn expression_match_and_replace() {
    let mut builder = UnitBuilder::new();
    let x = builder.local("x", Type::INT);
    let y = builder.local("y", Type::INT);
    let unit = builder.build(vec![assign_stmt(&y, int_binary(BinaryOp::Add, x, Expr::int(1)))]);
    let classes = classes();
    let ctx = ctx(&unit, &classes);
    let ExprKind::Assign { value: target, .. } = &body_expr(&unit, 0).kind else {
        panic!("expected an assignment");
    };

    let before = int_template(&["a", "b"], add(UExpr::free("a"), UExpr::free("b")));
    let after = int_template(&["a", "b"], add(UExpr::free("b"), UExpr::free("a")));
    let unifier = before
        .match_expr(target, ctx)
        .unwrap_or_else(|| panic!("a + b should match x + 1"));

    let policy = ImportPolicy::default();
    let fix = after.replace(target, unifier.bindings(), ctx, policy, ASSIGN_PRECEDENCE);
    let fix = fix.unwrap_or_else(|err| panic!("replacement failed: {err}"));
    let rewritten = fix.apply_to(&unit).unwrap_or_else(|err| panic!("conflict: {err}"));
    assert!(rewritten.contains("        y = 1 + x;\n"), "{rewritten}");

    // In a slot that binds tighter than `+` the replacement is parenthesized.
    let tight = after
        .replace(target, unifier.bindings(), ctx, policy, BinaryOp::Mul.precedence())
        .map(|fix| fix.edits[0].new_text.clone());
    assert_eq!(tight.as_deref(), Ok("(1 + x)"));
}

#[test]
fn declared_argument_types_must_accept_captures() {
    let mut builder = UnitBuilder::new();
    let x = builder.local("x", Type::INT);
    let unit = builder.build(vec![Stmt::expr(x)]);
    let classes = classes();

    let string_args = args_info(&[("a", UType::string())]);
    let strings = ExpressionTemplate::new(string_args, UExpr::free("a"), UType::string());
    assert!(strings.match_expr(body_expr(&unit, 0), ctx(&unit, &classes)).is_none());
    let ints = int_template(&["a"], UExpr::free("a"));
    assert!(ints.match_expr(body_expr(&unit, 0), ctx(&unit, &classes)).is_some());
}

#[test]
fn autoboxing_can_be_disabled() {
    let mut builder = UnitBuilder::new();
    let x = builder.local("x", Type::INT);
    let unit = builder.build(vec![Stmt::expr(x)]);
    let classes = classes();
    let integer = UType::class("java.lang.Integer");

    let boxed_args = args_info(&[("a", integer.clone())]);
    let boxing = ExpressionTemplate::new(boxed_args, UExpr::free("a"), integer.clone());
    assert!(boxing.match_expr(body_expr(&unit, 0), ctx(&unit, &classes)).is_some());

    let annotations = TemplateAnnotations {
        no_autoboxing: true,
        ..TemplateAnnotations::default()
    };
    let strict = ExpressionTemplate::new(
        args_info(&[("a", integer.clone())]).with_annotations(annotations),
        UExpr::free("a"),
        integer,
    );
    assert!(strict.match_expr(body_expr(&unit, 0), ctx(&unit, &classes)).is_none());
}

#[test]
fn inference_binds_free_type_variables() {
    let mut builder = UnitBuilder::new();
    let s = builder.local("s", Type::string());
    let unit = builder.build(vec![Stmt::expr(s)]);
    let classes = classes();

    let template = ExpressionTemplate::new(
        generic_info(&["T"], &[("a", UType::var("T"))]),
        UExpr::free("a"),
        UType::var("T"),
    );
    let unifier = template
        .match_expr(body_expr(&unit, 0), ctx(&unit, &classes))
        .unwrap_or_else(|| panic!("identity template should match"));
    assert_eq!(
        unifier.get_binding(&TypeVarKey::new("T")).map(|b| b.ty.clone()),
        Some(Type::string())
    );
}

#[test]
fn upper_bounds_are_checked_after_inference() {
    let mut builder = UnitBuilder::new();
    let s = builder.local("s", Type::string());
    let n = builder.local("n", Type::class("java.lang.Integer"));
    let unit = builder.build(vec![Stmt::expr(s), Stmt::expr(n)]);
    let classes = classes();

    let type_vars = TypeVarsBuilder::new()
        .declare("N")
        .upper_bound("N", UType::class("java.lang.Number"))
        .freeze();
    let info = TemplateInfo::new(type_vars, vec![("a".to_string(), UType::var("N"))]);
    let template = ExpressionTemplate::new(info, UExpr::free("a"), UType::var("N"));

    assert!(template.match_expr(body_expr(&unit, 0), ctx(&unit, &classes)).is_none());
    assert!(template.match_expr(body_expr(&unit, 1), ctx(&unit, &classes)).is_some());
}

#[test]
fn self_referential_bound_is_satisfied_by_enum() {
    let mut classes = classes();
    classes.add(recast_types::ClassDecl::class(
        "p.Color",
        &[],
        vec![Type::generic("java.lang.Enum", vec![Type::class("p.Color")])],
    ));
    let mut builder = UnitBuilder::new().package("p");
    let color = builder.local("color", Type::class("p.Color"));
    let name = builder.local("name", Type::string());
    let unit = builder.build(vec![Stmt::expr(color), Stmt::expr(name)]);

    let type_vars = TypeVarsBuilder::new()
        .declare("E")
        .upper_bound("E", UType::generic("java.lang.Enum", vec![UType::var("E")]))
        .freeze();
    let info = TemplateInfo::new(type_vars, vec![("e".to_string(), UType::var("E"))]);
    let template = ExpressionTemplate::new(info, UExpr::free("e"), UType::var("E"));

    assert!(template.match_expr(body_expr(&unit, 0), ctx(&unit, &classes)).is_some());
    assert!(template.match_expr(body_expr(&unit, 1), ctx(&unit, &classes)).is_none());
}

#[test]
fn bounded_host_type_variable_satisfies_its_bound() {
    let comparable = "java.lang.Comparable";
    let mut builder = UnitBuilder::new();
    let t = Type::bounded_var("T", Type::generic(comparable, vec![Type::var("T")]));
    let x = builder.local("x", t);
    let u = builder.local("u", Type::var("U"));
    let unit = builder.build(vec![Stmt::expr(x), Stmt::expr(u)]);
    let classes = classes();

    let raw = ExpressionTemplate::new(
        args_info(&[("a", UType::class(comparable))]),
        UExpr::free("a"),
        UType::class(comparable),
    );
    assert!(raw.match_expr(body_expr(&unit, 0), ctx(&unit, &classes)).is_some());
    assert!(raw.match_expr(body_expr(&unit, 1), ctx(&unit, &classes)).is_none());

    let type_vars = TypeVarsBuilder::new()
        .declare("C")
        .upper_bound("C", UType::generic(comparable, vec![UType::var("C")]))
        .freeze();
    let info = TemplateInfo::new(type_vars, vec![("c".to_string(), UType::var("C"))]);
    let generic = ExpressionTemplate::new(info, UExpr::free("c"), UType::var("C"));
    let unifier = generic
        .match_expr(body_expr(&unit, 0), ctx(&unit, &classes))
        .unwrap_or_else(|| panic!("T extends Comparable<T> satisfies C extends Comparable<C>"));
    assert_eq!(
        unifier.get_binding(&TypeVarKey::new("C")).map(|b| b.ty.to_string()),
        Some("T".to_string())
    );
    assert!(generic.match_expr(body_expr(&unit, 1), ctx(&unit, &classes)).is_none());
}

#[test]
fn unresolvable_argument_type_is_a_no_match() {
    let mut builder = UnitBuilder::new();
    let x = builder.local("x", Type::class("com.example.Widget"));
    let unit = builder.build(vec![Stmt::expr(x)]);
    let classes = classes();
    assert!(classes.resolve("com.example.Widget").is_err());

    let widget = UType::class("com.example.Widget");
    let info = args_info(&[("a", widget.clone())]);
    let template = ExpressionTemplate::new(info, UExpr::free("a"), widget);
    assert!(template.match_expr(body_expr(&unit, 0), ctx(&unit, &classes)).is_none());
}

#[test]
fn reverse_ternary_matches_swapped_branches() {
    let mut builder = UnitBuilder::new();
    let x = builder.local("x", Type::INT);
    let y = builder.local("y", Type::INT);
    let x_sym = x.symbol();
    let cond = int_binary(BinaryOp::GtEq, x.clone(), y.clone());
    let unit = builder.build(vec![Stmt::expr(Expr::conditional(cond, y, x, Type::INT))]);
    let classes = classes();

    let min = UExpr::conditional(
        UExpr::binary(BinaryOp::Lt, UExpr::free("a"), UExpr::free("b")),
        UExpr::free("a"),
        UExpr::free("b"),
    );
    let annotations = TemplateAnnotations {
        also_reverse_ternary: true,
        ..TemplateAnnotations::default()
    };
    let info = args_info(&[("a", UType::INT), ("b", UType::INT)]);

    let plain = ExpressionTemplate::new(info.clone(), min.clone(), UType::INT);
    assert!(plain.match_expr(body_expr(&unit, 0), ctx(&unit, &classes)).is_none());

    let reversible = ExpressionTemplate::new(info.with_annotations(annotations), min, UType::INT);
    let unifier = reversible
        .match_expr(body_expr(&unit, 0), ctx(&unit, &classes))
        .unwrap_or_else(|| panic!("reversed ternary should match"));
    assert_eq!(
        unifier.get_binding(&FreeIdentKey::new("a")).and_then(|a| a.symbol()),
        x_sym
    );
}

#[test]
fn negation_requires_boolean_result() {
    let not_boolean = int_template(&["a", "b"], add(UExpr::free("a"), UExpr::free("b")));
    assert_eq!(
        not_boolean.negation(),
        Err(RuleError::NonBooleanNegation(format!("{:?}", UType::INT)))
    );

    let annotations = TemplateAnnotations {
        also_negation: true,
        ..TemplateAnnotations::default()
    };
    let less = ExpressionTemplate::new(
        args_info(&[("a", UType::INT), ("b", UType::INT)]).with_annotations(annotations),
        UExpr::binary(BinaryOp::Lt, UExpr::free("a"), UExpr::free("b")),
        UType::BOOLEAN,
    );
    let negated = less.negation().unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(negated.expr, UExpr::binary(BinaryOp::GtEq, UExpr::free("a"), UExpr::free("b")));
    assert!(!negated.info.annotations.also_negation);
    assert_eq!(negated.result_type, UType::BOOLEAN);
}

// ==========================================================================
// Block templates
// ==========================================================================

/// `y = 5; x = 0; z = x; w = 0; v = w;`
fn five_statements(comment_on: Option<usize>) -> recast_ir::CompilationUnit {
    let mut builder = UnitBuilder::new();
    let [v, w, x, y, z] = ["v", "w", "x", "y", "z"].map(|name| builder.local(name, Type::INT));
    let mut stmts = vec![
        assign_stmt(&y, Expr::int(5)),
        assign_stmt(&x, Expr::int(0)),
        assign_stmt(&z, x.clone()),
        assign_stmt(&w, Expr::int(0)),
        assign_stmt(&v, w.clone()),
    ];
    if let Some(index) = comment_on {
        let stmt = stmts.remove(index);
        stmts.insert(index, stmt.with_comment("keep"));
    }
    builder.build(stmts)
}

/// `a = 0; b = a;`
fn zero_then_copy() -> BlockTemplate {
    BlockTemplate::new(
        args_info(&[("a", UType::INT), ("b", UType::INT)]),
        vec![
            assign(UExpr::free("a"), UExpr::int(0)),
            assign(UExpr::free("b"), UExpr::free("a")),
        ],
    )
}

#[test]
fn block_scan_reports_disjoint_matches_in_order() {
    let unit = five_statements(None);
    let classes = classes();
    let matches = zero_then_copy().scan(body(&unit), ctx(&unit, &classes));
    let ranges: Vec<(usize, usize)> = matches.iter().map(|m| (m.start, m.end)).collect();
    assert_eq!(ranges, vec![(1, 3), (3, 5)]);
    assert_eq!(
        matches[0].span().slice(&unit.source),
        Some("x = 0;\n        z = x;")
    );
}

#[test]
fn block_match_containing_comment_is_rejected() {
    let unit = five_statements(Some(2));
    let classes = classes();
    let matches = zero_then_copy().scan(body(&unit), ctx(&unit, &classes));
    let ranges: Vec<(usize, usize)> = matches.iter().map(|m| (m.start, m.end)).collect();
    assert_eq!(ranges, vec![(3, 5)]);
}

#[test]
fn shorter_replacement_deletes_surplus_lines() {
    let unit = five_statements(None);
    let classes = classes();
    let found = zero_then_copy().scan(body(&unit), ctx(&unit, &classes));
    let after = BlockTemplate::new(
        args_info(&[("a", UType::INT), ("b", UType::INT)]),
        vec![assign(UExpr::free("b"), UExpr::int(0))],
    );

    let fix = after
        .replace(&found[0], ImportPolicy::default())
        .unwrap_or_else(|err| panic!("replacement failed: {err}"));
    let rewritten = fix.apply_to(&unit).unwrap_or_else(|err| panic!("conflict: {err}"));
    assert_eq!(
        rewritten,
        "public class Main {\n\
         \x20   public void run() {\n\
         \x20       y = 5;\n\
         \x20       z = 0;\n\
         \x20       w = 0;\n\
         \x20       v = w;\n\
         \x20   }\n\
         }\n"
    );
}

#[test]
fn longer_replacement_extends_last_statement() {
    let mut builder = UnitBuilder::new();
    let x = builder.local("x", Type::INT);
    let unit = builder.build(vec![assign_stmt(&x, Expr::int(0))]);
    let classes = classes();

    let before = BlockTemplate::new(
        args_info(&[("a", UType::INT)]),
        vec![assign(UExpr::free("a"), UExpr::int(0))],
    );
    let after = BlockTemplate::new(
        args_info(&[("a", UType::INT)]),
        vec![
            assign(UExpr::free("a"), UExpr::int(1)),
            assign(UExpr::free("a"), UExpr::int(2)),
        ],
    );
    let found = before.scan(body(&unit), ctx(&unit, &classes));
    assert_eq!(found.len(), 1);
    let fix = after
        .replace(&found[0], ImportPolicy::default())
        .unwrap_or_else(|err| panic!("replacement failed: {err}"));
    let rewritten = fix.apply_to(&unit).unwrap_or_else(|err| panic!("conflict: {err}"));
    assert!(rewritten.contains("        x = 1;\n        x = 2;\n    }"), "{rewritten}");
}

#[test]
fn template_kinds_report_their_names() {
    let expression: Template = int_template(&["a"], UExpr::free("a")).into();
    let block: Template = zero_then_copy().into();
    assert_eq!(expression.kind_name(), "expression");
    assert_eq!(block.kind_name(), "block");
    assert_eq!(block.info().args.len(), 2);
    assert_eq!(expression.annotations(), &TemplateAnnotations::default());
}
