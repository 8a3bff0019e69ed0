//! End-to-end rewrites: build a unit, run rules over it, apply the fixes.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

mod common;

use common::{assign, binary, body, classes, info, Program};
use pretty_assertions::assert_eq;
use recast_ir::printer::print_expr;
use recast_ir::{BinaryOp, Expr, ExprKind, Stmt, Type};
use recast_patterns::{
    fix_unit, BlockTemplate, ExpressionTemplate, FreeIdentKey, ImportPolicy, MatchContext,
    RefasterRule, RepeatedKey, Template, TemplateAnnotations, TemplateInfo, UExpr, UStmt, UType,
    Unifier,
};

fn ab() -> TemplateInfo {
    info(&[("a", UType::INT), ("b", UType::INT)])
}

fn int_expression(expr: UExpr, result: UType) -> ExpressionTemplate {
    ExpressionTemplate::new(ab(), expr, result)
}

fn free_binary(op: BinaryOp, left: &str, right: &str) -> UExpr {
    UExpr::binary(op, UExpr::free(left), UExpr::free(right))
}

fn expression_rule(
    name: &str,
    before: ExpressionTemplate,
    after: ExpressionTemplate,
) -> Vec<RefasterRule> {
    let annotations = TemplateAnnotations::default();
    RefasterRule::create(name, vec![before.into()], Some(after.into()), annotations).unwrap()
}

fn value_of(stmt: &Stmt) -> &Expr {
    let recast_ir::StmtKind::Expr(expr) = &stmt.kind else {
        panic!("expected an expression statement");
    };
    match &expr.kind {
        ExprKind::Assign { value, .. } => value,
        _ => expr,
    }
}

#[test]
fn sum_binds_each_operand() {
    let mut program = Program::new();
    let x = program.local("x", Type::INT);
    let y = program.local("y", Type::INT);
    let unit = program.unit(vec![assign(&y, binary(BinaryOp::Add, x.clone(), Expr::int(1)))]);
    let classes = classes();
    let ctx = MatchContext::new(&unit, &classes);

    let template = int_expression(free_binary(BinaryOp::Add, "a", "b"), UType::INT);
    let unifier = template.match_expr(value_of(&body(&unit)[0]), ctx).unwrap();
    let bound = |name: &str| unifier.get_binding(&FreeIdentKey::new(name)).map(|e| print_expr(e));
    assert_eq!(bound("a").as_deref(), Some("x"));
    assert_eq!(bound("b").as_deref(), Some("1"));
}

#[test]
fn repeated_free_variable_needs_identical_text() {
    let mut program = Program::new();
    let x = program.local("x", Type::INT);
    let y = program.local("y", Type::INT);
    let z = program.local("z", Type::INT);
    let unit = program.unit(vec![
        assign(&z, binary(BinaryOp::Add, x.clone(), y)),
        assign(&z, binary(BinaryOp::Add, x.clone(), x)),
    ]);
    let classes = classes();
    let ctx = MatchContext::new(&unit, &classes);

    let template = int_expression(free_binary(BinaryOp::Add, "a", "a"), UType::INT);
    assert!(template.match_expr(value_of(&body(&unit)[0]), ctx).is_none());
    assert!(template.match_expr(value_of(&body(&unit)[1]), ctx).is_some());
}

#[test]
fn block_rule_rewrites_each_disjoint_run() {
    let mut program = Program::new();
    let [v, w, x, y, z] = ["v", "w", "x", "y", "z"].map(|name| program.local(name, Type::INT));
    let unit = program.unit(vec![
        assign(&y, Expr::int(5)),
        assign(&x, Expr::int(0)),
        assign(&z, x.clone()),
        assign(&w, Expr::int(0)),
        assign(&v, w.clone()),
    ]);
    let classes = classes();

    let stmt = |target: &str, value: UExpr| {
        UStmt::Expr(UExpr::Assign {
            target: Box::new(UExpr::free(target)),
            value: Box::new(value),
        })
    };
    let before = BlockTemplate::new(
        ab(),
        vec![stmt("a", UExpr::int(0)), stmt("b", UExpr::free("a"))],
    );
    let after = BlockTemplate::new(
        ab(),
        vec![stmt("a", UExpr::int(0)), stmt("b", UExpr::int(0))],
    );
    let rules = RefasterRule::create(
        "p.Rules.CopyZero",
        vec![before.into()],
        Some(after.into()),
        TemplateAnnotations::default(),
    )
    .unwrap();

    let (matches, fix) = fix_unit(&rules, &unit, &classes);
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|m| m.rule == "CopyZero"));
    assert!(matches[0].span.end <= matches[1].span.start);
    assert_eq!(
        fix.apply_to(&unit).unwrap(),
        "public class Main {\n\
         \x20   public void run() {\n\
         \x20       y = 5;\n\
         \x20       x = 0;\n\
         \x20       z = 0;\n\
         \x20       w = 0;\n\
         \x20       v = 0;\n\
         \x20   }\n\
         }\n"
    );
}

#[test]
fn varargs_capture_every_argument() {
    let mut program = Program::new();
    let (sym, ty) = program.method("f", Type::method(vec![Type::array(Type::INT)], Type::VOID));
    let callee = || Expr::ident("f", Some(sym), ty.clone());
    let three = Expr::call(callee(), vec![Expr::int(1), Expr::int(2), Expr::int(3)], Type::VOID);
    let none = Expr::call(callee(), Vec::new(), Type::VOID);
    let unit = program.unit(vec![Stmt::expr(three), Stmt::expr(none)]);
    let classes = classes();
    let ctx = MatchContext::new(&unit, &classes);

    let pattern = UExpr::call(
        UExpr::static_ident(
            "Main",
            "f",
            UType::method(vec![UType::array(UType::INT)], UType::VOID),
        ),
        vec![UExpr::repeated("args")],
    );
    let template = ExpressionTemplate::new(info(&[("args", UType::INT)]), pattern, UType::VOID);

    let captured = |index: usize| {
        let unifier = template.match_expr(value_of(&body(&unit)[index]), ctx).unwrap();
        unifier
            .get_binding(&RepeatedKey::new("args"))
            .map(|exprs| exprs.iter().map(|e| print_expr(e)).collect::<Vec<_>>())
            .unwrap()
    };
    assert_eq!(captured(0), vec!["1", "2", "3"]);
    assert_eq!(captured(1), Vec::<String>::new());
}

#[test]
fn negated_rule_rewrites_complementary_comparison() {
    let mut program = Program::new();
    let x = program.local("x", Type::INT);
    let y = program.local("y", Type::INT);
    let done = program.local("done", Type::BOOLEAN);
    let unit = program.unit(vec![assign(&done, binary(BinaryOp::GtEq, x, y))]);
    let classes = classes();

    let before = int_expression(free_binary(BinaryOp::Lt, "a", "b"), UType::BOOLEAN);
    let after = ExpressionTemplate::new(
        ab().with_annotations(TemplateAnnotations {
            also_negation: true,
            ..TemplateAnnotations::default()
        }),
        free_binary(BinaryOp::Gt, "b", "a"),
        UType::BOOLEAN,
    );
    let rules = expression_rule("p.Rules.Flip", before, after);
    assert_eq!(rules.len(), 2);

    assert!(rules[0].apply(&unit, &classes).is_empty());
    let (matches, fix) = fix_unit(&rules, &unit, &classes);
    assert_eq!(matches.len(), 1);
    let rewritten = fix.apply_to(&unit).unwrap();
    assert!(rewritten.contains("        done = y <= x;\n"), "{rewritten}");
}

#[test]
fn conditional_minimum_becomes_library_call() {
    let mut program = Program::new();
    let x = program.local("x", Type::INT);
    let y = program.local("y", Type::INT);
    let m = program.local("m", Type::INT);
    let cond = binary(BinaryOp::Lt, x.clone(), y.clone());
    let unit = program.unit(vec![assign(&m, Expr::conditional(cond, x, y, Type::INT))]);
    let classes = classes();

    let before = int_expression(
        UExpr::conditional(
            free_binary(BinaryOp::Lt, "a", "b"),
            UExpr::free("a"),
            UExpr::free("b"),
        ),
        UType::INT,
    );
    let min_ty = UType::method(vec![UType::INT, UType::INT], UType::INT);
    let min = UExpr::static_ident("java.lang.Math", "min", min_ty);
    let call = UExpr::call(min, vec![UExpr::free("a"), UExpr::free("b")]);
    let after = int_expression(call, UType::INT);
    let rules = expression_rule("com.example.Rules.MinOfInts", before, after);

    let (matches, fix) = fix_unit(&rules, &unit, &classes);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].rule, "MinOfInts");
    assert!(fix.imports_to_add.is_empty());
    let rewritten = fix.apply_to(&unit).unwrap();
    assert!(rewritten.contains("        m = Math.min(x, y);\n"), "{rewritten}");
}

#[test]
fn rule_without_after_template_only_reports() {
    let mut program = Program::new();
    let x = program.local("x", Type::INT);
    let unit = program.unit(vec![assign(&x, binary(BinaryOp::Add, x.clone(), Expr::int(0)))]);
    let classes = classes();

    let add_zero = UExpr::binary(BinaryOp::Add, UExpr::free("a"), UExpr::int(0));
    let before = int_expression(add_zero, UType::INT);
    let rules = RefasterRule::create(
        "p.Rules.AddZero",
        vec![Template::from(before)],
        None,
        TemplateAnnotations::default(),
    )
    .unwrap();
    let found = rules[0].apply(&unit, &classes);
    assert_eq!(found.len(), 1);
    assert!(found[0].fix.is_none());
    assert_eq!(found[0].span.slice(&unit.source), Some("x + 0"));
}

#[test]
fn unresolvable_replacement_reports_without_a_fix() {
    let mut program = Program::new();
    let x = program.local("x", Type::INT);
    let unit = program.unit(vec![assign(&x, binary(BinaryOp::Add, x.clone(), Expr::int(0)))]);
    let classes = classes();

    let add_zero = UExpr::binary(BinaryOp::Add, UExpr::free("a"), UExpr::int(0));
    let before = int_expression(add_zero, UType::INT);
    let wrap = UExpr::static_ident(
        "com.example.Missing",
        "wrap",
        UType::method(vec![UType::INT], UType::class("com.example.Missing")),
    );
    let after = int_expression(UExpr::call(wrap, vec![UExpr::free("a")]), UType::INT);
    let rules = expression_rule("p.Rules.Wrap", before, after);

    let found = rules[0].apply(&unit, &classes);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].span.slice(&unit.source), Some("x + 0"));
    assert!(found[0].fix.is_none());

    let (matches, fix) = fix_unit(&rules, &unit, &classes);
    assert_eq!(matches.len(), 1);
    assert_eq!(fix.apply_to(&unit).unwrap(), unit.source);
}

#[test]
fn matches_are_not_nested_within_one_rule() {
    let mut program = Program::new();
    let x = program.local("x", Type::INT);
    let y = program.local("y", Type::INT);
    let sum = binary(BinaryOp::Add, binary(BinaryOp::Add, x.clone(), y.clone()), Expr::int(1));
    let unit = program.unit(vec![assign(&x, sum)]);
    let classes = classes();

    let swap = expression_rule(
        "p.Rules.Swap",
        int_expression(free_binary(BinaryOp::Add, "a", "b"), UType::INT),
        int_expression(free_binary(BinaryOp::Add, "b", "a"), UType::INT),
    );
    let found = swap[0].apply(&unit, &classes);
    assert_eq!(found.len(), 1);
    let fix = found[0].fix.clone().unwrap();
    assert_eq!(fix.edits[0].new_text, "1 + (x + y)");
}

#[test]
fn replacement_reparses_against_its_own_pattern() {
    let mut program = Program::new();
    let x = program.local("x", Type::INT);
    let y = program.local("y", Type::INT);
    let targets = vec![
        binary(BinaryOp::Add, x.clone(), Expr::int(1)),
        binary(BinaryOp::Add, binary(BinaryOp::Mul, x.clone(), y.clone()), y.clone()),
        binary(BinaryOp::Add, Expr::paren(x.clone()), Expr::int(7)),
    ];
    let unit = program.unit(targets.into_iter().map(|t| assign(&x, t)).collect());
    let classes = classes();
    let ctx = MatchContext::new(&unit, &classes);

    let before = int_expression(free_binary(BinaryOp::Add, "a", "b"), UType::INT);
    let after = int_expression(free_binary(BinaryOp::Sub, "b", "a"), UType::INT);
    for stmt in body(&unit) {
        let target = value_of(stmt);
        let unifier = before.match_expr(target, ctx).unwrap();
        let policy = ImportPolicy::default();
        let mut inliner = recast_patterns::Inliner::new(ctx, unifier.bindings(), policy);
        let inlined = after.expr.inline(&mut inliner).unwrap();
        assert!(
            after.unify(&inlined, Unifier::new(ctx)).is_some(),
            "{} does not re-match",
            print_expr(&inlined)
        );
    }
}
