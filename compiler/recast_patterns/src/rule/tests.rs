use pretty_assertions::assert_eq;
use recast_ir::BinaryOp;

use super::*;
use crate::template::{BlockTemplate, ExpressionTemplate};
use crate::test_helpers::{args_info, int_template};
use crate::tree::{UExpr, UStmt};
use crate::types::UType;

fn less_than(annotations: TemplateAnnotations) -> Template {
    ExpressionTemplate::new(
        args_info(&[("a", UType::INT), ("b", UType::INT)]).with_annotations(annotations),
        UExpr::binary(BinaryOp::Lt, UExpr::free("a"), UExpr::free("b")),
        UType::BOOLEAN,
    )
    .into()
}

fn greater_than(annotations: TemplateAnnotations) -> Template {
    ExpressionTemplate::new(
        args_info(&[("a", UType::INT), ("b", UType::INT)]).with_annotations(annotations),
        UExpr::binary(BinaryOp::Gt, UExpr::free("b"), UExpr::free("a")),
        UType::BOOLEAN,
    )
    .into()
}

fn negatable() -> TemplateAnnotations {
    TemplateAnnotations {
        also_negation: true,
        ..TemplateAnnotations::default()
    }
}

#[test]
fn rule_needs_a_before_template() {
    let result =
        RefasterRule::create("p.Rules.Empty", Vec::new(), None, TemplateAnnotations::default());
    assert_eq!(result, Err(RuleError::NoBeforeTemplate("p.Rules.Empty".to_string())));
}

#[test]
fn templates_must_share_one_kind() {
    let block: Template = BlockTemplate::new(args_info(&[]), vec![UStmt::Empty]).into();
    let result = RefasterRule::create(
        "p.Rules.Mixed",
        vec![int_template(&["a"], UExpr::free("a")).into()],
        Some(block),
        TemplateAnnotations::default(),
    );
    assert_eq!(
        result,
        Err(RuleError::MixedTemplateKinds {
            rule: "p.Rules.Mixed".to_string(),
            expected: "expression",
            found: "block",
        })
    );
}

#[test]
fn plain_rule_yields_one_rule() {
    let rules = RefasterRule::create(
        "p.Rules.Flip",
        vec![less_than(TemplateAnnotations::default())],
        Some(greater_than(TemplateAnnotations::default())),
        TemplateAnnotations::default(),
    )
    .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(rules.len(), 1);
    assert!(rules[0].is_expression_rule());
    assert!(rules[0].reject_matches_with_comments());
}

#[test]
fn negatable_after_template_derives_a_negated_rule() {
    let rules = RefasterRule::create(
        "p.Rules.Flip",
        vec![less_than(TemplateAnnotations::default())],
        Some(greater_than(negatable())),
        TemplateAnnotations::default(),
    )
    .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(rules.len(), 2);

    let negated = &rules[1];
    assert_eq!(negated.qualified_name(), "p.Rules.Flip");
    let Some(Template::Expression(before)) = negated.before_templates().first() else {
        panic!("negated rule keeps an expression before-template");
    };
    assert_eq!(
        before.expr,
        UExpr::binary(BinaryOp::GtEq, UExpr::free("a"), UExpr::free("b"))
    );
    let Some(Template::Expression(after)) = negated.after_template() else {
        panic!("negated rule keeps an expression after-template");
    };
    assert_eq!(
        after.expr,
        UExpr::binary(BinaryOp::LtEq, UExpr::free("b"), UExpr::free("a"))
    );
    assert!(!after.info.annotations.also_negation);
}

#[test]
fn negating_a_non_boolean_rule_fails() {
    let after = ExpressionTemplate::new(
        args_info(&[("a", UType::INT)]).with_annotations(negatable()),
        UExpr::free("a"),
        UType::INT,
    );
    let result = RefasterRule::create(
        "p.Rules.Identity",
        vec![int_template(&["a"], UExpr::free("a")).into()],
        Some(after.into()),
        TemplateAnnotations::default(),
    );
    assert!(matches!(result, Err(RuleError::NonBooleanNegation(_))));
}

#[test]
fn import_policy_comes_from_the_after_template() {
    let before = vec![less_than(TemplateAnnotations::default())];
    let rules = RefasterRule::create("p.R", before.clone(), None, TemplateAnnotations::default())
        .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(rules[0].import_policy(), ImportPolicy::ImportTopLevel);

    let annotations = TemplateAnnotations {
        import_policy: Some(ImportPolicy::StaticImportAlways),
        ..TemplateAnnotations::default()
    };
    let after = Some(greater_than(annotations));
    let rules = RefasterRule::create("p.R", before, after, TemplateAnnotations::default())
        .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(rules[0].import_policy(), ImportPolicy::StaticImportAlways);
}

#[test]
fn display_drops_package_and_top_level_class() {
    let rule = |name: &str| {
        let before = vec![less_than(TemplateAnnotations::default())];
        RefasterRule::create(name, before, None, TemplateAnnotations::default())
            .unwrap_or_else(|err| panic!("{err}"))
            .remove(0)
    };
    assert_eq!(rule("com.example.Rules.MinOfInts").to_string(), "MinOfInts");
    assert_eq!(rule("com.example.Rules.Ints.Min").to_string(), "Ints_Min");
    assert_eq!(rule("com.example.MinOfInts").to_string(), "com.example.MinOfInts");
}

#[test]
fn block_rules_are_not_expression_rules() {
    let block: Template = BlockTemplate::new(args_info(&[]), vec![UStmt::Empty]).into();
    let rules = RefasterRule::create("p.R.Skip", vec![block], None, TemplateAnnotations::default())
        .unwrap_or_else(|err| panic!("{err}"));
    assert!(!rules[0].is_expression_rule());
    assert!(rules[0].after_template().is_none());
}
