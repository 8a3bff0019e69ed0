use std::borrow::Cow;
use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use recast_ir::printer::print_expr;
use recast_ir::{Expr, Import, Type};

use super::*;
use crate::bindings::{BindingKey, FreeIdentKey, LocalVarBinding, LocalVarKey, RepeatedKey};
use crate::test_helpers::{classes, ctx, UnitBuilder};
use crate::{InlineError, TypeWithExpression};

const COLLECTIONS: &str = "java.util.Collections";

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}

#[test]
fn top_level_policy_imports_outer_class() {
    let unit = UnitBuilder::new().package("p").build(Vec::new());
    let classes = classes();
    let bindings = Bindings::new();
    let mut inliner = Inliner::new(ctx(&unit, &classes), &bindings, ImportPolicy::ImportTopLevel);

    let entry = inliner.class_reference("java.util.Map", "java.util.Map.Entry");
    assert_eq!(print_expr(&entry), "Map.Entry");
    let string = inliner.class_reference("java.lang.String", "java.lang.String");
    assert_eq!(print_expr(&string), "String");
    assert_eq!(inliner.into_imports(), (set(&["java.util.Map"]), BTreeSet::new()));
}

#[test]
fn direct_policy_imports_nested_class() {
    let unit = UnitBuilder::new().package("p").build(Vec::new());
    let classes = classes();
    let bindings = Bindings::new();
    let policy = ImportPolicy::ImportClassDirectly;
    let mut inliner = Inliner::new(ctx(&unit, &classes), &bindings, policy);

    let entry = inliner.class_reference("java.util.Map", "java.util.Map.Entry");
    assert_eq!(print_expr(&entry), "Entry");
    assert_eq!(inliner.pending_imports(), &set(&["java.util.Map.Entry"]));
}

#[test]
fn simple_name_conflict_falls_back_to_qualified_name() {
    let unit = UnitBuilder::new()
        .package("p")
        .import(Import::new("com.other.List"))
        .build(Vec::new());
    let classes = classes();
    let bindings = Bindings::new();
    let mut inliner = Inliner::new(ctx(&unit, &classes), &bindings, ImportPolicy::default());

    let list = inliner.class_reference("java.util.List", "java.util.List");
    assert_eq!(print_expr(&list), "java.util.List");
    // The unit's own class name is taken too.
    let main = inliner.class_reference("q.Main", "q.Main");
    assert_eq!(print_expr(&main), "q.Main");
    assert!(inliner.pending_imports().is_empty());
}

#[test]
fn existing_and_same_package_references_need_no_import() {
    let unit = UnitBuilder::new()
        .package("p")
        .import(Import::new("java.util.List"))
        .build(Vec::new());
    let classes = classes();
    let bindings = Bindings::new();
    let mut inliner = Inliner::new(ctx(&unit, &classes), &bindings, ImportPolicy::default());

    assert_eq!(print_expr(&inliner.class_reference("java.util.List", "java.util.List")), "List");
    assert_eq!(print_expr(&inliner.class_reference("p.Helper", "p.Helper")), "Helper");
    assert!(inliner.pending_imports().is_empty());
}

#[test]
fn pending_import_blocks_second_class_with_same_simple_name() {
    let unit = UnitBuilder::new().package("p").build(Vec::new());
    let classes = classes();
    let bindings = Bindings::new();
    let mut inliner = Inliner::new(ctx(&unit, &classes), &bindings, ImportPolicy::default());

    let mut reference =
        |qualified: &str| print_expr(&inliner.class_reference(qualified, qualified));
    assert_eq!(reference("java.util.List"), "List");
    assert_eq!(reference("java.awt.List"), "java.awt.List");
    assert_eq!(reference("java.util.List"), "List");
    assert_eq!(inliner.pending_imports(), &set(&["java.util.List"]));
}

#[test]
fn static_references_follow_policy() {
    let unit = UnitBuilder::new().package("p").build(Vec::new());
    let classes = classes();
    let bindings = Bindings::new();
    let ty = Type::method(Vec::new(), Type::class("java.util.List"));

    let mut qualified = Inliner::new(ctx(&unit, &classes), &bindings, ImportPolicy::default());
    let reference = qualified.static_reference(COLLECTIONS, COLLECTIONS, "emptyList", ty.clone());
    assert_eq!(print_expr(&reference), "Collections.emptyList");
    assert_eq!(qualified.into_imports(), (set(&["java.util.Collections"]), BTreeSet::new()));

    let policy = ImportPolicy::StaticImportAlways;
    let mut imported = Inliner::new(ctx(&unit, &classes), &bindings, policy);
    let reference = imported.static_reference(COLLECTIONS, COLLECTIONS, "emptyList", ty);
    assert_eq!(print_expr(&reference), "emptyList");
    assert_eq!(
        imported.into_imports(),
        (BTreeSet::new(), set(&["java.util.Collections.emptyList"]))
    );
}

#[test]
fn static_import_conflict_keeps_class_qualifier() {
    let unit = UnitBuilder::new()
        .package("p")
        .import(Import::static_member("com.other.Lists.emptyList"))
        .build(Vec::new());
    let classes = classes();
    let bindings = Bindings::new();
    let policy = ImportPolicy::StaticImportAlways;
    let mut inliner = Inliner::new(ctx(&unit, &classes), &bindings, policy);

    let ty = Type::method(Vec::new(), Type::class("java.util.List"));
    let reference = inliner.static_reference(COLLECTIONS, COLLECTIONS, "emptyList", ty);
    assert_eq!(print_expr(&reference), "Collections.emptyList");
    assert!(inliner.pending_static_imports().is_empty());
}

#[test]
fn type_expressions_import_every_named_class() {
    let unit = UnitBuilder::new().package("p").build(Vec::new());
    let classes = classes();
    let bindings = Bindings::new();
    let mut inliner = Inliner::new(ctx(&unit, &classes), &bindings, ImportPolicy::default());

    let ty = Type::generic(
        "java.util.Map",
        vec![Type::string(), Type::array(Type::class("java.util.Optional"))],
    );
    let expr = inliner.type_expr(&ty);
    assert_eq!(print_expr(&expr), "Map<String, Optional[]>");
    assert_eq!(expr.ty, ty);
    assert_eq!(inliner.pending_imports(), &set(&["java.util.Map", "java.util.Optional"]));
}

#[test]
fn type_variables_inline_to_their_bindings() {
    let unit = UnitBuilder::new().build(Vec::new());
    let classes = classes();
    let mut bindings = Bindings::new();
    bindings
        .insert(&TypeVarKey::new("T"), TypeWithExpression::new(Type::string()))
        .ok();
    let inliner = Inliner::new(ctx(&unit, &classes), &bindings, ImportPolicy::default());
    assert_eq!(inliner.type_var("T"), Type::string());
    assert_eq!(inliner.type_var("U"), Type::var("U"));
}

#[test]
fn lists_expand_repeated_bindings_in_place() {
    let unit = UnitBuilder::new().build(Vec::new());
    let classes = classes();
    let exprs = [Expr::int(1), Expr::int(2), Expr::int(3)];
    let mut bindings = Bindings::new();
    bindings
        .insert(&FreeIdentKey::new("first"), Cow::Borrowed(&exprs[0]))
        .ok();
    bindings
        .insert(
            &RepeatedKey::new("rest"),
            exprs[1..].iter().map(Cow::Borrowed).collect(),
        )
        .ok();
    let mut inliner = Inliner::new(ctx(&unit, &classes), &bindings, ImportPolicy::default());

    let inlined = inliner.inline_list(&[UExpr::free("first"), UExpr::repeated("rest")]);
    assert_eq!(inlined, Ok(exprs.to_vec()));
    assert_eq!(
        inliner.inline_expr(&UExpr::repeated("rest")),
        Err(InlineError::RepeatedOutsideList("rest".to_string()))
    );
}

#[test]
fn unbound_and_uninlineable_patterns_are_errors() {
    let unit = UnitBuilder::new().build(Vec::new());
    let classes = classes();
    let bindings = Bindings::new();
    let mut inliner = Inliner::new(ctx(&unit, &classes), &bindings, ImportPolicy::default());

    assert_eq!(
        inliner.inline_expr(&UExpr::free("a")),
        Err(InlineError::Unbound(BindingKey::FreeIdent("a".to_string())))
    );
    assert_eq!(
        inliner.inline_expr(&UExpr::any_of(vec![UExpr::int(1)])),
        Err(InlineError::NotInlineable("an any-of pattern"))
    );
    assert_eq!(
        inliner.inline_list(&[UExpr::repeated("rest")]),
        Err(InlineError::Unbound(BindingKey::Repeated("rest".to_string())))
    );
}

#[test]
fn matched_locals_keep_their_names() {
    let mut builder = UnitBuilder::new();
    let target = builder.local("count", Type::INT);
    let unit = builder.build(Vec::new());
    let classes = classes();
    let symbol = target.symbol().unwrap_or_else(|| panic!("local has a symbol"));
    let mut bindings = Bindings::new();
    bindings
        .insert(
            &LocalVarKey::new("tmp"),
            LocalVarBinding {
                symbol,
                name: "count".to_string(),
            },
        )
        .ok();
    let mut inliner = Inliner::new(ctx(&unit, &classes), &bindings, ImportPolicy::default());

    let inlined = inliner.inline_expr(&UExpr::local("tmp"));
    assert_eq!(inlined, Ok(target));
}
