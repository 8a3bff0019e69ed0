use std::borrow::Cow;

use pretty_assertions::assert_eq;
use recast_ir::{Expr, SymbolId, Type};

use super::*;

#[test]
fn typed_keys_do_not_collide() {
    let expr = Expr::int(1);
    let mut bindings = Bindings::new();
    bindings
        .insert(&FreeIdentKey::new("x"), Cow::Borrowed(&expr))
        .ok();
    bindings
        .insert(&TypeVarKey::new("x"), TypeWithExpression::new(Type::INT))
        .ok();

    assert_eq!(bindings.len(), 2);
    assert_eq!(
        bindings.get(&FreeIdentKey::new("x")).map(|e| &**e),
        Some(&expr)
    );
    assert_eq!(
        bindings.get(&TypeVarKey::new("x")).map(|t| &t.ty),
        Some(&Type::INT)
    );
    assert!(bindings.get(&RepeatedKey::new("x")).is_none());
}

#[test]
fn insert_twice_is_a_contract_violation() {
    let mut bindings = Bindings::new();
    let key = LocalVarKey::new("i");
    let local = LocalVarBinding {
        symbol: SymbolId::new(3),
        name: "i".to_string(),
    };
    assert_eq!(bindings.insert(&key, local.clone()), Ok(()));
    assert_eq!(
        bindings.insert(&key, local),
        Err(BindingError::AlreadyBound(BindingKey::LocalVar("i".to_string())))
    );
}

#[test]
fn replace_requires_existing_binding() {
    let mut bindings: Bindings<'_> = Bindings::new();
    let key = TypeVarKey::new("T");
    assert_eq!(
        bindings.replace(&key, TypeWithExpression::new(Type::string())),
        Err(BindingError::Missing(BindingKey::TypeVar("T".to_string())))
    );

    bindings.insert(&key, TypeWithExpression::new(Type::object())).ok();
    assert_eq!(
        bindings.replace(&key, TypeWithExpression::new(Type::string())),
        Ok(())
    );
    assert_eq!(bindings.get(&key).map(|t| &t.ty), Some(&Type::string()));
}

#[test]
fn local_var_symbols_lists_only_locals() {
    let expr = Expr::int(0);
    let mut bindings = Bindings::new();
    bindings
        .insert(&FreeIdentKey::new("a"), Cow::Borrowed(&expr))
        .ok();
    bindings
        .insert(
            &LocalVarKey::new("i"),
            LocalVarBinding {
                symbol: SymbolId::new(7),
                name: "i".to_string(),
            },
        )
        .ok();
    assert_eq!(bindings.local_var_symbols(), vec![SymbolId::new(7)]);
}

#[test]
fn clone_is_an_independent_fork() {
    let expr = Expr::int(1);
    let mut original = Bindings::new();
    original
        .insert(&FreeIdentKey::new("a"), Cow::Borrowed(&expr))
        .ok();

    let mut fork = original.clone();
    fork.insert(&FreeIdentKey::new("b"), Cow::Borrowed(&expr)).ok();

    assert_eq!(original.len(), 1);
    assert_eq!(fork.len(), 2);
}

#[test]
fn key_display_names_the_family() {
    assert_eq!(
        BindingKey::Repeated("args".to_string()).to_string(),
        "repeated variable `args`"
    );
}
