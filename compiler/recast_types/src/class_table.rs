//! Class table.
//!
//! Every class the oracle reasons about is declared here by qualified name,
//! with its type parameters and direct supertypes. Supertypes are written
//! in terms of the class's own type parameters, e.g. `ArrayList<E>` has the
//! supertype `List<E>`.

use recast_ir::Type;
use rustc_hash::FxHashMap;

use crate::ResolveError;

pub const OBJECT: &str = "java.lang.Object";

#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassDecl {
    pub name: String,
    pub type_params: Vec<String>,
    /// Direct supertypes. `Object` is implicit.
    pub supertypes: Vec<Type>,
    pub is_interface: bool,
}

impl ClassDecl {
    pub fn class(name: &str, type_params: &[&str], supertypes: Vec<Type>) -> Self {
        ClassDecl {
            name: name.to_string(),
            type_params: type_params.iter().map(|p| (*p).to_string()).collect(),
            supertypes,
            is_interface: false,
        }
    }

    pub fn interface(name: &str, type_params: &[&str], supertypes: Vec<Type>) -> Self {
        ClassDecl {
            is_interface: true,
            ..Self::class(name, type_params, supertypes)
        }
    }

    /// Simple name: last component of the qualified name.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassTable {
    classes: FxHashMap<String, ClassDecl>,
}

impl ClassTable {
    /// An empty table. Only `Object` is known.
    pub fn new() -> Self {
        let mut table = ClassTable::default();
        table.add(ClassDecl::class(OBJECT, &[], Vec::new()));
        table
    }

    /// A table with the core `java.lang` and `java.util` types.
    pub fn java_lang() -> Self {
        let mut table = ClassTable::new();
        for decl in core_classes() {
            table.add(decl);
        }
        table
    }

    /// Add or replace a class.
    pub fn add(&mut self, decl: ClassDecl) {
        self.classes.insert(decl.name.clone(), decl);
    }

    pub fn get(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn resolve(&self, name: &str) -> Result<&ClassDecl, ResolveError> {
        self.classes
            .get(name)
            .ok_or_else(|| ResolveError::UnknownClass(name.to_string()))
    }

    pub fn is_interface(&self, name: &str) -> bool {
        self.get(name).is_some_and(|decl| decl.is_interface)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

fn var(name: &str) -> Type {
    Type::var(name)
}

fn class(name: &str) -> Type {
    Type::class(name)
}

fn generic(name: &str, args: Vec<Type>) -> Type {
    Type::generic(name, args)
}

fn comparable(arg: Type) -> Type {
    generic("java.lang.Comparable", vec![arg])
}

fn core_classes() -> Vec<ClassDecl> {
    const SERIALIZABLE: &str = "java.io.Serializable";
    let serializable = || class(SERIALIZABLE);

    let mut decls = vec![
        ClassDecl::interface(SERIALIZABLE, &[], Vec::new()),
        ClassDecl::interface("java.lang.Cloneable", &[], Vec::new()),
        ClassDecl::interface("java.lang.Comparable", &["T"], Vec::new()),
        ClassDecl::interface("java.lang.CharSequence", &[], Vec::new()),
        ClassDecl::interface("java.lang.Runnable", &[], Vec::new()),
        ClassDecl::interface("java.lang.Iterable", &["T"], Vec::new()),
        ClassDecl::class(
            "java.lang.String",
            &[],
            vec![
                serializable(),
                comparable(class("java.lang.String")),
                class("java.lang.CharSequence"),
            ],
        ),
        ClassDecl::class(
            "java.lang.StringBuilder",
            &[],
            vec![serializable(), class("java.lang.CharSequence")],
        ),
        ClassDecl::class("java.lang.Number", &[], vec![serializable()]),
        ClassDecl::class(
            "java.lang.Boolean",
            &[],
            vec![serializable(), comparable(class("java.lang.Boolean"))],
        ),
        ClassDecl::class(
            "java.lang.Character",
            &[],
            vec![serializable(), comparable(class("java.lang.Character"))],
        ),
        ClassDecl::class(
            "java.lang.Enum",
            &["E"],
            vec![comparable(var("E")), serializable()],
        ),
        ClassDecl::class("java.lang.Class", &["T"], vec![serializable()]),
        ClassDecl::class("java.lang.Throwable", &[], vec![serializable()]),
        ClassDecl::class("java.lang.Exception", &[], vec![class("java.lang.Throwable")]),
        ClassDecl::class(
            "java.lang.RuntimeException",
            &[],
            vec![class("java.lang.Exception")],
        ),
        ClassDecl::class(
            "java.lang.IllegalArgumentException",
            &[],
            vec![class("java.lang.RuntimeException")],
        ),
        ClassDecl::class("java.lang.Math", &[], Vec::new()),
        ClassDecl::class("java.lang.System", &[], Vec::new()),
        ClassDecl::class("java.util.Objects", &[], Vec::new()),
        ClassDecl::class("java.util.Arrays", &[], Vec::new()),
        ClassDecl::class("java.util.Collections", &[], Vec::new()),
        ClassDecl::class("java.util.Optional", &["T"], Vec::new()),
        ClassDecl::interface(
            "java.util.Collection",
            &["E"],
            vec![generic("java.lang.Iterable", vec![var("E")])],
        ),
        ClassDecl::interface(
            "java.util.List",
            &["E"],
            vec![generic("java.util.Collection", vec![var("E")])],
        ),
        ClassDecl::interface(
            "java.util.Set",
            &["E"],
            vec![generic("java.util.Collection", vec![var("E")])],
        ),
        ClassDecl::interface("java.util.Map", &["K", "V"], Vec::new()),
        ClassDecl::class(
            "java.util.ArrayList",
            &["E"],
            vec![
                generic("java.util.List", vec![var("E")]),
                class("java.lang.Cloneable"),
                serializable(),
            ],
        ),
        ClassDecl::class(
            "java.util.HashSet",
            &["E"],
            vec![
                generic("java.util.Set", vec![var("E")]),
                class("java.lang.Cloneable"),
                serializable(),
            ],
        ),
        ClassDecl::class(
            "java.util.HashMap",
            &["K", "V"],
            vec![
                generic("java.util.Map", vec![var("K"), var("V")]),
                class("java.lang.Cloneable"),
                serializable(),
            ],
        ),
    ];

    for boxed in [
        "java.lang.Integer",
        "java.lang.Long",
        "java.lang.Short",
        "java.lang.Byte",
        "java.lang.Double",
        "java.lang.Float",
    ] {
        decls.push(ClassDecl::class(
            boxed,
            &[],
            vec![class("java.lang.Number"), comparable(class(boxed))],
        ));
    }
    decls
}
