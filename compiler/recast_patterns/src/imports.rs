//! Import policies.
//!
//! How an after-template refers to the classes and static members it
//! mentions, and which imports that adds to the unit.

use recast_ir::{Expr, Type};

use crate::inliner::Inliner;

/// The qualified name of the outermost class enclosing `qualified`: the
/// path up to and including the first component that starts with an
/// uppercase letter. Names without such a component are returned whole.
pub fn top_level_class(qualified: &str) -> &str {
    let mut end = 0;
    for component in qualified.split('.') {
        end += component.len();
        if component.starts_with(|c: char| c.is_ascii_uppercase()) {
            return &qualified[..end];
        }
        end += 1;
    }
    qualified
}

/// How replacement code refers to classes and static members.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ImportPolicy {
    /// Import the top-level class; refer to nested classes through it
    /// (`Map.Entry`).
    #[default]
    ImportTopLevel,
    /// Import every class directly, nested classes included (`Entry`).
    ImportClassDirectly,
    /// Like `ImportTopLevel`, but static members are imported and referred
    /// to by their simple name.
    StaticImportAlways,
}

impl ImportPolicy {
    /// A reference to `qualified`, recording any import it needs.
    pub fn class_reference(
        self,
        inliner: &mut Inliner<'_, '_>,
        top_level: &str,
        qualified: &str,
    ) -> Expr {
        let ty = Type::class(qualified);
        let imported = match self {
            ImportPolicy::ImportTopLevel | ImportPolicy::StaticImportAlways => top_level,
            ImportPolicy::ImportClassDirectly => qualified,
        };
        if !refer_simply(inliner, imported) {
            return Expr::qualified_class(qualified, ty);
        }
        let simple = simple_name(imported);
        let written = match qualified.strip_prefix(imported) {
            Some(nested) => format!("{simple}{nested}"),
            None => simple.to_string(),
        };
        Expr::qualified_class(&written, ty)
    }

    /// A reference to the static member `class.member`.
    pub fn static_reference(
        self,
        inliner: &mut Inliner<'_, '_>,
        top_level: &str,
        class: &str,
        member: &str,
        ty: Type,
    ) -> Expr {
        if self == ImportPolicy::StaticImportAlways {
            let path = format!("{class}.{member}");
            if refer_to_static_simply(inliner, &path, member) {
                return Expr::ident(member, None, ty);
            }
        }
        let receiver = self.class_reference(inliner, top_level, class);
        Expr::select(receiver, member, None, ty)
    }
}

fn simple_name(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

fn package_of(path: &str) -> &str {
    path.rsplit_once('.').map_or("", |(package, _)| package)
}

/// Whether `path` can be written by its simple name, recording an import
/// when one is needed. `false` means the simple name is taken by
/// something else and the reference must be fully qualified.
fn refer_simply(inliner: &mut Inliner<'_, '_>, path: &str) -> bool {
    let unit = inliner.unit();
    if unit.has_import(path, false) || inliner.pending_imports().contains(path) {
        return true;
    }

    let simple = simple_name(path);
    let conflicts = unit.import_for_simple_name(simple).is_some()
        || unit.declares_type(simple)
        || inliner
            .pending_imports()
            .iter()
            .any(|pending| simple_name(pending) == simple);
    if conflicts {
        return false;
    }

    let package = package_of(path);
    if package == "java.lang" || unit.package.as_deref() == Some(package) {
        return true;
    }
    inliner.add_import(path);
    true
}

/// The static counterpart of [`refer_simply`].
fn refer_to_static_simply(inliner: &mut Inliner<'_, '_>, path: &str, member: &str) -> bool {
    let unit = inliner.unit();
    if unit.has_import(path, true) || inliner.pending_static_imports().contains(path) {
        return true;
    }
    let conflicts = unit.static_import_for_simple_name(member).is_some()
        || inliner
            .pending_static_imports()
            .iter()
            .any(|pending| simple_name(pending) == member);
    if conflicts {
        return false;
    }
    inliner.add_static_import(path);
    true
}
