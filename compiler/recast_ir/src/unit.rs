//! Compilation units.
//!
//! A unit owns its declarations, its symbol table and the source text the
//! declarations were laid out as. Constructing a unit prints it and writes
//! the span of every node back into the tree, so spans always index into
//! `source`.

use crate::ast::{Expr, Stmt, VarDecl};
use crate::printer::layout_unit;
use crate::visitor::{walk_expr_mut, walk_stmt_mut, VisitorMut};
use crate::{Span, Symbol, SymbolId, SymbolTable};

/// `import a.b.C;` or `import static a.b.C.member;`
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Import {
    pub path: String,
    pub is_static: bool,
    pub span: Span,
}

impl Import {
    pub fn new(path: impl Into<String>) -> Self {
        Import {
            path: path.into(),
            is_static: false,
            span: Span::DUMMY,
        }
    }

    pub fn static_member(path: impl Into<String>) -> Self {
        Import {
            path: path.into(),
            is_static: true,
            span: Span::DUMMY,
        }
    }

    /// Last path component: the name this import makes visible.
    pub fn simple_name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct MethodDecl {
    pub name: String,
    pub type_params: Vec<String>,
    pub return_ty: Expr,
    pub params: Vec<VarDecl>,
    /// Always a block.
    pub body: Stmt,
    pub is_static: bool,
    pub span: Span,
}

impl MethodDecl {
    pub fn new(
        name: impl Into<String>,
        return_ty: Expr,
        params: Vec<VarDecl>,
        body: Vec<Stmt>,
    ) -> Self {
        MethodDecl {
            name: name.into(),
            type_params: Vec::new(),
            return_ty,
            params,
            body: Stmt::block(body),
            is_static: false,
            span: Span::DUMMY,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDecl {
    /// Simple name; the qualified name is formed with the unit's package.
    pub name: String,
    pub fields: Vec<VarDecl>,
    pub methods: Vec<MethodDecl>,
    pub span: Span,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, fields: Vec<VarDecl>, methods: Vec<MethodDecl>) -> Self {
        TypeDecl {
            name: name.into(),
            fields,
            methods,
            span: Span::DUMMY,
        }
    }
}

/// A laid-out, fully resolved source file.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct CompilationUnit {
    pub package: Option<String>,
    pub package_span: Span,
    pub imports: Vec<Import>,
    pub types: Vec<TypeDecl>,
    pub symbols: SymbolTable,
    pub source: String,
    /// Spans of every comment in `source`.
    pub comments: Vec<Span>,
}

impl CompilationUnit {
    /// Lay out the declarations as source text and assign spans.
    pub fn new(
        package: Option<String>,
        mut imports: Vec<Import>,
        mut types: Vec<TypeDecl>,
        symbols: SymbolTable,
    ) -> Self {
        let layout = layout_unit(package.as_deref(), &imports, &types);
        let mut spans = SpanAssigner {
            spans: layout.spans.into_iter(),
        };

        let package_span = if package.is_some() {
            spans.next()
        } else {
            Span::DUMMY
        };
        for import in &mut imports {
            import.span = spans.next();
        }
        for ty in &mut types {
            ty.span = spans.next();
            for field in &mut ty.fields {
                spans.visit_var_decl_mut(field);
            }
            for method in &mut ty.methods {
                method.span = spans.next();
                spans.visit_expr_mut(&mut method.return_ty);
                for param in &mut method.params {
                    spans.visit_var_decl_mut(param);
                }
                spans.visit_stmt_mut(&mut method.body);
            }
        }
        debug_assert!(spans.spans.next().is_none(), "layout recorded extra spans");

        CompilationUnit {
            package,
            package_span,
            imports,
            types,
            symbols,
            source: layout.text,
            comments: layout.comments,
        }
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    /// Qualified name of a type declared in this unit.
    pub fn qualified_name(&self, ty: &TypeDecl) -> String {
        match &self.package {
            Some(package) => format!("{package}.{}", ty.name),
            None => ty.name.clone(),
        }
    }

    /// Whether any comment lies entirely inside `span`.
    pub fn has_comment_within(&self, span: Span) -> bool {
        self.comments.iter().any(|c| span.contains_span(*c))
    }

    /// Leading whitespace of the line containing `offset`.
    pub fn line_indent(&self, offset: u32) -> &str {
        let offset = (offset as usize).min(self.source.len());
        let line_start = self.source[..offset].rfind('\n').map_or(0, |i| i + 1);
        let line = &self.source[line_start..];
        let width = line.len() - line.trim_start_matches([' ', '\t']).len();
        &line[..width]
    }

    /// Non-static import whose simple name is `simple`.
    pub fn import_for_simple_name(&self, simple: &str) -> Option<&Import> {
        self.imports
            .iter()
            .find(|import| !import.is_static && import.simple_name() == simple)
    }

    /// Static import whose member name is `simple`.
    pub fn static_import_for_simple_name(&self, simple: &str) -> Option<&Import> {
        self.imports
            .iter()
            .find(|import| import.is_static && import.simple_name() == simple)
    }

    pub fn has_import(&self, path: &str, is_static: bool) -> bool {
        self.imports
            .iter()
            .any(|import| import.is_static == is_static && import.path == path)
    }

    /// Type declared in this unit whose simple name is `simple`.
    pub fn declares_type(&self, simple: &str) -> bool {
        self.types.iter().any(|ty| ty.name == simple)
    }

    /// Where new import lines go, and the text that must precede them.
    ///
    /// After the last import; else after the package declaration; else at
    /// the top of the file.
    pub fn import_insertion_point(&self) -> (u32, &'static str) {
        if let Some(last) = self.imports.last() {
            (last.span.end, "\n")
        } else if self.package.is_some() {
            (self.package_span.end, "\n\n")
        } else {
            (0, "")
        }
    }
}

/// Writes pre-order layout spans back into a tree.
struct SpanAssigner {
    spans: std::vec::IntoIter<Span>,
}

impl SpanAssigner {
    fn next(&mut self) -> Span {
        self.spans.next().unwrap_or(Span::DUMMY)
    }
}

impl VisitorMut for SpanAssigner {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        expr.span = self.next();
        walk_expr_mut(self, expr);
    }

    fn visit_stmt_mut(&mut self, stmt: &mut Stmt) {
        stmt.span = self.next();
        walk_stmt_mut(self, stmt);
    }
}
