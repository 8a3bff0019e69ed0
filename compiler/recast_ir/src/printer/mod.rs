//! Host Tree Printer
//!
//! Prints expressions, statements and whole compilation units as source
//! text. Three modes share one printer:
//!
//! - **Canonical** (`print_expr`): every node is printed structurally. Used
//!   to compare captured expressions by their printed form.
//! - **Render** (`render_expr`, `render_stmts`): nodes with a non-empty span
//!   are copied byte-for-byte from the unit's source; synthesized nodes are
//!   printed. Used to produce replacement text.
//! - **Layout** (`CompilationUnit::new`): prints a unit and records the span
//!   of every node in pre-order, matching the visitor's child order.
//!
//! Parentheses are inserted wherever a child binds more loosely than its
//! position allows.

mod buffer;

use crate::ast::{Expr, ExprKind, Stmt, StmtKind, UnaryOp, VarDecl, ASSIGN_PRECEDENCE};
use crate::unit::{Import, MethodDecl, TypeDecl};
use crate::Span;

use self::buffer::SourceBuffer;

/// Print `expr` structurally, ignoring spans.
pub fn print_expr(expr: &Expr) -> String {
    let mut printer = Printer::new(None);
    printer.expr(expr);
    printer.finish()
}

/// Print `expr`, copying source text for every node that has a span.
pub fn render_expr(expr: &Expr, source: &str) -> String {
    let mut printer = Printer::new(Some(source));
    printer.expr(expr);
    printer.finish()
}

/// Print `expr` wrapped in parentheses if it binds more loosely than
/// `max_precedence`.
pub fn render_expr_in(expr: &Expr, source: &str, max_precedence: u8) -> String {
    let mut printer = Printer::new(Some(source));
    printer.expr_prec(expr, max_precedence);
    printer.finish()
}

/// Print a statement sequence, one statement per line. Lines after the
/// first start with `indent`.
pub fn render_stmts(stmts: &[Stmt], source: &str, indent: &str) -> String {
    let mut printer = Printer::new(Some(source));
    printer.base_indent = indent.to_string();
    for (i, stmt) in stmts.iter().enumerate() {
        if i > 0 {
            printer.newline();
        }
        printer.stmt(stmt);
    }
    printer.finish()
}

/// Text and pre-order spans produced by laying out a unit.
pub(crate) struct Layout {
    pub text: String,
    pub spans: Vec<Span>,
    pub comments: Vec<Span>,
}

/// Lay out a whole unit.
///
/// Span order: package, imports, then per type its own span followed by
/// fields and methods. A method records its own span, then its return
/// type, parameters and body.
pub(crate) fn layout_unit(package: Option<&str>, imports: &[Import], types: &[TypeDecl]) -> Layout {
    let mut printer = Printer::new(None);
    printer.spans = Some(Vec::new());

    if let Some(package) = package {
        let mark = printer.open();
        printer.emit("package ");
        printer.emit(package);
        printer.emit(";");
        printer.close(mark);
        printer.out.newline();
        printer.out.newline();
    }
    for import in imports {
        let mark = printer.open();
        printer.emit(if import.is_static { "import static " } else { "import " });
        printer.emit(&import.path);
        printer.emit(";");
        printer.close(mark);
        printer.out.newline();
    }
    if !imports.is_empty() {
        printer.out.newline();
    }
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            printer.out.newline();
        }
        printer.type_decl(ty);
        printer.out.newline();
    }
    printer.out.end_line();

    let spans = printer.spans.take().unwrap_or_default();
    let comments = std::mem::take(&mut printer.comments);
    Layout {
        text: printer.out.into_string(),
        spans,
        comments,
    }
}

struct Printer<'src> {
    out: SourceBuffer,
    source: Option<&'src str>,
    base_indent: String,
    level: usize,
    spans: Option<Vec<Span>>,
    comments: Vec<Span>,
}

/// An open span slot: index into the span list and start offset.
type Mark = Option<(usize, usize)>;

impl<'src> Printer<'src> {
    fn new(source: Option<&'src str>) -> Self {
        Printer {
            out: SourceBuffer::default(),
            source,
            base_indent: String::new(),
            level: 0,
            spans: None,
            comments: Vec::new(),
        }
    }

    fn emit(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.newline();
        self.out.push_str(&self.base_indent);
        self.out.indent(self.level);
    }

    fn open(&mut self) -> Mark {
        let start = self.out.offset();
        self.spans.as_mut().map(|spans| {
            spans.push(Span::DUMMY);
            (spans.len() - 1, start)
        })
    }

    fn close(&mut self, mark: Mark) {
        if let (Some((slot, start)), Some(spans)) = (mark, self.spans.as_mut()) {
            spans[slot] = Span::from_offsets(start..self.out.offset());
        }
    }

    /// Source text for a node that came from the unit, in render mode.
    fn source_text(&self, span: Span) -> Option<&'src str> {
        if span.is_empty() {
            return None;
        }
        self.source.and_then(|source| span.slice(source))
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    fn expr_prec(&mut self, expr: &Expr, max_precedence: u8) {
        if expr.precedence() > max_precedence {
            self.emit("(");
            self.expr(expr);
            self.emit(")");
        } else {
            self.expr(expr);
        }
    }

    fn exprs(&mut self, exprs: &[Expr]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            self.expr_prec(expr, ASSIGN_PRECEDENCE);
        }
    }

    fn expr(&mut self, expr: &Expr) {
        if let Some(text) = self.source_text(expr.span) {
            self.emit(text);
            return;
        }
        let mark = self.open();
        match &expr.kind {
            ExprKind::Literal(lit) => self.emit(&lit.to_string()),
            ExprKind::Ident { name, .. } => self.emit(name),
            ExprKind::Select { receiver, name, .. } => {
                self.expr_prec(receiver, 0);
                self.emit(".");
                self.emit(name);
            }
            ExprKind::This => self.emit("this"),
            ExprKind::Super => self.emit("super"),
            ExprKind::Binary { op, left, right } => {
                let prec = op.precedence();
                self.expr_prec(left, prec);
                self.out.space();
                self.emit(op.as_symbol());
                self.out.space();
                self.expr_prec(right, prec - 1);
            }
            ExprKind::Unary { op, operand } => self.unary(*op, operand),
            ExprKind::Assign { target, value } => {
                self.expr_prec(target, 1);
                self.emit(" = ");
                self.expr_prec(value, ASSIGN_PRECEDENCE);
            }
            ExprKind::CompoundAssign { op, target, value } => {
                self.expr_prec(target, 1);
                self.out.space();
                self.emit(op.as_symbol());
                self.emit("= ");
                self.expr_prec(value, ASSIGN_PRECEDENCE);
            }
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                let prec = expr.precedence();
                self.expr_prec(cond, prec - 1);
                self.emit(" ? ");
                self.expr_prec(then_expr, prec);
                self.emit(" : ");
                self.expr_prec(else_expr, prec);
            }
            ExprKind::Cast { ty, expr: operand } => {
                self.emit("(");
                self.expr(ty);
                self.emit(") ");
                self.expr_prec(operand, 2);
            }
            ExprKind::InstanceOf { expr: operand, ty } => {
                self.expr_prec(operand, 6);
                self.emit(" instanceof ");
                self.expr(ty);
            }
            ExprKind::Call { callee, args } => {
                self.expr_prec(callee, 0);
                self.emit("(");
                self.exprs(args);
                self.emit(")");
            }
            ExprKind::Index { array, index } => {
                self.expr_prec(array, 0);
                self.emit("[");
                self.expr(index);
                self.emit("]");
            }
            ExprKind::NewArray {
                elem_ty,
                dims,
                init,
            } => {
                if let Some(elem_ty) = elem_ty {
                    self.emit("new ");
                    self.expr(elem_ty);
                }
                for dim in dims {
                    self.emit("[");
                    self.expr(dim);
                    self.emit("]");
                }
                if let Some(init) = init {
                    if elem_ty.is_some() {
                        if dims.is_empty() {
                            self.emit("[]");
                        }
                        self.out.space();
                    }
                    self.emit("{");
                    self.exprs(init);
                    self.emit("}");
                }
            }
            ExprKind::NewClass { class, args } => {
                self.emit("new ");
                self.expr(class);
                self.emit("(");
                self.exprs(args);
                self.emit(")");
            }
            ExprKind::Paren(inner) => {
                self.emit("(");
                self.expr(inner);
                self.emit(")");
            }
            ExprKind::PrimitiveType(kind) => self.emit(kind.keyword()),
            ExprKind::TypeApply { base, args } => {
                self.expr(base);
                self.emit("<");
                self.exprs(args);
                self.emit(">");
            }
            ExprKind::ArrayType(elem) => {
                self.expr(elem);
                self.emit("[]");
            }
        }
        self.close(mark);
    }

    fn unary(&mut self, op: UnaryOp, operand: &Expr) {
        if op.is_postfix() {
            self.expr_prec(operand, op.precedence());
            self.emit(op.as_symbol());
            return;
        }
        self.emit(op.as_symbol());
        // `- -x` must not print as the decrement `--x`.
        let sign = match op {
            UnaryOp::Neg | UnaryOp::PreDec => Some((UnaryOp::Neg, UnaryOp::PreDec)),
            UnaryOp::Plus | UnaryOp::PreInc => Some((UnaryOp::Plus, UnaryOp::PreInc)),
            _ => None,
        };
        if let (Some((a, b)), ExprKind::Unary { op: inner, .. }) = (sign, &operand.kind) {
            if *inner == a || *inner == b {
                self.out.space();
            }
        }
        self.expr_prec(operand, op.precedence());
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    fn stmt(&mut self, stmt: &Stmt) {
        if let Some(text) = self.source_text(stmt.span) {
            self.emit(text);
            return;
        }
        for comment in &stmt.leading_comments {
            let start = self.out.offset();
            self.emit("// ");
            self.emit(comment);
            if self.spans.is_some() {
                self.comments.push(Span::from_offsets(start..self.out.offset()));
            }
            self.newline();
        }
        self.stmt_inner(stmt, true);
    }

    fn stmt_inner(&mut self, stmt: &Stmt, semicolon: bool) {
        if let Some(text) = self.source_text(stmt.span) {
            self.emit(text);
            return;
        }
        let mark = self.open();
        match &stmt.kind {
            StmtKind::Block(stmts) => self.block(stmts),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.emit("if (");
                self.expr(cond);
                self.emit(")");
                self.body(then_branch);
                if let Some(else_branch) = else_branch {
                    if then_branch.as_block().is_some() {
                        self.emit(" else");
                    } else {
                        self.newline();
                        self.emit("else");
                    }
                    if matches!(else_branch.kind, StmtKind::If { .. }) {
                        self.out.space();
                        self.stmt(else_branch);
                    } else {
                        self.body(else_branch);
                    }
                }
            }
            StmtKind::While { cond, body } => {
                self.emit("while (");
                self.expr(cond);
                self.emit(")");
                self.body(body);
            }
            StmtKind::DoWhile { body, cond } => {
                self.emit("do");
                self.body(body);
                if body.as_block().is_some() {
                    self.out.space();
                } else {
                    self.newline();
                }
                self.emit("while (");
                self.expr(cond);
                self.emit(");");
            }
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => {
                self.emit("for (");
                for (i, s) in init.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    self.stmt_inner(s, false);
                }
                self.emit(";");
                if let Some(cond) = cond {
                    self.out.space();
                    self.expr(cond);
                }
                self.emit(";");
                if !update.is_empty() {
                    self.out.space();
                    self.exprs(update);
                }
                self.emit(")");
                self.body(body);
            }
            StmtKind::ForEach {
                var,
                iterable,
                body,
            } => {
                self.emit("for (");
                self.var_decl(var);
                self.emit(" : ");
                self.expr(iterable);
                self.emit(")");
                self.body(body);
            }
            StmtKind::Return(value) => {
                self.emit("return");
                if let Some(value) = value {
                    self.out.space();
                    self.expr(value);
                }
                self.emit(";");
            }
            StmtKind::Throw(expr) => {
                self.emit("throw ");
                self.expr(expr);
                self.emit(";");
            }
            StmtKind::Synchronized { lock, body } => {
                self.emit("synchronized (");
                self.expr(lock);
                self.emit(")");
                self.body(body);
            }
            StmtKind::Expr(expr) => {
                self.expr(expr);
                if semicolon {
                    self.emit(";");
                }
            }
            StmtKind::Empty => self.emit(";"),
            StmtKind::Var(decl) => {
                self.var_decl(decl);
                if semicolon {
                    self.emit(";");
                }
            }
        }
        self.close(mark);
    }

    /// Nested statement of a compound statement: blocks stay on the same
    /// line, anything else goes on its own indented line.
    fn body(&mut self, body: &Stmt) {
        if body.as_block().is_some() {
            self.out.space();
            self.stmt(body);
        } else {
            self.level += 1;
            self.newline();
            self.stmt(body);
            self.level -= 1;
        }
    }

    fn block(&mut self, stmts: &[Stmt]) {
        if stmts.is_empty() {
            self.emit("{}");
            return;
        }
        self.emit("{");
        self.level += 1;
        for stmt in stmts {
            self.newline();
            self.stmt(stmt);
        }
        self.level -= 1;
        self.newline();
        self.emit("}");
    }

    fn var_decl(&mut self, decl: &VarDecl) {
        if decl.is_final {
            self.emit("final ");
        }
        self.expr(&decl.ty);
        self.out.space();
        self.emit(&decl.name);
        if let Some(init) = &decl.init {
            self.emit(" = ");
            self.expr_prec(init, ASSIGN_PRECEDENCE);
        }
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    fn type_decl(&mut self, ty: &TypeDecl) {
        let mark = self.open();
        self.emit("public class ");
        self.emit(&ty.name);
        self.emit(" {");
        self.level += 1;
        for field in &ty.fields {
            self.newline();
            self.emit("private ");
            self.var_decl(field);
            self.emit(";");
        }
        for (i, method) in ty.methods.iter().enumerate() {
            if i > 0 || !ty.fields.is_empty() {
                self.out.newline();
            }
            self.newline();
            self.method_decl(method);
        }
        self.level -= 1;
        self.newline();
        self.emit("}");
        self.close(mark);
    }

    fn method_decl(&mut self, method: &MethodDecl) {
        let mark = self.open();
        self.emit("public ");
        if method.is_static {
            self.emit("static ");
        }
        if !method.type_params.is_empty() {
            self.emit("<");
            self.emit(&method.type_params.join(", "));
            self.emit("> ");
        }
        self.expr(&method.return_ty);
        self.out.space();
        self.emit(&method.name);
        self.emit("(");
        for (i, param) in method.params.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            self.var_decl(param);
        }
        self.emit(") ");
        self.stmt(&method.body);
        self.close(mark);
    }
}

impl Printer<'_> {
    fn finish(self) -> String {
        self.out.into_string()
    }
}

#[cfg(test)]
mod tests;
