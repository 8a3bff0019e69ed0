use recast_ir::printer::render_stmts;
use recast_ir::{Span, Stmt, TextEdit};

use super::TemplateInfo;
use crate::fix::Fix;
use crate::imports::ImportPolicy;
use crate::inliner::Inliner;
use crate::tree::UStmt;
use crate::unifier::{unify_seq, Unifier};
use crate::{InlineError, MatchContext};

/// A template matching a run of consecutive statements.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockTemplate {
    pub info: TemplateInfo,
    pub stmts: Vec<UStmt>,
}

/// Statements `start..end` of a statement list, matched.
#[derive(Clone, Debug)]
pub struct BlockMatch<'t> {
    pub start: usize,
    pub end: usize,
    pub stmts: &'t [Stmt],
    pub unifier: Unifier<'t>,
}

impl BlockMatch<'_> {
    /// From the first matched statement to the end of the last.
    pub fn span(&self) -> Span {
        match (self.stmts.first(), self.stmts.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => Span::DUMMY,
        }
    }
}

impl BlockTemplate {
    pub fn new(info: TemplateInfo, stmts: Vec<UStmt>) -> Self {
        BlockTemplate { info, stmts }
    }

    /// Every non-overlapping run of `stmts` this template matches, left to
    /// right. After a match the scan resumes past its last statement.
    pub fn scan<'t>(&self, stmts: &'t [Stmt], ctx: MatchContext<'t>) -> Vec<BlockMatch<'t>> {
        let width = self.stmts.len();
        let mut matches = Vec::new();
        if width == 0 {
            return matches;
        }
        let mut start = 0;
        while let Some(window) = stmts.get(start..start + width) {
            match self.match_window(window, ctx) {
                Some(unifier) => {
                    matches.push(BlockMatch {
                        start,
                        end: start + width,
                        stmts: window,
                        unifier,
                    });
                    start += width;
                }
                None => start += 1,
            }
        }
        matches
    }

    /// Match exactly `window`, with a fresh unifier.
    pub fn match_window<'t>(
        &self,
        window: &'t [Stmt],
        ctx: MatchContext<'t>,
    ) -> Option<Unifier<'t>> {
        let unifier = unify_seq(Unifier::new(ctx), &self.stmts, window)?;
        let span = window.first()?.span.merge(window.last()?.span);
        if ctx.unit.has_comment_within(span) {
            tracing::trace!(%span, "rejecting block match containing a comment");
            return None;
        }
        self.info.typecheck(unifier, None)
    }

    /// The fix replacing a match with this template.
    ///
    /// The overlapping prefix is replaced statement by statement. Surplus
    /// matched statements are deleted along with their line; surplus
    /// template statements are printed together in place of the last
    /// matched statement.
    pub fn replace(
        &self,
        found: &BlockMatch<'_>,
        policy: ImportPolicy,
    ) -> Result<Fix, InlineError> {
        let ctx = found.unifier.ctx();
        let unit = ctx.unit;
        let mut inliner = Inliner::new(ctx, found.unifier.bindings(), policy);
        let targets = found.stmts;
        let mut edits = Vec::with_capacity(targets.len().max(self.stmts.len()));

        if self.stmts.len() <= targets.len() {
            for (pattern, target) in self.stmts.iter().zip(targets) {
                edits.push(replace_stmts(&mut inliner, std::slice::from_ref(pattern), target)?);
            }
            for target in targets.iter().skip(self.stmts.len()) {
                edits.push(TextEdit::delete(whole_line(&unit.source, target.span)));
            }
        } else if let Some((last, init)) = targets.split_last() {
            for (pattern, target) in self.stmts.iter().zip(init) {
                edits.push(replace_stmts(&mut inliner, std::slice::from_ref(pattern), target)?);
            }
            let rest = self.stmts.get(init.len()..).unwrap_or_default();
            edits.push(replace_stmts(&mut inliner, rest, last)?);
        }

        let (imports, static_imports) = inliner.into_imports();
        Ok(Fix::new(edits).with_imports(imports, static_imports))
    }
}

/// Replace `target` with `pattern` inlined, indented like `target`.
fn replace_stmts(
    inliner: &mut Inliner<'_, '_>,
    pattern: &[UStmt],
    target: &Stmt,
) -> Result<TextEdit, InlineError> {
    let stmts = inliner.inline_stmts(pattern)?;
    let unit = inliner.unit();
    let indent = unit.line_indent(target.span.start);
    Ok(TextEdit::replace(target.span, render_stmts(&stmts, &unit.source, indent)))
}

/// `span` widened backwards over its indentation and the preceding line
/// break, when nothing else shares the line.
fn whole_line(source: &str, span: Span) -> Span {
    let before = source.get(..span.start as usize).unwrap_or_default();
    let trimmed = before.trim_end_matches([' ', '\t']);
    match trimmed.strip_suffix('\n') {
        Some(rest) => u32::try_from(rest.len()).map_or(span, |start| Span::new(start, span.end)),
        None => span,
    }
}
