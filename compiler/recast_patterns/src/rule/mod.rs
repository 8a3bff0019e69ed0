//! Rewrite rules.
//!
//! A rule groups alternative before-templates with at most one
//! after-template. All templates of a rule share one kind. A rule whose
//! after-template is a negatable boolean expression template also yields
//! an independent negated rule, built once at construction.

use std::fmt;

use crate::imports::ImportPolicy;
use crate::template::{Template, TemplateAnnotations};
use crate::RuleError;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct RefasterRule {
    /// Qualified name of the class the templates were defined in.
    qualified_name: String,
    before: Vec<Template>,
    after: Option<Template>,
    annotations: TemplateAnnotations,
}

impl RefasterRule {
    /// Build a rule, and its negation when the after-template asks for one.
    pub fn create(
        qualified_name: impl Into<String>,
        before: Vec<Template>,
        after: Option<Template>,
        annotations: TemplateAnnotations,
    ) -> Result<Vec<RefasterRule>, RuleError> {
        let rule = RefasterRule::new(qualified_name.into(), before, after, annotations)?;
        let negated = rule.negation()?;
        tracing::debug!(rule = %rule, negated = negated.is_some(), "created rule");
        Ok(std::iter::once(rule).chain(negated).collect())
    }

    fn new(
        qualified_name: String,
        before: Vec<Template>,
        after: Option<Template>,
        annotations: TemplateAnnotations,
    ) -> Result<Self, RuleError> {
        let Some(first) = before.first() else {
            return Err(RuleError::NoBeforeTemplate(qualified_name));
        };
        let expected = first.kind_name();
        for template in before.iter().chain(&after) {
            if template.kind_name() != expected {
                return Err(RuleError::MixedTemplateKinds {
                    rule: qualified_name,
                    expected,
                    found: template.kind_name(),
                });
            }
        }
        Ok(RefasterRule {
            qualified_name,
            before,
            after,
            annotations,
        })
    }

    /// The negated rule, if the after-template is marked negatable.
    fn negation(&self) -> Result<Option<RefasterRule>, RuleError> {
        let Some(Template::Expression(after)) = &self.after else {
            return Ok(None);
        };
        if !after.info.annotations.also_negation {
            return Ok(None);
        }
        let mut before = Vec::with_capacity(self.before.len());
        for template in &self.before {
            if let Template::Expression(template) = template {
                before.push(Template::Expression(template.negation()?));
            }
        }
        Ok(Some(RefasterRule {
            qualified_name: self.qualified_name.clone(),
            before,
            after: Some(Template::Expression(after.negation()?)),
            annotations: self.annotations.clone(),
        }))
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn before_templates(&self) -> &[Template] {
        &self.before
    }

    pub fn after_template(&self) -> Option<&Template> {
        self.after.as_ref()
    }

    pub fn annotations(&self) -> &TemplateAnnotations {
        &self.annotations
    }

    /// From the after-template's annotations; `ImportTopLevel` otherwise.
    pub fn import_policy(&self) -> ImportPolicy {
        self.after
            .as_ref()
            .and_then(|after| after.annotations().import_policy)
            .unwrap_or_default()
    }

    pub fn reject_matches_with_comments(&self) -> bool {
        true
    }

    /// Whether this rule matches expressions rather than statement runs.
    pub fn is_expression_rule(&self) -> bool {
        matches!(self.before.first(), Some(Template::Expression(_)))
    }
}

/// The class path below the top-level class, joined with `_`:
/// `com.example.Rules.MinOfInts` displays as `MinOfInts`.
impl fmt::Display for RefasterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Vec<&str> = self.qualified_name.split('.').collect();
        let top_level = path
            .iter()
            .take(path.len().saturating_sub(1))
            .position(|component| component.starts_with(|c: char| c.is_ascii_uppercase()));
        match top_level {
            Some(index) => f.write_str(&path[index + 1..].join("_")),
            None => f.write_str(&self.qualified_name),
        }
    }
}

#[cfg(test)]
mod tests;
