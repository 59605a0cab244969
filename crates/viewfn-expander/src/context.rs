//! Diagnostics boundary between the expander and its host.

use viewfn_core::{Declaration, FailureKind, Span};

use crate::expander::expand;
use crate::options::ExpansionOptions;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic reported to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub severity: Severity,
    /// Set for expansion failures
    pub kind: Option<FailureKind>,
    pub message: String,
    pub span: Span,
}

/// Host-provided channel for diagnostics.
pub trait ExpansionContext {
    fn diagnose(&mut self, diagnostic: Diagnostic);
}

/// Context that keeps every diagnostic in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectingContext {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning)
    }
}

impl ExpansionContext for CollectingContext {
    fn diagnose(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Expand a declaration and report the outcome through `ctx`.
///
/// Returns the replacement statements, or `None` when expansion failed and
/// an error was reported.
pub fn expand_in_context(
    decl: &Declaration,
    options: &ExpansionOptions,
    ctx: &mut dyn ExpansionContext,
) -> Option<Vec<String>> {
    match expand(decl, options) {
        Ok(expansion) => {
            for ambiguity in &expansion.ambiguities {
                ctx.diagnose(Diagnostic {
                    severity: Severity::Warning,
                    kind: None,
                    message: format!(
                        "'{}' carries more than one marker; ignored {}",
                        ambiguity.pattern,
                        ambiguity
                            .ignored
                            .iter()
                            .map(|name| format!("@{}", name))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                    span: ambiguity.span,
                });
            }
            Some(expansion.statements)
        }
        Err(err) => {
            ctx.diagnose(Diagnostic {
                severity: Severity::Error,
                kind: Some(err.kind()),
                message: err.to_string(),
                span: err.span(),
            });
            None
        }
    }
}
