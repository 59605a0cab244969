//! Expansion driver.
//!
//! Runs a single declaration through the pipeline:
//! 1. Validate that it is a function with a body
//! 2. Classify the body statements
//! 3. Synthesize stored fields and the initializer
//! 4. Render the local type and the construction statement
//!
//! Only validation can fail. Nothing is shared between calls.

use std::fmt;

use tracing::{debug, trace, warn};
use viewfn_core::{Declaration, ExpandError, FunctionDescriptor};

use crate::classifier::{classify, Ambiguity};
use crate::options::ExpansionOptions;
use crate::renderer::{render_construction, render_type, GeneratedType};
use crate::synthesizer::synthesize;

/// Result of expanding one declaration.
pub type ExpansionResult = Result<Expansion, ExpandError>;

/// Replacement body for an expanded declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expansion {
    /// The local type definition followed by the construction statement
    pub statements: Vec<String>,
    /// Bindings that carried more than one marker
    pub ambiguities: Vec<Ambiguity>,
}

impl Expansion {
    /// The replacement body as a single block of source text.
    pub fn to_source(&self) -> String {
        self.statements.join("\n")
    }
}

/// Driver phases, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validating,
    Classifying,
    Synthesizing,
    Rendering,
    Done,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Classifying => "classifying",
            Self::Synthesizing => "synthesizing",
            Self::Rendering => "rendering",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Expand an annotated declaration.
pub fn expand(decl: &Declaration, options: &ExpansionOptions) -> ExpansionResult {
    let mut expander = ViewExpander::new(options);
    expander.expand_declaration(decl)
}

/// Expand a function declaration.
pub fn expand_function(func: &FunctionDescriptor, options: &ExpansionOptions) -> ExpansionResult {
    let mut expander = ViewExpander::new(options);
    expander.expand_function(func)
}

/// Per-call driver state.
struct ViewExpander<'o> {
    options: &'o ExpansionOptions,
    phase: Phase,
}

impl<'o> ViewExpander<'o> {
    fn new(options: &'o ExpansionOptions) -> Self {
        Self {
            options,
            phase: Phase::Validating,
        }
    }

    fn advance(&mut self, next: Phase) {
        trace!(from = %self.phase, to = %next, "phase transition");
        self.phase = next;
    }

    fn fail(&mut self, err: ExpandError) -> ExpansionResult {
        self.advance(Phase::Failed);
        warn!(kind = %err.kind(), line = err.span().line, "{}", err);
        Err(err)
    }

    fn expand_declaration(&mut self, decl: &Declaration) -> ExpansionResult {
        match decl {
            Declaration::Function(func) => self.expand_function(func),
            Declaration::Other { kind, name, span, .. } => self.fail(ExpandError::UnsupportedShape {
                kind: kind.clone(),
                name: name.0.clone(),
                span: *span,
            }),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(name = %func.name))]
    fn expand_function(&mut self, func: &FunctionDescriptor) -> ExpansionResult {
        let statements = match func.body.as_deref() {
            Some(statements) if !statements.is_empty() => statements,
            _ => {
                return self.fail(ExpandError::MissingBody {
                    name: func.name.0.clone(),
                    span: func.span,
                })
            }
        };

        self.advance(Phase::Classifying);
        let body = classify(statements, self.options);
        debug!(
            render = body.render.len(),
            state = body.persistent_state.len(),
            bindings = body.external_binding.len(),
            locals = body.transient_local.len(),
            "classified body"
        );
        for ambiguity in &body.ambiguities {
            warn!(
                pattern = %ambiguity.pattern,
                chosen = ?ambiguity.chosen,
                ignored = ?ambiguity.ignored,
                "binding carries more than one marker; first marker applied"
            );
        }

        self.advance(Phase::Synthesizing);
        let synthesized = synthesize(&func.parameters, self.options);
        debug!(fields = synthesized.stored_fields.len(), "synthesized initializer");

        self.advance(Phase::Rendering);
        let generated = GeneratedType::new(&body, synthesized);
        let statements = vec![
            render_type(&generated, self.options),
            render_construction(&generated, self.options),
        ];

        self.advance(Phase::Done);
        Ok(Expansion {
            statements,
            ambiguities: body.ambiguities,
        })
    }
}
