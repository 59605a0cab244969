//! Declaration model handed to the expander.
//!
//! Everything here is read-only input: the host (or the declaration reader in
//! `viewfn-parser`) builds it once per annotated declaration and the expander
//! never mutates it.

use crate::types::{Attribute, Identifier, ReferenceQualifier};
use smallvec::SmallVec;

/// Attribute sets are almost always zero, one or two entries long.
pub type AttributeList = SmallVec<[Attribute; 2]>;

/// A declaration carrying an expansion marker.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Declaration {
    /// A function-shaped declaration.
    Function(FunctionDescriptor),
    /// Any other declaration shape (struct, class, variable, ...).
    Other {
        /// Introducer keyword, e.g. `struct`
        kind: String,
        name: Identifier,
        attributes: AttributeList,
        span: Span,
    },
}

impl Declaration {
    pub fn name(&self) -> &Identifier {
        match self {
            Declaration::Function(func) => &func.name,
            Declaration::Other { name, .. } => name,
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Declaration::Function(func) => &func.attributes,
            Declaration::Other { attributes, .. } => attributes,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Declaration::Function(func) => func.span,
            Declaration::Other { span, .. } => *span,
        }
    }

    /// Introducer keyword for this declaration.
    pub fn kind(&self) -> &str {
        match self {
            Declaration::Function(_) => "func",
            Declaration::Other { kind, .. } => kind,
        }
    }
}

/// A function declaration: name, attributes, parameters and optional body.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionDescriptor {
    pub name: Identifier,
    pub attributes: AttributeList,
    /// Parameters in declaration order
    pub parameters: Vec<ParameterDescriptor>,
    /// Body statements in source order; `None` when the declaration has no body
    pub body: Option<Vec<StatementRecord>>,
    pub span: Span,
}

impl FunctionDescriptor {
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Body statements, empty when there is no body.
    pub fn statements(&self) -> &[StatementRecord] {
        self.body.as_deref().unwrap_or(&[])
    }
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterDescriptor {
    pub name: Identifier,
    /// Type signature exactly as written, including attributes like `@escaping`
    pub type_text: String,
    /// The value may outlive the call
    pub is_escaping: bool,
}

impl ParameterDescriptor {
    pub fn new(name: &str, type_text: &str, is_escaping: bool) -> Self {
        Self {
            name: Identifier::from(name),
            type_text: type_text.to_string(),
            is_escaping,
        }
    }
}

/// A single body statement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatementRecord {
    Declaration(DeclarationStatement),
    Plain(PlainStatement),
}

impl StatementRecord {
    /// Full source text of the statement.
    pub fn source(&self) -> &str {
        match self {
            StatementRecord::Declaration(decl) => &decl.source,
            StatementRecord::Plain(plain) => &plain.source,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            StatementRecord::Declaration(decl) => decl.span,
            StatementRecord::Plain(plain) => plain.span,
        }
    }

    pub fn is_declaration(&self) -> bool {
        matches!(self, StatementRecord::Declaration(_))
    }
}

/// A `let`/`var` binding inside the body.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclarationStatement {
    /// Binding pattern, usually a single identifier
    pub pattern: String,
    /// Attributes in source order
    pub attributes: AttributeList,
    /// `weak`/`unowned` qualifier, if any
    pub qualifier: Option<ReferenceQualifier>,
    /// Full source text
    pub source: String,
    pub span: Span,
}

/// Any statement that is not a binding.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlainStatement {
    pub source: String,
    pub span: Span,
}

/// Source span for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self { start, end, line, column }
    }
}
