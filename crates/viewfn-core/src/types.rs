//! Core value types shared by the declaration model.

use std::fmt;

/// An identifier (function name, parameter name, binding name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Identifier(pub String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier(s.to_string())
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Identifier(s)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A parsed attribute such as `@State` or `@Environment(\.dismiss)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    /// Attribute name without the leading `@`
    pub name: String,
    /// Raw argument text between the parentheses, if any
    pub arguments: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: None,
        }
    }

    pub fn with_arguments(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Some(arguments.into()),
        }
    }

    /// Check whether this attribute has the given name.
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arguments {
            Some(args) => write!(f, "@{}({})", self.name, args),
            None => write!(f, "@{}", self.name),
        }
    }
}

/// Reference qualifier on a local binding (`weak var`, `unowned let`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReferenceQualifier {
    Weak,
    /// `unowned` or `unowned(safe)`
    Unowned,
    /// `unowned(unsafe)`
    UnownedUnsafe,
}

impl ReferenceQualifier {
    /// Keyword text as written in source.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Unowned => "unowned",
            Self::UnownedUnsafe => "unowned(unsafe)",
        }
    }
}
