//! Declaration reader for view functions.
//!
//! Turns the source text of an annotated declaration into the
//! [`viewfn_core::Declaration`] model consumed by the expander. Only the
//! declaration surface is understood: attributes, modifiers, the introducer
//! keyword, the parameter clause and the top-level body statements. Statement
//! contents are kept as opaque text.
//!
//! Built on `nom` for the token-level pieces.

mod grammar;
mod lexer;

pub use grammar::{parse_declaration, parse_statement, split_statements};
pub use lexer::{strip_type_attribute, type_attributes};

use viewfn_core::{FunctionDescriptor, ParseError, ViewFnError};

/// Parse a declaration that must be a function.
///
/// # Example
///
/// ```ignore
/// use viewfn_parser::parse_function;
///
/// let source = r#"
/// @ViewComponent
/// func greeting(name: String) -> some View {
///   Text(name)
/// }
/// "#;
///
/// let func = parse_function(source)?;
/// assert_eq!(func.parameters.len(), 1);
/// ```
pub fn parse_function(source: &str) -> Result<FunctionDescriptor, ViewFnError> {
    match parse_declaration(source)? {
        viewfn_core::Declaration::Function(func) => Ok(func),
        other => Err(ParseError::UnexpectedToken {
            found: other.kind().to_string(),
            expected: "func".to_string(),
            line: other.span().line,
            column: other.span().column,
        }
        .into()),
    }
}
