//! View-function expansion.
//!
//! Expands an annotated function into a self-contained view type:
//! - Parameters become stored fields and an initializer
//! - `@State` bindings become persistent state
//! - `@Binding` bindings become external bindings
//! - Other bindings stay as transient locals
//! - Remaining statements form the render routine
//!
//! The replacement body is the local type definition followed by a statement
//! constructing and returning it.
//!
//! # Example
//!
//! ```ignore
//! use viewfn_expander::{expand_source, ExpansionOptions};
//!
//! let source = r#"
//! @ViewComponent
//! func counter(step: Int) -> some View {
//!   @State var count = 0
//!   Button("\(count)") { count += step }
//! }
//! "#;
//!
//! let expansion = expand_source(source, &ExpansionOptions::default())?;
//! println!("{}", expansion.to_source());
//! ```

mod builder;
mod classifier;
mod context;
mod expander;
mod options;
mod registry;
mod renderer;
mod synthesizer;

pub use builder::FunctionBuilder;
pub use classifier::{classify, classify_statement, Ambiguity, ClassifiedBody, StatementClass};
pub use context::{expand_in_context, CollectingContext, Diagnostic, ExpansionContext, Severity};
pub use expander::{expand, expand_function, Expansion, ExpansionResult, Phase};
pub use options::{ExpansionOptions, Marker};
pub use registry::{BodyTransformer, TransformerRegistry, ViewComponentTransformer, VIEW_COMPONENT_MARKER};
pub use renderer::{reindent, render_construction, render_type, GeneratedType};
pub use synthesizer::{field_type, synthesize, Assignment, Initializer, StoredField, Synthesized};

use viewfn_core::ViewFnError;

/// Read a declaration from source text and expand it.
pub fn expand_source(source: &str, options: &ExpansionOptions) -> Result<Expansion, ViewFnError> {
    let decl = viewfn_parser::parse_declaration(source)?;
    Ok(expand(&decl, options)?)
}
