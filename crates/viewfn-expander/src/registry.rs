//! Transformer registry for storing and looking up body transformers.
//!
//! Hosts map marker attributes to transformers here instead of in a global
//! table; each registry is owned by whoever drives the compilation.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use viewfn_core::Declaration;

use crate::context::{expand_in_context, ExpansionContext};
use crate::options::ExpansionOptions;

/// Marker attribute handled by [`ViewComponentTransformer`] by default.
pub const VIEW_COMPONENT_MARKER: &str = "ViewComponent";

/// A transformer that replaces the body of a marked declaration.
pub trait BodyTransformer: Send + Sync {
    /// Attribute name that selects this transformer.
    fn marker(&self) -> &str;

    /// Produce the replacement body, or report through `ctx` and return `None`.
    fn expand(&self, decl: &Declaration, ctx: &mut dyn ExpansionContext) -> Option<Vec<String>>;
}

/// Expands view functions into a local view type.
#[derive(Debug, Clone)]
pub struct ViewComponentTransformer {
    marker: String,
    options: ExpansionOptions,
}

impl ViewComponentTransformer {
    pub fn new(options: ExpansionOptions) -> Self {
        Self {
            marker: VIEW_COMPONENT_MARKER.to_string(),
            options,
        }
    }

    /// Use a different marker attribute.
    pub fn with_marker(mut self, marker: &str) -> Self {
        self.marker = marker.to_string();
        self
    }

    pub fn options(&self) -> &ExpansionOptions {
        &self.options
    }
}

impl Default for ViewComponentTransformer {
    fn default() -> Self {
        Self::new(ExpansionOptions::default())
    }
}

impl BodyTransformer for ViewComponentTransformer {
    fn marker(&self) -> &str {
        &self.marker
    }

    fn expand(&self, decl: &Declaration, ctx: &mut dyn ExpansionContext) -> Option<Vec<String>> {
        expand_in_context(decl, &self.options, ctx)
    }
}

/// A registry of body transformers keyed by marker name.
#[derive(Clone, Default)]
pub struct TransformerRegistry {
    transformers: IndexMap<String, Arc<dyn BodyTransformer>>,
}

impl TransformerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            transformers: IndexMap::new(),
        }
    }

    /// Registry with the view component transformer under its default marker.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ViewComponentTransformer::default());
        registry
    }

    /// Register a transformer under its marker, replacing any previous one.
    pub fn register(&mut self, transformer: impl BodyTransformer + 'static) {
        self.transformers
            .insert(transformer.marker().to_string(), Arc::new(transformer));
    }

    /// Get a transformer by marker name.
    pub fn get(&self, marker: &str) -> Option<&dyn BodyTransformer> {
        self.transformers.get(marker).map(|t| t.as_ref())
    }

    /// Check if a marker is registered.
    pub fn contains(&self, marker: &str) -> bool {
        self.transformers.contains_key(marker)
    }

    /// Registered marker names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.transformers.keys().map(|s| s.as_str())
    }

    /// Number of registered transformers.
    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Transformer for the first registered marker on the declaration.
    pub fn transformer_for(&self, decl: &Declaration) -> Option<&dyn BodyTransformer> {
        decl.attributes().iter().find_map(|attr| self.get(&attr.name))
    }
}

impl fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("markers", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
