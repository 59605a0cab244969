//! Expansion options.

use viewfn_core::Attribute;

/// Classification marker carried by a local binding's attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Marker {
    /// Value survives re-renders (`@State`)
    PersistentState,
    /// Two-way connection to state owned elsewhere (`@Binding`)
    ExternalBinding,
}

/// Options controlling how a view function is expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpansionOptions {
    /// Name of the generated local type.
    pub type_name: String,
    /// Protocol the generated type conforms to.
    pub conformance: String,
    /// Declaration line of the render routine, without the opening brace.
    pub render_signature: String,
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Attribute names marking persistent-state bindings.
    pub persistent_state_markers: Vec<String>,
    /// Attribute names marking external-binding declarations.
    pub external_binding_markers: Vec<String>,
    /// Type attribute stripped from escaping parameters' stored fields.
    pub escaping_attribute: String,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            type_name: "Component".to_string(),
            conformance: "View".to_string(),
            render_signature: "var body: some View".to_string(),
            indent_width: 2,
            persistent_state_markers: vec!["State".to_string()],
            external_binding_markers: vec!["Binding".to_string()],
            escaping_attribute: "escaping".to_string(),
        }
    }
}

impl ExpansionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_name(mut self, name: &str) -> Self {
        self.type_name = name.to_string();
        self
    }

    pub fn indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Add an attribute name that marks persistent state.
    pub fn persistent_state_marker(mut self, name: &str) -> Self {
        self.persistent_state_markers.push(name.to_string());
        self
    }

    /// Add an attribute name that marks an external binding.
    pub fn external_binding_marker(mut self, name: &str) -> Self {
        self.external_binding_markers.push(name.to_string());
        self
    }

    /// Marker for an attribute, if it is a recognized one.
    pub fn marker_for(&self, attribute: &Attribute) -> Option<Marker> {
        if self.persistent_state_markers.iter().any(|m| attribute.is(m)) {
            Some(Marker::PersistentState)
        } else if self.external_binding_markers.iter().any(|m| attribute.is(m)) {
            Some(Marker::ExternalBinding)
        } else {
            None
        }
    }

    /// Indentation string for the given nesting level.
    pub(crate) fn indent(&self, level: usize) -> String {
        " ".repeat(level * self.indent_width)
    }
}
