//! Stored field and initializer synthesis.
//!
//! Every parameter becomes a stored field, in order. A field holds the value
//! itself, so escaping parameters lose their escaping attribute in the field
//! type while the initializer keeps the original signature.

use viewfn_core::ParameterDescriptor;
use viewfn_parser::strip_type_attribute;

use crate::options::ExpansionOptions;

/// A stored field of the generated type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoredField {
    pub name: String,
    pub type_text: String,
}

/// `self.field = parameter`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    pub field: String,
    pub parameter: String,
}

/// The synthesized initializer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Initializer {
    /// Parameters with their original type text
    pub parameters: Vec<ParameterDescriptor>,
    /// One assignment per parameter, in parameter order
    pub assignments: Vec<Assignment>,
}

/// Fields and initializer derived from a parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Synthesized {
    pub stored_fields: Vec<StoredField>,
    pub initializer: Initializer,
}

/// Derive stored fields and the initializer from a parameter list.
pub fn synthesize(parameters: &[ParameterDescriptor], options: &ExpansionOptions) -> Synthesized {
    let stored_fields = parameters
        .iter()
        .map(|param| StoredField {
            name: param.name.0.clone(),
            type_text: field_type(param, options),
        })
        .collect();

    let assignments = parameters
        .iter()
        .map(|param| Assignment {
            field: param.name.0.clone(),
            parameter: param.name.0.clone(),
        })
        .collect();

    Synthesized {
        stored_fields,
        initializer: Initializer {
            parameters: parameters.to_vec(),
            assignments,
        },
    }
}

/// Type text for a parameter's stored field.
pub fn field_type(param: &ParameterDescriptor, options: &ExpansionOptions) -> String {
    if param.is_escaping {
        strip_type_attribute(&param.type_text, &options.escaping_attribute)
    } else {
        param.type_text.clone()
    }
}
