//! Builder for function descriptors.
//!
//! Hosts that already hold a syntax tree usually build descriptors directly;
//! this builder is for callers working from loose parts (tests, tools).

use viewfn_core::{
    Attribute, AttributeList, FunctionDescriptor, Identifier, ParameterDescriptor, Span,
    StatementRecord,
};
use viewfn_parser::{parse_statement, type_attributes};

/// Builder for [`FunctionDescriptor`]s.
pub struct FunctionBuilder {
    name: String,
    attributes: AttributeList,
    parameters: Vec<ParameterDescriptor>,
    body: Option<Vec<StatementRecord>>,
}

impl FunctionBuilder {
    /// Create a builder for a function with an empty body.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: AttributeList::new(),
            parameters: Vec::new(),
            body: Some(Vec::new()),
        }
    }

    /// Add a declaration attribute.
    pub fn attribute(mut self, name: &str) -> Self {
        self.attributes.push(Attribute::new(name));
        self
    }

    /// Add a parameter. It is escaping when the type carries `@escaping`.
    pub fn param(mut self, name: &str, type_text: &str) -> Self {
        let is_escaping = type_attributes(type_text).iter().any(|a| a.is("escaping"));
        self.parameters
            .push(ParameterDescriptor::new(name, type_text, is_escaping));
        self
    }

    /// Add a body statement, classified from its source text.
    pub fn statement(mut self, source: &str) -> Self {
        self.body
            .get_or_insert_with(Vec::new)
            .push(parse_statement(source, Span::default()));
        self
    }

    /// Add an already-built statement record.
    pub fn record(mut self, record: StatementRecord) -> Self {
        self.body.get_or_insert_with(Vec::new).push(record);
        self
    }

    /// Drop the body entirely.
    pub fn without_body(mut self) -> Self {
        self.body = None;
        self
    }

    pub fn build(self) -> FunctionDescriptor {
        FunctionDescriptor {
            name: Identifier(self.name),
            attributes: self.attributes,
            parameters: self.parameters,
            body: self.body,
            span: Span::default(),
        }
    }
}
