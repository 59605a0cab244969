//! Statement classification.
//!
//! Partitions body statements into four ordered groups:
//! 1. Plain statements render the view
//! 2. Bindings carrying a persistent-state marker
//! 3. Bindings carrying an external-binding marker
//! 4. Every other binding stays a transient local
//!
//! The partition is total and disjoint, and each group keeps source order.

use smallvec::SmallVec;
use viewfn_core::{DeclarationStatement, Span, StatementRecord};

use crate::options::{ExpansionOptions, Marker};

/// Group a statement is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatementClass {
    PersistentState,
    ExternalBinding,
    TransientLocal,
    Render,
}

impl From<Marker> for StatementClass {
    fn from(marker: Marker) -> Self {
        match marker {
            Marker::PersistentState => StatementClass::PersistentState,
            Marker::ExternalBinding => StatementClass::ExternalBinding,
        }
    }
}

/// A binding that carried more than one recognized marker.
///
/// The first marker in attribute order decides the group; the rest are
/// reported here.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ambiguity {
    /// Binding pattern of the statement
    pub pattern: String,
    /// Group the statement was placed in
    pub chosen: StatementClass,
    /// Names of the recognized attributes that were not applied
    pub ignored: SmallVec<[String; 1]>,
    pub span: Span,
}

/// Body statements partitioned by class.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedBody<'a> {
    pub persistent_state: Vec<&'a StatementRecord>,
    pub external_binding: Vec<&'a StatementRecord>,
    pub transient_local: Vec<&'a StatementRecord>,
    pub render: Vec<&'a StatementRecord>,
    pub ambiguities: Vec<Ambiguity>,
}

impl<'a> ClassifiedBody<'a> {
    /// Total number of classified statements.
    pub fn len(&self) -> usize {
        self.persistent_state.len()
            + self.external_binding.len()
            + self.transient_local.len()
            + self.render.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, class: StatementClass, statement: &'a StatementRecord) {
        match class {
            StatementClass::PersistentState => self.persistent_state.push(statement),
            StatementClass::ExternalBinding => self.external_binding.push(statement),
            StatementClass::TransientLocal => self.transient_local.push(statement),
            StatementClass::Render => self.render.push(statement),
        }
    }
}

/// Classify every statement of a body.
pub fn classify<'a>(statements: &'a [StatementRecord], options: &ExpansionOptions) -> ClassifiedBody<'a> {
    let mut body = ClassifiedBody::default();
    for statement in statements {
        let (class, ambiguity) = classify_statement(statement, options);
        body.push(class, statement);
        body.ambiguities.extend(ambiguity);
    }
    body
}

/// Classify a single statement.
pub fn classify_statement(
    statement: &StatementRecord,
    options: &ExpansionOptions,
) -> (StatementClass, Option<Ambiguity>) {
    match statement {
        StatementRecord::Plain(_) => (StatementClass::Render, None),
        StatementRecord::Declaration(decl) => classify_declaration(decl, options),
    }
}

fn classify_declaration(
    decl: &DeclarationStatement,
    options: &ExpansionOptions,
) -> (StatementClass, Option<Ambiguity>) {
    let mut markers = decl
        .attributes
        .iter()
        .filter_map(|attr| options.marker_for(attr).map(|marker| (attr, marker)));

    let Some((_, first)) = markers.next() else {
        return (StatementClass::TransientLocal, None);
    };
    let class = StatementClass::from(first);

    let ignored: SmallVec<[String; 1]> = markers.map(|(attr, _)| attr.name.clone()).collect();
    let ambiguity = (!ignored.is_empty()).then(|| Ambiguity {
        pattern: decl.pattern.clone(),
        chosen: class,
        ignored,
        span: decl.span,
    });

    (class, ambiguity)
}
