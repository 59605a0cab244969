//! Code rendering for the generated view type.
//!
//! The local type definition is laid out in a fixed section order:
//! transient locals, stored fields, persistent state, external bindings,
//! the initializer, and finally the render routine. Empty sections are
//! skipped and the remaining ones are separated by a single blank line.
//!
//! Statements are copied verbatim but re-based on the fixed indent step;
//! relative indentation inside a multi-line statement is preserved, measured
//! against the column its first line started at.

use viewfn_core::StatementRecord;

use crate::classifier::ClassifiedBody;
use crate::options::ExpansionOptions;
use crate::synthesizer::{Initializer, StoredField, Synthesized};

/// Everything needed to render the local type.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedType<'a> {
    pub transient_locals: Vec<&'a StatementRecord>,
    pub stored_fields: Vec<StoredField>,
    pub persistent_state: Vec<&'a StatementRecord>,
    pub external_bindings: Vec<&'a StatementRecord>,
    pub initializer: Initializer,
    pub render_statements: Vec<&'a StatementRecord>,
}

impl<'a> GeneratedType<'a> {
    pub fn new(body: &ClassifiedBody<'a>, synthesized: Synthesized) -> Self {
        Self {
            transient_locals: body.transient_local.clone(),
            stored_fields: synthesized.stored_fields,
            persistent_state: body.persistent_state.clone(),
            external_bindings: body.external_binding.clone(),
            initializer: synthesized.initializer,
            render_statements: body.render.clone(),
        }
    }
}

/// Render the local type definition.
pub fn render_type(ty: &GeneratedType<'_>, options: &ExpansionOptions) -> String {
    let sections = [
        render_statements(&ty.transient_locals, 1, options),
        render_fields(&ty.stored_fields, options),
        render_statements(&ty.persistent_state, 1, options),
        render_statements(&ty.external_bindings, 1, options),
        render_initializer(&ty.initializer, options),
        render_routine(&ty.render_statements, options),
    ];

    let mut lines = Vec::new();
    if options.conformance.is_empty() {
        lines.push(format!("struct {} {{", options.type_name));
    } else {
        lines.push(format!("struct {}: {} {{", options.type_name, options.conformance));
    }

    for (i, section) in sections.into_iter().filter(|s| !s.is_empty()).enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(section);
    }

    lines.push("}".to_string());
    lines.join("\n")
}

/// Render the statement that builds and returns an instance of the type.
pub fn render_construction(ty: &GeneratedType<'_>, options: &ExpansionOptions) -> String {
    let args: Vec<String> = ty
        .initializer
        .parameters
        .iter()
        .map(|param| format!("{}: {}", param.name, param.name))
        .collect();
    format!("return {}({})", options.type_name, args.join(", "))
}

fn render_fields(fields: &[StoredField], options: &ExpansionOptions) -> Vec<String> {
    let indent = options.indent(1);
    fields
        .iter()
        .map(|field| format!("{}let {}: {}", indent, field.name, field.type_text))
        .collect()
}

fn render_initializer(init: &Initializer, options: &ExpansionOptions) -> Vec<String> {
    let indent = options.indent(1);
    let params: Vec<String> = init
        .parameters
        .iter()
        .map(|param| format!("{}: {}", param.name, param.type_text.trim()))
        .collect();
    let header = format!("{}init({})", indent, params.join(", "));

    if init.assignments.is_empty() {
        return vec![format!("{} {{}}", header)];
    }

    let inner = options.indent(2);
    let mut lines = vec![format!("{} {{", header)];
    for assignment in &init.assignments {
        lines.push(format!("{}self.{} = {}", inner, assignment.field, assignment.parameter));
    }
    lines.push(format!("{}}}", indent));
    lines
}

fn render_routine(statements: &[&StatementRecord], options: &ExpansionOptions) -> Vec<String> {
    let indent = options.indent(1);
    if statements.is_empty() {
        return vec![format!("{}{} {{}}", indent, options.render_signature)];
    }

    let mut lines = vec![format!("{}{} {{", indent, options.render_signature)];
    lines.extend(render_statements(statements, 2, options));
    lines.push(format!("{}}}", indent));
    lines
}

fn render_statements(
    statements: &[&StatementRecord],
    level: usize,
    options: &ExpansionOptions,
) -> Vec<String> {
    statements
        .iter()
        .flat_map(|stmt| reindent(stmt.source(), stmt.span().column, level, options))
        .collect()
}

/// Re-base a statement at `level`, keeping its internal relative indentation.
///
/// `column` is the 1-based source column of the first line. Zero means the
/// column is unknown, and only the later lines set the common indentation.
pub fn reindent(text: &str, column: u32, level: usize, options: &ExpansionOptions) -> Vec<String> {
    let mut source_lines = text.trim().lines();
    let Some(first) = source_lines.next() else {
        return Vec::new();
    };
    let rest: Vec<&str> = source_lines.collect();

    let first_indent = column.checked_sub(1).map(|c| c as usize);
    let common = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| leading_whitespace(line))
        .chain(first_indent)
        .min()
        .unwrap_or(0);

    let indent = options.indent(level);
    let mut lines = vec![format!("{}{}", indent, first.trim_end())];
    for line in rest {
        if line.trim().is_empty() {
            lines.push(String::new());
        } else {
            lines.push(format!("{}{}", indent, skip_chars(line, common).trim_end()));
        }
    }
    lines
}

fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn skip_chars(line: &str, count: usize) -> &str {
    match line.char_indices().nth(count) {
        Some((i, _)) => &line[i..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesizer::synthesize;
    use viewfn_core::{ParameterDescriptor, Span};
    use viewfn_parser::parse_statement;

    fn records(sources: &[&str]) -> Vec<StatementRecord> {
        sources
            .iter()
            .map(|source| parse_statement(source, Span::default()))
            .collect()
    }

    fn generated<'a>(render: &'a [StatementRecord], state: &'a [StatementRecord]) -> GeneratedType<'a> {
        let params = vec![
            ParameterDescriptor::new("title", "String", false),
            ParameterDescriptor::new("onTap", "@escaping () -> Void", true),
        ];
        let synthesized = synthesize(&params, &ExpansionOptions::default());
        GeneratedType {
            transient_locals: vec![],
            stored_fields: synthesized.stored_fields,
            persistent_state: state.iter().collect(),
            external_bindings: vec![],
            initializer: synthesized.initializer,
            render_statements: render.iter().collect(),
        }
    }

    #[test]
    fn test_render_type_layout() {
        let render = records(&["Text(title)"]);
        let state = records(&["@State var pressed = false"]);
        let ty = generated(&render, &state);
        let code = render_type(&ty, &ExpansionOptions::default());

        let expected = "\
struct Component: View {
  let title: String
  let onTap: () -> Void

  @State var pressed = false

  init(title: String, onTap: @escaping () -> Void) {
    self.title = title
    self.onTap = onTap
  }

  var body: some View {
    Text(title)
  }
}";
        assert_eq!(code, expected);
    }

    #[test]
    fn test_render_construction() {
        let ty = generated(&[], &[]);
        assert_eq!(
            render_construction(&ty, &ExpansionOptions::default()),
            "return Component(title: title, onTap: onTap)"
        );
    }

    #[test]
    fn test_render_without_parameters() {
        let locals = records(&["let greeting = \"hi\""]);
        let render = records(&["Text(greeting)"]);
        let ty = GeneratedType {
            transient_locals: locals.iter().collect(),
            stored_fields: vec![],
            persistent_state: vec![],
            external_bindings: vec![],
            initializer: Initializer::default(),
            render_statements: render.iter().collect(),
        };
        let options = ExpansionOptions::default();
        let code = render_type(&ty, &options);

        assert!(code.contains("  init() {}"));
        assert!(code.starts_with("struct Component: View {\n  let greeting = \"hi\"\n\n  init() {}"));
        assert_eq!(render_construction(&ty, &options), "return Component()");
    }

    #[test]
    fn test_render_empty_routine() {
        let ty = generated(&[], &[]);
        let code = render_type(&ty, &ExpansionOptions::default());
        assert!(code.contains("  var body: some View {}"));
    }

    #[test]
    fn test_reindent_multiline_statement() {
        let stmt = "VStack {\n      Text(\"a\")\n      Button(\"b\") {\n        tap()\n      }\n    }";
        let lines = reindent(stmt, 5, 2, &ExpansionOptions::default());
        assert_eq!(
            lines,
            vec![
                "    VStack {",
                "      Text(\"a\")",
                "      Button(\"b\") {",
                "        tap()",
                "      }",
                "    }",
            ]
        );
    }

    #[test]
    fn test_reindent_measures_from_first_line_column() {
        let stmt = "Text(\"a\")\n    .padding()";
        let options = ExpansionOptions::default();

        assert_eq!(reindent(stmt, 3, 2, &options), vec!["    Text(\"a\")", "        .padding()"]);
        assert_eq!(reindent(stmt, 5, 2, &options), vec!["    Text(\"a\")", "    .padding()"]);
    }

    #[test]
    fn test_reindent_unknown_column() {
        let lines = reindent("Text(\"a\")\n    .padding()", 0, 1, &ExpansionOptions::default());
        assert_eq!(lines, vec!["  Text(\"a\")", "  .padding()"]);
    }

    #[test]
    fn test_reindent_keeps_blank_lines() {
        let lines = reindent("Group {\n\n  Text(\"x\")  \n}", 1, 1, &ExpansionOptions::default());
        assert_eq!(lines, vec!["  Group {", "", "    Text(\"x\")", "  }"]);
    }

    #[test]
    fn test_custom_indent_and_names() {
        let options = ExpansionOptions::new().indent_width(4).type_name("Card");
        let render = records(&["Text(title)"]);
        let ty = generated(&render, &[]);
        let code = render_type(&ty, &options);
        assert!(code.starts_with("struct Card: View {\n    let title: String"));
        assert!(code.contains("        self.title = title"));
        assert!(render_construction(&ty, &options).starts_with("return Card("));
    }
}
