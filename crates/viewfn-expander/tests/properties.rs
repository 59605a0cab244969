//! Property tests for the expansion pipeline.

use proptest::prelude::*;
use viewfn_core::FunctionDescriptor;
use viewfn_expander::{
    classify, expand_function, synthesize, ExpansionOptions, FunctionBuilder, GeneratedType,
};

const TYPES: &[&str] = &["Int", "String", "[Item]", "Binding<Bool>"];

/// Source text for a generated statement. Index `i` keeps every source unique.
fn statement_source(kind: u8, i: usize) -> String {
    match kind {
        0 => format!("Text(\"line {}\")", i),
        1 => format!("@State var s{} = {}", i, i),
        2 => format!("@Binding var b{}: Bool", i),
        3 => format!("let t{} = \"{}\"", i, i),
        4 => format!("weak var w{} = owner", i),
        5 => format!("@State @Binding var m{}: Int", i),
        _ => format!("VStack {{\n  Text(\"nested {}\")\n}}", i),
    }
}

fn build_function(kinds: &[u8], params: &[(usize, bool)]) -> FunctionDescriptor {
    let mut builder = FunctionBuilder::new("generated");
    for (i, (ty, escaping)) in params.iter().enumerate() {
        let type_text = if *escaping {
            "@escaping (Int) -> Void".to_string()
        } else {
            TYPES[*ty].to_string()
        };
        builder = builder.param(&format!("p{}", i), &type_text);
    }
    for (i, kind) in kinds.iter().enumerate() {
        builder = builder.statement(&statement_source(*kind, i));
    }
    builder.build()
}

fn strategy() -> impl Strategy<Value = (Vec<u8>, Vec<(usize, bool)>)> {
    (
        prop::collection::vec(0u8..7, 1..24),
        prop::collection::vec((0usize..TYPES.len(), any::<bool>()), 0..8),
    )
}

/// Positions of `group` within `all`, which must be strictly increasing.
fn is_subsequence(group: &[&str], all: &[&str]) -> bool {
    let mut positions = group.iter().map(|s| all.iter().position(|a| a == s));
    let mut last = None;
    positions.all(|pos| match (pos, last) {
        (Some(p), Some(l)) if p <= l => false,
        (Some(p), _) => {
            last = Some(p);
            true
        }
        (None, _) => false,
    })
}

proptest! {
    #[test]
    fn expansion_is_deterministic((kinds, params) in strategy()) {
        let func = build_function(&kinds, &params);
        let options = ExpansionOptions::default();

        let first = expand_function(&func, &options).unwrap();
        let second = expand_function(&func, &options).unwrap();
        prop_assert_eq!(first.to_source(), second.to_source());
    }

    #[test]
    fn classification_is_a_partition((kinds, params) in strategy()) {
        let func = build_function(&kinds, &params);
        let statements = func.statements();
        let body = classify(statements, &ExpansionOptions::default());

        let all: Vec<&str> = statements.iter().map(|s| s.source()).collect();
        let groups = [&body.render, &body.persistent_state, &body.external_binding, &body.transient_local];

        let mut concatenated: Vec<&str> = groups
            .iter()
            .flat_map(|group| group.iter().map(|s| s.source()))
            .collect();
        prop_assert_eq!(concatenated.len(), all.len());

        for group in groups {
            let sources: Vec<&str> = group.iter().map(|s| s.source()).collect();
            prop_assert!(is_subsequence(&sources, &all));
        }

        let mut expected = all.clone();
        concatenated.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(concatenated, expected);
    }

    #[test]
    fn every_parameter_is_stored_and_assigned((kinds, params) in strategy()) {
        let func = build_function(&kinds, &params);
        let synthesized = synthesize(&func.parameters, &ExpansionOptions::default());

        prop_assert_eq!(synthesized.stored_fields.len(), func.parameters.len());
        prop_assert_eq!(synthesized.initializer.assignments.len(), func.parameters.len());

        for ((field, assignment), param) in synthesized
            .stored_fields
            .iter()
            .zip(&synthesized.initializer.assignments)
            .zip(&func.parameters)
        {
            prop_assert_eq!(&field.name, &param.name.0);
            prop_assert_eq!(&assignment.field, &param.name.0);
            prop_assert_eq!(&assignment.parameter, &param.name.0);
            prop_assert!(!field.type_text.contains("@escaping"));
        }
    }

    #[test]
    fn render_statements_keep_source_order((kinds, params) in strategy()) {
        let func = build_function(&kinds, &params);
        let options = ExpansionOptions::default();
        let body = classify(func.statements(), &options);
        let generated = GeneratedType::new(&body, synthesize(&func.parameters, &options));

        let plain: Vec<&str> = func
            .statements()
            .iter()
            .filter(|s| !s.is_declaration())
            .map(|s| s.source())
            .collect();
        let rendered: Vec<&str> = generated.render_statements.iter().map(|s| s.source()).collect();
        prop_assert_eq!(&rendered, &plain);

        // Single-line render statements appear in the rendered body in order.
        let source = expand_function(&func, &options).unwrap().to_source();
        let routine = &source[source.find("var body: some View").unwrap()..];
        let mut cursor = 0;
        for stmt in plain.iter().filter(|s| !s.contains('\n')) {
            let found = routine[cursor..].find(*stmt);
            prop_assert!(found.is_some(), "missing {:?}", stmt);
            cursor += found.unwrap() + stmt.len();
        }
    }
}
