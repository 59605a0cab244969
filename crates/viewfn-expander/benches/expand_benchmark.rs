//! Expansion benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use viewfn_expander::{expand, expand_source, ExpansionOptions};

const SIMPLE_FN: &str = r#"
@ViewComponent
func greeting(name: String) -> some View {
  Text("Hello, \(name)")
}
"#;

const MEDIUM_FN: &str = include_str!("../../../tests/fixtures/settings_row.swift");

fn expand_simple(c: &mut Criterion) {
    let options = ExpansionOptions::default();
    c.bench_function("expand_simple", |b| {
        b.iter(|| expand_source(black_box(SIMPLE_FN), &options))
    });
}

fn expand_medium(c: &mut Criterion) {
    let options = ExpansionOptions::default();
    c.bench_function("expand_medium", |b| {
        b.iter(|| expand_source(black_box(MEDIUM_FN), &options))
    });
}

fn expand_preparsed(c: &mut Criterion) {
    let options = ExpansionOptions::default();
    let decl = viewfn_parser::parse_declaration(MEDIUM_FN).unwrap();
    c.bench_function("expand_preparsed", |b| {
        b.iter(|| expand(black_box(&decl), &options))
    });
}

criterion_group!(benches, expand_simple, expand_medium, expand_preparsed);
criterion_main!(benches);
