//! Compilation performance benchmarks

use atomc::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::fs;
use tempfile::TempDir;

const SIMPLE_SOURCE: &str = r#"{
    "create": {
        "root": {
            "color": "red",
            "padding": "4px 8px",
            ":hover": { "color": "blue" },
            "@media (min-width: 1000px)": { "marginLeft": 10 }
        }
    },
    "keyframes": {
        "fadeIn": { "from": { "opacity": 0 }, "to": { "opacity": 1 } }
    }
}"#;

fn large_definition(namespaces: usize) -> StyleDefinition {
    let mut definition = StyleDefinition::new();
    for i in 0..namespaces {
        let styles = style_map([
            ("width", Value::from(i as f64)),
            ("margin", Value::from(format!("{}px {}px", i % 16, i % 8))),
            (
                "color",
                Value::object([
                    ("default", Value::from("black")),
                    (":hover", Value::from(format!("#{:06x}", i))),
                ]),
            ),
            ("left", Value::from(i as f64 % 32.0)),
        ]);
        definition = definition.namespace(format!("item{}", i), Namespace::new(styles));
    }
    definition
}

fn bench_simple_compilation(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("simple.json");
    let output_path = temp_dir.path().join("simple.css");
    fs::write(&input_path, SIMPLE_SOURCE).unwrap();

    c.bench_function("simple_compilation", |b| {
        b.iter(|| {
            compile_file(
                black_box(input_path.to_str().unwrap()),
                black_box(output_path.to_str().unwrap()),
            )
            .unwrap()
        })
    });
}

fn bench_large_definition(c: &mut Criterion) {
    let compiler = StyleCompiler::new(CompilerOptions::default()).unwrap();
    let definition = large_definition(1000);

    c.bench_function("large_definition", |b| {
        b.iter(|| {
            let mut registry = StyleRegistry::new();
            compiler
                .compile(black_box(&definition), &mut registry)
                .unwrap();
            registry.to_css(Direction::Ltr)
        })
    });
}

fn bench_parallel_compilation(c: &mut Criterion) {
    let compiler = StyleCompiler::new(CompilerOptions::default()).unwrap();
    let definitions: Vec<StyleDefinition> = (0..8).map(|_| large_definition(250)).collect();

    c.bench_function("parallel_compilation", |b| {
        b.iter(|| {
            let registry = StyleRegistry::new().into_shared();
            compiler.compile_parallel(black_box(&definitions), &registry)
        })
    });
}

fn bench_shorthand_expansion(c: &mut Criterion) {
    let definition = large_definition(200);
    let mut group = c.benchmark_group("shorthand_expansion");

    for expand in [false, true] {
        let options = CompilerOptions {
            expand_shorthands: expand,
            ..Default::default()
        };
        let compiler = StyleCompiler::new(options).unwrap();
        group.bench_with_input(format!("expand_{}", expand), &definition, |b, definition| {
            b.iter(|| {
                let mut registry = StyleRegistry::new();
                compiler.compile(black_box(definition), &mut registry).unwrap()
            })
        });
    }

    group.finish();
}

fn bench_normalize_and_hash(c: &mut Criterion) {
    let normalizer = Normalizer::default();
    let hover = ContextPath::from_segments(vec![ContextSegment::Pseudo(":hover".to_string())]);
    let value = Value::from("calc(100% - 2rem)");

    c.bench_function("normalize_and_hash", |b| {
        b.iter(|| {
            let normalized = normalizer.normalize(black_box("width"), &value).unwrap();
            normalized
                .declarations
                .iter()
                .map(|declaration| rule_generator::compile_rule("x", declaration, &hover))
                .count()
        })
    });
}

criterion_group!(
    benches,
    bench_simple_compilation,
    bench_large_definition,
    bench_parallel_compilation,
    bench_shorthand_expansion,
    bench_normalize_and_hash
);

criterion_main!(benches);
