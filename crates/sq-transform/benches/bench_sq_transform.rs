use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use sq_core::{Aggressiveness, JsonOptions, OptionSet, ScriptOptions, StylesheetOptions};
use sq_transform::TransformEngine;

fn generate_json(entries: usize) -> String {
    let mut out = String::from("{");
    for i in 0..entries {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&format!(
            r#""key{i}": {{ "id": {i}, "score": {i}.50, "tags": ["x", "y", "x"], "gone": null }}"#
        ));
    }
    out.push('}');
    out
}

fn generate_script(stmts: usize) -> String {
    (0..stmts)
        .map(|i| {
            format!(
                "// statement {i}\nfunction handler{i}(event) {{\n    var total = event.value + {i};\n    return total;\n}}\n"
            )
        })
        .collect()
}

fn generate_css(rules: usize) -> String {
    (0..rules)
        .map(|i| format!("/* rule {i} */\n.widget-{i} {{\n  margin: 0px;\n  color: #aabbcc;\n}}\n"))
        .collect()
}

fn bench_structured(c: &mut Criterion) {
    let engine = TransformEngine::new();
    let json = generate_json(500);
    let mut opts = JsonOptions::default();
    opts.remove_null_values = true;
    opts.remove_duplicate_array_elements = true;
    opts.sort_object_keys = true;
    opts.optimize_numbers = true;
    let full = OptionSet::StructuredData(opts);
    let minify_only = OptionSet::StructuredData(JsonOptions::default());

    c.bench_function("transform_json_minify_500", |b| {
        b.iter(|| black_box(engine.transform(black_box(&json), &minify_only)))
    });
    c.bench_function("transform_json_rules_500", |b| {
        b.iter(|| black_box(engine.transform(black_box(&json), &full)))
    });

    // worst case for key sorting: keys arrive in shuffled order
    let mut keys: Vec<usize> = (0..500).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(42));
    let shuffled = format!(
        "{{{}}}",
        keys.iter()
            .map(|k| format!(r#""key{k}":{k}"#))
            .collect::<Vec<_>>()
            .join(",")
    );
    let mut sort_opts = JsonOptions::default();
    sort_opts.sort_object_keys = true;
    let sort_set = OptionSet::StructuredData(sort_opts);
    c.bench_function("transform_json_sort_shuffled_500", |b| {
        b.iter(|| black_box(engine.transform(black_box(&shuffled), &sort_set)))
    });
}

fn bench_script_and_css(c: &mut Criterion) {
    let engine = TransformEngine::new();
    let js = generate_script(200);
    let css = generate_css(200);

    for &(name, tier) in &[
        ("whitespace", Aggressiveness::Whitespace),
        ("standard", Aggressiveness::Standard),
        ("aggressive", Aggressiveness::Aggressive),
    ] {
        let opts = OptionSet::Script(ScriptOptions {
            aggressiveness: tier,
            ..ScriptOptions::default()
        });
        c.bench_function(&format!("transform_script_{name}_200"), |b| {
            b.iter(|| black_box(engine.transform(black_box(&js), &opts)))
        });
    }

    let css_opts = OptionSet::Stylesheet(StylesheetOptions {
        aggressiveness: Aggressiveness::Aggressive,
        strip_comments: true,
    });
    c.bench_function("transform_css_aggressive_200", |b| {
        b.iter(|| black_box(engine.transform(black_box(&css), &css_opts)))
    });
}

criterion_group!(benches, bench_structured, bench_script_and_css);
criterion_main!(benches);
