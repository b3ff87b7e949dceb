use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sq_core::{Family, Fragment, OptionSet, ScriptOptions, StylesheetOptions};
use sq_merge::{merge, MergeOptions};
use sq_transform::TransformEngine;

fn script_fragments(count: usize) -> Vec<Fragment> {
    (0..count)
        .map(|i| {
            Fragment::new(
                format!("mod{i}.js"),
                format!("// module {i}\nfunction mod{i}(x) {{\n  return x + {i};\n}}\n"),
                Family::Script,
            )
        })
        .collect()
}

fn css_fragments(count: usize) -> Vec<Fragment> {
    (0..count)
        .map(|i| {
            Fragment::new(
                format!("part{i}.css"),
                format!("/* part {i} */\n.part-{i} {{ margin: {i}px; }}\n"),
                Family::Stylesheet,
            )
        })
        .collect()
}

fn bench_merge(c: &mut Criterion) {
    let engine = TransformEngine::new();
    let scripts = script_fragments(50);
    let sheets = css_fragments(50);
    let strip = MergeOptions {
        strip_comments: true,
        insert_separators: true,
    };

    c.bench_function("merge_script_50", |b| {
        b.iter(|| {
            black_box(merge(
                &engine,
                black_box(&scripts),
                &OptionSet::Script(ScriptOptions::default()),
                &strip,
            ))
        })
    });
    c.bench_function("merge_stylesheet_50", |b| {
        b.iter(|| {
            black_box(merge(
                &engine,
                black_box(&sheets),
                &OptionSet::Stylesheet(StylesheetOptions::default()),
                &strip,
            ))
        })
    });
}

criterion_group!(benches, bench_merge);
criterion_main!(benches);
