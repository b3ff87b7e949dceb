use crate::{merge, MergeOptions};
use sq_core::{
    Aggressiveness, Family, FailureKind, Fragment, JsonOptions, OptionSet, ScriptOptions,
    StylesheetOptions,
};
use sq_transform::TransformEngine;

fn engine() -> TransformEngine {
    TransformEngine::new()
}

fn script_opts(tier: Aggressiveness) -> OptionSet {
    OptionSet::Script(ScriptOptions {
        aggressiveness: tier,
        strip_comments: false,
        ..ScriptOptions::default()
    })
}

fn frag(name: &str, body: &str, family: Family) -> Fragment {
    Fragment::new(name, body, family)
}

#[test]
fn test_merge_two_script_fragments() {
    let out = merge(
        &engine(),
        &[
            frag("a.js", "var a = 1;", Family::Script),
            frag("b.js", "var b = 2;", Family::Script),
        ],
        &script_opts(Aggressiveness::Standard),
        &MergeOptions::default(),
    )
    .unwrap();
    assert_eq!(out, "var a=1;\nvar b=2;");
}

#[test]
fn test_merge_rejects_mixed_families() {
    let err = merge(
        &engine(),
        &[
            frag("styles.css", ".a { color: red; }", Family::Stylesheet),
            frag("app.js", "var a = 1;", Family::Script),
        ],
        &OptionSet::Stylesheet(StylesheetOptions::default()),
        &MergeOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), FailureKind::FamilyMismatch);
    assert!(err.to_string().contains("app.js"));
}

#[test]
fn test_merge_family_check_covers_every_fragment() {
    let err = merge(
        &engine(),
        &[
            frag("one.js", "a();", Family::Script),
            frag("two.js", "b();", Family::Script),
            frag("data.json", "{}", Family::StructuredData),
        ],
        &script_opts(Aggressiveness::Whitespace),
        &MergeOptions::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("data.json"));
}

#[test]
fn test_merge_empty_list_is_empty_output() {
    let out = merge(
        &engine(),
        &[],
        &script_opts(Aggressiveness::Standard),
        &MergeOptions::default(),
    )
    .unwrap();
    assert_eq!(out, "");
}

#[test]
fn test_strip_comments_is_per_fragment() {
    // fragment A ends in a line comment with no trailing newline; stripping
    // after concatenation would swallow fragment B
    let out = merge(
        &engine(),
        &[
            frag("a.js", "a(); // tail comment", Family::Script),
            frag("b.js", "b();", Family::Script),
        ],
        &script_opts(Aggressiveness::Whitespace),
        &MergeOptions {
            strip_comments: true,
            insert_separators: false,
        },
    )
    .unwrap();
    assert!(out.contains("b()"), "fragment B was swallowed: {out}");
    assert!(!out.contains("tail comment"));
}

#[test]
fn test_no_strip_keeps_comments() {
    let out = merge(
        &engine(),
        &[frag("a.js", "a(); // kept", Family::Script)],
        &script_opts(Aggressiveness::Whitespace),
        &MergeOptions {
            strip_comments: false,
            insert_separators: false,
        },
    )
    .unwrap();
    assert!(out.contains("// kept"));
}

#[test]
fn test_separator_insertion() {
    let with = merge(
        &engine(),
        &[
            frag("a.css", ".a{color:red}", Family::Stylesheet),
            frag("b.css", ".b{color:blue}", Family::Stylesheet),
        ],
        &OptionSet::Stylesheet(StylesheetOptions {
            aggressiveness: Aggressiveness::Whitespace,
            strip_comments: false,
        }),
        &MergeOptions {
            strip_comments: false,
            insert_separators: true,
        },
    )
    .unwrap();
    assert!(with.contains('\n'));

    let without = merge(
        &engine(),
        &[
            frag("a.css", ".a{color:red}", Family::Stylesheet),
            frag("b.css", ".b{color:blue}", Family::Stylesheet),
        ],
        &OptionSet::Stylesheet(StylesheetOptions {
            aggressiveness: Aggressiveness::Whitespace,
            strip_comments: false,
        }),
        &MergeOptions {
            strip_comments: false,
            insert_separators: false,
        },
    )
    .unwrap();
    assert_eq!(without, ".a{color:red}.b{color:blue}");
}

#[test]
fn test_merge_order_is_caller_order() {
    let out = merge(
        &engine(),
        &[
            frag("second", "var b = 2;", Family::Script),
            frag("first", "var a = 1;", Family::Script),
        ],
        &script_opts(Aggressiveness::Standard),
        &MergeOptions::default(),
    )
    .unwrap();
    let b_at = out.find("b=2").unwrap();
    let a_at = out.find("a=1").unwrap();
    assert!(b_at < a_at);
}

#[test]
fn test_merge_stylesheet_with_comments_stripped() {
    let out = merge(
        &engine(),
        &[
            frag("a.css", "/* header */ .a { top: 0; }", Family::Stylesheet),
            frag("b.css", ".b { left: 0; }", Family::Stylesheet),
        ],
        &OptionSet::Stylesheet(StylesheetOptions::default()),
        &MergeOptions {
            strip_comments: true,
            insert_separators: true,
        },
    )
    .unwrap();
    assert_eq!(out, ".a{top:0}.b{left:0}");
    assert!(!out.contains("header"));
}

#[test]
fn test_merge_surfaces_transform_failure() {
    // two structured-data fragments cannot concatenate into valid input;
    // the transform's syntax error comes back verbatim
    let err = merge(
        &engine(),
        &[
            frag("a.json", r#"{"a":1}"#, Family::StructuredData),
            frag("b.json", r#"{"b":2}"#, Family::StructuredData),
        ],
        &OptionSet::StructuredData(JsonOptions::default()),
        &MergeOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), FailureKind::SyntaxError);
}

#[test]
fn test_merge_single_structured_fragment_transforms() {
    let out = merge(
        &engine(),
        &[frag("only.json", r#"{ "a" : 1 }"#, Family::StructuredData)],
        &OptionSet::StructuredData(JsonOptions::default()),
        &MergeOptions::default(),
    )
    .unwrap();
    assert_eq!(out, r#"{"a":1}"#);
}

#[test]
fn test_merge_unterminated_comment_in_fragment_errors() {
    let err = merge(
        &engine(),
        &[frag("bad.js", "a(); /* never closed", Family::Script)],
        &script_opts(Aggressiveness::Whitespace),
        &MergeOptions {
            strip_comments: true,
            insert_separators: false,
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), FailureKind::SyntaxError);
}
