//! Per-family structural signature sets.
//!
//! Each set is scored independently; a signature belonging to one family
//! does not suppress matching in another.

use regex::Regex;
use sq_core::Family;
use std::sync::LazyLock;

/// PHP-style length-prefixed serialization tokens.
static SERIALIZED_OBJECT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#"^(?:a|O):\d+:"#,
        r#"(?:^|[;{])s:\d+:""#,
        r"(?:^|[;{])i:-?\d+;",
        r"b:[01];",
        r"d:-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?;",
        r"(?:^|[;{])N;",
        r#"O:\d+:"[A-Za-z_\\]"#,
    ])
});

/// Brace/bracket-wrapped, double-quoted key:value pairs.
static STRUCTURED_DATA: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#"^\{\s*["}]"#,
        r"^\[",
        r#""[^"\n]*"\s*:"#,
        r#":\s*(?:-?\d|"|\{|\[|true\b|false\b|null\b)"#,
        r"^\{[\s\S]*\}$|^\[[\s\S]*\]$",
        r#",\s*["\d\{\[]"#,
    ])
});

/// Selector headers, declarations, unit suffixes, at-rules.
static STYLESHEET: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"[.#][A-Za-z][\w-]*\s*\{",
        r"(?m)^[a-zA-Z][\w-]*\s*\{",
        r"[a-zA-Z-]+\s*:\s*[^;{}\n]+;",
        r"\d+(?:px|r?em|ex|ch|vh|vw|vmin|vmax|pt|%)",
        r"@(?:media|import|charset|namespace|supports|font-face|keyframes|page)\b",
        r"#[0-9a-fA-F]{3,8}\b",
        r"!important\b",
        r"[{;]\s*[a-zA-Z-]+\s*:",
        r":\s*(?:hover|focus|active|nth-child|first-child|last-child|before|after|root)\b",
    ])
});

/// Keyword, operator, and template-literal signatures. Deliberately broad;
/// the tie-break ordering makes script lose ties against the narrow sets.
static SCRIPT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\b(?:function|return)\b",
        r"\b(?:var|let|const)\s+[A-Za-z_$]",
        r"\b(?:if|for|while|switch)\s*\(",
        r"=>",
        r"[=!]==",
        r"\b(?:document|window|console|module|require)\b",
        r"\)\s*\{",
        r"`",
        r"\+\+|&&|\|\|",
        r"(?m)^\s*//",
        r"\bundefined\b",
    ])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

fn matched(set: &[Regex], text: &str) -> usize {
    set.iter().filter(|re| re.is_match(text)).count()
}

pub fn score_serialized_object(text: &str) -> usize {
    matched(&SERIALIZED_OBJECT, text)
}

pub fn score_structured_data(text: &str) -> usize {
    matched(&STRUCTURED_DATA, text)
}

pub fn score_stylesheet(text: &str) -> usize {
    matched(&STYLESHEET, text)
}

pub fn score_script(text: &str) -> usize {
    matched(&SCRIPT, text)
}

/// Number of signatures for `family` matching `text`.
pub fn score(family: Family, text: &str) -> usize {
    match family {
        Family::SerializedObject => score_serialized_object(text),
        Family::StructuredData => score_structured_data(text),
        Family::Stylesheet => score_stylesheet(text),
        Family::Script => score_script(text),
    }
}
