//! Structured-data normalize and serialize phases.
//!
//! Normalize parses the text into a `serde_json::Value`, optionally after a
//! single best-effort repair pass. Serialize re-emits the rewritten tree
//! with minimal whitespace and value-preserving numeric canonicalization.

use serde_json::Value;
use sq_core::{JsonOptions, PipelineError, Result};

/// Parse structured-data text. When `fixCommonErrors` is set and the raw
/// parse fails, one repair pass (trailing-comma removal, unquoted-key
/// quoting) is attempted; a second failure is fatal.
pub fn parse(text: &str, opts: &JsonOptions) -> Result<Value> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(first) if opts.fix_common_errors => {
            tracing::warn!(error = %first, "raw parse failed, attempting repair pass");
            let repaired = repair(text);
            serde_json::from_str(&repaired).map_err(|e| syntax_error(&e))
        }
        Err(e) => Err(syntax_error(&e)),
    }
}

fn syntax_error(e: &serde_json::Error) -> PipelineError {
    let full = e.to_string();
    let message = full
        .split(" at line")
        .next()
        .unwrap_or(full.as_str())
        .to_string();
    PipelineError::Syntax {
        line: e.line(),
        column: e.column(),
        message,
    }
}

/// Best-effort repair of the two most common hand-edit mistakes: trailing
/// commas before a closing brace/bracket, and unquoted object keys. String
/// contents are left untouched.
pub fn repair(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'"' => {
                let end = string_end(bytes, i);
                out.push_str(&text[i..end]);
                i = end;
            }
            b',' => {
                let mut j = i + 1;
                while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                    j += 1;
                }
                if j < bytes.len() && (bytes[j] == b'}' || bytes[j] == b']') {
                    // trailing comma: drop it, keep the whitespace
                    out.push_str(&text[i + 1..j]);
                    i = j;
                } else {
                    out.push(',');
                    i += 1;
                }
            }
            b'A'..=b'Z' | b'a'..=b'z' | b'_' | b'$' => {
                let start = i;
                let mut j = i;
                while j < bytes.len()
                    && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'_' || bytes[j] == b'$')
                {
                    j += 1;
                }
                let mut k = j;
                while k < bytes.len() && bytes[k].is_ascii_whitespace() {
                    k += 1;
                }
                let word = &text[start..j];
                let is_key = k < bytes.len() && bytes[k] == b':';
                if is_key {
                    // covers `true`/`false`/`null` used as keys too
                    out.push('"');
                    out.push_str(word);
                    out.push('"');
                } else {
                    out.push_str(word);
                }
                i = j;
            }
            _ => {
                let len = utf8_len(b);
                out.push_str(&text[i..i + len]);
                i += len;
            }
        }
    }
    out
}

fn string_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn utf8_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    }
}

/// Canonical minimal-whitespace serialization. String escaping changes
/// nothing beyond what validity requires; numbers follow the
/// `optimizeNumbers` / `useScientificNotation` settings.
pub fn serialize(value: &Value, opts: &JsonOptions) -> String {
    let mut out = String::new();
    write_value(value, opts, &mut out);
    out
}

fn write_value(value: &Value, opts: &JsonOptions, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => write_number(n, opts, out),
        Value::String(s) => write_escaped(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, opts, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, val)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_escaped(key, out);
                out.push(':');
                write_value(val, opts, out);
            }
            out.push('}');
        }
    }
}

fn write_escaped(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_number(n: &serde_json::Number, opts: &JsonOptions, out: &mut String) {
    // The scientific check runs before integer demotion so that
    // optimizeNumbers and useScientificNotation compose idempotently.
    if opts.use_scientific_notation {
        if let Some(v) = n.as_f64() {
            if v.is_finite() && wants_scientific(v, opts) && roundtrips(n, v) {
                out.push_str(&format!("{v:e}"));
                return;
            }
        }
    }

    if let Some(i) = n.as_i64() {
        out.push_str(&i.to_string());
        return;
    }
    if let Some(u) = n.as_u64() {
        out.push_str(&u.to_string());
        return;
    }

    let Some(v) = n.as_f64() else {
        out.push_str(&n.to_string());
        return;
    };
    if opts.optimize_numbers && v.fract() == 0.0 && v.abs() < 9.007_199_254_740_992e15 {
        out.push_str(&format!("{}", v as i64));
        return;
    }
    out.push_str(&n.to_string());
}

fn wants_scientific(v: f64, opts: &JsonOptions) -> bool {
    let mag = v.abs();
    mag >= 10f64.powi(opts.scientific_upper_exponent)
        || (mag > 0.0 && mag < 10f64.powi(opts.scientific_lower_exponent))
}

/// Integers above 2^53 cannot take the f64 path without changing value.
fn roundtrips(n: &serde_json::Number, v: f64) -> bool {
    match (n.as_i64(), n.as_u64()) {
        (Some(i), _) => v as i64 == i,
        (_, Some(u)) => v as u64 == u,
        _ => true,
    }
}
