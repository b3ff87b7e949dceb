//! The generic compactor boundary.
//!
//! Script and stylesheet size reduction is delegated through
//! [`GenericCompactor`], so embedders can plug a full grammar-aware
//! optimizer behind the pipeline. The built-in implementations are
//! deliberately conservative: comment stripping, whitespace collapse, and
//! tier-gated tightening that cannot change program meaning. They accept
//! the whole option grammar but act only on the safe subset;
//! `renameIdentifiers`, `preserveNames`, and `removeDeadCode` are honored
//! by replacement compactors supplied via
//! [`TransformEngine::with_compactors`].
//!
//! [`TransformEngine::with_compactors`]: crate::TransformEngine::with_compactors

use crate::scanner::{self, ScanLang, ScanOptions};
use regex::Regex;
use sq_core::{Aggressiveness, PipelineError, ScriptOptions, StylesheetOptions};
use std::sync::LazyLock;
use thiserror::Error;

/// Options mapped onto the compactor's grammar.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactorOptions {
    pub aggressiveness: Aggressiveness,
    pub strip_comments: bool,
    pub rename_identifiers: bool,
    pub preserve_names: bool,
    pub remove_dead_code: bool,
}

impl CompactorOptions {
    pub fn for_script(o: &ScriptOptions) -> Self {
        Self {
            aggressiveness: o.aggressiveness,
            strip_comments: o.strip_comments,
            rename_identifiers: o.rename_identifiers,
            preserve_names: o.preserve_names,
            remove_dead_code: o.remove_dead_code,
        }
    }

    pub fn for_stylesheet(o: &StylesheetOptions) -> Self {
        Self {
            aggressiveness: o.aggressiveness,
            strip_comments: o.strip_comments,
            rename_identifiers: false,
            preserve_names: true,
            remove_dead_code: false,
        }
    }
}

/// Failure surface of a compactor. `Syntax` is surfaced to callers
/// verbatim; anything else is reported as an internal compactor failure,
/// never swallowed.
#[derive(Debug, Error)]
pub enum CompactorError {
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

pub trait GenericCompactor: Send + Sync {
    fn compact(&self, text: &str, options: &CompactorOptions)
        -> Result<String, CompactorError>;
}

fn to_compactor_err(e: PipelineError) -> CompactorError {
    match e {
        PipelineError::Syntax {
            line,
            column,
            message,
        } => CompactorError::Syntax {
            line,
            column,
            message,
        },
        other => CompactorError::Internal(anyhow::Error::new(other)),
    }
}

/// Built-in ECMAScript-family compactor.
pub struct ScriptCompactor;

impl GenericCompactor for ScriptCompactor {
    fn compact(
        &self,
        text: &str,
        options: &CompactorOptions,
    ) -> Result<String, CompactorError> {
        let scanned = scanner::scan(
            text.trim(),
            ScanLang::Script,
            ScanOptions {
                strip_comments: options.strip_comments,
                check_balance: true,
            },
        )
        .map_err(to_compactor_err)?;
        Ok(compact_ws(&scanned, ScanLang::Script, options.aggressiveness))
    }
}

/// Built-in stylesheet compactor.
pub struct StylesheetCompactor;

impl GenericCompactor for StylesheetCompactor {
    fn compact(
        &self,
        text: &str,
        options: &CompactorOptions,
    ) -> Result<String, CompactorError> {
        let scanned = scanner::scan(
            text.trim(),
            ScanLang::Stylesheet,
            ScanOptions {
                strip_comments: options.strip_comments,
                check_balance: true,
            },
        )
        .map_err(to_compactor_err)?;
        let mut out = compact_ws(&scanned, ScanLang::Stylesheet, options.aggressiveness);
        if options.aggressiveness == Aggressiveness::Aggressive {
            out = shorten_zero_units(&out);
            out = shorten_hex_colors(&out);
        }
        Ok(out)
    }
}

const SCRIPT_PUNCT: &[u8] = b"{}()[];,=+-*/%<>!&|?:.~^";
const CSS_PUNCT: &[u8] = b"{}:;,>()";

/// Whitespace collapse with tier-gated tightening. Strings, template
/// literals, regex literals, and any comments still present are copied
/// verbatim.
fn compact_ws(text: &str, lang: ScanLang, tier: Aggressiveness) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut prev_sig: Option<u8> = None;
    // Set after a line comment so the following newline is never joined away.
    let mut newline_pinned = false;
    let mut run_newline = false;
    let mut in_run = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            in_run = true;
            run_newline |= b == b'\n';
            i += 1;
            continue;
        }

        if in_run {
            emit_separator(&mut out, lang, tier, prev_sig, b, run_newline, newline_pinned);
            in_run = false;
            run_newline = false;
            newline_pinned = false;
        }

        if let Some((end, is_line_comment)) = protected_at(bytes, i, lang, prev_sig) {
            out.push_str(&text[i..end]);
            newline_pinned = is_line_comment;
            prev_sig = Some(b);
            i = end;
            continue;
        }

        if lang == ScanLang::Stylesheet
            && tier >= Aggressiveness::Standard
            && b == b'}'
            && out.ends_with(';')
        {
            out.pop();
        }
        out.push_str(&text[i..i + utf8_len(b)]);
        prev_sig = Some(b);
        i += utf8_len(b);
    }
    out
}

fn emit_separator(
    out: &mut String,
    lang: ScanLang,
    tier: Aggressiveness,
    prev: Option<u8>,
    next: u8,
    had_newline: bool,
    newline_pinned: bool,
) {
    let Some(prev) = prev else {
        return; // leading whitespace
    };
    match lang {
        ScanLang::Script => {
            if had_newline {
                let joinable = tier == Aggressiveness::Aggressive
                    && !newline_pinned
                    && (matches!(prev, b'{' | b';' | b',' | b'(')
                        || matches!(next, b')' | b'}' | b';'));
                if !joinable {
                    out.push('\n');
                }
                return;
            }
            let tighten = tier >= Aggressiveness::Standard
                && (SCRIPT_PUNCT.contains(&prev) || SCRIPT_PUNCT.contains(&next))
                && !(matches!(prev, b'+' | b'-') && matches!(next, b'+' | b'-'))
                && !(prev.is_ascii_digit() && next == b'.');
            if !tighten {
                out.push(' ');
            }
        }
        ScanLang::Stylesheet => {
            if tier == Aggressiveness::Whitespace {
                out.push(if had_newline { '\n' } else { ' ' });
                return;
            }
            // `and (...)` and `(...) and` must keep their word breaks.
            let word_break = (next == b'(' && prev.is_ascii_alphanumeric())
                || (prev == b')' && next.is_ascii_alphanumeric());
            let tighten = !word_break
                && (CSS_PUNCT.contains(&prev) || CSS_PUNCT.contains(&next));
            if !tighten {
                out.push(' ');
            }
        }
    }
}

/// Protected segment (string, template, regex, comment) starting at `i`,
/// returning its end and whether it was a line comment. Input has already
/// passed the scanner, so unterminated literals cannot occur; the `len`
/// fallbacks are unreachable on that path.
fn protected_at(
    bytes: &[u8],
    i: usize,
    lang: ScanLang,
    prev_sig: Option<u8>,
) -> Option<(usize, bool)> {
    let b = bytes[i];
    match b {
        b'"' | b'\'' => Some((string_end(bytes, i, b), false)),
        b'`' if lang == ScanLang::Script => Some((string_end(bytes, i, b'`'), false)),
        b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'*' => {
            let end = find_sub(bytes, i + 2, b"*/")
                .map(|p| p + 2)
                .unwrap_or(bytes.len());
            Some((end, false))
        }
        b'/' if lang == ScanLang::Script && i + 1 < bytes.len() && bytes[i + 1] == b'/' => {
            let end = bytes[i..]
                .iter()
                .position(|&c| c == b'\n')
                .map(|p| i + p)
                .unwrap_or(bytes.len());
            Some((end, true))
        }
        b'/' if lang == ScanLang::Script && regex_start(prev_sig) => {
            Some((regex_literal_end(bytes, i), false))
        }
        _ => None,
    }
}

fn regex_start(prev: Option<u8>) -> bool {
    match prev {
        None => true,
        Some(b) => matches!(
            b,
            b'=' | b'(' | b'[' | b'{' | b',' | b';' | b':' | b'!' | b'&' | b'|' | b'?' | b'+'
                | b'-' | b'*' | b'%' | b'<' | b'>' | b'~' | b'^'
        ),
    }
}

fn string_end(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn regex_literal_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    let mut in_class = false;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return start + 1,
            b'[' => {
                in_class = true;
                i += 1;
            }
            b']' if in_class => {
                in_class = false;
                i += 1;
            }
            b'/' if !in_class => {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                    i += 1;
                }
                return i;
            }
            _ => i += 1,
        }
    }
    start + 1
}

fn find_sub(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from > bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

fn utf8_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    }
}

static RE_ZERO_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b0(?:px|r?em|ex|ch|vh|vw|vmin|vmax|pt)\b").unwrap());
static RE_HEX6: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[0-9a-fA-F]{6}\b").unwrap());

/// Byte ranges inside strings or parentheses; aggressive value shortening
/// skips these (calc() and media-query expressions keep their units).
fn css_protected_spans(text: &str) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut open = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                let end = string_end(bytes, i, bytes[i]);
                if depth == 0 {
                    spans.push((i, end));
                }
                i = end;
            }
            b'(' => {
                if depth == 0 {
                    open = i;
                }
                depth += 1;
                i += 1;
            }
            b')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    spans.push((open, i + 1));
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    if depth > 0 {
        spans.push((open, bytes.len()));
    }
    spans
}

fn in_spans(spans: &[(usize, usize)], pos: usize) -> bool {
    spans.iter().any(|&(s, e)| pos >= s && pos < e)
}

fn shorten_zero_units(text: &str) -> String {
    let spans = css_protected_spans(text);
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in RE_ZERO_UNIT.find_iter(text) {
        if in_spans(&spans, m.start()) {
            continue;
        }
        out.push_str(&text[last..m.start()]);
        out.push('0');
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

fn shorten_hex_colors(text: &str) -> String {
    let spans = css_protected_spans(text);
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in RE_HEX6.find_iter(text) {
        if in_spans(&spans, m.start()) {
            continue;
        }
        let hex = &m.as_str()[1..];
        let b = hex.as_bytes();
        if b[0] == b[1] && b[2] == b[3] && b[4] == b[5] {
            out.push_str(&text[last..m.start()]);
            out.push('#');
            out.push(b[0] as char);
            out.push(b[2] as char);
            out.push(b[4] as char);
            last = m.end();
        }
    }
    out.push_str(&text[last..]);
    out
}
