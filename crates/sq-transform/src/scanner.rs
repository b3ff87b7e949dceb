//! String- and comment-aware scanning for the script and stylesheet
//! families.
//!
//! Both built-in compactors and the merge engine need to walk text without
//! mistaking comment-like bytes inside string literals for comments (or the
//! other way round). The scanner is the single place that knows each
//! family's literal syntax: script has `'`/`"`/template strings, regex
//! literals, `//` and `/* */`; stylesheet has `'`/`"` strings and `/* */`
//! only.

use sq_core::{PipelineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanLang {
    Script,
    Stylesheet,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Drop comments from the output (block comments become one space so
    /// adjacent tokens never fuse).
    pub strip_comments: bool,
    /// Error on unbalanced `()[]{}` outside literals.
    pub check_balance: bool,
}

/// Strip comments using family-appropriate syntax. Fails on an unterminated
/// string, template, or block comment.
pub fn strip_comments(text: &str, lang: ScanLang) -> Result<String> {
    scan(
        text,
        lang,
        ScanOptions {
            strip_comments: true,
            check_balance: false,
        },
    )
}

/// One pass over `text`: validates literal termination (and optionally
/// delimiter balance), returning the text with comments stripped when
/// requested and untouched otherwise.
pub fn scan(text: &str, lang: ScanLang, opts: ScanOptions) -> Result<String> {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut stack: Vec<(u8, usize)> = Vec::new();
    // Last significant byte emitted outside literals; drives the regex
    // vs. division heuristic.
    let mut prev_sig: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'"' | b'\'' => {
                let end = string_end(bytes, i, b)
                    .ok_or_else(|| PipelineError::syntax_at(text, i, "unterminated string"))?;
                out.push_str(&text[i..end]);
                prev_sig = Some(b);
                i = end;
            }
            b'`' if lang == ScanLang::Script => {
                let end = string_end(bytes, i, b'`').ok_or_else(|| {
                    PipelineError::syntax_at(text, i, "unterminated template literal")
                })?;
                out.push_str(&text[i..end]);
                prev_sig = Some(b);
                i = end;
            }
            b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'*' => {
                let close = find_sub(bytes, i + 2, b"*/").ok_or_else(|| {
                    PipelineError::syntax_at(text, i, "unterminated block comment")
                })?;
                if opts.strip_comments {
                    out.push(' ');
                } else {
                    out.push_str(&text[i..close + 2]);
                }
                i = close + 2;
            }
            b'/' if lang == ScanLang::Script
                && i + 1 < bytes.len()
                && bytes[i + 1] == b'/' =>
            {
                let eol = find_byte(bytes, i, b'\n').unwrap_or(bytes.len());
                if !opts.strip_comments {
                    out.push_str(&text[i..eol]);
                }
                i = eol;
            }
            b'/' if lang == ScanLang::Script && regex_may_start(prev_sig) => {
                let end = regex_end(bytes, i);
                out.push_str(&text[i..end]);
                prev_sig = Some(b'/');
                i = end;
            }
            b if b >= 0x80 => {
                // Copy a multi-byte character verbatim.
                let end = i + utf8_len(b);
                out.push_str(&text[i..end]);
                prev_sig = Some(b);
                i = end;
            }
            _ => {
                if opts.check_balance {
                    match b {
                        b'(' | b'[' | b'{' => stack.push((b, i)),
                        b')' | b']' | b'}' => {
                            let open = match b {
                                b')' => b'(',
                                b']' => b'[',
                                _ => b'{',
                            };
                            match stack.pop() {
                                Some((top, _)) if top == open => {}
                                _ => {
                                    return Err(PipelineError::syntax_at(
                                        text,
                                        i,
                                        format!("unexpected `{}`", b as char),
                                    ));
                                }
                            }
                        }
                        _ => {}
                    }
                }
                out.push(b as char);
                if !b.is_ascii_whitespace() {
                    prev_sig = Some(b);
                }
                i += 1;
            }
        }
    }

    if let Some((open, at)) = stack.last() {
        return Err(PipelineError::syntax_at(
            text,
            *at,
            format!("unclosed `{}`", *open as char),
        ));
    }
    Ok(out)
}

/// End offset (exclusive, past the closing quote) of a string starting at
/// `start`, or `None` when unterminated. Template literals may span lines;
/// the other quotes may not, but a lenient scan costs nothing and broken
/// input fails at the parser behind us anyway.
fn string_end(bytes: &[u8], start: usize, quote: u8) -> Option<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return Some(i + 1),
            b'\n' if quote != b'`' => return None,
            _ => i += 1,
        }
    }
    None
}

/// `/` starts a regex literal when the previous significant byte cannot end
/// an expression.
fn regex_may_start(prev: Option<u8>) -> bool {
    match prev {
        None => true,
        Some(b) => matches!(
            b,
            b'=' | b'(' | b'[' | b'{' | b',' | b';' | b':' | b'!' | b'&' | b'|' | b'?' | b'+'
                | b'-' | b'*' | b'%' | b'<' | b'>' | b'~' | b'^'
        ),
    }
}

/// Scan past a regex literal (escapes and `[...]` classes respected). A
/// newline before the closing `/` means the heuristic misfired; fall back
/// to treating the `/` as division and hand back just that byte.
fn regex_end(bytes: &[u8], start: usize) -> usize {
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

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from..].iter().position(|&b| b == needle).map(|p| from + p)
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
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    }
}
