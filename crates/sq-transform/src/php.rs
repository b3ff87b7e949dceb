//! Serialized-object family: the PHP `serialize()` token grammar.
//!
//! Normalize validates the length-prefixed grammar into a [`PhpValue`]
//! tree; Serialize re-emits the native encoding with every length prefix
//! and entry count recomputed from the rewritten content. String lengths
//! are byte lengths, so multi-byte UTF-8 content must round-trip exactly;
//! this is the most error-prone part of the family and is covered by tests.

use sq_core::{PipelineError, Result, SerializedOptions};

#[derive(Debug, Clone, PartialEq)]
pub enum PhpValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<(PhpKey, PhpValue)>),
    Object {
        class: String,
        props: Vec<(PhpKey, PhpValue)>,
    },
}

/// Array/property key. The derived ordering (ints before strings, each
/// ascending) is what `sortKeys` uses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PhpKey {
    Int(i64),
    Str(String),
}

pub fn parse(text: &str) -> Result<PhpValue> {
    let mut cursor = Cursor {
        text,
        bytes: text.as_bytes(),
        pos: 0,
    };
    cursor.skip_ws();
    let value = cursor.parse_value()?;
    cursor.skip_ws();
    if cursor.pos != cursor.bytes.len() {
        return Err(cursor.err("trailing data after value"));
    }
    Ok(value)
}

struct Cursor<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn err(&self, message: impl Into<String>) -> PipelineError {
        PipelineError::syntax_at(self.text, self.pos, message)
    }

    fn skip_ws(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        match self.peek() {
            Some(b) if b == expected => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(self.err(format!("expected `{}`", expected as char))),
        }
    }

    /// Read up to (not including) `stop`, advancing past it.
    fn read_until(&mut self, stop: u8) -> Result<&'a str> {
        let start = self.pos;
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == stop {
                let s = &self.text[start..self.pos];
                self.pos += 1;
                return Ok(s);
            }
            self.pos += 1;
        }
        self.pos = start;
        Err(self.err(format!("expected `{}`", stop as char)))
    }

    fn parse_usize(&mut self, stop: u8) -> Result<usize> {
        let at = self.pos;
        let raw = self.read_until(stop)?;
        raw.parse::<usize>().map_err(|_| {
            self.pos = at;
            self.err("invalid length")
        })
    }

    fn parse_value(&mut self) -> Result<PhpValue> {
        match self.peek() {
            Some(b'N') => {
                self.pos += 1;
                self.expect(b';')?;
                Ok(PhpValue::Null)
            }
            Some(b'b') => {
                self.pos += 1;
                self.expect(b':')?;
                let v = match self.peek() {
                    Some(b'0') => false,
                    Some(b'1') => true,
                    _ => return Err(self.err("expected `0` or `1`")),
                };
                self.pos += 1;
                self.expect(b';')?;
                Ok(PhpValue::Bool(v))
            }
            Some(b'i') => {
                self.pos += 1;
                self.expect(b':')?;
                let at = self.pos;
                let raw = self.read_until(b';')?;
                let v = raw.parse::<i64>().map_err(|_| {
                    self.pos = at;
                    self.err("invalid integer")
                })?;
                Ok(PhpValue::Int(v))
            }
            Some(b'd') => {
                self.pos += 1;
                self.expect(b':')?;
                let at = self.pos;
                let raw = self.read_until(b';')?;
                let v = raw.parse::<f64>().map_err(|_| {
                    self.pos = at;
                    self.err("invalid float")
                })?;
                if !v.is_finite() {
                    self.pos = at;
                    return Err(self.err("non-finite float"));
                }
                Ok(PhpValue::Float(v))
            }
            Some(b's') => {
                self.pos += 1;
                self.expect(b':')?;
                let s = self.parse_string_body()?;
                self.expect(b';')?;
                Ok(PhpValue::Str(s))
            }
            Some(b'a') => {
                self.pos += 1;
                self.expect(b':')?;
                let count = self.parse_usize(b':')?;
                self.expect(b'{')?;
                let mut entries = Vec::with_capacity(count);
                for _ in 0..count {
                    let key = self.parse_key()?;
                    let value = self.parse_value()?;
                    entries.push((key, value));
                }
                self.expect(b'}')?;
                Ok(PhpValue::Array(entries))
            }
            Some(b'O') => {
                self.pos += 1;
                self.expect(b':')?;
                let class = self.parse_string_body()?;
                self.expect(b':')?;
                let count = self.parse_usize(b':')?;
                self.expect(b'{')?;
                let mut props = Vec::with_capacity(count);
                for _ in 0..count {
                    let key = self.parse_key()?;
                    let value = self.parse_value()?;
                    props.push((key, value));
                }
                self.expect(b'}')?;
                Ok(PhpValue::Object { class, props })
            }
            Some(other) => Err(self.err(format!("unexpected token `{}`", other as char))),
            None => Err(self.err("unexpected end of input")),
        }
    }

    /// `<len>:"<len bytes>"` — the body of a string or class name.
    fn parse_string_body(&mut self) -> Result<String> {
        let len = self.parse_usize(b':')?;
        self.expect(b'"')?;
        let start = self.pos;
        let end = start
            .checked_add(len)
            .filter(|&e| e <= self.bytes.len())
            .ok_or_else(|| self.err("string length out of range"))?;
        let s = self
            .text
            .get(start..end)
            .ok_or_else(|| self.err("string length splits a UTF-8 sequence"))?
            .to_string();
        self.pos = end;
        self.expect(b'"')?;
        Ok(s)
    }

    fn parse_key(&mut self) -> Result<PhpKey> {
        let at = self.pos;
        match self.parse_value()? {
            PhpValue::Int(i) => Ok(PhpKey::Int(i)),
            PhpValue::Str(s) => Ok(PhpKey::Str(s)),
            _ => {
                self.pos = at;
                Err(self.err("key must be an integer or string"))
            }
        }
    }
}

/// Apply the option subset meaningful to this family, in the documented
/// order: null-entry removal, bottom-up empty-container pruning, key sort.
pub fn rewrite(value: &mut PhpValue, opts: &SerializedOptions) {
    if !opts.include_null_values {
        drop_null_entries(value);
    }
    if opts.remove_empty_arrays || opts.remove_empty_objects {
        prune_empty(value, opts.remove_empty_objects, opts.remove_empty_arrays);
    }
    if opts.sort_keys {
        sort_entries(value);
    }
}

fn entries_mut(value: &mut PhpValue) -> Option<&mut Vec<(PhpKey, PhpValue)>> {
    match value {
        PhpValue::Array(entries) => Some(entries),
        PhpValue::Object { props, .. } => Some(props),
        _ => None,
    }
}

fn drop_null_entries(value: &mut PhpValue) {
    if let Some(entries) = entries_mut(value) {
        entries.retain(|(_, v)| !matches!(v, PhpValue::Null));
        for (_, v) in entries.iter_mut() {
            drop_null_entries(v);
        }
    }
}

fn is_prunable(v: &PhpValue, objects: bool, arrays: bool) -> bool {
    match v {
        PhpValue::Array(entries) => arrays && entries.is_empty(),
        PhpValue::Object { props, .. } => objects && props.is_empty(),
        _ => false,
    }
}

fn prune_empty(value: &mut PhpValue, objects: bool, arrays: bool) {
    if let Some(entries) = entries_mut(value) {
        for (_, v) in entries.iter_mut() {
            prune_empty(v, objects, arrays);
        }
        entries.retain(|(_, v)| !is_prunable(v, objects, arrays));
    }
}

fn sort_entries(value: &mut PhpValue) {
    if let Some(entries) = entries_mut(value) {
        for (_, v) in entries.iter_mut() {
            sort_entries(v);
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));
    }
}

/// Re-emit in native encoding. Every `s:` length and `a:`/`O:` count is
/// recomputed here from the actual content, never carried over from the
/// input.
pub fn serialize(value: &PhpValue) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &PhpValue, out: &mut String) {
    match value {
        PhpValue::Null => out.push_str("N;"),
        PhpValue::Bool(b) => {
            out.push_str(if *b { "b:1;" } else { "b:0;" });
        }
        PhpValue::Int(i) => {
            out.push_str(&format!("i:{i};"));
        }
        PhpValue::Float(f) => {
            out.push_str(&format!("d:{f};"));
        }
        PhpValue::Str(s) => write_str(s, out),
        PhpValue::Array(entries) => {
            out.push_str(&format!("a:{}:{{", entries.len()));
            for (key, val) in entries {
                write_key(key, out);
                write_value(val, out);
            }
            out.push('}');
        }
        PhpValue::Object { class, props } => {
            out.push_str(&format!("O:{}:\"{}\":{}:{{", class.len(), class, props.len()));
            for (key, val) in props {
                write_key(key, out);
                write_value(val, out);
            }
            out.push('}');
        }
    }
}

fn write_key(key: &PhpKey, out: &mut String) {
    match key {
        PhpKey::Int(i) => out.push_str(&format!("i:{i};")),
        PhpKey::Str(s) => write_str(s, out),
    }
}

fn write_str(s: &str, out: &mut String) {
    out.push_str(&format!("s:{}:\"{}\";", s.len(), s));
}
