/// Tokenizer for bracketed markup
use crate::tags::TagSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Quote styles an option or attribute value may be wrapped in. A value may
/// also be bare (no quote at all).
const QUOTES: [&str; 4] = ["\"", "'", "&quot;", "&#039;"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    Text(String),
    Tag(TagToken),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagToken {
    /// The full `[...]` text as it appeared in the input.
    pub raw: String,
    /// Tag name as written (matching is case-insensitive).
    pub name: String,
    pub closing: bool,
    /// The `=value` argument of the open tag, unquoted.
    pub option: Option<String>,
    /// Raw attribute text between the name and the closing bracket,
    /// parsed on demand by [`parse_attributes`].
    pub attributes: String,
}

/// Scan the input left to right and produce the token sequence. Bracket
/// constructs that do not match the tag grammar, and grammatical tags whose
/// name has no configured handler, stay inside the surrounding literal run.
/// The scanner never backtracks across a consumed span, so a swallowed
/// bracket is never reinterpreted later.
pub fn tokenize(input: &str, tags: &TagSet) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut last = 0;
    let mut pos = 0;
    while let Some(offset) = input[pos..].find('[') {
        let start = pos + offset;
        match match_tag(&input[start..]) {
            Some((len, tag)) => {
                pos = start + len;
                if tags.contains(&tag.name) {
                    if start > last {
                        tokens.push(Token::Text(input[last..start].to_string()));
                    }
                    tokens.push(Token::Tag(tag));
                    last = pos;
                }
            }
            // Not a tag at this bracket; try the next one.
            None => pos = start + 1,
        }
    }
    if last < input.len() {
        tokens.push(Token::Text(input[last..].to_string()));
    }
    tokens
}

/// Parse the raw attribute text of a tag into a key/value map. Quoted and
/// bare values follow the same termination rule as the tokenizer. Malformed
/// stretches are skipped; duplicate keys keep the last value. Never fails.
pub fn parse_attributes(raw: &str) -> HashMap<String, String> {
    let mut attributes = HashMap::new();
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        // Every pair starts with whitespace: \s+ key = value.
        if !bytes[i].is_ascii_whitespace() {
            i += 1;
            continue;
        }
        let mut j = i;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        let key_start = j;
        while j < bytes.len() && is_word(bytes[j]) {
            j += 1;
        }
        if j == key_start || bytes.get(j) != Some(&b'=') {
            i += 1;
            continue;
        }
        match scan_value(raw, j + 1) {
            Some(value) => {
                attributes.insert(
                    raw[key_start..j].to_string(),
                    raw[value.start..value.end].to_string(),
                );
                i = value.after;
            }
            None => i += 1,
        }
    }
    attributes
}

fn is_word(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// A scanned option/attribute value: the value span plus the position just
/// past its closing quote (equal to `end` for bare values).
struct Value {
    start: usize,
    end: usize,
    after: usize,
}

/// Try to match a complete tag at the start of `s` (which begins with `[`).
/// Returns the matched byte length and the token. Closing tags may carry
/// neither option nor attributes; such constructs do not match.
fn match_tag(s: &str) -> Option<(usize, TagToken)> {
    let bytes = s.as_bytes();
    let mut i = 1;
    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }
    let name_start = i;
    while i < bytes.len() && is_word(bytes[i]) {
        i += 1;
    }
    if i == name_start {
        return None;
    }
    let name = s[name_start..i].to_string();

    match bytes.get(i) {
        Some(&b']') => Some((
            i + 1,
            TagToken {
                raw: s[..i + 1].to_string(),
                name,
                closing,
                option: None,
                attributes: String::new(),
            },
        )),
        Some(&b'=') if !closing => {
            let value = scan_value(s, i + 1)?;
            // The bracket must follow the option immediately.
            if bytes.get(value.after) != Some(&b']') {
                return None;
            }
            let len = value.after + 1;
            Some((
                len,
                TagToken {
                    raw: s[..len].to_string(),
                    name,
                    closing,
                    option: Some(s[value.start..value.end].to_string()),
                    attributes: String::new(),
                },
            ))
        }
        Some(byte) if byte.is_ascii_whitespace() && !closing => {
            let attrs_start = i;
            let bracket = match_attribute_run(s, i)?;
            Some((
                bracket + 1,
                TagToken {
                    raw: s[..bracket + 1].to_string(),
                    name,
                    closing,
                    option: None,
                    attributes: s[attrs_start..bracket].to_string(),
                },
            ))
        }
        _ => None,
    }
}

/// Match one or more `\s+ key=value` pairs starting at `i`, ending exactly
/// at a `]`. Returns the bracket's index.
fn match_attribute_run(s: &str, mut i: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    loop {
        let ws_start = i;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i == ws_start {
            return None;
        }
        let key_start = i;
        while i < bytes.len() && is_word(bytes[i]) {
            i += 1;
        }
        if i == key_start || bytes.get(i) != Some(&b'=') {
            return None;
        }
        let value = scan_value(s, i + 1)?;
        i = value.after;
        match bytes.get(i) {
            Some(&b']') => return Some(i),
            Some(byte) if byte.is_ascii_whitespace() => {}
            _ => return None,
        }
    }
}

/// Scan a quoted or bare value beginning at `start`. A quoted value ends at
/// the first matching quote followed by whitespace, `]`, or end of input; a
/// bare value ends immediately before any of those. Values never span a
/// newline.
fn scan_value(s: &str, start: usize) -> Option<Value> {
    let bytes = s.as_bytes();
    let quote = QUOTES
        .iter()
        .find(|q| bytes[start..].starts_with(q.as_bytes()))
        .copied()
        .unwrap_or("");
    let vstart = start + quote.len();
    let mut j = vstart;
    if quote.is_empty() {
        while j < bytes.len() && bytes[j] != b']' && !bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        return Some(Value {
            start: vstart,
            end: j,
            after: j,
        });
    }
    while j < bytes.len() {
        if bytes[j] == b'\n' {
            return None;
        }
        if bytes[j..].starts_with(quote.as_bytes()) {
            let after = j + quote.len();
            let terminated = match bytes.get(after) {
                None => true,
                Some(&byte) => byte == b']' || byte.is_ascii_whitespace(),
            };
            if terminated {
                return Some(Value {
                    start: vstart,
                    end: j,
                    after,
                });
            }
        }
        j += 1;
    }
    None
}
