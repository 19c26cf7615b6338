//! Parser for `.properties` text.
//!
//! Supports `key=value`, `key: value` and `key value` forms, `#` and `!`
//! comment lines, backslash line continuation and the usual escapes
//! (`\t`, `\n`, `\r`, `\f`, `\uXXXX`, and `\` before any other character).

use crate::error::ProviderError;

/// Parse properties text into `(key, value)` pairs in file order.
///
/// Duplicate keys are returned as they appear; later entries win once the
/// pairs are collected into a map.
pub fn parse(text: &str) -> Result<Vec<(String, String)>, ProviderError> {
    let mut entries = Vec::new();
    let mut logical = String::new();
    let mut continuing = false;
    let mut start_line = 0;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim_start_matches([' ', '\t', '\x0c']);

        if !continuing {
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            start_line = idx + 1;
        }

        let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            logical.push_str(&line[..line.len() - 1]);
            continuing = true;
            continue;
        }

        logical.push_str(line);
        continuing = false;
        entries.push(parse_entry(&logical, start_line)?);
        logical.clear();
    }

    if continuing && !logical.is_empty() {
        entries.push(parse_entry(&logical, start_line)?);
    }

    Ok(entries)
}

fn parse_entry(line: &str, line_no: usize) -> Result<(String, String), ProviderError> {
    let chars: Vec<char> = line.chars().collect();
    let mut pos = 0;
    let mut escaped = false;
    let mut separator_seen = false;

    while pos < chars.len() {
        let c = chars[pos];
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' {
            separator_seen = true;
            break;
        } else if is_blank(c) {
            break;
        }
        pos += 1;
    }

    let key_end = pos;
    if pos < chars.len() {
        pos += 1;
    }
    while pos < chars.len() && is_blank(chars[pos]) {
        pos += 1;
    }
    if !separator_seen && pos < chars.len() && (chars[pos] == '=' || chars[pos] == ':') {
        pos += 1;
        while pos < chars.len() && is_blank(chars[pos]) {
            pos += 1;
        }
    }

    let key: String = chars[..key_end].iter().collect();
    let value: String = chars[pos.min(chars.len())..].iter().collect();

    Ok((unescape(&key, line_no)?, unescape(&value, line_no)?))
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

fn unescape(text: &str, line_no: usize) -> Result<String, ProviderError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let code = (hex.len() == 4)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32)
                    .ok_or_else(|| ProviderError::Properties {
                        line: line_no,
                        message: format!("malformed \\uxxxx escape `\\u{}`", hex),
                    })?;
                out.push(code);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}
