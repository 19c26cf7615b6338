//! Positional templating for text values.
//!
//! `{n}` is replaced by the text of argument `n`. A format type after the
//! index (`{0,number}`) is accepted and ignored. Text between single quotes
//! is literal, and `''` produces one quote. Placeholders whose index has no
//! argument are kept as written.

use thiserror::Error;

use crate::core::value::Value;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unmatched brace at offset {0}")]
    UnmatchedBrace(usize),

    #[error("invalid argument index `{0}`")]
    InvalidIndex(String),
}

/// Substitute `args` into `pattern`.
pub fn format(pattern: &str, args: &[Value]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.char_indices().peekable();
    let mut quoted = false;

    while let Some((offset, c)) = chars.next() {
        match c {
            '\'' => {
                if chars.peek().map(|(_, next)| *next) == Some('\'') {
                    chars.next();
                    out.push('\'');
                } else {
                    quoted = !quoted;
                }
            }
            _ if quoted => out.push(c),
            '{' => {
                let mut body = String::new();
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                    body.push(inner);
                }
                if !closed {
                    return Err(TemplateError::UnmatchedBrace(offset));
                }
                out.push_str(&substitute(&body, args)?);
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

fn substitute(body: &str, args: &[Value]) -> Result<String, TemplateError> {
    let index_text = body.split(',').next().unwrap_or("").trim();
    let index: usize = index_text
        .parse()
        .map_err(|_| TemplateError::InvalidIndex(index_text.to_string()))?;

    Ok(match args.get(index) {
        Some(arg) => arg.to_text(),
        None => format!("{{{}}}", body),
    })
}
