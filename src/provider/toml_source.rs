//! Flattening of TOML documents into dotted keys.

use toml::Table;

use crate::core::value::Value;
use crate::error::ProviderError;

/// Parse `text` and flatten it.
pub fn flatten_str(text: &str) -> Result<Vec<(String, Value)>, ProviderError> {
    let table: Table = text.parse()?;
    Ok(flatten(&table))
}

/// Flatten a table: nested tables become dotted keys, scalars keep their
/// type, arrays become comma-joined text.
pub fn flatten(table: &Table) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    flatten_into(table, "", &mut out);
    out
}

fn flatten_into(table: &Table, prefix: &str, out: &mut Vec<(String, Value)>) {
    for (key, value) in table {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            toml::Value::Table(inner) => flatten_into(inner, &full, out),
            other => out.push((full, scalar(other))),
        }
    }
}

fn scalar(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::Text(s.clone()),
        toml::Value::Integer(i) => Value::I64(*i),
        toml::Value::Float(f) => Value::F64(*f),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Datetime(dt) => Value::Text(dt.to_string()),
        toml::Value::Array(items) => Value::Text(
            items
                .iter()
                .map(|item| match item {
                    toml::Value::String(s) => s.clone(),
                    other => scalar(other).to_text(),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        toml::Value::Table(t) => Value::Text(t.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_nested_tables() {
        let entries = flatten_str(
            r#"
title = "demo"

[server]
port = 8080
ratio = 0.5

[server.tls]
enabled = true
"#,
        )
        .unwrap();

        let get = |k: &str| entries.iter().find(|(key, _)| key == k).map(|(_, v)| v.clone());
        assert_eq!(get("title"), Some(Value::from("demo")));
        assert_eq!(get("server.port"), Some(Value::I64(8080)));
        assert_eq!(get("server.ratio"), Some(Value::F64(0.5)));
        assert_eq!(get("server.tls.enabled"), Some(Value::Bool(true)));
    }

    #[test]
    fn test_arrays_become_comma_joined_text() {
        let entries = flatten_str("hosts = [\"a\", \"b\"]\nports = [1, 2]\n").unwrap();
        let get = |k: &str| entries.iter().find(|(key, _)| key == k).map(|(_, v)| v.clone());
        assert_eq!(get("hosts"), Some(Value::from("a,b")));
        assert_eq!(get("ports"), Some(Value::from("1,2")));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            flatten_str("not = [valid"),
            Err(ProviderError::Toml(_))
        ));
    }
}
