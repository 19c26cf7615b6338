//! Live provider over the process environment.

use std::ffi::OsString;

use crate::core::value::Value;
use crate::provider::{check_key, DataProvider};

/// Reads environment variables at call time. Changes made to the
/// environment after construction are visible.
///
/// By default a key is used verbatim as the variable name. With
/// [`EnvironmentProvider::with_prefix`], keys are mapped to conventional
/// variable names: `server.port` under prefix `APP` reads `APP_SERVER_PORT`.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentProvider {
    prefix: Option<String>,
}

impl EnvironmentProvider {
    pub fn new() -> Self {
        EnvironmentProvider { prefix: None }
    }

    /// Map keys to upper-case, underscore-separated names under `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        EnvironmentProvider {
            prefix: Some(prefix.into()),
        }
    }

    /// The environment variable name a key is read from.
    pub fn variable_name(&self, key: &str) -> String {
        match &self.prefix {
            None => key.to_string(),
            Some(prefix) => {
                let mapped: String = key
                    .chars()
                    .map(|c| match c {
                        '.' | '-' => '_',
                        c => c.to_ascii_uppercase(),
                    })
                    .collect();
                if prefix.is_empty() {
                    mapped
                } else {
                    format!("{}_{}", prefix.to_ascii_uppercase(), mapped)
                }
            }
        }
    }

    fn lookup(&self, key: &str) -> Option<OsString> {
        check_key(key);
        let name = self.variable_name(key);
        // Names the platform cannot represent are simply absent.
        if name.is_empty() || name.contains(['=', '\0']) {
            return None;
        }
        std::env::var_os(name)
    }
}

impl DataProvider for EnvironmentProvider {
    fn has(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    fn raw_value(&self, key: &str) -> Option<Value> {
        self.lookup(key)
            .map(|v| Value::Text(v.to_string_lossy().into_owned()))
    }

    fn name(&self) -> &str {
        "environment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_name_mapping() {
        let verbatim = EnvironmentProvider::new();
        assert_eq!(verbatim.variable_name("server.port"), "server.port");

        let mapped = EnvironmentProvider::with_prefix("app");
        assert_eq!(mapped.variable_name("server.port"), "APP_SERVER_PORT");
        assert_eq!(mapped.variable_name("max-conn"), "APP_MAX_CONN");
    }

    #[test]
    fn test_reads_live_environment() {
        let provider = EnvironmentProvider::new();
        let name = "PROPBIND_TEST_ENV_LIVE";
        assert!(!provider.has(name));

        std::env::set_var(name, "on");
        assert!(provider.has(name));
        assert_eq!(provider.raw_value(name), Some(Value::from("on")));

        std::env::remove_var(name);
        assert!(!provider.has(name));
    }

    #[test]
    fn test_unrepresentable_names_are_absent() {
        let provider = EnvironmentProvider::new();
        assert!(!provider.has("a=b"));
        assert_eq!(provider.raw_value("nul\0"), None);
    }
}
