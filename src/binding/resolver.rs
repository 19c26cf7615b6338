//! Key resolution: operation metadata to lookup key.

use crate::core::contract::OperationDescriptor;
use crate::provider::DataProvider;

/// Conventional getter prefix stripped from operation names.
const GETTER_PREFIX: &str = "get";

/// Derive a key from an operation name.
///
/// `getServerPort` becomes `serverPort`; every other name, including a
/// bare `get` or `getter`, is returned unchanged.
pub fn derive_key(name: &str) -> String {
    if let Some(rest) = name.strip_prefix(GETTER_PREFIX) {
        let mut chars = rest.chars();
        if let Some(first) = chars.next().filter(|c| c.is_uppercase()) {
            return first.to_lowercase().chain(chars).collect();
        }
    }
    name.to_string()
}

/// All keys an operation may resolve to, most specific first, with the
/// declaring type's prefix applied.
///
/// An explicit key comes first, followed by the aliases. Without an
/// explicit key, the derived key comes first.
pub fn candidates(op: &OperationDescriptor) -> Vec<String> {
    let prefix = op.declaring_type().key_prefix();
    let primary = op
        .key()
        .map(str::to_string)
        .unwrap_or_else(|| derive_key(op.name()));

    std::iter::once(primary)
        .chain(op.aliases().iter().cloned())
        .map(|key| format!("{}{}", prefix, key))
        .collect()
}

/// Resolve the key to look up for `op` in `provider`.
///
/// 1. An explicit key that exists wins.
/// 2. Otherwise the first existing alias, in declaration order.
/// 3. An explicit key that does not exist is still returned, so defaults
///    apply to a deterministic key.
/// 4. Without an explicit key, the derived key is returned.
pub fn resolve(op: &OperationDescriptor, provider: &dyn DataProvider) -> String {
    let prefix = op.declaring_type().key_prefix();
    let prefixed = |key: &str| format!("{}{}", prefix, key);

    let explicit = op.key().map(&prefixed);
    if let Some(key) = &explicit {
        if provider.has(key) {
            return key.clone();
        }
    }

    if let Some(alias) = op
        .aliases()
        .iter()
        .map(|alias| prefixed(alias))
        .find(|alias| provider.has(alias))
    {
        tracing::trace!(operation = op.name(), key = %alias, "resolved through alias");
        return alias;
    }

    explicit.unwrap_or_else(|| prefixed(&derive_key(op.name())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::contract::{ContractDescriptor, OperationDescriptor};
    use crate::core::types::{PrimitiveKind, TargetType};
    use crate::provider::MapProvider;

    fn int() -> TargetType {
        TargetType::primitive(PrimitiveKind::I32)
    }

    fn declared(prefix: Option<&str>, op: OperationDescriptor) -> OperationDescriptor {
        let builder = ContractDescriptor::builder("Settings");
        let builder = match prefix {
            Some(p) => builder.prefix(p),
            None => builder,
        };
        builder.operation(op).build().operations()[0].clone()
    }

    fn provider(keys: &[&str]) -> MapProvider {
        MapProvider::new(keys.iter().map(|k| (*k, "1")))
    }

    #[test]
    fn test_derive_key() {
        assert_eq!(derive_key("getPort"), "port");
        assert_eq!(derive_key("getURL"), "uRL");
        assert_eq!(derive_key("port"), "port");
        assert_eq!(derive_key("get"), "get");
        assert_eq!(derive_key("getter"), "getter");
        assert_eq!(derive_key("get_port"), "get_port");
        assert_eq!(derive_key("getÉtat"), "état");
    }

    #[test]
    fn test_derived_key_with_prefix() {
        let op = declared(Some("server"), OperationDescriptor::new("getPort", int()));
        assert_eq!(resolve(&op, &provider(&[])), "server.port");
    }

    #[test]
    fn test_prefix_from_type_name() {
        let op = ContractDescriptor::builder("Settings")
            .prefix_from_type_name()
            .operation(OperationDescriptor::new("port", int()))
            .build()
            .operations()[0]
            .clone();
        assert_eq!(resolve(&op, &provider(&[])), "Settings.port");
    }

    #[test]
    fn test_explicit_key_that_exists() {
        let op = declared(
            None,
            OperationDescriptor::new("port", int())
                .with_key("http.port")
                .with_aliases(["port"]),
        );
        assert_eq!(resolve(&op, &provider(&["http.port", "port"])), "http.port");
    }

    #[test]
    fn test_alias_order() {
        let op = declared(
            None,
            OperationDescriptor::new("host", TargetType::String).with_aliases(["a", "b"]),
        );
        assert_eq!(resolve(&op, &provider(&["b"])), "b");
        assert_eq!(resolve(&op, &provider(&["a", "b"])), "a");
    }

    #[test]
    fn test_missing_explicit_key_is_still_returned() {
        let op = declared(
            Some("db"),
            OperationDescriptor::new("getUrl", TargetType::String)
                .with_key("jdbc")
                .with_aliases(["url"]),
        );
        assert_eq!(resolve(&op, &provider(&[])), "db.jdbc");
    }

    #[test]
    fn test_aliases_without_explicit_key_fall_back_to_derived() {
        let op = declared(
            None,
            OperationDescriptor::new("getHost", TargetType::String).with_aliases(["hostname"]),
        );
        assert_eq!(resolve(&op, &provider(&[])), "host");
        assert_eq!(resolve(&op, &provider(&["hostname"])), "hostname");
    }

    #[test]
    fn test_candidates_order() {
        let op = declared(
            Some("app."),
            OperationDescriptor::new("name", TargetType::String)
                .with_key("title")
                .with_aliases(["label", "caption"]),
        );
        assert_eq!(
            candidates(&op),
            vec!["app.title", "app.label", "app.caption"]
        );
    }
}
