//! Property tests for the variable store and placeholder resolution.

use api_harness::config::HostConfig;
use api_harness::response::{classify_parts, BodyShape};
use api_harness::variables::{resolve_url, VariableStore};
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,12}"
}

proptest! {
    #[test]
    fn set_then_get_returns_last_value(key in name(), first in any::<i64>(), second in ".*") {
        let mut store = VariableStore::new();
        store.set(key.clone(), first);
        store.set(key.clone(), second.clone());

        prop_assert_eq!(store.get(&key).and_then(|v| v.as_str()), Some(second.as_str()));
        prop_assert_eq!(store.len(), 1);
    }

    #[test]
    fn urls_without_placeholders_are_unchanged(url in "[a-zA-Z0-9:/?&=._-]{0,64}") {
        let mut store = VariableStore::new();
        store.set("x", "y");
        prop_assert_eq!(resolve_url(&url, &HostConfig::new(), &store), url);
    }

    #[test]
    fn unknown_placeholders_are_left_verbatim(var in name(), path in "[a-z/]{0,16}") {
        let url = format!("http://h/${{{}}}{}", var, path);
        prop_assert_eq!(resolve_url(&url, &HostConfig::new(), &VariableStore::new()), url);
    }

    #[test]
    fn every_occurrence_is_replaced(var in name(), value in "[a-z0-9]{0,8}", count in 1usize..5) {
        let mut store = VariableStore::new();
        store.set(var.clone(), value.clone());

        let url = format!("${{{}}}/", var).repeat(count);
        prop_assert_eq!(
            resolve_url(&url, &HostConfig::new(), &store),
            format!("{}/", value).repeat(count)
        );
    }

    #[test]
    fn host_config_takes_precedence(var in name(), host in "[a-z]{1,8}", stored in "[A-Z]{1,8}") {
        let mut hosts = HostConfig::new();
        hosts.insert(var.clone(), host.clone());
        let mut store = VariableStore::new();
        store.set(var.clone(), stored);

        prop_assert_eq!(resolve_url(&format!("${{{}}}", var), &hosts, &store), host);
    }

    #[test]
    fn missing_content_type_is_always_status_only(status in 100u16..600, body in proptest::collection::vec(any::<u8>(), 0..64)) {
        prop_assert_eq!(classify_parts(None, status, &body).shape(), BodyShape::Status);
    }
}
