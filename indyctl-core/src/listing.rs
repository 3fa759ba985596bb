//! Client-side search and sort over an already-fetched store list
//!
//! Both operations return a new vector and never reorder equal elements.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::IndyError;
use crate::store::{Store, StoreKey};

/// Store field a listing can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortProp {
    Key,
    Name,
    PackageType,
    Type,
    Description,
    Disabled,
    DisableTimeout,
}

impl SortProp {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortProp::Key => "key",
            SortProp::Name => "name",
            SortProp::PackageType => "packageType",
            SortProp::Type => "type",
            SortProp::Description => "description",
            SortProp::Disabled => "disabled",
            SortProp::DisableTimeout => "disable_timeout",
        }
    }

    fn compare(&self, a: &Store, b: &Store) -> Ordering {
        match self {
            SortProp::Key => a.key_string().cmp(&b.key_string()),
            SortProp::Name => a.name.cmp(&b.name),
            SortProp::PackageType => a.package_type.cmp(&b.package_type),
            SortProp::Type => a.store_type.cmp(&b.store_type),
            SortProp::Description => a.description.cmp(&b.description),
            SortProp::Disabled => a.disabled.cmp(&b.disabled),
            SortProp::DisableTimeout => a.disable_timeout.cmp(&b.disable_timeout),
        }
    }
}

impl fmt::Display for SortProp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortProp {
    type Err = IndyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "key" => Ok(SortProp::Key),
            "name" => Ok(SortProp::Name),
            "packageType" | "package_type" => Ok(SortProp::PackageType),
            "type" => Ok(SortProp::Type),
            "description" => Ok(SortProp::Description),
            "disabled" => Ok(SortProp::Disabled),
            "disable_timeout" | "disableTimeout" => Ok(SortProp::DisableTimeout),
            other => Err(IndyError::UnknownSortProp {
                value: other.to_string(),
            }),
        }
    }
}

/// Keep stores whose key contains `query`, ignoring case.
pub fn search_by_key(query: &str, stores: &[Store]) -> Vec<Store> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return stores.to_vec();
    }

    stores
        .iter()
        .filter(|store| store.key_string().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Stable ascending sort by a store property.
pub fn sort_by_prop(prop: SortProp, stores: &[Store]) -> Vec<Store> {
    let mut sorted = stores.to_vec();
    sorted.sort_by(|a, b| prop.compare(a, b));
    sorted
}

/// Sort by a property given by name; unknown names keep the current order.
pub fn sort_by_prop_name(prop: &str, stores: &[Store]) -> Vec<Store> {
    match prop.parse::<SortProp>() {
        Ok(prop) => sort_by_prop(prop, stores),
        Err(err) => {
            tracing::debug!("{}, keeping listing order", err);
            stores.to_vec()
        }
    }
}

/// Sort store keys in canonical endpoint order.
pub fn sort_endpoints(keys: &mut [StoreKey]) {
    keys.sort();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(key: &str, description: Option<&str>) -> Store {
        let key: StoreKey = key.parse().unwrap();
        let mut store = Store::new(&key);
        store.description = description.map(str::to_string);
        store
    }

    fn keys(stores: &[Store]) -> Vec<String> {
        stores.iter().map(Store::key_string).collect()
    }

    #[test]
    fn search_ignores_case_and_keeps_order() {
        let stores = vec![
            store("maven:remote:Central", None),
            store("npm:remote:npmjs", None),
            store("maven:hosted:central-staging", None),
        ];

        let found = search_by_key("CENTRAL", &stores);
        assert_eq!(
            keys(&found),
            vec!["maven:remote:Central", "maven:hosted:central-staging"]
        );
    }

    #[test]
    fn empty_search_returns_everything() {
        let stores = vec![store("maven:remote:a", None), store("npm:remote:b", None)];
        assert_eq!(search_by_key("  ", &stores), stores);
    }

    #[test]
    fn sort_is_stable() {
        let stores = vec![
            store("maven:remote:c", Some("same")),
            store("maven:remote:a", Some("other")),
            store("maven:remote:b", Some("same")),
        ];

        let sorted = sort_by_prop(SortProp::Description, &stores);
        assert_eq!(
            keys(&sorted),
            vec!["maven:remote:a", "maven:remote:c", "maven:remote:b"]
        );
    }

    #[test]
    fn sort_is_idempotent() {
        let stores = vec![
            store("npm:remote:b", None),
            store("maven:remote:z", None),
            store("maven:hosted:a", None),
        ];
        let once = sort_by_prop(SortProp::Name, &stores);
        let twice = sort_by_prop(SortProp::Name, &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_prop_keeps_order() {
        let stores = vec![store("npm:remote:b", None), store("maven:remote:a", None)];
        assert_eq!(sort_by_prop_name("colour", &stores), stores);
        assert_eq!(
            keys(&sort_by_prop_name("packageType", &stores)),
            vec!["maven:remote:a", "npm:remote:b"]
        );
    }

    #[test]
    fn endpoints_sort_canonically() {
        let mut endpoints: Vec<StoreKey> = ["npm:hosted:a", "maven:remote:b", "maven:hosted:c"]
            .iter()
            .map(|k| k.parse().unwrap())
            .collect();
        sort_endpoints(&mut endpoints);
        assert_eq!(endpoints[0].to_string(), "maven:hosted:c");
        assert_eq!(endpoints[2].to_string(), "npm:hosted:a");
    }
}
