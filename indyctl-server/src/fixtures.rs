//! Canned data served by the mock backend

use indyctl_core::{DisableTimeout, DisableTimeoutList, IndyError, Store, StoreKey, StorePage, StoreType, VersionInfo};

const REMOTE: &str = include_str!("../fixtures/remote.json");
const HOSTED: &str = include_str!("../fixtures/hosted.json");
const GROUP: &str = include_str!("../fixtures/group.json");
const DISABLE_TIMEOUTS: &str = include_str!("../fixtures/disable_timeouts.json");
const VERSION_INFO: &str = include_str!("../fixtures/version_info.json");

/// Immutable store data behind the mock API
#[derive(Debug, Clone)]
pub struct Fixtures {
    stores: Vec<Store>,
    timeouts: Vec<DisableTimeout>,
    version: VersionInfo,
}

impl Fixtures {
    /// Parse the fixture files compiled into the binary.
    pub fn load() -> Result<Self, IndyError> {
        let mut stores = Vec::new();
        for (name, raw) in [("remote", REMOTE), ("hosted", HOSTED), ("group", GROUP)] {
            let page: StorePage =
                serde_json::from_str(raw).map_err(|e| IndyError::json(format!("{} fixtures", name), e))?;
            stores.extend(page.items);
        }

        let timeouts: DisableTimeoutList = serde_json::from_str(DISABLE_TIMEOUTS)
            .map_err(|e| IndyError::json("disable timeout fixtures", e))?;
        let version: VersionInfo =
            serde_json::from_str(VERSION_INFO).map_err(|e| IndyError::json("version fixtures", e))?;

        Ok(Self::from_parts(stores, timeouts.items, version))
    }

    pub fn from_parts(stores: Vec<Store>, timeouts: Vec<DisableTimeout>, version: VersionInfo) -> Self {
        Self {
            stores,
            timeouts,
            version,
        }
    }

    pub fn version(&self) -> &VersionInfo {
        &self.version
    }

    /// Distinct package types, sorted.
    pub fn package_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.stores.iter().map(|s| s.package_type.clone()).collect();
        types.sort();
        types.dedup();
        types
    }

    pub fn find(&self, key: &StoreKey) -> Option<&Store> {
        self.stores.iter().find(|s| s.store_key() == *key)
    }

    /// Stores of one type; `None` package type means every package type.
    pub fn list(&self, package_type: Option<&str>, store_type: StoreType) -> Vec<&Store> {
        self.stores
            .iter()
            .filter(|s| s.store_type == store_type)
            .filter(|s| package_type.map_or(true, |pt| s.package_type == pt))
            .collect()
    }

    /// Stores of every type for a package type (or all).
    pub fn endpoints(&self, package_type: Option<&str>) -> Vec<&Store> {
        self.stores
            .iter()
            .filter(|s| package_type.map_or(true, |pt| s.package_type == pt))
            .collect()
    }

    pub fn timeouts(&self) -> &[DisableTimeout] {
        &self.timeouts
    }

    pub fn timeout_for(&self, key: &StoreKey) -> Option<&DisableTimeout> {
        self.timeouts.iter().find(|t| t.matches(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_fixtures_parse() {
        let fixtures = Fixtures::load().unwrap();
        assert_eq!(fixtures.package_types(), vec!["generic-http", "maven", "npm"]);
        assert_eq!(fixtures.list(None, StoreType::Remote).len(), 5);
        assert_eq!(fixtures.list(Some("maven"), StoreType::Group).len(), 2);
    }

    #[test]
    fn finds_store_and_timeout() {
        let fixtures = Fixtures::load().unwrap();
        let key: StoreKey = "maven:remote:jboss".parse().unwrap();
        assert!(fixtures.find(&key).is_some());
        assert_eq!(fixtures.timeout_for(&key).and_then(|t| t.expiration), Some(1_893_456_000_000));

        let missing: StoreKey = "maven:remote:nope".parse().unwrap();
        assert!(fixtures.find(&missing).is_none());
        assert!(fixtures.timeout_for(&missing).is_none());
    }
}
