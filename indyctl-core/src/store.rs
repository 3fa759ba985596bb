//! Store model shared by the client, the mock backend and the CLI
//!
//! A store is addressed by the composite key `packageType:type:name`.
//! Fields the console does not interpret are kept in `extra` so an
//! edit round-trips them back to the server untouched.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::IndyError;

/// Kind of store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    // Declared alphabetically so derived Ord matches string order.
    Group,
    Hosted,
    Remote,
}

impl StoreType {
    pub const ALL: [StoreType; 3] = [StoreType::Remote, StoreType::Hosted, StoreType::Group];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreType::Group => "group",
            StoreType::Hosted => "hosted",
            StoreType::Remote => "remote",
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreType {
    type Err = IndyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "group" => Ok(StoreType::Group),
            "hosted" => Ok(StoreType::Hosted),
            "remote" => Ok(StoreType::Remote),
            other => Err(IndyError::UnknownStoreType {
                value: other.to_string(),
            }),
        }
    }
}

/// Composite store key `packageType:type:name`.
///
/// Ordering is the canonical endpoint order: package type, then type,
/// then name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey {
    package_type: String,
    store_type: StoreType,
    name: String,
}

impl StoreKey {
    pub fn new(package_type: impl Into<String>, store_type: StoreType, name: impl Into<String>) -> Self {
        Self {
            package_type: package_type.into(),
            store_type,
            name: name.into(),
        }
    }

    pub fn package_type(&self) -> &str {
        &self.package_type
    }

    pub fn store_type(&self) -> StoreType {
        self.store_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Ord for StoreKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.package_type
            .cmp(&other.package_type)
            .then(self.store_type.cmp(&other.store_type))
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for StoreKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.package_type, self.store_type, self.name)
    }
}

impl FromStr for StoreKey {
    type Err = IndyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(3, ':').collect();
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(IndyError::invalid_key(
                s,
                "expected packageType:type:name with non-empty parts",
            ));
        }

        let store_type = parts[1]
            .parse::<StoreType>()
            .map_err(|_| IndyError::invalid_key(s, format!("unknown store type '{}'", parts[1])))?;

        Ok(Self::new(parts[0], store_type, parts[2]))
    }
}

impl Serialize for StoreKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StoreKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A configured repository endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    #[serde(rename = "packageType")]
    pub package_type: String,

    #[serde(rename = "type")]
    pub store_type: StoreType,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub disabled: bool,

    /// Seconds; 0 or absent means the server default, negative means never
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_timeout: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_releases: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_snapshots: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepend_constituent: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constituents: Option<Vec<StoreKey>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Store {
    /// Create an empty store with only its identity set
    pub fn new(key: &StoreKey) -> Self {
        Self {
            package_type: key.package_type().to_string(),
            store_type: key.store_type(),
            name: key.name().to_string(),
            key: Some(key.to_string()),
            description: None,
            disabled: false,
            disable_timeout: None,
            allow_releases: None,
            allow_snapshots: None,
            prepend_constituent: None,
            constituents: match key.store_type() {
                StoreType::Group => Some(Vec::new()),
                _ => None,
            },
            url: None,
            extra: Map::new(),
        }
    }

    /// Key derived from the identity fields.
    pub fn store_key(&self) -> StoreKey {
        StoreKey::new(self.package_type.clone(), self.store_type, self.name.clone())
    }

    /// Key string as used for search and display.
    pub fn key_string(&self) -> String {
        self.key
            .clone()
            .unwrap_or_else(|| self.store_key().to_string())
    }

    pub fn is_group(&self) -> bool {
        self.store_type == StoreType::Group
    }

    pub fn constituents(&self) -> &[StoreKey] {
        self.constituents.as_deref().unwrap_or(&[])
    }
}

/// One page of a store listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorePage {
    #[serde(default)]
    pub items: Vec<Store>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
}

/// Scheduled re-enablement of a disabled store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisableTimeout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Schedule group, e.g. `maven:remote:central#Disable-Timeout`
    pub group: String,

    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DisableTimeout {
    /// Store key the schedule belongs to, if the group names one.
    pub fn store_key(&self) -> Option<StoreKey> {
        let raw = self.group.split('#').next().unwrap_or(&self.group);
        raw.parse().ok()
    }

    pub fn matches(&self, key: &StoreKey) -> bool {
        self.group.contains(&key.to_string())
    }
}

/// Response of the all-timeouts endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisableTimeoutList {
    #[serde(default)]
    pub items: Vec<DisableTimeout>,
}

/// Server build information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    #[serde(rename = "commitId")]
    pub commit_id: String,
    pub builder: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_and_displays_key() {
        let key: StoreKey = "maven:remote:central".parse().unwrap();
        assert_eq!(key.package_type(), "maven");
        assert_eq!(key.store_type(), StoreType::Remote);
        assert_eq!(key.name(), "central");
        assert_eq!(key.to_string(), "maven:remote:central");
    }

    #[test]
    fn name_may_contain_colons() {
        let key: StoreKey = "generic-http:remote:host:8080".parse().unwrap();
        assert_eq!(key.name(), "host:8080");
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!("maven:remote".parse::<StoreKey>().is_err());
        assert!("maven::central".parse::<StoreKey>().is_err());
        assert!("maven:proxy:central".parse::<StoreKey>().is_err());
    }

    #[test]
    fn canonical_order_is_package_type_type_name() {
        let mut keys: Vec<StoreKey> = [
            "npm:group:a",
            "maven:remote:a",
            "maven:hosted:z",
            "maven:group:b",
            "maven:group:a",
        ]
        .iter()
        .map(|k| k.parse().unwrap())
        .collect();
        keys.sort();

        let rendered: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "maven:group:a",
                "maven:group:b",
                "maven:hosted:z",
                "maven:remote:a",
                "npm:group:a",
            ]
        );
    }

    #[test]
    fn store_round_trips_unknown_fields() {
        let raw = json!({
            "packageType": "maven",
            "type": "group",
            "name": "public",
            "key": "maven:group:public",
            "constituents": ["maven:remote:central", "maven:hosted:local"],
            "path_style": "plain",
            "authoritative_index": false
        });

        let store: Store = serde_json::from_value(raw.clone()).unwrap();
        assert!(store.is_group());
        assert!(!store.disabled);
        assert_eq!(store.constituents().len(), 2);
        assert_eq!(store.extra.get("path_style"), Some(&json!("plain")));

        let back = serde_json::to_value(&store).unwrap();
        assert_eq!(back["path_style"], json!("plain"));
        assert_eq!(back["constituents"][0], json!("maven:remote:central"));
    }

    #[test]
    fn timeout_resolves_store_key() {
        let timeout = DisableTimeout {
            name: Some("Disable-Timeout".into()),
            group: "maven:remote:central#Disable-Timeout".into(),
            expiration: Some(1_700_000_000_000),
            extra: Map::new(),
        };
        let key: StoreKey = "maven:remote:central".parse().unwrap();
        assert_eq!(timeout.store_key(), Some(key.clone()));
        assert!(timeout.matches(&key));
    }

    #[test]
    fn page_without_cursor() {
        let page: StorePage = serde_json::from_value(json!({"items": []})).unwrap();
        assert!(page.next_page.is_none());
    }
}
