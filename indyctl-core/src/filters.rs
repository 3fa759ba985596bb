//! Small display helpers for store detail views

use crate::store::Store;

pub fn checkmark(value: bool) -> &'static str {
    if value {
        "✓"
    } else {
        "✗"
    }
}

/// Capability lines for a store, empty when neither flag is set.
pub fn capabilities(store: &Store) -> Vec<String> {
    let releases = store.allow_releases.unwrap_or(false);
    let snapshots = store.allow_snapshots.unwrap_or(false);

    if !releases && !snapshots {
        return Vec::new();
    }

    vec![
        format!("{} Allow Releases", checkmark(releases)),
        format!("{} Snapshots Allowed?", checkmark(snapshots)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreKey;

    #[test]
    fn hides_capabilities_when_unset() {
        let key: StoreKey = "maven:hosted:local".parse().unwrap();
        let mut store = Store::new(&key);
        assert!(capabilities(&store).is_empty());

        store.allow_snapshots = Some(true);
        assert_eq!(
            capabilities(&store),
            vec!["✗ Allow Releases", "✓ Snapshots Allowed?"]
        );
    }
}
