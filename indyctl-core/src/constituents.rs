//! Group constituent editor
//!
//! Holds the ordered constituents of one group (index 0 is the highest
//! resolution priority) and the set of stores that could still be added.
//! Every operation takes `&self` and returns a fresh editor, so a caller
//! either sees the whole transition or none of it.
//!
//! Invariants held by every value of [`ConstituentEditor`]:
//! - constituents has no duplicates
//! - constituents and available are disjoint
//! - the group's own key is in neither
//! - available is sorted in canonical endpoint order

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::listing::sort_endpoints;
use crate::store::{Store, StoreKey, StoreType};

/// Rejected editor operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("{key} is not available to add")]
    NotAvailable { key: StoreKey },

    #[error("{key} is not a constituent of this group")]
    NotAConstituent { key: StoreKey },

    #[error("invalid edit operation '{input}': {reason}")]
    InvalidOp { input: String, reason: String },
}

/// What an accepted operation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    /// The key was already at the requested end of the list
    AtBoundary,
}

/// A single editor operation, parsed from `op:packageType:type:name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    Add(StoreKey),
    Remove(StoreKey),
    Promote(StoreKey),
    Demote(StoreKey),
    Top(StoreKey),
    Bottom(StoreKey),
}

impl EditOp {
    pub fn key(&self) -> &StoreKey {
        match self {
            EditOp::Add(k)
            | EditOp::Remove(k)
            | EditOp::Promote(k)
            | EditOp::Demote(k)
            | EditOp::Top(k)
            | EditOp::Bottom(k) => k,
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            EditOp::Add(_) => "add",
            EditOp::Remove(_) => "remove",
            EditOp::Promote(_) => "promote",
            EditOp::Demote(_) => "demote",
            EditOp::Top(_) => "top",
            EditOp::Bottom(_) => "bottom",
        }
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.verb(), self.key())
    }
}

impl FromStr for EditOp {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| EditError::InvalidOp {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (verb, rest) = s.split_once(':').ok_or_else(|| invalid("expected op:key"))?;
        let key: StoreKey = rest.parse().map_err(|_| invalid("malformed store key"))?;

        match verb {
            "add" => Ok(EditOp::Add(key)),
            "remove" => Ok(EditOp::Remove(key)),
            "promote" => Ok(EditOp::Promote(key)),
            "demote" => Ok(EditOp::Demote(key)),
            "top" => Ok(EditOp::Top(key)),
            "bottom" => Ok(EditOp::Bottom(key)),
            _ => Err(invalid("unknown operation")),
        }
    }
}

/// Editing state for one group's constituents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstituentEditor {
    group: StoreKey,
    prepend_constituent: bool,
    constituents: Vec<StoreKey>,
    available: Vec<StoreKey>,
}

impl ConstituentEditor {
    /// Build an editor from the current constituents and every known store.
    ///
    /// Duplicate constituents keep their first position. Candidates that
    /// are already constituents, or are the group itself, are dropped.
    pub fn new(
        group: StoreKey,
        constituents: impl IntoIterator<Item = StoreKey>,
        candidates: impl IntoIterator<Item = StoreKey>,
    ) -> Self {
        let mut current: Vec<StoreKey> = Vec::new();
        for key in constituents {
            if key != group && !current.contains(&key) {
                current.push(key);
            }
        }

        let mut available: Vec<StoreKey> = candidates
            .into_iter()
            .filter(|key| *key != group && !current.contains(key))
            .collect();
        sort_endpoints(&mut available);
        available.dedup();

        Self {
            group,
            prepend_constituent: false,
            constituents: current,
            available,
        }
    }

    /// Build an editor for an existing group store.
    pub fn from_store(store: &Store, candidates: impl IntoIterator<Item = StoreKey>) -> Self {
        let mut editor = Self::new(
            store.store_key(),
            store.constituents().iter().cloned(),
            candidates,
        );
        editor.prepend_constituent = store.prepend_constituent.unwrap_or(false);
        editor
    }

    pub fn group(&self) -> &StoreKey {
        &self.group
    }

    pub fn package_type(&self) -> &str {
        self.group.package_type()
    }

    pub fn prepend_constituent(&self) -> bool {
        self.prepend_constituent
    }

    pub fn constituents(&self) -> &[StoreKey] {
        &self.constituents
    }

    pub fn available(&self) -> &[StoreKey] {
        &self.available
    }

    /// Available stores whose key starts with the group's package type.
    pub fn visible_available(&self) -> Vec<&StoreKey> {
        self.available
            .iter()
            .filter(|key| self.offers(key))
            .collect()
    }

    /// Only stores of the group's own package type may be added.
    fn offers(&self, key: &StoreKey) -> bool {
        let package_type = self.package_type();
        !package_type.is_empty() && key.to_string().starts_with(package_type)
    }

    pub fn with_prepend_constituent(&self, prepend: bool) -> Self {
        let mut next = self.clone();
        next.prepend_constituent = prepend;
        next
    }

    /// Append a visible available store to the end of the constituents.
    pub fn add(&self, key: &StoreKey) -> Result<(Self, Outcome), EditError> {
        let idx = self
            .available
            .iter()
            .position(|k| k == key)
            .filter(|_| self.offers(key))
            .ok_or_else(|| EditError::NotAvailable { key: key.clone() })?;

        let mut next = self.clone();
        let moved = next.available.remove(idx);
        next.constituents.push(moved);
        Ok((next, Outcome::Changed))
    }

    /// Drop a constituent and return it to the available list.
    pub fn remove(&self, key: &StoreKey) -> Result<(Self, Outcome), EditError> {
        let idx = self.index_of(key)?;

        let mut next = self.clone();
        let moved = next.constituents.remove(idx);
        next.available.push(moved);
        sort_endpoints(&mut next.available);
        Ok((next, Outcome::Changed))
    }

    /// Swap a constituent with its predecessor.
    pub fn promote(&self, key: &StoreKey) -> Result<(Self, Outcome), EditError> {
        let idx = self.index_of(key)?;
        if idx == 0 {
            return Ok((self.clone(), Outcome::AtBoundary));
        }
        Ok((self.moved(idx, idx - 1), Outcome::Changed))
    }

    /// Swap a constituent with its successor.
    pub fn demote(&self, key: &StoreKey) -> Result<(Self, Outcome), EditError> {
        let idx = self.index_of(key)?;
        if idx + 1 >= self.constituents.len() {
            return Ok((self.clone(), Outcome::AtBoundary));
        }
        Ok((self.moved(idx, idx + 1), Outcome::Changed))
    }

    /// Move a constituent to the highest priority.
    pub fn top(&self, key: &StoreKey) -> Result<(Self, Outcome), EditError> {
        let idx = self.index_of(key)?;
        if idx == 0 {
            return Ok((self.clone(), Outcome::AtBoundary));
        }
        Ok((self.moved(idx, 0), Outcome::Changed))
    }

    /// Move a constituent to the lowest priority.
    pub fn bottom(&self, key: &StoreKey) -> Result<(Self, Outcome), EditError> {
        let idx = self.index_of(key)?;
        let last = self.constituents.len() - 1;
        if idx == last {
            return Ok((self.clone(), Outcome::AtBoundary));
        }
        Ok((self.moved(idx, last), Outcome::Changed))
    }

    pub fn apply(&self, op: &EditOp) -> Result<(Self, Outcome), EditError> {
        match op {
            EditOp::Add(key) => self.add(key),
            EditOp::Remove(key) => self.remove(key),
            EditOp::Promote(key) => self.promote(key),
            EditOp::Demote(key) => self.demote(key),
            EditOp::Top(key) => self.top(key),
            EditOp::Bottom(key) => self.bottom(key),
        }
    }

    /// Switch a new group to another package type.
    ///
    /// Constituents belong to the old package type, so they go back to
    /// the available list.
    pub fn change_package_type(&self, package_type: &str) -> Self {
        let group = StoreKey::new(package_type, StoreType::Group, self.group.name());

        let mut available: Vec<StoreKey> = self
            .available
            .iter()
            .chain(self.constituents.iter())
            .filter(|key| **key != group)
            .cloned()
            .collect();
        sort_endpoints(&mut available);
        available.dedup();

        Self {
            group,
            prepend_constituent: self.prepend_constituent,
            constituents: Vec::new(),
            available,
        }
    }

    /// Write the edited constituents back onto a store for submission.
    pub fn apply_to(&self, store: &mut Store) {
        store.constituents = Some(self.constituents.clone());
        store.prepend_constituent = Some(self.prepend_constituent);
    }

    fn index_of(&self, key: &StoreKey) -> Result<usize, EditError> {
        self.constituents
            .iter()
            .position(|k| k == key)
            .ok_or_else(|| EditError::NotAConstituent { key: key.clone() })
    }

    fn moved(&self, from: usize, to: usize) -> Self {
        let mut next = self.clone();
        let item = next.constituents.remove(from);
        next.constituents.insert(to, item);
        next
    }
}
