use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A username or hashtag name as read from the screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<&str> for Identity {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One item-row observed in the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Item(Identity),
    /// The end-of-list marker ("Suggestions for you" and friends).
    Sentinel,
}

impl Row {
    pub fn item(value: impl Into<String>) -> Self {
        Row::Item(Identity::new(value))
    }
}

/// Identities in first-seen order. Inserting a value already present is a no-op,
/// so the set never holds duplicates, not even transiently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    order: Vec<Identity>,
    seen: HashSet<Identity>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the identity was new.
    pub fn insert(&mut self, identity: Identity) -> bool {
        if self.seen.contains(&identity) {
            return false;
        }
        self.seen.insert(identity.clone());
        self.order.push(identity);
        true
    }

    /// Inserts every identity of `batch`, returning how many were new.
    pub fn extend<I>(&mut self, batch: I) -> usize
    where
        I: IntoIterator<Item = Identity>,
    {
        batch
            .into_iter()
            .map(|identity| usize::from(self.insert(identity)))
            .sum()
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.seen.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn last(&self) -> Option<&Identity> {
        self.order.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Identity> {
        self.order.iter()
    }

    pub fn as_slice(&self) -> &[Identity] {
        &self.order
    }

    /// Keeps the first `len` identities.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.order.len() {
            return;
        }
        for dropped in self.order.drain(len..) {
            self.seen.remove(&dropped);
        }
    }

    pub fn into_vec(self) -> Vec<Identity> {
        self.order
    }
}

impl FromIterator<Identity> for ResultSet {
    fn from_iter<T: IntoIterator<Item = Identity>>(iter: T) -> Self {
        let mut set = ResultSet::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Identity;
    type IntoIter = std::slice::Iter<'a, Identity>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = Identity;
    type IntoIter = std::vec::IntoIter<Identity>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.into_iter()
    }
}
