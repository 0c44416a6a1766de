//! Group keys and key-ordered group tables
//!
//! A [`GroupTable`] holds one row per distinct [`GroupKey`]. Rows are kept
//! in key order, so two tables built from the same studies in a different
//! order compare equal. Joins between tables, and between a per-study table
//! and a group table, are explicit key lookups.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Ordered tuple of grouping values (e.g. species and structure)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey(Vec<String>);

impl GroupKey {
    /// Create a key from its parts, in key-column order
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// The key values in key-column order
    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Number of key columns
    pub fn width(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

impl<S: Into<String>> FromIterator<S> for GroupKey {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// A table with exactly one row per group, ordered by key
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTable<T> {
    rows: BTreeMap<GroupKey, T>,
}

impl<T> Default for GroupTable<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<T> GroupTable<T> {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Group rows by the key returned from `key_of` and fold each group
    /// into an accumulator. Input order and contiguity do not matter.
    pub fn fold_rows<R, K, F>(rows: impl IntoIterator<Item = R>, key_of: K, mut fold: F) -> Self
    where
        T: Default,
        K: Fn(&R) -> &GroupKey,
        F: FnMut(&mut T, &R),
    {
        let mut table = Self::new();
        for row in rows {
            let acc = table.rows.entry(key_of(&row).clone()).or_default();
            fold(acc, &row);
        }
        table
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: &GroupKey) -> Option<&T> {
        self.rows.get(key)
    }

    /// Row for `key`, or [`Error::MissingGroup`] naming this table.
    ///
    /// This is the explicit per-study join: every study must find its group.
    pub fn lookup(&self, key: &GroupKey, table: &'static str) -> Result<&T> {
        self.rows
            .get(key)
            .ok_or_else(|| Error::MissingGroup(key.clone(), table))
    }

    pub fn iter(&self) -> btree_map::Iter<'_, GroupKey, T> {
        self.rows.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, GroupKey, T> {
        self.rows.keys()
    }

    pub fn values(&self) -> btree_map::Values<'_, GroupKey, T> {
        self.rows.values()
    }

    /// Replace every row with `f(key, row)`
    pub fn map<U, F>(self, mut f: F) -> GroupTable<U>
    where
        F: FnMut(&GroupKey, T) -> U,
    {
        GroupTable {
            rows: self
                .rows
                .into_iter()
                .map(|(key, row)| {
                    let mapped = f(&key, row);
                    (key, mapped)
                })
                .collect(),
        }
    }

    /// Key join with `other`, combining matching rows through `f`.
    ///
    /// Every group of `self` must be present in `other`; groups that only
    /// exist in `other` are not carried over.
    pub fn join<U, V, F>(
        &self,
        other: &GroupTable<U>,
        other_name: &'static str,
        mut f: F,
    ) -> Result<GroupTable<V>>
    where
        F: FnMut(&GroupKey, &T, &U) -> V,
    {
        let mut rows = BTreeMap::new();
        for (key, left) in &self.rows {
            let right = other.lookup(key, other_name)?;
            rows.insert(key.clone(), f(key, left, right));
        }
        Ok(GroupTable { rows })
    }
}

impl<T> FromIterator<(GroupKey, T)> for GroupTable<T> {
    fn from_iter<I: IntoIterator<Item = (GroupKey, T)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for GroupTable<T> {
    type Item = (GroupKey, T);
    type IntoIter = btree_map::IntoIter<GroupKey, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a GroupTable<T> {
    type Item = (&'a GroupKey, &'a T);
    type IntoIter = btree_map::Iter<'a, GroupKey, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
