//! Lookup caches over the store.
//!
//! A [`LookupCache`] fronts one kind of store query for the duration of a
//! run. A cache is either *full* (eagerly populated by a scan; the store is
//! never queried again) or *lazy* (populated one key at a time, memoizing
//! misses as well as hits). Writes performed during the run are pushed into
//! the caches immediately, so later records in the same input observe them.

use std::collections::HashMap;

use crate::store;

pub mod run;

pub use run::RunCaches;

/// How a [`LookupCache`] is populated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// The cache was populated up front by a full scan; absence of a key
    /// means the entity does not exist.
    Full,

    /// The cache is populated on demand; absence of a key means the store
    /// has not been asked yet.
    Lazy,
}

/// A case-insensitive lookup cache.
///
/// Keys are canonicalized (trimmed and uppercased) on every access, so
/// `EPD0059_1_A05` and `epd0059_1_a05 ` address the same entry.
#[derive(Clone, Debug)]
pub struct LookupCache<V> {
    /// The population mode.
    mode: Mode,

    /// The entries. `None` records a memoized miss.
    entries: HashMap<String, Option<V>>,
}

impl<V> LookupCache<V> {
    /// Creates an empty cache in [`Mode::Full`].
    pub fn full() -> Self {
        Self {
            mode: Mode::Full,
            entries: HashMap::new(),
        }
    }

    /// Creates an empty cache in [`Mode::Lazy`].
    pub fn lazy() -> Self {
        Self {
            mode: Mode::Lazy,
            entries: HashMap::new(),
        }
    }

    /// Gets the population mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Inserts a value, replacing any memoized miss for the key.
    pub fn put(&mut self, key: &str, value: V) {
        self.entries.insert(canonical(key), Some(value));
    }

    /// Gets the cached value for a key, if one is present.
    ///
    /// Memoized misses and unseen keys both return `None`; use
    /// [`get_or_query`](Self::get_or_query) when the distinction matters.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(&canonical(key)).and_then(|v| v.as_ref())
    }

    /// Gets a mutable reference to the cached value for a key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .get_mut(&canonical(key))
            .and_then(|v| v.as_mut())
    }

    /// Gets the value for a key, consulting the store at most once.
    ///
    /// In [`Mode::Full`], the store is never consulted: the scan already
    /// saw everything, so an absent key is a definitive miss. In
    /// [`Mode::Lazy`], an unseen key runs `query` and memoizes its result,
    /// including a miss, so the store is asked once per distinct key.
    pub fn get_or_query(
        &mut self,
        key: &str,
        query: impl FnOnce() -> store::Result<Option<V>>,
    ) -> store::Result<Option<&V>> {
        let key = canonical(key);

        if self.mode == Mode::Lazy && !self.entries.contains_key(&key) {
            let value = query()?;
            self.entries.insert(key.clone(), value);
        }

        Ok(self.entries.get(&key).and_then(|v| v.as_ref()))
    }

    /// Iterates over the canonical keys that currently hold a value.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, v)| v.is_some())
            .map(|(k, _)| k.as_str())
    }

    /// Iterates over the values currently held.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values().filter_map(|v| v.as_ref())
    }
}

/// Canonicalizes a cache key.
fn canonical(key: &str) -> String {
    key.trim().to_uppercase()
}
