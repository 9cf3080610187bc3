//! Explicit query store for API-backed data.
//!
//! Each query is identified by a [`QueryKey`]. Fetches are numbered with a
//! per-key generation so that a slow response from a superseded fetch can
//! never overwrite newer data. Mutations mark a key stale through
//! [`QueryStore::invalidate`], which tells the caller whether a re-fetch must
//! be issued. Nothing here outlives the process.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Identity of a cached query.
///
/// The credential is folded into the key as a fingerprint so that switching
/// tokens never shows another caller's data, without keeping the token in
/// the key itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    ServerList { credential_fingerprint: u64 },
}

impl QueryKey {
    pub fn server_list(credential: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        credential.hash(&mut hasher);
        Self::ServerList {
            credential_fingerprint: hasher.finish(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct QueryEntry<T> {
    pub status: QueryStatus,
    /// Last successfully fetched data; kept across failures and re-fetches.
    pub data: Option<T>,
    /// Generation of the most recently issued fetch.
    pub generation: u64,
    pub stale: bool,
}

impl<T> Default for QueryEntry<T> {
    fn default() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            generation: 0,
            stale: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryStore<T> {
    entries: HashMap<QueryKey, QueryEntry<T>>,
}

impl<T> Default for QueryStore<T> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<T> QueryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &QueryKey) -> Option<&QueryEntry<T>> {
        self.entries.get(key)
    }

    pub fn data(&self, key: &QueryKey) -> Option<&T> {
        self.get(key).and_then(|entry| entry.data.as_ref())
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        self.get(key).map(|entry| entry.status.clone()).unwrap_or_default()
    }

    pub fn is_loading(&self, key: &QueryKey) -> bool {
        matches!(self.status(key), QueryStatus::Loading)
    }

    /// Record that a fetch is being issued and return its generation.
    pub fn begin_fetch(&mut self, key: QueryKey) -> u64 {
        let entry = self.entries.entry(key).or_default();
        entry.generation += 1;
        entry.status = QueryStatus::Loading;
        entry.stale = false;
        entry.generation
    }

    /// Apply a fetch result. Returns `false` when the result belongs to a
    /// superseded generation and was discarded.
    pub fn resolve(&mut self, key: QueryKey, generation: u64, result: Result<T, String>) -> bool {
        let Some(entry) = self.entries.get_mut(&key) else {
            return false;
        };
        if entry.generation != generation {
            return false;
        }
        match result {
            Ok(data) => {
                entry.data = Some(data);
                entry.status = QueryStatus::Ready;
            }
            Err(message) => entry.status = QueryStatus::Failed(message),
        }
        true
    }

    /// Mark a query stale after a mutation. Returns `true` when the query has
    /// been issued before and therefore needs a re-fetch.
    pub fn invalidate(&mut self, key: &QueryKey) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.stale = true;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_lifecycle_updates_status_and_data() {
        let key = QueryKey::server_list("sk-1");
        let mut store: QueryStore<Vec<u32>> = QueryStore::new();
        assert_eq!(store.status(&key), QueryStatus::Idle);

        let generation = store.begin_fetch(key);
        assert!(store.is_loading(&key));
        assert!(store.resolve(key, generation, Ok(vec![1, 2])));
        assert_eq!(store.status(&key), QueryStatus::Ready);
        assert_eq!(store.data(&key), Some(&vec![1, 2]));
    }

    #[test]
    fn failures_keep_previous_data() {
        let key = QueryKey::server_list("sk-1");
        let mut store: QueryStore<Vec<u32>> = QueryStore::new();
        let first = store.begin_fetch(key);
        store.resolve(key, first, Ok(vec![7]));

        let second = store.begin_fetch(key);
        store.resolve(key, second, Err("boom".into()));
        assert_eq!(store.status(&key), QueryStatus::Failed("boom".into()));
        assert_eq!(store.data(&key), Some(&vec![7]));
    }

    #[test]
    fn superseded_results_are_discarded() {
        let key = QueryKey::server_list("sk-1");
        let mut store: QueryStore<Vec<u32>> = QueryStore::new();
        let old = store.begin_fetch(key);
        let new = store.begin_fetch(key);

        assert!(store.resolve(key, new, Ok(vec![2])));
        assert!(!store.resolve(key, old, Ok(vec![1])));
        assert_eq!(store.data(&key), Some(&vec![2]));
    }

    #[test]
    fn invalidate_only_requests_refetch_for_known_queries() {
        let key = QueryKey::server_list("sk-1");
        let mut store: QueryStore<Vec<u32>> = QueryStore::new();
        assert!(!store.invalidate(&key));

        store.begin_fetch(key);
        assert!(store.invalidate(&key));
        assert!(store.get(&key).is_some_and(|entry| entry.stale));
        store.begin_fetch(key);
        assert!(store.get(&key).is_some_and(|entry| !entry.stale));
    }

    #[test]
    fn keys_differ_per_credential() {
        assert_ne!(QueryKey::server_list("a"), QueryKey::server_list("b"));
        assert_eq!(QueryKey::server_list("a"), QueryKey::server_list("a"));
    }
}
