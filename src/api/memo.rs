use serde::{Deserialize, Serialize};
use tracing::trace;

/// Runtime metrics exposed by single-entry memo caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
}

/// Key comparison used by [`Memo`].
///
/// Strings compare by value; shared functions and props compare by
/// allocation so that a hit means every input is the same object.
pub trait MemoKey {
    fn same(&self, other: &Self) -> bool;
}

/// Last-call cache: remembers one `(key, value)` pair and recomputes only when
/// the key changes.
#[derive(Debug)]
pub struct Memo<K, V> {
    entry: Option<(K, V)>,
    hits: u64,
    misses: u64,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            entry: None,
            hits: 0,
            misses: 0,
        }
    }
}

impl<K: MemoKey, V: Clone> Memo<K, V> {
    /// Returns the cached value when `key` matches the previous key.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let value = self
            .entry
            .as_ref()
            .filter(|(cached, _)| cached.same(key))
            .map(|(_, value)| value.clone());
        if value.is_some() {
            self.hits = self.hits.saturating_add(1);
            trace!(hits = self.hits, "memo hit");
        }
        value
    }

    /// Stores a freshly computed value, returning the evicted one.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.misses = self.misses.saturating_add(1);
        self.entry.replace((key, value)).map(|(_, evicted)| evicted)
    }

    pub fn clear(&mut self) -> Option<V> {
        self.entry.take().map(|(_, value)| value)
    }

    #[must_use]
    pub fn peek(&self) -> Option<&V> {
        self.entry.as_ref().map(|(_, value)| value)
    }

    #[must_use]
    pub fn stats(&self) -> MemoStats {
        MemoStats {
            hits: self.hits,
            misses: self.misses,
        }
    }
}
