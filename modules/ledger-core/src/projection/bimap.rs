use std::collections::{HashMap, HashSet};

/// Symmetric string mapping: `put(k, h)` installs `k -> h` and `h -> k`.
///
/// The first argument of `put` is remembered as the forward key of its pair;
/// the second is its token. Overwriting a key leaves the old reverse entry
/// behind. Such an entry is stale: it no longer round-trips, and
/// [`BiMap::counterpart`] ignores it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BiMap {
    entries: HashMap<String, String>,
    keys: HashSet<String>,
}

impl BiMap {
    pub fn put(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.entries.insert(value.to_string(), key.to_string());
        self.keys.insert(key.to_string());
    }

    /// Apply one persisted half of a pair.
    ///
    /// Pairs are written forward half first, so a record that merely mirrors
    /// the live pair of an existing key is its backward half and changes
    /// nothing.
    pub fn restore(&mut self, left: &str, right: &str) {
        let mirrors_key = self.keys.contains(right)
            && self.entries.get(right).map(String::as_str) == Some(left);
        if !mirrors_key {
            self.put(left, right);
        }
    }

    /// Whether `side` is present in either direction, stale entries included.
    pub fn contains(&self, side: &str) -> bool {
        self.entries.contains_key(side)
    }

    /// Whether `key` was stored as a key and still has a live token.
    pub fn is_live_key(&self, key: &str) -> bool {
        self.keys.contains(key) && self.counterpart(key).is_some()
    }

    /// Whether `side` is a key or a token that is still reachable.
    pub fn is_taken(&self, side: &str) -> bool {
        self.keys.contains(side) || self.counterpart(side).is_some()
    }

    /// The other member of the live pair containing `side`.
    pub fn counterpart(&self, side: &str) -> Option<&str> {
        let other = self.entries.get(side)?;
        match self.entries.get(other) {
            Some(back) if back == side => Some(other.as_str()),
            _ => None,
        }
    }

    /// Number of live pairs.
    pub fn pair_count(&self) -> usize {
        self.keys.iter().filter(|k| self.is_live_key(k)).count()
    }

    /// Raw entry count, stale reverse entries included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
