//! An ordered map from keys to one or more values.
//!
//! Submitted form data repeats keys (multi-selects, checkbox groups) and the
//! order keys first appear in decides the order rows are discovered, so a
//! plain `HashMap<K, V>` is not enough.

use std::borrow::Borrow;
use std::hash::Hash;

use indexmap::map;
use indexmap::IndexMap;

/// Keys map to a non-empty list of values, ordered by first insertion.
///
/// [`get`](Self::get) answers with the most recent value for a key and
/// [`get_list`](Self::get_list) with all of them.
///
/// ```
/// use fieldwork_core::utils::MultiValueDict;
///
/// let d: MultiValueDict<String, &str> = [
///     ("color".to_string(), "red"),
///     ("size".to_string(), "m"),
///     ("color".to_string(), "blue"),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(d.get("color"), Some(&"blue"));
/// assert_eq!(d.get_list("color"), Some(&["red", "blue"][..]));
/// assert_eq!(d.keys().collect::<Vec<_>>(), ["color", "size"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiValueDict<K: Eq + Hash, V> {
    entries: IndexMap<K, Vec<V>>,
}

impl<K: Eq + Hash, V> Default for MultiValueDict<K, V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> MultiValueDict<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_list(key).and_then(<[V]>::last)
    }

    /// Every value stored under `key`, oldest first.
    pub fn get_list<Q>(&self, key: &Q) -> Option<&[V]>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Replaces whatever `key` held with the single `value`. An existing key
    /// keeps its position.
    pub fn set(&mut self, key: K, value: V) {
        self.entries.insert(key, vec![value]);
    }

    /// Adds `value` after any values `key` already holds.
    pub fn append(&mut self, key: K, value: V) {
        self.entries.entry(key).or_default().push(value);
    }

    /// Drops `key`; the keys after it move up one place.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<Vec<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.shift_remove(key)
    }

    pub fn keys(&self) -> map::Keys<'_, K, Vec<V>> {
        self.entries.keys()
    }

    pub fn iter(&self) -> map::Iter<'_, K, Vec<V>> {
        self.entries.iter()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash, V> Extend<(K, V)> for MultiValueDict<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, pairs: I) {
        for (key, value) in pairs {
            self.append(key, value);
        }
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for MultiValueDict<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        let mut dict = Self::new();
        dict.extend(pairs);
        dict
    }
}

impl<'a, K: Eq + Hash, V> IntoIterator for &'a MultiValueDict<K, V> {
    type Item = (&'a K, &'a Vec<V>);
    type IntoIter = map::Iter<'a, K, Vec<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
