//! Keyed join over in-memory records.

use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Index of borrowed values by a key extracted from each value.
///
/// When two values share a key the first one wins.
#[derive(Debug)]
pub struct KeyedIndex<'a, K, V> {
    entries: FxHashMap<K, &'a V>,
}

impl<'a, K, V> KeyedIndex<'a, K, V>
where
    K: Eq + Hash,
{
    /// Build the index in a single pass over `values`.
    #[must_use]
    pub fn build<I, F>(values: I, key: F) -> Self
    where
        I: IntoIterator<Item = &'a V>,
        F: Fn(&V) -> K,
    {
        let values = values.into_iter();
        let mut entries = FxHashMap::default();

        entries.reserve(values.size_hint().0);

        for value in values {
            entries.entry(key(value)).or_insert(value);
        }

        Self { entries }
    }

    /// The value indexed under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&'a V> {
        self.entries.get(key).copied()
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no value was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pair every item of `left` with its indexed match (if any), preserving
    /// the order of `left`.
    pub fn join<L, T, KF, CF>(
        &self,
        left: impl IntoIterator<Item = L>,
        key: KF,
        mut combine: CF,
    ) -> impl Iterator<Item = T>
    where
        KF: Fn(&L) -> K,
        CF: FnMut(L, Option<&'a V>) -> T,
    {
        left.into_iter().map(move |item| {
            let matched = self.get(&key(&item));

            combine(item, matched)
        })
    }
}
