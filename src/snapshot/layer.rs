//! Layered copy-on-write maps.

use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;

/// One delta layer. Frozen once another snapshot points at it.
#[derive(Clone, Debug)]
struct Layer<K, V> {
    values: FxHashMap<K, V>,
    parent: Option<Arc<Layer<K, V>>>,
}

impl<K, V> Layer<K, V> {
    fn root(values: FxHashMap<K, V>) -> Self {
        Self { values, parent: None }
    }
}

impl<K, V> Drop for Layer<K, V> {
    // Unlink the chain iteratively so long chains cannot overflow the stack.
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(layer) = next {
            next = match Arc::try_unwrap(layer) {
                Ok(mut inner) => inner.parent.take(),
                Err(_) => None,
            };
        }
    }
}

/// A map made of parent-linked delta layers.
///
/// `fork` is O(1): the fork gets an empty layer on top of the current one.
/// Reads walk the chain from the top. Writes go to the caller's own top
/// layer, which is copied first if another snapshot still shares it, so a
/// write is never visible through any other snapshot.
///
/// ```
/// use ccg_kernel::snapshot::Snapshot;
///
/// let mut base: Snapshot<&str, i64> = Snapshot::new(32);
/// base.set("health", 30);
///
/// let mut branch = base.fork();
/// branch.set("health", 24);
///
/// assert_eq!(base.get(&"health"), Some(&30));
/// assert_eq!(branch.get(&"health"), Some(&24));
/// ```
#[derive(Clone, Debug)]
pub struct Snapshot<K, V> {
    top: Arc<Layer<K, V>>,
    depth: usize,
    version: u64,
    flatten_threshold: usize,
}

impl<K, V> Snapshot<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    /// An empty snapshot that flattens once its chain is deeper than
    /// `flatten_threshold` layers.
    #[must_use]
    pub fn new(flatten_threshold: usize) -> Self {
        Self::from_map(FxHashMap::default(), flatten_threshold)
    }

    /// A single-layer snapshot holding `values`.
    #[must_use]
    pub fn from_map(values: FxHashMap<K, V>, flatten_threshold: usize) -> Self {
        Self {
            top: Arc::new(Layer::root(values)),
            depth: 1,
            version: 0,
            flatten_threshold: flatten_threshold.max(1),
        }
    }

    /// Branch off in O(1).
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            top: Arc::new(Layer {
                values: FxHashMap::default(),
                parent: Some(Arc::clone(&self.top)),
            }),
            depth: self.depth + 1,
            version: self.version + 1,
            flatten_threshold: self.flatten_threshold,
        }
    }

    /// Value for `key` from the nearest layer that has one.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut layer = Some(&self.top);
        while let Some(current) = layer {
            if let Some(value) = current.values.get(key) {
                return Some(value);
            }
            layer = current.parent.as_ref();
        }
        None
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Write to this snapshot's own top layer.
    pub fn set(&mut self, key: K, value: V) {
        if self.depth > self.flatten_threshold {
            self.flatten();
        }
        Arc::make_mut(&mut self.top).values.insert(key, value);
        self.version += 1;
    }

    /// Rebase onto a single materialized layer.
    pub fn flatten(&mut self) {
        trace!(depth = self.depth, "flattening snapshot chain");
        self.top = Arc::new(Layer::root(self.materialize()));
        self.depth = 1;
    }

    /// Every key with its visible value.
    #[must_use]
    pub fn materialize(&self) -> FxHashMap<K, V> {
        let mut chain = Vec::with_capacity(self.depth);
        let mut layer = Some(&self.top);
        while let Some(current) = layer {
            chain.push(current);
            layer = current.parent.as_ref();
        }

        let mut out = FxHashMap::default();
        for layer in chain.into_iter().rev() {
            out.extend(layer.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        out
    }

    /// Layers between this snapshot and its root, inclusive.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Forks and writes since creation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn flatten_threshold(&self) -> usize {
        self.flatten_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parent_unchanged_by_fork_writes() {
        let mut base: Snapshot<u32, i64> = Snapshot::new(8);
        base.set(1, 10);
        base.set(2, 20);

        let mut fork = base.fork();
        fork.set(1, 11);
        fork.set(3, 30);

        assert_eq!(base.get(&1), Some(&10));
        assert_eq!(base.get(&3), None);
        assert_eq!(fork.get(&1), Some(&11));
        assert_eq!(fork.get(&2), Some(&20));
    }

    #[test]
    fn test_parent_write_after_fork_copies() {
        let mut base: Snapshot<u32, i64> = Snapshot::new(8);
        base.set(1, 10);
        let fork = base.fork();

        base.set(1, 99);
        assert_eq!(fork.get(&1), Some(&10));
        assert_eq!(base.get(&1), Some(&99));
    }

    #[test]
    fn test_flatten_bounds_depth() {
        let mut snap: Snapshot<u32, i64> = Snapshot::new(4);
        for i in 0..10 {
            snap = snap.fork();
            snap.set(i, i64::from(i));
            assert!(snap.depth() <= 5);
        }
        for i in 0..10 {
            assert_eq!(snap.get(&i), Some(&i64::from(i)));
        }
    }

    #[test]
    fn test_deep_chain_without_writes() {
        let mut snap: Snapshot<u32, i64> = Snapshot::new(16);
        snap.set(7, 70);
        for _ in 0..50_000 {
            snap = snap.fork();
        }
        assert_eq!(snap.depth(), 50_001);
        assert_eq!(snap.get(&7), Some(&70));
        drop(snap);
    }

    proptest! {
        #[test]
        fn prop_fork_chain_matches_flat_map(
            writes in prop::collection::vec((0u8..16, any::<i64>(), any::<bool>()), 0..200),
            threshold in 1usize..12,
        ) {
            let mut snap: Snapshot<u8, i64> = Snapshot::new(threshold);
            let mut expected = std::collections::HashMap::new();
            let mut frozen = Vec::new();

            for (key, value, fork) in writes {
                if fork {
                    frozen.push((snap.clone(), expected.clone()));
                    snap = snap.fork();
                }
                snap.set(key, value);
                expected.insert(key, value);
            }

            for key in 0..16u8 {
                prop_assert_eq!(snap.get(&key), expected.get(&key));
            }
            for (old, seen) in frozen {
                for key in 0..16u8 {
                    prop_assert_eq!(old.get(&key), seen.get(&key));
                }
            }
        }
    }
}
