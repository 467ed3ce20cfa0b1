//! Memoized lookup from a concrete type key to the registry category it belongs to.

use fxhash::{FxHashMap, FxHashSet};
use parking_lot::RwLock;
use sponge_domain::ResourceKey;
use std::collections::BTreeMap;
use tracing::trace;

/// Resolves the registry type of a key.
///
/// Seeds map a type directly to its registry type. Types that are not seeded fall back
/// to the first seed (in key order) that is one of their declared supertypes; such
/// answers are remembered. Misses are not cached, so a seed added later is picked up.
#[derive(Debug, Default)]
pub struct RegistryTypeCache {
    seeds: BTreeMap<ResourceKey, ResourceKey>,
    supertypes: FxHashMap<ResourceKey, Vec<ResourceKey>>,
    resolved: RwLock<FxHashMap<ResourceKey, ResourceKey>>,
}

impl RegistryTypeCache {
    pub fn new(seeds: impl IntoIterator<Item = (ResourceKey, ResourceKey)>) -> Self {
        Self { seeds: seeds.into_iter().collect(), ..Self::default() }
    }

    /// Maps `key` straight to `registry_type`, replacing any earlier seed.
    pub fn insert(&mut self, key: ResourceKey, registry_type: ResourceKey) {
        self.seeds.insert(key, registry_type);
        self.resolved.get_mut().clear();
    }

    /// Records that `child` is a kind of `parent`.
    pub fn declare_supertype(&mut self, child: ResourceKey, parent: ResourceKey) {
        let parents = self.supertypes.entry(child).or_default();
        if !parents.contains(&parent) {
            parents.push(parent);
        }
        self.resolved.get_mut().clear();
    }

    #[must_use]
    pub fn find(&self, key: &ResourceKey) -> Option<ResourceKey> {
        if let Some(found) = self.seeds.get(key) {
            return Some(found.clone());
        }
        if let Some(found) = self.resolved.read().get(key) {
            return Some(found.clone());
        }

        let (seed, found) = self.seeds.iter().find(|(seed, _)| self.is_ancestor(seed, key))?;
        trace!(key = %key, via = %seed, registry_type = %found, "Memoizing registry type");
        // Racing misses may both get here; seeds are immutable behind `&self`, so they
        // store the same answer.
        self.resolved.write().insert(key.clone(), found.clone());
        Some(found.clone())
    }

    /// Whether `ancestor` is reachable from `key` through declared supertypes.
    fn is_ancestor(&self, ancestor: &ResourceKey, key: &ResourceKey) -> bool {
        let mut visited = FxHashSet::default();
        let mut pending = vec![key];
        while let Some(current) = pending.pop() {
            let Some(parents) = self.supertypes.get(current) else {
                continue;
            };
            for parent in parents {
                if parent == ancestor {
                    return true;
                }
                if visited.insert(parent) {
                    pending.push(parent);
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: &str) -> ResourceKey {
        ResourceKey::try_from(value).unwrap()
    }

    #[test]
    fn exact_match_then_supertype_fallback() {
        let mut cache = RegistryTypeCache::new([(key("entity"), key("registry/entity_type"))]);
        cache.declare_supertype(key("living"), key("entity"));
        cache.declare_supertype(key("zombie"), key("living"));

        assert_eq!(cache.find(&key("entity")), Some(key("registry/entity_type")));
        assert_eq!(cache.find(&key("zombie")), Some(key("registry/entity_type")));
        assert!(cache.resolved.read().contains_key(&key("zombie")));
    }

    #[test]
    fn misses_are_not_cached() {
        let mut cache = RegistryTypeCache::default();
        cache.declare_supertype(key("zombie"), key("entity"));

        assert_eq!(cache.find(&key("zombie")), None);
        assert_eq!(cache.find(&key("zombie")), None);
        assert!(cache.resolved.read().is_empty());

        cache.insert(key("entity"), key("registry/entity_type"));
        assert_eq!(cache.find(&key("zombie")), Some(key("registry/entity_type")));
    }

    #[test]
    fn racing_misses_agree_on_the_answer() {
        let mut cache = RegistryTypeCache::new([(key("entity"), key("registry/entity_type"))]);
        cache.declare_supertype(key("zombie"), key("entity"));

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        assert_eq!(cache.find(&key("zombie")), Some(key("registry/entity_type")));
                    }
                });
            }
        });
        assert_eq!(cache.resolved.read().len(), 1);
    }

    #[test]
    fn supertype_cycles_terminate() {
        let mut cache = RegistryTypeCache::new([(key("block"), key("registry/block_type"))]);
        cache.declare_supertype(key("a"), key("b"));
        cache.declare_supertype(key("b"), key("a"));

        assert_eq!(cache.find(&key("a")), None);
    }
}
