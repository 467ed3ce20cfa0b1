//! Immutable builders live in their own sharded map so they can be registered late.

use crate::builder::{BuilderEntry, DataBuilder};
use crate::error::DataError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use sponge_domain::ResourceKey;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::trace;

/// Write-once builder map striped over independent locks.
///
/// Unlike the general builder map, registration goes through `&self` and a second
/// registration for a key is an error.
#[derive(Debug)]
pub(crate) struct ImmutableBuilders {
    shards: Box<[RwLock<FxHashMap<ResourceKey, BuilderEntry>>]>,
}

impl ImmutableBuilders {
    /// Zero shards is treated as one.
    pub(crate) fn new(shards: usize) -> Self {
        let shards = shards.max(1);
        Self { shards: (0..shards).map(|_| RwLock::new(FxHashMap::default())).collect() }
    }

    pub(crate) fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard(&self, key: &ResourceKey) -> &RwLock<FxHashMap<ResourceKey, BuilderEntry>> {
        // Truncation only affects which shard is picked.
        #[allow(clippy::cast_possible_truncation)]
        let index = (fxhash::hash64(key) % self.shards.len() as u64) as usize;
        &self.shards[index]
    }

    pub(crate) fn insert(&self, key: ResourceKey, entry: BuilderEntry) -> Result<(), DataError> {
        let mut shard = self.shard(&key).write();
        match shard.entry(key) {
            Entry::Occupied(existing) => Err(DataError::DuplicateRegistration {
                message: format!(
                    "an immutable builder ({}) is already registered for {}",
                    existing.get().builder_type(),
                    existing.key()
                )
                .into(),
                context: Some(entry.builder_type().into()),
            }),
            Entry::Vacant(slot) => {
                trace!(key = %slot.key(), builder = entry.builder_type(), "Registering immutable builder");
                slot.insert(entry);
                Ok(())
            },
        }
    }

    pub(crate) fn get<T: 'static>(
        &self,
        key: &ResourceKey,
    ) -> Result<Option<Arc<dyn DataBuilder<T>>>, DataError> {
        self.shard(key).read().get(key).map(|entry| entry.downcast::<T>(key)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::DataManager;
    use sponge_domain::DataContainer;
    use std::thread;

    struct Fixed(i64);

    impl DataBuilder<i64> for Fixed {
        fn build(&self, _: &DataManager, _: &DataContainer) -> Result<i64, DataError> {
            Ok(self.0)
        }
    }

    fn key(value: &str) -> ResourceKey {
        ResourceKey::sponge(value).unwrap()
    }

    #[test]
    fn zero_shards_is_clamped() {
        assert_eq!(ImmutableBuilders::new(0).shard_count(), 1);
        assert_eq!(ImmutableBuilders::new(8).shard_count(), 8);
    }

    #[test]
    fn duplicate_keeps_the_first_builder() {
        let map = ImmutableBuilders::new(4);
        map.insert(key("fixed"), BuilderEntry::new::<i64, _>(Fixed(1))).unwrap();
        let err = map.insert(key("fixed"), BuilderEntry::new::<i64, _>(Fixed(2))).unwrap_err();
        assert!(matches!(err, DataError::DuplicateRegistration { .. }));

        let manager = DataManager::new();
        let builder = map.get::<i64>(&key("fixed")).unwrap().unwrap();
        assert_eq!(builder.build(&manager, &DataContainer::new()).unwrap(), 1);
        assert!(map.get::<i64>(&key("missing")).unwrap().is_none());
    }

    #[test]
    fn concurrent_registration_is_write_once() {
        let map = ImmutableBuilders::new(2);
        let successes: usize = thread::scope(|scope| {
            let handles: Vec<_> = (0..8_i64)
                .map(|i| {
                    let map = &map;
                    scope.spawn(move || {
                        usize::from(
                            map.insert(key("contested"), BuilderEntry::new::<i64, _>(Fixed(i)))
                                .is_ok(),
                        )
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });
        assert_eq!(successes, 1);
    }
}
