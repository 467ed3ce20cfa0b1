//! Per-key updater lists and the greedy path resolver.

use crate::error::DataError;
use crate::updater::{DataContentUpdater, UpdaterChain};
use fxhash::FxHashMap;
use sponge_domain::ResourceKey;
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Ordered content updaters keyed by type.
///
/// Each list is kept sorted by input version (descending), then output version
/// (descending); updaters with equal versions keep their registration order. The
/// resolver depends on that order: at every version it takes the first updater that
/// does not step past the target, so shorter steps win over longer ones.
#[derive(Debug)]
pub struct ContentUpdaterRegistry {
    updaters: FxHashMap<ResourceKey, Vec<Arc<dyn DataContentUpdater>>>,
    warn_on_unresolved: bool,
}

impl ContentUpdaterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { updaters: FxHashMap::default(), warn_on_unresolved: true }
    }

    /// Chooses between `warn!` and `debug!` for unresolvable requests.
    #[must_use]
    pub const fn with_resolution_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_unresolved = enabled;
        self
    }

    pub fn register(&mut self, key: ResourceKey, updater: Arc<dyn DataContentUpdater>) {
        trace!(
            key = %key,
            input = updater.input_version(),
            output = updater.output_version(),
            "Registering content updater"
        );
        let list = self.updaters.entry(key).or_default();
        list.push(updater);
        list.sort_by_key(|u| (Reverse(u.input_version()), Reverse(u.output_version())));
    }

    /// Updaters registered for `key`, in resolution order.
    #[must_use]
    pub fn updaters(&self, key: &ResourceKey) -> &[Arc<dyn DataContentUpdater>] {
        self.updaters.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Resolves a chain that migrates records of `key` from version `from` down to `to`.
    ///
    /// Returns `Ok(None)` if nothing is registered for `key` or the registered updaters
    /// do not connect the two versions.
    ///
    /// # Errors
    /// Returns [`DataError::InvalidUsage`] if `from == to` or `from < to`.
    pub fn resolve(
        &self,
        key: &ResourceKey,
        from: i32,
        to: i32,
    ) -> Result<Option<UpdaterChain>, DataError> {
        if from == to {
            return Err(DataError::InvalidUsage {
                message: format!("cannot update {key} from version {from} to the same version")
                    .into(),
                context: None,
            });
        }
        if from < to {
            return Err(DataError::InvalidUsage {
                message: format!(
                    "backwards conversion of {key} from version {from} to {to} is not supported"
                )
                .into(),
                context: None,
            });
        }

        let Some(candidates) = self.updaters.get(key) else {
            debug!(key = %key, from, to, "No content updaters registered");
            return Ok(None);
        };

        let mut version = from;
        let mut path = Vec::new();
        for updater in candidates {
            if updater.input_version() == version && updater.output_version() >= to {
                version = updater.output_version();
                path.push(Arc::clone(updater));
            }
        }

        if version != to {
            if self.warn_on_unresolved {
                warn!(key = %key, from, to, reached = version, "Unable to resolve content update path");
            } else {
                debug!(key = %key, from, to, reached = version, "Unable to resolve content update path");
            }
            return Ok(None);
        }

        Ok(Some(UpdaterChain::new(key.clone(), from, to, path)))
    }
}

impl Default for ContentUpdaterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::updater::ContentUpdater;
    use sponge_domain::DataContainer;

    fn key() -> ResourceKey {
        ResourceKey::sponge("item_stack").unwrap()
    }

    fn noop(input: i32, output: i32) -> Arc<dyn DataContentUpdater> {
        Arc::new(ContentUpdater::new(input, output, Ok::<DataContainer, DataError>))
    }

    #[test]
    fn keeps_descending_order_with_stable_ties() {
        let mut registry = ContentUpdaterRegistry::new();
        let first = noop(2, 1);
        let second = noop(2, 1);
        registry.register(key(), noop(1, 0));
        registry.register(key(), Arc::clone(&first));
        registry.register(key(), noop(3, 1));
        registry.register(key(), noop(3, 2));
        registry.register(key(), Arc::clone(&second));

        let versions: Vec<_> = registry
            .updaters(&key())
            .iter()
            .map(|u| (u.input_version(), u.output_version()))
            .collect();
        assert_eq!(versions, [(3, 2), (3, 1), (2, 1), (2, 1), (1, 0)]);

        let ordered = registry.updaters(&key());
        assert!(Arc::ptr_eq(&ordered[2], &first));
        assert!(Arc::ptr_eq(&ordered[3], &second));
    }

    #[test]
    fn greedy_walk_takes_first_fitting_step() {
        let mut registry = ContentUpdaterRegistry::new();
        registry.register(key(), noop(3, 2));
        registry.register(key(), noop(3, 1));
        registry.register(key(), noop(2, 1));
        registry.register(key(), noop(1, 0));

        let chain = registry.resolve(&key(), 3, 0).unwrap().unwrap();
        assert_eq!(chain.path(), [(3, 2), (2, 1), (1, 0)]);

        let chain = registry.resolve(&key(), 3, 1).unwrap().unwrap();
        assert_eq!(chain.path(), [(3, 2), (2, 1)]);
    }

    #[test]
    fn overshooting_updaters_are_skipped() {
        let mut registry = ContentUpdaterRegistry::new();
        registry.register(key(), noop(5, 3));
        registry.register(key(), noop(5, 4));

        let chain = registry.resolve(&key(), 5, 4).unwrap().unwrap();
        assert_eq!(chain.path(), [(5, 4)]);
    }

    #[test]
    fn gaps_and_unknown_keys_resolve_to_none() {
        let mut registry = ContentUpdaterRegistry::new().with_resolution_warnings(false);
        registry.register(key(), noop(3, 2));
        registry.register(key(), noop(1, 0));

        assert!(registry.resolve(&key(), 3, 0).unwrap().is_none());
        let other = ResourceKey::sponge("other").unwrap();
        assert!(registry.resolve(&other, 3, 0).unwrap().is_none());
    }

    #[test]
    fn rejects_same_and_backwards_requests() {
        let registry = ContentUpdaterRegistry::new();
        assert!(matches!(registry.resolve(&key(), 2, 2), Err(DataError::InvalidUsage { .. })));
        assert!(matches!(registry.resolve(&key(), 1, 2), Err(DataError::InvalidUsage { .. })));
    }
}
