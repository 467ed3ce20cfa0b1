//! Builders reconstruct typed values from records.

use crate::error::DataError;
use crate::manager::DataManager;
use fxhash::FxHashMap;
use sponge_domain::{BuilderCapabilities, DataContainer, ResourceKey};
use std::any::{Any, type_name};
use std::sync::Arc;
use tracing::{trace, warn};

/// Reconstructs a `T` from a [`DataContainer`].
///
/// The manager that dispatched the call is passed along so builders can resolve
/// content updaters or nested builders without global state.
pub trait DataBuilder<T>: Send + Sync {
    /// # Errors
    /// Returns [`DataError::InvalidData`] if `container` does not describe a valid `T`.
    fn build(&self, manager: &DataManager, container: &DataContainer) -> Result<T, DataError>;

    fn capabilities(&self) -> BuilderCapabilities {
        BuilderCapabilities::empty()
    }
}

/// A type-erased `Arc<dyn DataBuilder<T>>` plus what is needed to report misuse.
#[derive(Debug)]
pub(crate) struct BuilderEntry {
    output: &'static str,
    builder_type: &'static str,
    capabilities: BuilderCapabilities,
    builder: Box<dyn Any + Send + Sync>,
}

impl BuilderEntry {
    pub(crate) fn new<T, B>(builder: B) -> Self
    where
        T: 'static,
        B: DataBuilder<T> + 'static,
    {
        let capabilities = builder.capabilities();
        let builder: Arc<dyn DataBuilder<T>> = Arc::new(builder);
        Self {
            output: type_name::<T>(),
            builder_type: type_name::<B>(),
            capabilities,
            builder: Box::new(builder),
        }
    }

    pub(crate) const fn builder_type(&self) -> &'static str {
        self.builder_type
    }

    pub(crate) const fn capabilities(&self) -> BuilderCapabilities {
        self.capabilities
    }

    pub(crate) fn downcast<T: 'static>(
        &self,
        key: &ResourceKey,
    ) -> Result<Arc<dyn DataBuilder<T>>, DataError> {
        self.builder.downcast_ref::<Arc<dyn DataBuilder<T>>>().cloned().ok_or_else(|| {
            DataError::TypeMismatch {
                message: format!(
                    "builder for {key} produces {}, not {}",
                    self.output,
                    type_name::<T>()
                )
                .into(),
                context: Some(self.builder_type.into()),
            }
        })
    }
}

/// First-wins builder map, written only during initialization.
#[derive(Debug, Default)]
pub(crate) struct BuilderRegistry {
    builders: FxHashMap<ResourceKey, BuilderEntry>,
}

impl BuilderRegistry {
    /// Stores `entry` unless `key` is taken. A rejected entry is logged and dropped.
    pub(crate) fn insert(&mut self, key: ResourceKey, entry: BuilderEntry) -> bool {
        if let Some(existing) = self.builders.get(&key) {
            warn!(
                key = %key,
                existing = existing.builder_type(),
                rejected = entry.builder_type(),
                "A DataBuilder has already been registered for this key"
            );
            return false;
        }
        trace!(key = %key, builder = entry.builder_type(), "Registering data builder");
        self.builders.insert(key, entry);
        true
    }

    pub(crate) fn get(&self, key: &ResourceKey) -> Option<&BuilderEntry> {
        self.builders.get(key)
    }
}
