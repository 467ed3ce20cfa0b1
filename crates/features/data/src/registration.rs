use crate::error::DataError;
use crate::provider::{DataProvider, DataStore};
use fxhash::FxHashMap;
use sponge_domain::ResourceKey;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::trace;

/// A named group of data keys, with the providers and stores that serve them.
#[derive(Debug, Clone)]
pub struct DataRegistration {
    key: ResourceKey,
    data_keys: Vec<ResourceKey>,
    providers: Vec<Arc<dyn DataProvider>>,
    stores: Vec<Arc<dyn DataStore>>,
}

impl DataRegistration {
    pub fn new(key: ResourceKey, data_keys: impl IntoIterator<Item = ResourceKey>) -> Self {
        Self {
            key,
            data_keys: data_keys.into_iter().collect(),
            providers: Vec::new(),
            stores: Vec::new(),
        }
    }

    /// Adds `provider`, declaring its data key if the registration does not list it yet.
    #[must_use]
    pub fn with_provider(mut self, provider: impl DataProvider + 'static) -> Self {
        if !self.provides(provider.key()) {
            self.data_keys.push(provider.key().clone());
        }
        self.providers.push(Arc::new(provider));
        self
    }

    /// Adds a store persisting every data key of this registration.
    #[must_use]
    pub fn with_store(mut self, store: impl DataStore + 'static) -> Self {
        self.stores.push(Arc::new(store));
        self
    }

    #[must_use]
    pub const fn key(&self) -> &ResourceKey {
        &self.key
    }

    #[must_use]
    pub fn data_keys(&self) -> &[ResourceKey] {
        &self.data_keys
    }

    #[must_use]
    pub fn provides(&self, data_key: &ResourceKey) -> bool {
        self.data_keys.contains(data_key)
    }

    pub fn providers_for<'a>(
        &'a self,
        data_key: &'a ResourceKey,
    ) -> impl Iterator<Item = &'a Arc<dyn DataProvider>> + 'a {
        self.providers.iter().filter(move |provider| provider.key() == data_key)
    }

    #[must_use]
    pub fn stores(&self) -> &[Arc<dyn DataStore>] {
        &self.stores
    }
}

/// Registrations by key. Write-once.
#[derive(Debug, Default)]
pub(crate) struct Registrations {
    by_key: FxHashMap<ResourceKey, Arc<DataRegistration>>,
}

impl Registrations {
    pub(crate) fn insert(
        &mut self,
        registration: DataRegistration,
    ) -> Result<Arc<DataRegistration>, DataError> {
        match self.by_key.entry(registration.key.clone()) {
            Entry::Occupied(_) => Err(DataError::DuplicateRegistration {
                message: format!("a data registration already exists for {}", registration.key)
                    .into(),
                context: None,
            }),
            Entry::Vacant(slot) => {
                trace!(key = %registration.key, data_keys = registration.data_keys.len(), "Registering data registration");
                Ok(Arc::clone(slot.insert(Arc::new(registration))))
            },
        }
    }

    pub(crate) fn get(&self, key: &ResourceKey) -> Option<Arc<DataRegistration>> {
        self.by_key.get(key).cloned()
    }
}
