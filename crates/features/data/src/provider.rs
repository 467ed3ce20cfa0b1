//! Data providers and data stores, indexed by the data key they serve.

use crate::error::DataError;
use crate::registration::DataRegistration;
use fxhash::{FxHashMap, FxHashSet};
use sponge_domain::query::queries;
use sponge_domain::{DataContainer, DataQuery, DataValue, ResourceKey};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Reads and writes the value of one data key on holder records.
pub trait DataProvider: fmt::Debug + Send + Sync {
    /// The data key this provider serves.
    fn key(&self) -> &ResourceKey;

    /// Whether holders of `holder_type` carry this key through this provider.
    fn is_supported(&self, holder_type: &ResourceKey) -> bool;

    fn get(&self, holder: &DataContainer) -> Option<DataValue>;

    /// # Errors
    /// Returns [`DataError::InvalidData`] if `value` is not acceptable for this key.
    fn offer(&self, holder: &mut DataContainer, value: DataValue) -> Result<(), DataError>;
}

/// Persists the values of a registration's data keys for some holder types.
pub trait DataStore: fmt::Debug + Send + Sync {
    fn supported_types(&self) -> &[ResourceKey];
}

/// Provider registered for store-backed holder types that no other provider covers.
///
/// Values live under `Data.<namespace>.<value>` of the holder record.
#[derive(Debug)]
pub struct CustomDataProvider {
    key: ResourceKey,
    supported_types: FxHashSet<ResourceKey>,
    path: DataQuery,
}

impl CustomDataProvider {
    pub fn new(key: ResourceKey, supported_types: impl IntoIterator<Item = ResourceKey>) -> Self {
        let path = DataQuery::from_parts([queries::CUSTOM_DATA, key.namespace(), key.value()]);
        Self { key, supported_types: supported_types.into_iter().collect(), path }
    }

    #[must_use]
    pub const fn path(&self) -> &DataQuery {
        &self.path
    }
}

impl DataProvider for CustomDataProvider {
    fn key(&self) -> &ResourceKey {
        &self.key
    }

    fn is_supported(&self, holder_type: &ResourceKey) -> bool {
        self.supported_types.contains(holder_type)
    }

    fn get(&self, holder: &DataContainer) -> Option<DataValue> {
        holder.get(&self.path).cloned()
    }

    fn offer(&self, holder: &mut DataContainer, value: DataValue) -> Result<(), DataError> {
        holder.set(&self.path, value);
        Ok(())
    }
}

/// Providers and stores per data key, in registration order.
#[derive(Debug, Default)]
pub(crate) struct ProviderRegistry {
    providers: FxHashMap<ResourceKey, Vec<Arc<dyn DataProvider>>>,
    stores: FxHashMap<ResourceKey, Vec<Arc<dyn DataStore>>>,
}

impl ProviderRegistry {
    /// Indexes the stores and providers of `registration`.
    ///
    /// With `custom_fallback`, holder types supported by a store of a key but by none of
    /// the registration's providers for it get a [`CustomDataProvider`].
    pub(crate) fn register(&mut self, registration: &DataRegistration, custom_fallback: bool) {
        for store in registration.stores() {
            for key in registration.data_keys() {
                self.stores.entry(key.clone()).or_default().push(Arc::clone(store));
            }
        }

        for key in registration.data_keys() {
            let mut uncovered: FxHashSet<ResourceKey> = if custom_fallback {
                self.stores_for(key).iter().flat_map(|s| s.supported_types()).cloned().collect()
            } else {
                FxHashSet::default()
            };

            let providers = self.providers.entry(key.clone()).or_default();
            for provider in registration.providers_for(key) {
                uncovered.retain(|holder_type| !provider.is_supported(holder_type));
                trace!(key = %key, registration = %registration.key(), "Registering data provider");
                providers.push(Arc::clone(provider));
            }

            if !uncovered.is_empty() {
                debug!(
                    key = %key,
                    holder_types = uncovered.len(),
                    "Registering custom data provider for store-backed holder types"
                );
                providers.push(Arc::new(CustomDataProvider::new(key.clone(), uncovered)));
            }
        }
    }

    pub(crate) fn providers_for(&self, key: &ResourceKey) -> &[Arc<dyn DataProvider>] {
        self.providers.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn stores_for(&self, key: &ResourceKey) -> &[Arc<dyn DataStore>] {
        self.stores.get(key).map(Vec::as_slice).unwrap_or_default()
    }
}
