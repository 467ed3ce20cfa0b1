use crate::builder::{BuilderEntry, BuilderRegistry, DataBuilder};
use crate::error::DataError;
use crate::immutable::ImmutableBuilders;
use crate::legacy::LegacyIds;
use crate::provider::{DataProvider, DataStore, ProviderRegistry};
use crate::registration::{DataRegistration, Registrations};
use crate::registry_type::RegistryTypeCache;
use crate::resolver::ContentUpdaterRegistry;
use crate::translator::{DataTranslator, Translators};
use crate::updater::{DataContentUpdater, UpdaterChain};
use sponge_domain::config::DataConfig;
use sponge_domain::{BuilderCapabilities, DataContainer, ResourceKey};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The data registry.
///
/// Populate it through `&mut self` during startup, then share it (usually as
/// `Arc<DataManager>`) with the threads that deserialize records. Only the
/// immutable-builder map accepts registrations after that point.
#[derive(Debug)]
pub struct DataManager {
    config: DataConfig,
    builders: BuilderRegistry,
    immutable_builders: ImmutableBuilders,
    updaters: ContentUpdaterRegistry,
    custom_updaters: ContentUpdaterRegistry,
    legacy_ids: LegacyIds,
    registrations: Registrations,
    providers: ProviderRegistry,
    translators: Translators,
    registry_types: RegistryTypeCache,
}

impl DataManager {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&DataConfig::default())
    }

    #[must_use]
    pub fn with_config(config: &DataConfig) -> Self {
        let manager = Self {
            config: config.clone(),
            builders: BuilderRegistry::default(),
            immutable_builders: ImmutableBuilders::new(config.immutable_shards),
            updaters: ContentUpdaterRegistry::new()
                .with_resolution_warnings(config.log_resolution_failures),
            custom_updaters: ContentUpdaterRegistry::new()
                .with_resolution_warnings(config.log_resolution_failures),
            legacy_ids: LegacyIds::default(),
            registrations: Registrations::default(),
            providers: ProviderRegistry::default(),
            translators: Translators::default(),
            registry_types: RegistryTypeCache::default(),
        };
        info!(immutable_shards = manager.immutable_builders.shard_count(), "Data manager created");
        manager
    }

    #[must_use]
    pub const fn config(&self) -> &DataConfig {
        &self.config
    }

    // --- Builders ---

    /// Registers `builder` for `key` unless another builder already owns the key.
    ///
    /// A rejected registration is logged and otherwise ignored. Returns whether the
    /// builder was stored.
    pub fn register_builder<T, B>(&mut self, key: ResourceKey, builder: B) -> bool
    where
        T: 'static,
        B: DataBuilder<T> + 'static,
    {
        let entry = BuilderEntry::new::<T, B>(builder);
        let unversioned = !entry.capabilities().contains(BuilderCapabilities::VERSIONED);
        let advise = self.config.advise_unversioned_builders && unversioned;
        let builder_type = entry.builder_type();

        let stored = self.builders.insert(key.clone(), entry);
        if stored && advise {
            warn!(
                key = %key,
                builder = builder_type,
                "Builder does not handle content versions; consider VersionedDataBuilder"
            );
        }
        stored
    }

    /// Finds the builder for `key`, looking at general builders first and immutable
    /// builders second.
    ///
    /// # Errors
    /// Returns [`DataError::TypeMismatch`] if the builder registered for `key` does not
    /// produce a `T`.
    pub fn get_builder<T: 'static>(
        &self,
        key: &ResourceKey,
    ) -> Result<Option<Arc<dyn DataBuilder<T>>>, DataError> {
        if let Some(entry) = self.builders.get(key) {
            return entry.downcast::<T>(key).map(Some);
        }
        self.immutable_builders.get::<T>(key)
    }

    /// Builds a `T` from `container` with the builder registered for `key`.
    ///
    /// Returns `Ok(None)` if no builder is registered or the builder rejects the record
    /// as invalid data, including a record an update step could not migrate.
    ///
    /// # Errors
    /// Returns [`DataError::TypeMismatch`] for a builder of another type, and passes on
    /// any other builder error.
    pub fn deserialize<T: 'static>(
        &self,
        key: &ResourceKey,
        container: &DataContainer,
    ) -> Result<Option<T>, DataError> {
        let Some(builder) = self.get_builder::<T>(key)? else {
            debug!(key = %key, "No builder registered");
            return Ok(None);
        };
        match builder.build(self, container) {
            Ok(value) => Ok(Some(value)),
            Err(DataError::InvalidData { message, context }) => {
                debug!(key = %key, %message, context = context.as_deref(), "Record rejected by builder");
                Ok(None)
            },
            Err(e) => Err(e),
        }
    }

    /// Registers an immutable builder. Safe to call while other threads read.
    ///
    /// # Errors
    /// Returns [`DataError::DuplicateRegistration`] if `key` already has an immutable
    /// builder; the first one stays in place.
    pub fn register_immutable_builder<T, B>(
        &self,
        key: ResourceKey,
        builder: B,
    ) -> Result<(), DataError>
    where
        T: 'static,
        B: DataBuilder<T> + 'static,
    {
        self.immutable_builders.insert(key, BuilderEntry::new::<T, B>(builder))
    }

    /// Like [`DataManager::get_builder`], restricted to immutable builders.
    ///
    /// # Errors
    /// Returns [`DataError::TypeMismatch`] if the builder does not produce a `T`.
    pub fn get_immutable_builder<T: 'static>(
        &self,
        key: &ResourceKey,
    ) -> Result<Option<Arc<dyn DataBuilder<T>>>, DataError> {
        self.immutable_builders.get::<T>(key)
    }

    // --- Content updaters ---

    pub fn register_content_updater<U>(&mut self, key: ResourceKey, updater: U)
    where
        U: DataContentUpdater + 'static,
    {
        self.updaters.register(key, Arc::new(updater));
    }

    /// Resolves the update chain that migrates records of `key` from `from` to `to`.
    ///
    /// # Errors
    /// Returns [`DataError::InvalidUsage`] unless `from > to`.
    pub fn update_chain(
        &self,
        key: &ResourceKey,
        from: i32,
        to: i32,
    ) -> Result<Option<UpdaterChain>, DataError> {
        self.updaters.resolve(key, from, to)
    }

    /// Registers an updater for plugin-provided custom data. Kept apart from
    /// [`DataManager::register_content_updater`].
    pub fn register_custom_content_updater<U>(&mut self, key: ResourceKey, updater: U)
    where
        U: DataContentUpdater + 'static,
    {
        self.custom_updaters.register(key, Arc::new(updater));
    }

    /// [`DataManager::update_chain`] over the custom-data updaters.
    ///
    /// # Errors
    /// Returns [`DataError::InvalidUsage`] unless `from > to`.
    pub fn custom_update_chain(
        &self,
        key: &ResourceKey,
        from: i32,
        to: i32,
    ) -> Result<Option<UpdaterChain>, DataError> {
        self.custom_updaters.resolve(key, from, to)
    }

    // --- Registrations & legacy ids ---

    /// Stores `registration` and indexes its providers and stores by data key.
    ///
    /// # Errors
    /// Returns [`DataError::DuplicateRegistration`] if the key is taken. Nothing is
    /// indexed in that case.
    pub fn register_data_registration(
        &mut self,
        registration: DataRegistration,
    ) -> Result<Arc<DataRegistration>, DataError> {
        let registration = self.registrations.insert(registration)?;
        self.providers.register(&registration, false);
        Ok(registration)
    }

    /// Like [`DataManager::register_data_registration`] for plugin data. Holder types a
    /// store supports but no provider covers get a
    /// [`CustomDataProvider`](crate::CustomDataProvider).
    ///
    /// # Errors
    /// Returns [`DataError::DuplicateRegistration`] if the key is taken.
    pub fn register_custom_data_registration(
        &mut self,
        registration: DataRegistration,
    ) -> Result<Arc<DataRegistration>, DataError> {
        let registration = self.registrations.insert(registration)?;
        self.providers.register(&registration, true);
        Ok(registration)
    }

    /// Every provider registered for `data_key`, in registration order.
    #[must_use]
    pub fn data_providers(&self, data_key: &ResourceKey) -> &[Arc<dyn DataProvider>] {
        self.providers.providers_for(data_key)
    }

    /// The first provider for `data_key` that supports holders of `holder_type`.
    #[must_use]
    pub fn data_provider(
        &self,
        data_key: &ResourceKey,
        holder_type: &ResourceKey,
    ) -> Option<Arc<dyn DataProvider>> {
        self.providers
            .providers_for(data_key)
            .iter()
            .find(|provider| provider.is_supported(holder_type))
            .cloned()
    }

    #[must_use]
    pub fn data_stores(&self, data_key: &ResourceKey) -> &[Arc<dyn DataStore>] {
        self.providers.stores_for(data_key)
    }

    #[must_use]
    pub fn registration(&self, key: &ResourceKey) -> Option<Arc<DataRegistration>> {
        self.registrations.get(key)
    }

    /// Binds a historical id to `registration`.
    ///
    /// # Errors
    /// Returns [`DataError::DuplicateRegistration`] if `id` is already bound, or
    /// [`DataError::InvalidUsage`] if it is empty.
    pub fn register_legacy_id(
        &mut self,
        id: impl Into<String>,
        registration: Arc<DataRegistration>,
    ) -> Result<(), DataError> {
        self.legacy_ids.insert(id.into(), registration)
    }

    #[must_use]
    pub fn registration_for_legacy_id(&self, id: &str) -> Option<Arc<DataRegistration>> {
        self.legacy_ids.get(id)
    }

    // --- Translators ---

    /// Registers a translator for `T`. The first one registered for a type wins.
    pub fn register_translator<T, X>(&mut self, translator: X) -> bool
    where
        T: 'static,
        X: DataTranslator<T> + 'static,
    {
        self.translators.insert::<T, X>(translator)
    }

    #[must_use]
    pub fn translator<T: 'static>(&self) -> Option<Arc<dyn DataTranslator<T>>> {
        self.translators.get::<T>()
    }

    // --- Registry types ---

    pub fn register_registry_type(&mut self, key: ResourceKey, registry_type: ResourceKey) {
        self.registry_types.insert(key, registry_type);
    }

    pub fn declare_supertype(&mut self, child: ResourceKey, parent: ResourceKey) {
        self.registry_types.declare_supertype(child, parent);
    }

    #[must_use]
    pub fn find_registry_type(&self, key: &ResourceKey) -> Option<ResourceKey> {
        self.registry_types.find(key)
    }
}

impl Default for DataManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn manager_is_shareable() {
        assert_send_sync::<DataManager>();
        assert_send_sync::<Arc<DataManager>>();
    }

    #[test]
    fn config_is_kept() {
        let config = DataConfig { immutable_shards: 0, ..DataConfig::default() };
        let manager = DataManager::with_config(&config);
        assert_eq!(manager.config().immutable_shards, 0);
        assert_eq!(manager.immutable_builders.shard_count(), 1);
    }
}
