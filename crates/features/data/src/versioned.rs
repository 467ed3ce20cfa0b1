use crate::builder::DataBuilder;
use crate::error::DataError;
use crate::manager::DataManager;
use sponge_domain::{BuilderCapabilities, DataContainer, ResourceKey};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type BuildFn<T> = dyn Fn(&DataManager, &DataContainer) -> Result<T, DataError> + Send + Sync;

/// A builder that migrates old records before building.
///
/// Records carrying a `ContentVersion` above `supported_version` are run through the
/// manager's update chain for `key` first; `build_fn` only ever sees records at the
/// supported version (or records without a version at all). A record an updater
/// rejects is reported as [`DataError::InvalidData`] carrying the failed step.
///
/// ```rust
/// use sponge_data::{ContentUpdater, DataError, DataManager, VersionedDataBuilder};
/// use sponge_domain::{DataContainer, ResourceKey};
///
/// let key = ResourceKey::sponge("banner").unwrap();
/// let mut manager = DataManager::new();
/// manager.register_content_updater(
///     key.clone(),
///     ContentUpdater::new(2, 1, |mut content: DataContainer| {
///         let name = content.remove("Name");
///         if let Some(name) = name {
///             content.set("Title", name);
///         }
///         Ok(content)
///     }),
/// );
/// manager.register_builder(
///     key.clone(),
///     VersionedDataBuilder::new(key.clone(), 1, |_, content| {
///         content.get_string("Title").map(str::to_owned).ok_or_else(|| DataError::invalid_data("no title"))
///     }),
/// );
///
/// let old = DataContainer::new().with("ContentVersion", 2).with("Name", "Gate");
/// assert_eq!(manager.deserialize::<String>(&key, &old).unwrap().as_deref(), Some("Gate"));
/// ```
pub struct VersionedDataBuilder<T> {
    key: ResourceKey,
    supported_version: i32,
    build_fn: Arc<BuildFn<T>>,
}

impl<T> VersionedDataBuilder<T> {
    pub fn new<F>(key: ResourceKey, supported_version: i32, build_fn: F) -> Self
    where
        F: Fn(&DataManager, &DataContainer) -> Result<T, DataError> + Send + Sync + 'static,
    {
        Self { key, supported_version, build_fn: Arc::new(build_fn) }
    }

    #[must_use]
    pub const fn key(&self) -> &ResourceKey {
        &self.key
    }

    #[must_use]
    pub const fn supported_version(&self) -> i32 {
        self.supported_version
    }
}

impl<T> DataBuilder<T> for VersionedDataBuilder<T> {
    fn build(&self, manager: &DataManager, container: &DataContainer) -> Result<T, DataError> {
        let supported = self.supported_version;
        match container.content_version() {
            None => (self.build_fn)(manager, container),
            Some(version) if version == supported => (self.build_fn)(manager, container),
            Some(version) if version > supported => {
                let chain = manager.update_chain(&self.key, version, supported)?.ok_or_else(|| {
                    DataError::InvalidData {
                        message: format!(
                            "no content update path for {} from version {version} to {supported}",
                            self.key
                        )
                        .into(),
                        context: None,
                    }
                })?;
                debug!(key = %self.key, from = version, to = supported, "Updating content before build");
                let updated = chain.apply(container).map_err(|e| DataError::InvalidData {
                    message: format!("{} record at version {version} could not be updated", self.key)
                        .into(),
                    context: Some(e.to_string().into()),
                })?;
                (self.build_fn)(manager, &updated)
            },
            Some(version) => Err(DataError::InvalidData {
                message: format!(
                    "{} record at version {version} cannot be converted to version {supported}",
                    self.key
                )
                .into(),
                context: Some("backwards conversion is not supported".into()),
            }),
        }
    }

    fn capabilities(&self) -> BuilderCapabilities {
        BuilderCapabilities::VERSIONED
    }
}

impl<T> fmt::Debug for VersionedDataBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionedDataBuilder")
            .field("key", &self.key)
            .field("supported_version", &self.supported_version)
            .finish_non_exhaustive()
    }
}
