//! Content updaters migrate a record from one schema version to another.

use crate::error::DataError;
use sponge_domain::{DataContainer, ResourceKey};
use std::fmt;
use std::sync::Arc;

/// A single migration step between two content versions.
///
/// Updaters are registered per type key and stitched together by the path resolver.
/// Implementations must not touch the `ContentVersion` field; the chain stamps it.
pub trait DataContentUpdater: fmt::Debug + Send + Sync {
    fn input_version(&self) -> i32;

    fn output_version(&self) -> i32;

    /// Migrates `content` from [`Self::input_version`] to [`Self::output_version`].
    ///
    /// # Errors
    /// Any error aborts the enclosing chain with [`DataError::UpdateFailed`].
    fn update(&self, content: DataContainer) -> Result<DataContainer, DataError>;
}

type UpdateFn = dyn Fn(DataContainer) -> Result<DataContainer, DataError> + Send + Sync;

/// Closure-backed updater.
///
/// ```rust
/// use sponge_data::{ContentUpdater, DataContentUpdater};
/// use sponge_domain::DataContainer;
///
/// let rename = ContentUpdater::new(2, 1, |mut content: DataContainer| {
///     if let Some(name) = content.remove("Name") {
///         content.set("DisplayName", name);
///     }
///     Ok(content)
/// });
/// assert_eq!((rename.input_version(), rename.output_version()), (2, 1));
/// ```
#[derive(Clone)]
pub struct ContentUpdater {
    input: i32,
    output: i32,
    apply: Arc<UpdateFn>,
}

impl ContentUpdater {
    pub fn new<F>(input: i32, output: i32, apply: F) -> Self
    where
        F: Fn(DataContainer) -> Result<DataContainer, DataError> + Send + Sync + 'static,
    {
        Self { input, output, apply: Arc::new(apply) }
    }
}

impl DataContentUpdater for ContentUpdater {
    fn input_version(&self) -> i32 {
        self.input
    }

    fn output_version(&self) -> i32 {
        self.output
    }

    fn update(&self, content: DataContainer) -> Result<DataContainer, DataError> {
        (self.apply)(content)
    }
}

impl fmt::Debug for ContentUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentUpdater")
            .field("input", &self.input)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

/// The composite updater produced by a successful path resolution.
///
/// Applying it runs every step in order on a copy of the record and stamps
/// `ContentVersion` with each step's output version.
#[derive(Clone)]
pub struct UpdaterChain {
    key: ResourceKey,
    from: i32,
    to: i32,
    updaters: Vec<Arc<dyn DataContentUpdater>>,
}

impl UpdaterChain {
    pub(crate) const fn new(
        key: ResourceKey,
        from: i32,
        to: i32,
        updaters: Vec<Arc<dyn DataContentUpdater>>,
    ) -> Self {
        Self { key, from, to, updaters }
    }

    #[must_use]
    pub const fn key(&self) -> &ResourceKey {
        &self.key
    }

    #[must_use]
    pub const fn from_version(&self) -> i32 {
        self.from
    }

    #[must_use]
    pub const fn to_version(&self) -> i32 {
        self.to
    }

    #[must_use]
    pub fn steps(&self) -> &[Arc<dyn DataContentUpdater>] {
        &self.updaters
    }

    /// `(input, output)` of every step, in application order.
    #[must_use]
    pub fn path(&self) -> Vec<(i32, i32)> {
        self.updaters.iter().map(|u| (u.input_version(), u.output_version())).collect()
    }

    /// Runs the chain on a copy of `content`, leaving the caller's record untouched.
    ///
    /// # Errors
    /// Returns [`DataError::UpdateFailed`] naming the first step that rejected the record.
    pub fn apply(&self, content: &DataContainer) -> Result<DataContainer, DataError> {
        self.update(content.clone())
    }
}

impl DataContentUpdater for UpdaterChain {
    fn input_version(&self) -> i32 {
        self.from
    }

    fn output_version(&self) -> i32 {
        self.to
    }

    fn update(&self, mut content: DataContainer) -> Result<DataContainer, DataError> {
        for (step, updater) in self.updaters.iter().enumerate() {
            let (input, output) = (updater.input_version(), updater.output_version());
            content = updater.update(content).map_err(|e| DataError::UpdateFailed {
                message: format!("step {step} ({input} -> {output}) rejected the record: {e}")
                    .into(),
                context: Some(format!("{} {} -> {}", self.key, self.from, self.to).into()),
            })?;
            content.set_content_version(output);
        }
        Ok(content)
    }
}

impl fmt::Debug for UpdaterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdaterChain")
            .field("key", &self.key)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("path", &self.path())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ResourceKey {
        ResourceKey::sponge("test").unwrap()
    }

    fn tagging(input: i32, output: i32) -> Arc<dyn DataContentUpdater> {
        Arc::new(ContentUpdater::new(input, output, move |mut content: DataContainer| {
            let mut trail = content.get_string("Trail").unwrap_or_default().to_owned();
            trail.push_str(&format!("{input}>{output};"));
            content.set("Trail", trail);
            Ok(content)
        }))
    }

    #[test]
    fn chain_applies_steps_in_order_and_stamps_versions() {
        let chain = UpdaterChain::new(key(), 3, 1, vec![tagging(3, 2), tagging(2, 1)]);
        let original = DataContainer::new().with("ContentVersion", 3);

        let updated = chain.apply(&original).unwrap();
        assert_eq!(updated.get_string("Trail"), Some("3>2;2>1;"));
        assert_eq!(updated.content_version(), Some(1));
        assert_eq!(original.content_version(), Some(3));
        assert!(!original.contains("Trail"));
    }

    #[test]
    fn failing_step_is_named() {
        let failing: Arc<dyn DataContentUpdater> =
            Arc::new(ContentUpdater::new(2, 1, |_| Err(DataError::invalid_data("missing Name"))));
        let chain = UpdaterChain::new(key(), 3, 1, vec![tagging(3, 2), failing]);

        let err = chain.apply(&DataContainer::new()).unwrap_err();
        let DataError::UpdateFailed { message, context } = &err else {
            panic!("unexpected error: {err}");
        };
        assert!(message.contains("step 1 (2 -> 1)"), "{message}");
        assert!(message.contains("missing Name"), "{message}");
        assert_eq!(context.as_deref(), Some("sponge:test 3 -> 1"));
    }
}
