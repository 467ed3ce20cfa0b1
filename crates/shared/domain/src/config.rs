use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration shared across crates.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpongeConfigInner {
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct SpongeConfig {
    #[serde(flatten, default)]
    inner: Arc<SpongeConfigInner>,
}

impl Deref for SpongeConfig {
    type Target = SpongeConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for SpongeConfig {
    fn deref_mut(&mut self) -> &mut SpongeConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Data registry tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Shard count of the immutable-builder map. Zero is treated as one.
    pub immutable_shards: usize,
    /// Warn when a registered builder does not migrate old content versions itself.
    pub advise_unversioned_builders: bool,
    /// Emit a warning with full context when an update chain cannot be resolved.
    pub log_resolution_failures: bool,
}

/// Logger settings consumed at process start.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub name: String,
    pub level: String,
    pub console: bool,
    pub directory: Option<PathBuf>,
    pub json: bool,
    pub env_filter: Option<String>,
}

// --- Default ---

impl Default for DataConfig {
    fn default() -> Self {
        Self { immutable_shards: 4, advise_unversioned_builders: true, log_resolution_failures: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            name: "sponge".to_owned(),
            level: "info".to_owned(),
            console: true,
            directory: None,
            json: false,
            env_filter: None,
        }
    }
}
