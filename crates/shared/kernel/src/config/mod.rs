use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides (`SPONGE__DATA__IMMUTABLE_SHARDS=8`).
pub const ENV_PREFIX: &str = "SPONGE";
const ENV_SEPARATOR: &str = "__";
const DEFAULT_CONFIG: &str = "sponge";

#[sponge_derive::sponge_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads a configuration structure from a file with environment overrides layered on top.
///
/// 1. **Base File**: `path` (any format the `config` crate recognizes by extension, or
///    extension-less lookup). Defaults to `sponge` in the working directory.
/// 2. **Environment Overrides**: variables prefixed with `SPONGE__`, nested with `__`
///    (`SPONGE__DATA__IMMUTABLE_SHARDS` maps to `data.immutable_shards`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is missing, an override is malformed, or
/// the merged values do not deserialize into `T`.
///
/// # Example
/// ```rust,no_run
/// use sponge_kernel::config::load_config;
/// use sponge_kernel::domain::config::SpongeConfig;
///
/// let cfg: SpongeConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .convert_case(config::Case::Snake),
        );

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
