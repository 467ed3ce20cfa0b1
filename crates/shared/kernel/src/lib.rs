//! Kernel utilities shared across slices.
//! Keep this crate lightweight: configuration loading and logger bootstrap only.
//!
//! ## Config loading
//! ```rust,no_run
//! use sponge_kernel::config::load_config;
//! use sponge_kernel::domain::config::SpongeConfig;
//!
//! let cfg: SpongeConfig = load_config(Some("sponge")).unwrap_or_default();
//! let _logger = sponge_kernel::logging::init_logger(&cfg.logging);
//! ```

pub mod config;
pub mod logging;

pub use sponge_domain as domain;
