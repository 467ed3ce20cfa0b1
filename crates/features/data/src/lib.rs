//! # Data
//!
//! The versioned data registry. A [`DataManager`] maps type keys to the builders that
//! rebuild values from [`DataContainer`](sponge_domain::DataContainer) records, and
//! keeps the content updaters that migrate old records to the current schema.
//!
//! ## Overview
//!
//! * **Builders**: one [`DataBuilder`] per key, first registration wins. Immutable
//!   builders live in a separate, write-once map that accepts late registration.
//! * **Content updaters**: per-key [`DataContentUpdater`]s, stitched into an
//!   [`UpdaterChain`] by a greedy walk over the versions. Custom (plugin) data has its
//!   own independent set.
//! * **Registrations**: a [`DataRegistration`] groups data keys with the
//!   [`DataProvider`]s and [`DataStore`]s serving them; the manager indexes both by key.
//! * **Legacy ids**: historical ids resolve to the [`DataRegistration`] that replaced them.
//! * **Registry types**: [`RegistryTypeCache`] answers which registry a type belongs to.
//!
//! # Example
//!
//! ```rust
//! use sponge_data::{ContentUpdater, DataError, DataManager};
//! use sponge_domain::{DataContainer, ResourceKey};
//!
//! # fn main() -> Result<(), DataError> {
//! let key = ResourceKey::sponge("sign").unwrap();
//! let mut manager = DataManager::new();
//! manager.register_content_updater(key.clone(), ContentUpdater::new(3, 2, |c| Ok(c)));
//! manager.register_content_updater(key.clone(), ContentUpdater::new(2, 1, |c| Ok(c)));
//!
//! let chain = manager.update_chain(&key, 3, 1)?.expect("path 3 -> 2 -> 1");
//! let record = chain.apply(&DataContainer::new().with("ContentVersion", 3))?;
//! assert_eq!(record.content_version(), Some(1));
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
mod immutable;
mod legacy;
mod manager;
mod provider;
mod registration;
mod registry_type;
mod resolver;
mod translator;
mod updater;
mod versioned;

pub use crate::builder::DataBuilder;
pub use crate::error::{DataError, DataErrorExt};
pub use crate::manager::DataManager;
pub use crate::provider::{CustomDataProvider, DataProvider, DataStore};
pub use crate::registration::DataRegistration;
pub use crate::registry_type::RegistryTypeCache;
pub use crate::resolver::ContentUpdaterRegistry;
pub use crate::translator::DataTranslator;
pub use crate::updater::{ContentUpdater, DataContentUpdater, UpdaterChain};
pub use crate::versioned::VersionedDataBuilder;
pub use sponge_domain as domain;
