//! # Domain Models
//!
//! This crate contains pure data types with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O and no registries, only data and simple helpers.
//!
//! The central type is [`container::DataContainer`], the structured record every
//! builder and content updater consumes.

pub mod capabilities;
pub mod config;
pub mod container;
pub mod key;
pub mod query;

pub use capabilities::BuilderCapabilities;
pub use container::{DataContainer, DataValue};
pub use key::{InvalidResourceKey, ResourceKey};
pub use query::DataQuery;
