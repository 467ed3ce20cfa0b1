//! Translators convert plain Rust types that have no builder of their own.

use crate::error::DataError;
use fxhash::FxHashMap;
use sponge_domain::{DataContainer, ResourceKey};
use std::any::{Any, TypeId, type_name};
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::{trace, warn};

/// Two-way conversion between `T` and a record.
pub trait DataTranslator<T>: Send + Sync {
    fn key(&self) -> &ResourceKey;

    /// # Errors
    /// Returns [`DataError::InvalidData`] if `container` cannot be read as a `T`.
    fn translate(&self, container: &DataContainer) -> Result<T, DataError>;

    fn translate_to(&self, value: &T) -> DataContainer;
}

#[derive(Debug)]
struct TranslatorEntry {
    key: ResourceKey,
    translator: Box<dyn Any + Send + Sync>,
}

/// One translator per Rust type; the first registration wins.
#[derive(Debug, Default)]
pub(crate) struct Translators {
    by_type: FxHashMap<TypeId, TranslatorEntry>,
}

impl Translators {
    pub(crate) fn insert<T, X>(&mut self, translator: X) -> bool
    where
        T: 'static,
        X: DataTranslator<T> + 'static,
    {
        let key = translator.key().clone();
        match self.by_type.entry(TypeId::of::<T>()) {
            Entry::Occupied(existing) => {
                warn!(
                    target_type = type_name::<T>(),
                    existing = %existing.get().key,
                    rejected = %key,
                    "A DataTranslator has already been registered for this type"
                );
                false
            },
            Entry::Vacant(slot) => {
                trace!(target_type = type_name::<T>(), key = %key, "Registering data translator");
                let translator: Arc<dyn DataTranslator<T>> = Arc::new(translator);
                slot.insert(TranslatorEntry { key, translator: Box::new(translator) });
                true
            },
        }
    }

    pub(crate) fn get<T: 'static>(&self) -> Option<Arc<dyn DataTranslator<T>>> {
        self.by_type
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.translator.downcast_ref::<Arc<dyn DataTranslator<T>>>())
            .cloned()
    }
}
