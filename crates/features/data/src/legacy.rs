//! Historical string ids still found in stored records.

use crate::error::DataError;
use crate::registration::DataRegistration;
use fxhash::FxHashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::trace;

/// Maps legacy ids to the registration that replaced them. Each id can be bound once.
#[derive(Debug, Default)]
pub(crate) struct LegacyIds {
    ids: FxHashMap<String, Arc<DataRegistration>>,
}

impl LegacyIds {
    pub(crate) fn insert(
        &mut self,
        id: String,
        registration: Arc<DataRegistration>,
    ) -> Result<(), DataError> {
        if id.is_empty() {
            return Err(DataError::InvalidUsage {
                message: "legacy id must not be empty".into(),
                context: Some(registration.key().to_string().into()),
            });
        }
        match self.ids.entry(id) {
            Entry::Occupied(existing) => Err(DataError::DuplicateRegistration {
                message: format!(
                    "legacy id '{}' is already bound to {}",
                    existing.key(),
                    existing.get().key()
                )
                .into(),
                context: Some(registration.key().to_string().into()),
            }),
            Entry::Vacant(slot) => {
                trace!(id = %slot.key(), registration = %registration.key(), "Registering legacy id");
                slot.insert(registration);
                Ok(())
            },
        }
    }

    pub(crate) fn get(&self, id: &str) -> Option<Arc<DataRegistration>> {
        self.ids.get(id).cloned()
    }
}
