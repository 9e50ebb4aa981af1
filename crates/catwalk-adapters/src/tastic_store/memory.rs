//! In-memory tastic definition store.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use catwalk_core::{
    application::{ApplicationError, ports::TasticDefinitionStore},
    domain::{DomainValidator as validator, TasticDefinition, TasticMap},
    error::{CatwalkError, CatwalkResult},
};

/// Thread-safe in-memory tastic definition store.
#[derive(Clone, Default)]
pub struct InMemoryTasticStore {
    inner: Arc<RwLock<HashMap<String, TasticDefinition>>>,
}

impl InMemoryTasticStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `definitions`, validating each one.
    pub fn with_definitions(
        definitions: impl IntoIterator<Item = TasticDefinition>,
    ) -> CatwalkResult<Self> {
        let store = Self::new();
        for definition in definitions {
            store.insert(definition)?;
        }
        Ok(store)
    }

    /// Get the number of definitions.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    /// Check if store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all definitions.
    pub fn clear(&self) -> CatwalkResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.clear();
        Ok(())
    }
}

impl TasticDefinitionStore for InMemoryTasticStore {
    fn tastics_by_type(&self) -> CatwalkResult<TasticMap> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner.clone())
    }

    fn get(&self, tastic_type: &str) -> CatwalkResult<TasticDefinition> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.get(tastic_type).cloned().ok_or_else(|| {
            ApplicationError::DefinitionNotFound {
                tastic_type: tastic_type.to_string(),
            }
            .into()
        })
    }

    fn list(&self) -> CatwalkResult<Vec<TasticDefinition>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let mut definitions: Vec<_> = inner.values().cloned().collect();
        definitions.sort_by(|a, b| a.tastic_type.cmp(&b.tastic_type));
        Ok(definitions)
    }

    fn insert(&self, definition: TasticDefinition) -> CatwalkResult<()> {
        // Validate before insertion
        validator::validate_definition(&definition).map_err(CatwalkError::Domain)?;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.insert(definition.tastic_type.clone(), definition);
        Ok(())
    }

    fn remove(&self, tastic_type: &str) -> CatwalkResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        match inner.remove(tastic_type) {
            Some(_) => Ok(()),
            None => Err(ApplicationError::DefinitionNotFound {
                tastic_type: tastic_type.to_string(),
            }
            .into()),
        }
    }
}
