//! In-memory schema registry
//!
//! Definitions are registered once at process start and are immutable
//! afterwards: a second registration under an existing name is rejected.
//! Lookups and collection-name derivation are read-only, so the registry can
//! be shared freely across concurrent validation calls.

use std::collections::HashMap;

use crate::builtin;
use crate::errors::{SchemaError, SchemaResult};
use crate::types::Schema;

/// Registry of named record definitions
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            schemas: HashMap::new(),
        }
    }

    /// Creates a registry preloaded with the application's definitions
    /// (User, Product, Booking).
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for schema in builtin::all() {
            registry
                .register(schema)
                .expect("builtin definitions are valid");
        }
        registry
    }

    /// Registers a definition.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidSchema` if the definition fails its
    /// structural check, or `SchemaError::SchemaExists` if a definition is
    /// already registered under the same name.
    pub fn register(&mut self, schema: Schema) -> SchemaResult<()> {
        schema.check().map_err(|reason| SchemaError::InvalidSchema {
            schema: schema.name.clone(),
            reason,
        })?;

        if self.schemas.contains_key(&schema.name) {
            return Err(SchemaError::SchemaExists(schema.name));
        }

        self.schemas.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Gets a definition by name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Checks whether a definition exists.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Returns the storage collection identifier for a definition.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownSchema` if no definition is registered
    /// under `name`.
    pub fn collection_name(&self, name: &str) -> SchemaResult<String> {
        self.get(name)
            .map(Schema::collection_name)
            .ok_or_else(|| SchemaError::UnknownSchema(name.to_string()))
    }

    /// Returns all registered definitions.
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    /// Returns the number of registered definitions.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
