//! Registry of entity types with occurrence materialization enabled.
//!
//! Owned by the application composition root and populated at startup; the
//! engine never consults process-wide state.

use std::collections::BTreeMap;

use cadence_core::config::UpdateMode;

/// Per-entity-type materialization options.
#[derive(Debug, Clone, Default)]
pub struct RegistryEntry {
    /// Parent attributes copied into every occurrence.
    pub schedulable_fields: Vec<String>,
    /// Overrides the globally configured update mode for this type.
    pub update_mode: Option<UpdateMode>,
}

#[derive(Debug, Default)]
pub struct SchedulableRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl SchedulableRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity type. Re-registering replaces the previous entry.
    pub fn register(&mut self, type_name: impl Into<String>, entry: RegistryEntry) {
        let type_name = type_name.into();
        tracing::debug!(type_name = %type_name, "Registered schedulable type");
        self.entries.insert(type_name, entry);
    }

    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&RegistryEntry> {
        self.entries.get(type_name)
    }

    #[must_use]
    pub fn is_registered(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    /// Registered type names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}
