//! Default listener descriptions keyed by store ID.
//!
//! Built once at application bootstrap and shared (`Rc`) with every
//! [`StoreBinding`](crate::StoreBinding) that depends on it.

use crate::config::{RegistryConfig, UnmountPolicy};
use crate::error::{ListenerError, Result};
use crate::types::{ListenerDescription, Store, StoreId, UnmountWhen};
use std::collections::HashMap;
use std::rc::Rc;

/// Store ID → default [`ListenerDescription`].
#[derive(Clone, Debug, Default)]
pub struct DescriptionRegistry {
    defaults: HashMap<StoreId, ListenerDescription>,
}

impl DescriptionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from a ready-made map.
    pub fn with_defaults(defaults: HashMap<StoreId, ListenerDescription>) -> Self {
        Self { defaults }
    }

    /// Build a registry from declarative config, attaching live stores by ID.
    pub fn from_config(
        config: &RegistryConfig,
        stores: &HashMap<StoreId, Rc<dyn Store>>,
    ) -> Result<Self> {
        let mut defaults = HashMap::with_capacity(config.stores.len());

        for (id, entry) in &config.stores {
            let store = stores
                .get(id)
                .cloned()
                .ok_or_else(|| ListenerError::StoreNotProvided(id.clone()))?;

            let mut description = ListenerDescription::new(store)
                .listen_always(entry.listen_always)
                .suppress_update(entry.suppress_update);
            description.events = entry.events.clone();
            description.unmount_when = entry.unmount.map(|policy| match policy {
                UnmountPolicy::Always => UnmountWhen::always(),
                UnmountPolicy::Never => UnmountWhen::never(),
            });

            defaults.insert(id.clone(), description);
        }

        Ok(Self { defaults })
    }

    /// Replace the entire default map. Previous entries are discarded.
    pub fn configure(&mut self, defaults: HashMap<StoreId, ListenerDescription>) {
        tracing::debug!(stores = defaults.len(), "configured listener defaults");
        self.defaults = defaults;
    }

    /// Default description for `store_id`.
    pub fn get(&self, store_id: &str) -> Option<&ListenerDescription> {
        self.defaults.get(store_id)
    }

    pub fn contains(&self, store_id: &str) -> bool {
        self.defaults.contains_key(store_id)
    }

    pub fn len(&self) -> usize {
        self.defaults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty()
    }
}
