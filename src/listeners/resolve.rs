//! Merging listener specs with registry defaults.

use crate::registry::DescriptionRegistry;
use crate::types::{EventMap, ListenerDescription, ListenerOverride, ListenerSpec, StoreId, UnmountWhen};
use std::collections::BTreeMap;

/// Resolved listeners of one component, keyed by store ID.
pub type ListenerMap = BTreeMap<StoreId, ListenerDescription>;

/// Component-level declarations that shape resolution.
#[derive(Clone, Debug, Default)]
pub struct ListenerOptions {
    /// Fallback predicate for descriptions that carry none.
    pub unmount_when: Option<UnmountWhen>,
    /// Declared update suppression. Declaring it (either value) opts out of
    /// the implicit one-shot predicate.
    pub suppress_update: Option<bool>,
}

impl ListenerOptions {
    /// Predicate installed on descriptions without their own.
    fn fallback_unmount_when(&self) -> Option<UnmountWhen> {
        match (&self.unmount_when, self.suppress_update) {
            (Some(predicate), _) => Some(predicate.clone()),
            (None, None) => Some(UnmountWhen::always()),
            (None, Some(_)) => None,
        }
    }
}

/// Resolves listener specs against a [`DescriptionRegistry`].
pub struct ListenerRegistry<'a> {
    defaults: &'a DescriptionRegistry,
}

impl<'a> ListenerRegistry<'a> {
    pub fn new(defaults: &'a DescriptionRegistry) -> Self {
        Self { defaults }
    }

    /// Build the resolved listener map for a component.
    ///
    /// Entries naming a store with no registry default are dropped. A later
    /// entry for the same store replaces an earlier one.
    pub fn resolve(&self, specs: &[ListenerSpec], options: &ListenerOptions) -> ListenerMap {
        let mut resolved = ListenerMap::new();

        for spec in specs {
            let Some(default) = self.defaults.get(spec.store_id()) else {
                tracing::debug!(store_id = spec.store_id(), "no listener default, skipping");
                continue;
            };

            let description = match spec {
                ListenerSpec::ById(_) => default.clone(),
                ListenerSpec::ByOverride(o) => merge(default, o),
            };
            resolved.insert(spec.store_id().to_string(), description);
        }

        if let Some(fallback) = options.fallback_unmount_when() {
            for description in resolved.values_mut() {
                if description.unmount_when.is_none() {
                    description.unmount_when = Some(fallback.clone());
                }
            }
        }

        resolved
    }
}

/// Shallow merge, override wins per field.
fn merge(default: &ListenerDescription, o: &ListenerOverride) -> ListenerDescription {
    let mut description = default.clone();

    if let Some(store) = &o.store {
        description.store = store.clone();
    }
    if let Some(events) = &o.events {
        description.events = select_events(&o.name, &default.events, events);
    }
    if let Some(predicate) = &o.unmount_when {
        description.unmount_when = Some(predicate.clone());
    }
    if let Some(listen_always) = o.listen_always {
        description.listen_always = listen_always;
    }
    if let Some(suppress_update) = o.suppress_update {
        description.suppress_update = suppress_update;
    }

    description
}

/// Keep only the named events, with keys taken from the default map.
/// Names missing from the default are dropped.
fn select_events(store_id: &str, defaults: &EventMap, names: &[String]) -> EventMap {
    names
        .iter()
        .filter_map(|name| match defaults.get(name) {
            Some(key) => Some((name.clone(), key.clone())),
            None => {
                tracing::debug!(store_id, event = %name, "event not in listener default, dropping");
                None
            }
        })
        .collect()
}
