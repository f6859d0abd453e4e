//! Subscription manager for binding resolved listeners to their stores.

use crate::config::DiagnosticsMode;
use crate::error::{ListenerError, Result};
use crate::listeners::ListenerMap;
use crate::types::ChangeHandler;
use std::cell::RefCell;
use std::rc::Rc;

use super::types::{BindingKey, BindingState};

/// Attaches and detaches change handlers for one component's listeners.
///
/// The listener map is shared with the dispatcher. No borrow of it is held
/// while calling into a store, so stores may deliver events (and handlers may
/// unbind) synchronously from inside `add_change_listener` or an emission loop.
#[derive(Clone)]
pub struct SubscriptionManager {
    /// Resolved listeners and their binding slots.
    listeners: Rc<RefCell<ListenerMap>>,
    mode: DiagnosticsMode,
}

impl SubscriptionManager {
    /// Create a manager over a shared listener map.
    pub fn new(listeners: Rc<RefCell<ListenerMap>>, mode: DiagnosticsMode) -> Self {
        Self { listeners, mode }
    }

    /// The shared listener map.
    pub fn listeners(&self) -> &Rc<RefCell<ListenerMap>> {
        &self.listeners
    }

    pub fn mode(&self) -> DiagnosticsMode {
        self.mode
    }

    /// Check that every listener has at least one event.
    ///
    /// Always passes in production mode.
    pub fn validate(&self) -> Result<()> {
        if !self.mode.checks_events() {
            return Ok(());
        }

        let missing = self
            .listeners
            .borrow()
            .iter()
            .find(|(_, d)| d.events.is_empty())
            .map(|(store_id, _)| store_id.clone());

        match missing {
            Some(store_id) => Err(ListenerError::MissingEvents(store_id)),
            None => Ok(()),
        }
    }

    /// Bind every unbound (store ID, event) pair.
    ///
    /// `make_handler` builds the handler for a pair; it is only called for
    /// pairs that are not already bound. Validation runs before anything is
    /// bound, so a configuration error leaves no subscriptions behind.
    ///
    /// Returns the number of newly bound pairs.
    pub fn add_all<F>(&self, make_handler: F) -> Result<usize>
    where
        F: Fn(&BindingKey) -> ChangeHandler,
    {
        self.validate()?;

        let pending: Vec<BindingKey> = self
            .listeners
            .borrow()
            .iter()
            .flat_map(|(store_id, d)| {
                d.events
                    .keys()
                    .filter(move |event| !d.bindings.contains_key(*event))
                    .map(move |event| BindingKey::new(store_id.as_str(), event.as_str()))
            })
            .collect();

        let mut bound = 0;
        for key in pending {
            let handler = make_handler(&key);

            let (store, event_key) = {
                let mut listeners = self.listeners.borrow_mut();
                let Some(description) = listeners.get_mut(&key.store_id) else {
                    continue;
                };
                // A delivery during an earlier subscribe may have rebuilt state.
                if description.bindings.contains_key(&key.event) {
                    continue;
                }
                let Some(event_key) = description.events.get(&key.event).cloned() else {
                    continue;
                };
                description.bindings.insert(key.event.clone(), handler.clone());
                (description.store.clone(), event_key)
            };

            tracing::trace!(store_id = %key.store_id, event = %key.event, %event_key, "binding");
            store.add_change_listener(&event_key, handler);
            bound += 1;
        }

        Ok(bound)
    }

    /// Unbind every bound pair, regardless of unmount predicates.
    ///
    /// Returns the number of pairs unbound.
    pub fn remove_all(&self) -> usize {
        let bound: Vec<BindingKey> = self
            .listeners
            .borrow()
            .iter()
            .flat_map(|(store_id, d)| {
                d.bindings
                    .keys()
                    .map(move |event| BindingKey::new(store_id.as_str(), event.as_str()))
            })
            .collect();

        bound
            .iter()
            .filter(|key| self.remove_one(&key.store_id, &key.event))
            .count()
    }

    /// Unbind one pair. No-op (returns false) if it is not bound.
    ///
    /// The binding slot is cleared before the store is told, so a nested
    /// delivery for the same pair already observes it as unbound. A slot whose
    /// event has no store key is left in place, since the store could not be
    /// told to drop it.
    pub fn remove_one(&self, store_id: &str, event: &str) -> bool {
        let (store, event_key, handler) = {
            let mut listeners = self.listeners.borrow_mut();
            let Some(description) = listeners.get_mut(store_id) else {
                return false;
            };
            if !description.bindings.contains_key(event) {
                return false;
            }
            let Some(event_key) = description.events.get(event).cloned() else {
                tracing::warn!(store_id, event, "bound event missing from event map");
                return false;
            };
            let Some(handler) = description.bindings.remove(event) else {
                return false;
            };
            (description.store.clone(), event_key, handler)
        };

        tracing::trace!(store_id, event, %event_key, "unbinding");
        store.remove_change_listener(&event_key, &handler);
        true
    }

    /// Current state of a pair.
    pub fn state(&self, store_id: &str, event: &str) -> BindingState {
        match self.handler(store_id, event) {
            Some(_) => BindingState::Bound,
            None => BindingState::Unbound,
        }
    }

    /// The handler bound for a pair, if any.
    pub fn handler(&self, store_id: &str, event: &str) -> Option<ChangeHandler> {
        self.listeners
            .borrow()
            .get(store_id)
            .and_then(|d| d.binding(event).cloned())
    }

    /// Total number of bound pairs.
    pub fn bound_count(&self) -> usize {
        self.listeners
            .borrow()
            .values()
            .map(|d| d.bound_count())
            .sum()
    }
}
