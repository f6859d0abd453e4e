//! Delivery of store change events to the owning component.

use crate::component::{HandlerTable, StoreListener};
use crate::config::DiagnosticsMode;
use crate::subscriptions::SubscriptionManager;
use crate::types::handler_name;
use serde_json::Value;
use std::cell::RefCell;

/// What a single dispatch did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// The store ID had a resolved listener.
    pub delivered: bool,
    /// The pair was unbound by its unmount predicate.
    pub unsubscribed: bool,
    /// A registered component handler ran.
    pub handled: bool,
    /// The re-render trigger ran.
    pub rerendered: bool,
}

/// Runs the post-change steps for one component: auto-unsubscribe, handler
/// call, re-render.
pub struct ChangeDispatcher<C> {
    subscriptions: SubscriptionManager,
    handlers: RefCell<HandlerTable<C>>,
}

impl<C: StoreListener> ChangeDispatcher<C> {
    pub fn new(subscriptions: SubscriptionManager) -> Self {
        Self {
            subscriptions,
            handlers: RefCell::new(HandlerTable::new()),
        }
    }

    pub fn subscriptions(&self) -> &SubscriptionManager {
        &self.subscriptions
    }

    /// Replace the handler table (done once per mount).
    pub fn set_handlers(&self, handlers: HandlerTable<C>) {
        *self.handlers.borrow_mut() = handlers;
    }

    /// Handle a change emitted by the store bound as `store_id` for `event`.
    ///
    /// Safe to run reentrantly: no borrow of the listener map or handler table
    /// is held while calling the predicate, the component or the store.
    pub fn on_store_event(
        &self,
        component: &C,
        store_id: &str,
        event: &str,
        args: &[Value],
    ) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();

        let detail = self.subscriptions.listeners().borrow().get(store_id).map(|d| {
            (
                d.store.clone(),
                d.unmount_when.clone(),
                d.listen_always,
                d.suppress_update,
            )
        });
        let Some((store, unmount_when, listen_always, suppress_update)) = detail else {
            tracing::debug!(store_id, event, "change for unknown listener ignored");
            return outcome;
        };
        outcome.delivered = true;

        if let Some(predicate) = unmount_when.filter(|_| !listen_always) {
            if predicate.evaluate(store.as_ref(), event) {
                outcome.unsubscribed = self.subscriptions.remove_one(store_id, event);
                tracing::debug!(store_id, event, "listener unmounted after change");
            }
        }

        let handler = self.handlers.borrow().get(store_id, event);
        if let Some(handler) = handler {
            tracing::trace!(store_id, event, handler = %handler_name(store_id, event), "calling change handler");
            handler(component, args);
            outcome.handled = true;
        }

        if suppress_update {
            return outcome;
        }
        if let Some(force_update) = component.rerender_trigger() {
            if self.subscriptions.mode() == DiagnosticsMode::Performance {
                warn_forced_update(component);
            }
            force_update(component);
            outcome.rerendered = true;
        }

        outcome
    }
}

fn warn_forced_update<C: StoreListener>(component: &C) {
    match component.display_name() {
        Some(name) => tracing::warn!(
            component = %name,
            "Forced updates are an antipattern. Check the render method of {}.",
            name
        ),
        None => tracing::warn!("Forced updates are an antipattern."),
    }
}
