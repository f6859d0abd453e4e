//! Component-side capability interface and the mount/unmount lifecycle.

use crate::config::DiagnosticsMode;
use crate::dispatch::{ChangeDispatcher, DispatchOutcome};
use crate::error::Result;
use crate::listeners::{ListenerMap, ListenerOptions, ListenerRegistry};
use crate::registry::DescriptionRegistry;
use crate::subscriptions::{BindingState, SubscriptionManager};
use crate::types::{ChangeHandler, ListenerSpec, UnmountWhen};
use serde_json::Value;
use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// A component method handling one store event.
pub type EventHandlerFn<C> = Rc<dyn Fn(&C, &[Value])>;

/// What a component exposes to its store listeners.
///
/// Everything except [`store_listeners`](StoreListener::store_listeners) is
/// optional.
pub trait StoreListener {
    /// Stores this component listens to.
    fn store_listeners(&self) -> Vec<ListenerSpec>;

    /// Component-wide unmount predicate, used for listeners without their own.
    fn unmount_when(&self) -> Option<UnmountWhen> {
        None
    }

    /// Declared update suppression. Declaring it disables the implicit
    /// unsubscribe-after-first-change default.
    fn suppress_update(&self) -> Option<bool> {
        None
    }

    /// Register per-event handlers, e.g. the `onUserStoreSuccess` equivalent
    /// for `("user", "success")`.
    fn register_handlers(&self, _handlers: &mut HandlerTable<Self>)
    where
        Self: Sized,
    {
    }

    /// Re-render trigger, if the component has one.
    fn rerender_trigger(&self) -> Option<fn(&Self)>
    where
        Self: Sized,
    {
        None
    }

    /// Name used in diagnostics.
    fn display_name(&self) -> Option<String> {
        None
    }
}

/// Explicit (store ID, event) → handler table, built once per mount.
pub struct HandlerTable<C> {
    handlers: HashMap<String, HashMap<String, EventHandlerFn<C>>>,
}

impl<C> HandlerTable<C> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register `handler` for `event` on `store_id`, replacing any previous one.
    pub fn on<F>(&mut self, store_id: impl Into<String>, event: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&C, &[Value]) + 'static,
    {
        self.handlers
            .entry(store_id.into())
            .or_default()
            .insert(event.into(), Rc::new(handler));
        self
    }

    pub fn get(&self, store_id: &str, event: &str) -> Option<EventHandlerFn<C>> {
        self.handlers.get(store_id)?.get(event).cloned()
    }

    pub fn contains(&self, store_id: &str, event: &str) -> bool {
        self.handlers
            .get(store_id)
            .is_some_and(|events| events.contains_key(event))
    }

    pub fn len(&self) -> usize {
        self.handlers.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C> Default for HandlerTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared state reached from bound handlers through a `Weak`.
struct BindingInner<C> {
    component: Weak<C>,
    registry: Rc<DescriptionRegistry>,
    dispatcher: ChangeDispatcher<C>,
    mounted: Cell<bool>,
}

impl<C: StoreListener + 'static> BindingInner<C> {
    fn deliver(&self, store_id: &str, event: &str, args: &[Value]) -> DispatchOutcome {
        match self.component.upgrade() {
            Some(component) => self.dispatcher.on_store_event(&component, store_id, event, args),
            None => {
                tracing::debug!(store_id, event, "component dropped, ignoring change");
                DispatchOutcome::default()
            }
        }
    }
}

/// Ties a component's store subscriptions to its mount lifecycle.
///
/// Holds the component weakly; stores hold only weak references back to the
/// binding, so neither side keeps the other alive. Dropping the binding
/// unmounts it.
///
/// # Example
///
/// ```ignore
/// let registry = Rc::new(registry);
/// let component = Rc::new(UserPanel::default());
/// let binding = StoreBinding::new(&component, registry, DiagnosticsMode::from_env());
///
/// binding.mount()?;    // componentDidMount
/// // ... stores emit, handlers run, component re-renders ...
/// binding.unmount();   // componentWillUnmount
/// ```
pub struct StoreBinding<C: StoreListener + 'static> {
    inner: Rc<BindingInner<C>>,
}

impl<C: StoreListener + 'static> StoreBinding<C> {
    pub fn new(component: &Rc<C>, registry: Rc<DescriptionRegistry>, mode: DiagnosticsMode) -> Self {
        let listeners = Rc::new(RefCell::new(ListenerMap::new()));
        let subscriptions = SubscriptionManager::new(listeners, mode);

        Self {
            inner: Rc::new(BindingInner {
                component: Rc::downgrade(component),
                registry,
                dispatcher: ChangeDispatcher::new(subscriptions),
                mounted: Cell::new(false),
            }),
        }
    }

    /// Resolve the component's listeners and bind them all.
    ///
    /// Mounting an already-mounted binding releases its current bindings and
    /// resolves afresh. On error nothing stays bound.
    ///
    /// Returns the number of bound (store ID, event) pairs.
    pub fn mount(&self) -> Result<usize> {
        if self.inner.mounted.get() {
            self.unmount();
        }

        let Some(component) = self.inner.component.upgrade() else {
            tracing::debug!("component dropped before mount");
            return Ok(0);
        };

        let options = ListenerOptions {
            unmount_when: component.unmount_when(),
            suppress_update: component.suppress_update(),
        };
        let resolved =
            ListenerRegistry::new(&self.inner.registry).resolve(&component.store_listeners(), &options);

        let mut handlers = HandlerTable::new();
        component.register_handlers(&mut handlers);
        self.inner.dispatcher.set_handlers(handlers);

        let subscriptions = self.subscriptions();
        *subscriptions.listeners().borrow_mut() = resolved;

        let weak = Rc::downgrade(&self.inner);
        let result = subscriptions.add_all(|key| {
            let weak = weak.clone();
            let key = key.clone();
            ChangeHandler::new(move |args| {
                if let Some(inner) = weak.upgrade() {
                    inner.deliver(&key.store_id, &key.event, args);
                }
            })
        });

        match result {
            Ok(bound) => {
                self.inner.mounted.set(true);
                let name = component.display_name().unwrap_or_default();
                tracing::debug!(component = %name, bound, "mounted store listeners");
                Ok(bound)
            }
            Err(e) => {
                subscriptions.listeners().borrow_mut().clear();
                Err(e)
            }
        }
    }

    /// Unbind everything and discard the resolved listeners.
    ///
    /// Returns the number of pairs that were still bound.
    pub fn unmount(&self) -> usize {
        let subscriptions = self.subscriptions();
        let released = subscriptions.remove_all();
        subscriptions.listeners().borrow_mut().clear();
        self.inner.mounted.set(false);

        tracing::debug!(released, "unmounted store listeners");
        released
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    pub fn is_bound(&self, store_id: &str, event: &str) -> bool {
        self.subscriptions().state(store_id, event) == BindingState::Bound
    }

    pub fn bound_count(&self) -> usize {
        self.subscriptions().bound_count()
    }

    /// The handler currently registered with the store for a pair.
    pub fn handler(&self, store_id: &str, event: &str) -> Option<ChangeHandler> {
        self.subscriptions().handler(store_id, event)
    }

    /// The resolved listeners (empty while unmounted).
    pub fn listeners(&self) -> Ref<'_, ListenerMap> {
        self.subscriptions().listeners().borrow()
    }

    /// Deliver a change directly, as a bound handler would.
    pub fn dispatch(&self, store_id: &str, event: &str, args: &[Value]) -> DispatchOutcome {
        self.inner.deliver(store_id, event, args)
    }

    fn subscriptions(&self) -> &SubscriptionManager {
        self.inner.dispatcher.subscriptions()
    }
}

impl<C: StoreListener + 'static> Drop for StoreBinding<C> {
    fn drop(&mut self) {
        if self.inner.mounted.get() {
            self.unmount();
        }
    }
}
