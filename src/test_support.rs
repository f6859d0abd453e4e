//! In-memory store and component used by unit tests.

use crate::component::{HandlerTable, StoreListener};
use crate::registry::DescriptionRegistry;
use crate::types::{ChangeHandler, ListenerDescription, ListenerSpec, Store};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Store that records subscriptions and emits on demand.
#[derive(Default)]
pub(crate) struct RecordingStore {
    listeners: RefCell<Vec<(String, ChangeHandler)>>,
    adds: Cell<usize>,
    removes: Cell<usize>,
    deliver_on_add: bool,
}

impl RecordingStore {
    pub(crate) fn shared() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Store that calls each handler once, synchronously, as it is added.
    pub(crate) fn eager() -> Rc<Self> {
        Rc::new(Self {
            deliver_on_add: true,
            ..Self::default()
        })
    }

    /// Call every handler registered under `key`, as snapshotted before the loop.
    pub(crate) fn emit(&self, key: &str, args: &[Value]) {
        let handlers: Vec<ChangeHandler> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, h)| h.clone())
            .collect();
        for handler in handlers {
            handler.call(args);
        }
    }

    pub(crate) fn listener_count(&self, key: &str) -> usize {
        self.listeners.borrow().iter().filter(|(k, _)| k == key).count()
    }

    pub(crate) fn total_listeners(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub(crate) fn adds(&self) -> usize {
        self.adds.get()
    }

    pub(crate) fn removes(&self) -> usize {
        self.removes.get()
    }
}

impl Store for RecordingStore {
    fn add_change_listener(&self, event_key: &str, handler: ChangeHandler) {
        self.adds.set(self.adds.get() + 1);
        self.listeners
            .borrow_mut()
            .push((event_key.to_string(), handler.clone()));
        if self.deliver_on_add {
            handler.call(&[]);
        }
    }

    fn remove_change_listener(&self, event_key: &str, handler: &ChangeHandler) {
        self.removes.set(self.removes.get() + 1);
        self.listeners
            .borrow_mut()
            .retain(|(k, h)| !(k == event_key && h == handler));
    }
}

/// Registry with a single `user` store emitting `success` and `error`.
pub(crate) fn user_registry() -> (DescriptionRegistry, Rc<RecordingStore>) {
    let store = RecordingStore::shared();
    let mut defaults = HashMap::new();
    defaults.insert(
        "user".to_string(),
        ListenerDescription::new(store.clone())
            .event("success", "USER_STORE_SUCCESS")
            .event("error", "USER_STORE_ERROR"),
    );

    let mut registry = DescriptionRegistry::new();
    registry.configure(defaults);
    (registry, store)
}

/// Component with a `user`/`success` handler and a counting re-render trigger.
pub(crate) struct TestComponent {
    specs: Vec<ListenerSpec>,
    rerender: bool,
    calls: RefCell<Vec<(String, Vec<Value>)>>,
    renders: Cell<usize>,
}

impl TestComponent {
    pub(crate) fn new(specs: Vec<ListenerSpec>) -> Self {
        Self {
            specs,
            rerender: true,
            calls: RefCell::new(Vec::new()),
            renders: Cell::new(0),
        }
    }

    pub(crate) fn without_rerender(mut self) -> Self {
        self.rerender = false;
        self
    }

    pub(crate) fn handlers() -> HandlerTable<Self> {
        let mut table = HandlerTable::new();
        table.on("user", "success", |c: &TestComponent, args| {
            c.calls
                .borrow_mut()
                .push(("onUserStoreSuccess".to_string(), args.to_vec()));
        });
        table
    }

    pub(crate) fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.borrow().clone()
    }

    pub(crate) fn renders(&self) -> usize {
        self.renders.get()
    }

    fn record_render(&self) {
        self.renders.set(self.renders.get() + 1);
    }
}

impl StoreListener for TestComponent {
    fn store_listeners(&self) -> Vec<ListenerSpec> {
        self.specs.clone()
    }

    fn register_handlers(&self, handlers: &mut HandlerTable<Self>) {
        *handlers = Self::handlers();
    }

    fn rerender_trigger(&self) -> Option<fn(&Self)> {
        if self.rerender {
            Some(Self::record_render)
        } else {
            None
        }
    }
}
