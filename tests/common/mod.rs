//! Shared fixtures for integration tests.

#![allow(dead_code)]

use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use store_listeners::{
    ChangeHandler, DescriptionRegistry, HandlerTable, ListenerDescription, ListenerSpec, Store,
    StoreListener, UnmountWhen,
};

/// Flux-style store: handlers per event key, emission over a snapshot.
#[derive(Default)]
pub struct EventStore {
    listeners: RefCell<Vec<(String, ChangeHandler)>>,
    deliver_on_add: bool,
}

impl EventStore {
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// A store that calls each handler once as soon as it is added.
    pub fn eager() -> Rc<Self> {
        Rc::new(Self {
            deliver_on_add: true,
            ..Self::default()
        })
    }

    pub fn emit(&self, key: &str, args: &[Value]) {
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

    pub fn listener_count(&self, key: &str) -> usize {
        self.listeners.borrow().iter().filter(|(k, _)| k == key).count()
    }

    pub fn total_listeners(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Store for EventStore {
    fn add_change_listener(&self, event_key: &str, handler: ChangeHandler) {
        self.listeners
            .borrow_mut()
            .push((event_key.to_string(), handler.clone()));
        if self.deliver_on_add {
            handler.call(&[]);
        }
    }

    fn remove_change_listener(&self, event_key: &str, handler: &ChangeHandler) {
        self.listeners
            .borrow_mut()
            .retain(|(k, h)| !(k == event_key && h == handler));
    }
}

/// Log output captured from a `tracing_subscriber` writer.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Run `f` with WARN-level events written into these logs.
    pub fn capture_warnings<R>(&self, f: impl FnOnce() -> R) -> R {
        let logs = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || logs.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Registry with `user` (success/error) and `session` (expired) stores.
pub fn app_registry() -> (Rc<DescriptionRegistry>, Rc<EventStore>, Rc<EventStore>) {
    let users = EventStore::shared();
    let sessions = EventStore::shared();

    let mut defaults = HashMap::new();
    defaults.insert(
        "user".to_string(),
        ListenerDescription::new(users.clone())
            .event("success", "USER_STORE_SUCCESS")
            .event("error", "USER_STORE_ERROR"),
    );
    defaults.insert(
        "session".to_string(),
        ListenerDescription::new(sessions.clone()).event("expired", "SESSION_EXPIRED"),
    );

    let mut registry = DescriptionRegistry::new();
    registry.configure(defaults);
    (Rc::new(registry), users, sessions)
}

/// A panel that records handler calls and re-renders.
pub struct UserPanel {
    pub specs: Vec<ListenerSpec>,
    pub unmount_when: Option<UnmountWhen>,
    pub suppress_update: Option<bool>,
    pub name: Option<String>,
    pub successes: RefCell<Vec<Vec<Value>>>,
    pub errors: Cell<usize>,
    pub renders: Cell<usize>,
}

impl UserPanel {
    pub fn new<I, S>(specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ListenerSpec>,
    {
        Self {
            specs: specs.into_iter().map(Into::into).collect(),
            unmount_when: None,
            suppress_update: None,
            name: None,
            successes: RefCell::new(Vec::new()),
            errors: Cell::new(0),
            renders: Cell::new(0),
        }
    }

    fn on_user_store_success(&self, args: &[Value]) {
        self.successes.borrow_mut().push(args.to_vec());
    }

    fn on_user_store_error(&self, _args: &[Value]) {
        self.errors.set(self.errors.get() + 1);
    }

    fn force_update(&self) {
        self.renders.set(self.renders.get() + 1);
    }
}

impl StoreListener for UserPanel {
    fn store_listeners(&self) -> Vec<ListenerSpec> {
        self.specs.clone()
    }

    fn unmount_when(&self) -> Option<UnmountWhen> {
        self.unmount_when.clone()
    }

    fn suppress_update(&self) -> Option<bool> {
        self.suppress_update
    }

    fn register_handlers(&self, handlers: &mut HandlerTable<Self>) {
        handlers
            .on("user", "success", Self::on_user_store_success)
            .on("user", "error", Self::on_user_store_error);
    }

    fn rerender_trigger(&self) -> Option<fn(&Self)> {
        Some(Self::force_update)
    }

    fn display_name(&self) -> Option<String> {
        self.name.clone()
    }
}
