//! Core types shared by the registry, subscription manager and dispatcher.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Identifier of a store in the description registry (e.g. `"user"`).
pub type StoreId = String;

/// Logical event name → store-specific event key (e.g. `success` → `USER_STORE_SUCCESS`).
pub type EventMap = BTreeMap<String, String>;

/// A store that emits named change events.
///
/// Stores are shared and externally owned; bindings only hold an `Rc` for as
/// long as they are active.
pub trait Store {
    /// Subscribe `handler` to changes under `event_key`.
    fn add_change_listener(&self, event_key: &str, handler: ChangeHandler);

    /// Unsubscribe the handler previously registered under `event_key`.
    ///
    /// Handlers compare by identity, see [`ChangeHandler`].
    fn remove_change_listener(&self, event_key: &str, handler: &ChangeHandler);
}

/// Callback handed to a store. Invoked with the store's extra arguments.
///
/// Equality is pointer identity: two clones of the same handler are equal,
/// two handlers built from identical closures are not.
#[derive(Clone)]
pub struct ChangeHandler(Rc<dyn Fn(&[Value])>);

impl ChangeHandler {
    pub fn new(f: impl Fn(&[Value]) + 'static) -> Self {
        ChangeHandler(Rc::new(f))
    }

    /// Invoke the handler.
    pub fn call(&self, args: &[Value]) {
        (self.0)(args)
    }

    /// Whether both handles point at the same callback.
    pub fn same(&self, other: &ChangeHandler) -> bool {
        std::ptr::eq(
            Rc::as_ptr(&self.0) as *const (),
            Rc::as_ptr(&other.0) as *const (),
        )
    }
}

impl PartialEq for ChangeHandler {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for ChangeHandler {}

impl fmt::Debug for ChangeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChangeHandler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// Predicate deciding whether a binding removes itself after firing.
#[derive(Clone)]
pub struct UnmountWhen(Rc<dyn Fn(&dyn Store, &str) -> bool>);

impl UnmountWhen {
    pub fn new(f: impl Fn(&dyn Store, &str) -> bool + 'static) -> Self {
        UnmountWhen(Rc::new(f))
    }

    /// Unsubscribe the first time the event fires.
    pub fn always() -> Self {
        Self::new(|_, _| true)
    }

    /// Never unsubscribe from dispatch.
    pub fn never() -> Self {
        Self::new(|_, _| false)
    }

    pub fn evaluate(&self, store: &dyn Store, event: &str) -> bool {
        (self.0)(store, event)
    }
}

impl fmt::Debug for UnmountWhen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UnmountWhen(..)")
    }
}

/// Per-store listener configuration.
///
/// Registry entries are templates; a component gets its own copy on mount,
/// and only that copy ever carries bindings.
#[derive(Clone)]
pub struct ListenerDescription {
    /// The store to subscribe to.
    pub store: Rc<dyn Store>,
    /// Events this listener subscribes to.
    pub events: EventMap,
    /// Self-removal predicate evaluated on every dispatch.
    pub unmount_when: Option<UnmountWhen>,
    /// Keep listening regardless of `unmount_when`.
    pub listen_always: bool,
    /// Skip the re-render trigger after dispatch.
    pub suppress_update: bool,
    /// Active handler per event name. Absent when unbound.
    pub(crate) bindings: BTreeMap<String, ChangeHandler>,
}

impl ListenerDescription {
    /// A description with no events and default flags.
    pub fn new(store: Rc<dyn Store>) -> Self {
        Self {
            store,
            events: EventMap::new(),
            unmount_when: None,
            listen_always: false,
            suppress_update: false,
            bindings: BTreeMap::new(),
        }
    }

    /// Add an event mapping.
    pub fn event(mut self, name: impl Into<String>, key: impl Into<String>) -> Self {
        self.events.insert(name.into(), key.into());
        self
    }

    pub fn unmount_when(mut self, predicate: UnmountWhen) -> Self {
        self.unmount_when = Some(predicate);
        self
    }

    pub fn listen_always(mut self, listen_always: bool) -> Self {
        self.listen_always = listen_always;
        self
    }

    pub fn suppress_update(mut self, suppress_update: bool) -> Self {
        self.suppress_update = suppress_update;
        self
    }

    /// Handler currently bound for `event`, if any.
    pub fn binding(&self, event: &str) -> Option<&ChangeHandler> {
        self.bindings.get(event)
    }

    /// Number of active bindings.
    pub fn bound_count(&self) -> usize {
        self.bindings.len()
    }
}

impl fmt::Debug for ListenerDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerDescription")
            .field("events", &self.events)
            .field("unmount_when", &self.unmount_when.is_some())
            .field("listen_always", &self.listen_always)
            .field("suppress_update", &self.suppress_update)
            .field("bindings", &self.bindings.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// One entry of a component's `store_listeners` declaration.
///
/// Deserializes from either a bare string or an object:
///
/// ```ignore
/// let specs: Vec<ListenerSpec> =
///     serde_json::from_str(r#"["user", {"name": "session", "events": ["success"]}]"#)?;
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ListenerSpec {
    /// Use the registry default verbatim.
    ById(StoreId),
    /// Merge field overrides onto the registry default.
    ByOverride(ListenerOverride),
}

impl ListenerSpec {
    /// The store ID this entry refers to.
    pub fn store_id(&self) -> &str {
        match self {
            ListenerSpec::ById(id) => id,
            ListenerSpec::ByOverride(o) => &o.name,
        }
    }
}

impl From<&str> for ListenerSpec {
    fn from(id: &str) -> Self {
        ListenerSpec::ById(id.to_string())
    }
}

impl From<String> for ListenerSpec {
    fn from(id: String) -> Self {
        ListenerSpec::ById(id)
    }
}

impl From<ListenerOverride> for ListenerSpec {
    fn from(o: ListenerOverride) -> Self {
        ListenerSpec::ByOverride(o)
    }
}

/// Field overrides for one store. `None` keeps the registry default.
#[derive(Clone, Default, Deserialize)]
pub struct ListenerOverride {
    /// Store ID to look up in the registry.
    pub name: StoreId,
    /// Restrict the event map to these names.
    #[serde(default)]
    pub events: Option<Vec<String>>,
    #[serde(default, alias = "listenAlways")]
    pub listen_always: Option<bool>,
    #[serde(default, alias = "suppressUpdate")]
    pub suppress_update: Option<bool>,
    #[serde(skip)]
    pub unmount_when: Option<UnmountWhen>,
    #[serde(skip)]
    pub store: Option<Rc<dyn Store>>,
}

impl ListenerOverride {
    pub fn new(name: impl Into<StoreId>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events = Some(events.into_iter().map(Into::into).collect());
        self
    }

    pub fn listen_always(mut self, listen_always: bool) -> Self {
        self.listen_always = Some(listen_always);
        self
    }

    pub fn suppress_update(mut self, suppress_update: bool) -> Self {
        self.suppress_update = Some(suppress_update);
        self
    }

    pub fn unmount_when(mut self, predicate: UnmountWhen) -> Self {
        self.unmount_when = Some(predicate);
        self
    }

    pub fn store(mut self, store: Rc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }
}

impl fmt::Debug for ListenerOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerOverride")
            .field("name", &self.name)
            .field("events", &self.events)
            .field("listen_always", &self.listen_always)
            .field("suppress_update", &self.suppress_update)
            .field("unmount_when", &self.unmount_when.is_some())
            .field("store", &self.store.is_some())
            .finish()
    }
}

/// Conventional handler name for a store event: `onUserStoreSuccess`.
pub fn handler_name(store_id: &str, event: &str) -> String {
    format!("on{}Store{}", capitalize(store_id), capitalize(event))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
