//! Binding types.

use std::fmt;

/// One (store ID, event name) pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingKey {
    pub store_id: String,
    pub event: String,
}

impl BindingKey {
    pub fn new(store_id: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            event: event.into(),
        }
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.store_id, self.event)
    }
}

/// Whether a pair currently holds a subscription with its store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingState {
    Unbound,
    Bound,
}
