//! Per-component listener resolution.
//!
//! A component declares which stores it listens to as a list of
//! [`ListenerSpec`](crate::ListenerSpec) entries. Resolution merges each entry
//! with the registry default for that store and produces the component's own
//! [`ListenerMap`], which the subscription manager then binds.

mod resolve;

pub use resolve::{ListenerMap, ListenerOptions, ListenerRegistry};
