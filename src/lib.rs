//! # Store Listeners
//!
//! Binds UI components to data stores for the length of their mount: a
//! component subscribes to its stores' change events on mount, unsubscribes
//! on unmount, and re-renders when a subscribed store changes.
//!
//! ## Core Concepts
//!
//! - **Registry**: Default listener description per store ID, built at bootstrap
//! - **Listener specs**: A component's list of store IDs or per-store overrides
//! - **Bindings**: One active subscription per (store ID, event) pair
//! - **Dispatch**: Auto-unsubscribe, component handler, re-render
//!
//! ## Example
//!
//! ```ignore
//! use store_listeners::{DescriptionRegistry, DiagnosticsMode, ListenerDescription, StoreBinding};
//!
//! let mut registry = DescriptionRegistry::new();
//! registry.configure(HashMap::from([(
//!     "user".to_string(),
//!     ListenerDescription::new(user_store).event("success", "USER_STORE_SUCCESS"),
//! )]));
//! let registry = Rc::new(registry);
//!
//! // `UserPanel` implements `StoreListener` and declares `["user"]`.
//! let panel = Rc::new(UserPanel::default());
//! let binding = StoreBinding::new(&panel, registry, DiagnosticsMode::from_env());
//! binding.mount()?;
//! ```

pub mod component;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod listeners;
pub mod registry;
pub mod subscriptions;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use component::{EventHandlerFn, HandlerTable, StoreBinding, StoreListener};
pub use config::{DescriptionConfig, DiagnosticsMode, RegistryConfig, UnmountPolicy, MODE_ENV_VAR};
pub use dispatch::{ChangeDispatcher, DispatchOutcome};
pub use error::{ListenerError, Result};
pub use listeners::{ListenerMap, ListenerOptions, ListenerRegistry};
pub use registry::DescriptionRegistry;
pub use subscriptions::{BindingKey, BindingState, SubscriptionManager};
pub use types::*;
