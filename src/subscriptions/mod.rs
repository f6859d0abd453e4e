//! Change-event bindings between a component's resolved listeners and stores.
//!
//! Every (store ID, event) pair moves through two states:
//!
//! ```text
//!            add_all
//!  Unbound ----------> Bound
//!     ^                  |
//!     +------------------+
//!      remove_one / remove_all
//! ```
//!
//! A pair only becomes bound again through a fresh `add_all`, i.e. on the
//! next mount.
//!
//! # Example
//!
//! ```ignore
//! let listeners = Rc::new(RefCell::new(resolved));
//! let manager = SubscriptionManager::new(listeners, DiagnosticsMode::Development);
//!
//! manager.add_all(|key| ChangeHandler::new(move |_args| println!("{key}")))?;
//! assert_eq!(manager.state("user", "success"), BindingState::Bound);
//!
//! manager.remove_all();
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{BindingKey, BindingState};
