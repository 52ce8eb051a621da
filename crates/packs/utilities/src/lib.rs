//! Utilities content pack.

pub mod default_if_empty;

use std::sync::Arc;

use actionpack_action::DynAction;

pub use default_if_empty::{DefaultIfEmpty, default_if_blank_or_empty};

/// Every action of the pack, ready to register.
pub fn actions() -> Vec<Arc<dyn DynAction>> {
    vec![Arc::new(DefaultIfEmpty::new())]
}
