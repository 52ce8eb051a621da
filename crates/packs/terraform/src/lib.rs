//! Terraform content pack.
//!
//! Creates workspace variables through the Terraform Cloud (or Terraform
//! Enterprise) REST API, using the shared HTTP client inputs.

pub mod actions;
pub mod client;
pub mod error;
pub mod types;

use std::sync::Arc;

use actionpack_action::DynAction;

pub use actions::CreateVariables;
pub use client::TerraformClient;
pub use error::TerraformError;
pub use types::{VariableAttributes, VariableDocument, VariableEntry};

/// Every action of the pack, ready to register.
pub fn actions() -> Vec<Arc<dyn DynAction>> {
    vec![Arc::new(CreateVariables::new())]
}
