//! LDAP content pack for Active Directory computer accounts.

pub mod actions;
pub mod connection;
pub mod error;
pub mod service;

use std::sync::Arc;

use actionpack_action::DynAction;

pub use actions::{GetComputerAccountOu, ResetComputerAccount};
pub use connection::LdapConnection;
pub use error::LdapActionError;

/// Every action of the pack, ready to register.
pub fn actions() -> Vec<Arc<dyn DynAction>> {
    vec![
        Arc::new(GetComputerAccountOu::new()),
        Arc::new(ResetComputerAccount::new()),
    ]
}
