//! Mail content pack.
//!
//! SMTP delivery built on `lettre`, plus the list of TLS cipher suites the
//! pack accepts.

pub mod actions;
pub mod cipher;
pub mod config;
pub mod error;
pub mod smtp;

use std::sync::Arc;

use actionpack_action::DynAction;

pub use actions::SendMail;
pub use cipher::{SUPPORTED_CIPHER_SUITES, validate_cipher_suites};
pub use config::SendMailConfig;
pub use error::MailError;

/// Every action of the pack, ready to register.
pub fn actions() -> Vec<Arc<dyn DynAction>> {
    vec![Arc::new(SendMail::new())]
}
