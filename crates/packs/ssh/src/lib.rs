//! SSH identity keys.
//!
//! Private keys given inline ([`KeyData`]) or by path ([`KeyFile`]), as
//! accepted by the actions that authenticate with a key pair.

pub mod error;
pub mod key;

pub use error::SshError;
pub use key::{IdentityKey, KeyData, KeyFile, normalize_private_key};
