//! Parameter definitions of the cloud content packs.
//!
//! Input names, descriptions and validation for the Oracle Cloud
//! Infrastructure and Amazon Service Catalog actions.

pub mod amazon;
pub mod error;
pub mod oci;

pub use error::CloudError;
