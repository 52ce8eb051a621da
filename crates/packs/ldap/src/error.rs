use actionpack_action::ActionError;
use thiserror::Error;

/// Errors raised while talking to the directory.
#[derive(Debug, Error)]
pub enum LdapActionError {
    /// Connection, bind or protocol failure reported by the client.
    #[error("{0}")]
    Ldap(#[from] ldap3::LdapError),

    /// The entry exists but lacks an attribute the action needs.
    #[error("The entry {dn} has no {attribute} attribute.")]
    MissingAttribute { dn: String, attribute: String },

    #[error("LDAP object doesn't exist")]
    NotFound,
}

impl From<LdapActionError> for ActionError {
    fn from(err: LdapActionError) -> Self {
        match err {
            LdapActionError::Ldap(e) => ActionError::Connection(e.to_string()),
            other => ActionError::ExecutionFailed(other.to_string()),
        }
    }
}
