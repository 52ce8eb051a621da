use std::time::Duration;

use actionpack_core::strings::to_boolean_lenient;
use actionpack_core::{CoreError, InputSpec, Inputs, Validation};
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings};
use tracing::{debug, instrument, warn};

use crate::error::LdapActionError;

pub const HOST: &str = "host";
pub const USERNAME: &str = "username";
pub const PASSWORD: &str = "password";
pub const USE_SSL: &str = "useSSL";
pub const TRUST_ALL_ROOTS: &str = "trustAllRoots";
pub const KEYSTORE: &str = "keystore";
pub const KEYSTORE_PASSWORD: &str = "keystorePassword";
pub const TRUST_KEYSTORE: &str = "trustKeystore";
pub const TRUST_PASSWORD: &str = "trustPassword";
pub const TIMEOUT: &str = "timeout";

pub const DEFAULT_USE_SSL: &str = "false";
pub const DEFAULT_TRUST_ALL_ROOTS: &str = "true";
pub const DEFAULT_TIMEOUT: &str = "30";

const LDAP_PORT: u16 = 389;
const LDAPS_PORT: u16 = 636;

/// Connection settings shared by the directory actions.
#[derive(Clone)]
pub struct LdapConnection {
    pub host: String,
    pub username: String,
    pub password: String,
    pub use_ssl: bool,
    pub trust_all_roots: bool,
    pub keystore: String,
    pub keystore_password: String,
    pub trust_keystore: String,
    pub trust_password: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for LdapConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapConnection")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("use_ssl", &self.use_ssl)
            .field("trust_all_roots", &self.trust_all_roots)
            .field("keystore", &self.keystore)
            .field("trust_keystore", &self.trust_keystore)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Input specs for the connection inputs, `host` included.
pub fn input_specs() -> Vec<InputSpec> {
    vec![
        InputSpec::new(HOST)
            .required()
            .describe("Domain controller host, optionally with a port."),
        InputSpec::new(USERNAME).describe("User to bind as. Empty binds anonymously."),
        InputSpec::new(PASSWORD).encrypted(),
        InputSpec::new(USE_SSL)
            .describe("true to connect with LDAPS.")
            .default_value(DEFAULT_USE_SSL),
        InputSpec::new(TRUST_ALL_ROOTS)
            .describe("true to accept any server certificate.")
            .default_value(DEFAULT_TRUST_ALL_ROOTS),
        InputSpec::new(KEYSTORE),
        InputSpec::new(KEYSTORE_PASSWORD).encrypted(),
        InputSpec::new(TRUST_KEYSTORE),
        InputSpec::new(TRUST_PASSWORD).encrypted(),
        InputSpec::new(TIMEOUT)
            .describe("Connect and operation timeout in seconds.")
            .default_value(DEFAULT_TIMEOUT),
    ]
}

impl LdapConnection {
    /// Resolve and validate the connection inputs.
    pub fn from_inputs(inputs: &Inputs) -> Result<Self, CoreError> {
        let use_ssl = inputs.get_or(USE_SSL, DEFAULT_USE_SSL);
        let trust_all_roots = inputs.get_or(TRUST_ALL_ROOTS, DEFAULT_TRUST_ALL_ROOTS);
        let timeout = inputs.get_or(TIMEOUT, DEFAULT_TIMEOUT);
        Validation::new()
            .required(HOST, inputs.get(HOST))
            .boolean(USE_SSL, use_ssl.trim())
            .boolean(TRUST_ALL_ROOTS, trust_all_roots.trim())
            .positive_integer(TIMEOUT, &timeout)
            .finish()?;

        Ok(Self {
            host: inputs.get(HOST).trim().to_owned(),
            username: inputs.get(USERNAME).to_owned(),
            password: inputs.get(PASSWORD).to_owned(),
            use_ssl: to_boolean_lenient(&use_ssl),
            trust_all_roots: to_boolean_lenient(&trust_all_roots),
            keystore: inputs.get(KEYSTORE).to_owned(),
            keystore_password: inputs.get(KEYSTORE_PASSWORD).to_owned(),
            trust_keystore: inputs.get(TRUST_KEYSTORE).to_owned(),
            trust_password: inputs.get(TRUST_PASSWORD).to_owned(),
            timeout: Duration::from_secs(timeout.trim().parse().unwrap_or(30)),
        })
    }

    /// Server URL, with the default port for the scheme unless the host
    /// names one.
    pub fn url(&self) -> String {
        let (scheme, port) = if self.use_ssl {
            ("ldaps", LDAPS_PORT)
        } else {
            ("ldap", LDAP_PORT)
        };
        if has_port(&self.host) {
            format!("{scheme}://{}", self.host)
        } else if is_bare_ipv6(&self.host) {
            format!("{scheme}://[{}]:{port}", self.host)
        } else {
            format!("{scheme}://{}:{port}", self.host)
        }
    }

    /// Open a connection and bind.
    ///
    /// An empty username skips the bind and stays anonymous.
    #[instrument(skip(self), fields(host = %self.host, ssl = self.use_ssl))]
    pub async fn connect(&self) -> Result<Ldap, LdapActionError> {
        if !self.keystore.is_empty() || !self.trust_keystore.is_empty() {
            warn!("keystore inputs are ignored; platform trust roots are used");
        }
        let settings = LdapConnSettings::new()
            .set_conn_timeout(self.timeout)
            .set_no_tls_verify(self.trust_all_roots);
        let url = self.url();
        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &url).await?;
        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "LDAP connection closed with error");
            }
        });

        if self.username.is_empty() {
            debug!("using anonymous session");
        } else {
            ldap.with_timeout(self.timeout)
                .simple_bind(&self.username, &self.password)
                .await?
                .success()?;
            debug!(user = %self.username, "bound to directory");
        }
        Ok(ldap)
    }
}

/// An IPv6 literal without brackets, such as `::1`.
fn is_bare_ipv6(host: &str) -> bool {
    !host.contains(']') && host.matches(':').count() > 1
}

fn has_port(host: &str) -> bool {
    if is_bare_ipv6(host) {
        return false;
    }
    // Bracketed IPv6 literals carry the port after the closing bracket.
    let tail = host.rsplit_once(']').map_or(host, |(_, rest)| rest);
    tail.rsplit_once(':')
        .is_some_and(|(_, port)| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection(host: &str, ssl: &str) -> LdapConnection {
        LdapConnection::from_inputs(&Inputs::new().with(HOST, host).with(USE_SSL, ssl)).unwrap()
    }

    #[test]
    fn defaults() {
        let conn = connection("dc1.example.com", "");
        assert!(!conn.use_ssl);
        assert!(conn.trust_all_roots);
        assert_eq!(conn.timeout, Duration::from_secs(30));
    }

    #[test]
    fn url_uses_scheme_default_port() {
        assert_eq!(connection("dc1", "false").url(), "ldap://dc1:389");
        assert_eq!(connection("dc1", "true").url(), "ldaps://dc1:636");
    }

    #[test]
    fn url_keeps_explicit_port() {
        assert_eq!(connection("dc1:3268", "false").url(), "ldap://dc1:3268");
        assert_eq!(connection("[::1]:1636", "true").url(), "ldaps://[::1]:1636");
        assert_eq!(connection("[::1]", "true").url(), "ldaps://[::1]:636");
    }

    #[test]
    fn bare_ipv6_host_has_no_port() {
        assert!(!has_port("::1"));
        assert!(!has_port("fe80::1:389"));
        assert_eq!(connection("::1", "false").url(), "ldap://[::1]:389");
        assert_eq!(
            connection("2001:db8::10", "true").url(),
            "ldaps://[2001:db8::10]:636"
        );
    }

    #[test]
    fn validation_collects_all_problems() {
        let err = LdapConnection::from_inputs(
            &Inputs::new()
                .with(USE_SSL, "maybe")
                .with(TIMEOUT, "0"),
        )
        .unwrap_err();
        let CoreError::InvalidInputs(messages) = err else {
            panic!("expected invalid inputs");
        };
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], "The host input is required.");
    }

    #[test]
    fn debug_redacts_password() {
        let conn = LdapConnection::from_inputs(
            &Inputs::new().with(HOST, "dc1").with(PASSWORD, "hunter2"),
        )
        .unwrap();
        let debug = format!("{conn:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }
}
