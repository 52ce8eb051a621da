use std::time::Duration;

use actionpack_core::{InputSpec, Inputs, Validation};
use reqwest::{Certificate, Client, Proxy, redirect};
use tracing::{debug, warn};

use crate::config::{RequestConfig, RequestConfigBuilder, Timeout};
use crate::error::HttpError;

pub const PROXY_HOST: &str = "proxyHost";
pub const PROXY_PORT: &str = "proxyPort";
pub const PROXY_USERNAME: &str = "proxyUsername";
pub const PROXY_PASSWORD: &str = "proxyPassword";
pub const TRUST_ALL_ROOTS: &str = "trustAllRoots";
pub const X509_HOSTNAME_VERIFIER: &str = "x509HostnameVerifier";
pub const TRUST_KEYSTORE: &str = "trustKeystore";
pub const TRUST_PASSWORD: &str = "trustPassword";
pub const CONNECT_TIMEOUT: &str = "connectTimeout";
pub const SOCKET_TIMEOUT: &str = "socketTimeout";
pub const EXECUTION_TIMEOUT: &str = "executionTimeout";
pub const KEEP_ALIVE: &str = "keepAlive";
pub const CONNECTIONS_MAX_PER_ROUTE: &str = "connectionsMaxPerRoute";
pub const CONNECTIONS_MAX_TOTAL: &str = "connectionsMaxTotal";
pub const RESPONSE_CHARACTER_SET: &str = "responseCharacterSet";

pub const DEFAULT_CONNECT_TIMEOUT: &str = "10000";
pub const DEFAULT_SOCKET_TIMEOUT: &str = "0";
pub const DEFAULT_EXECUTION_TIMEOUT: &str = "60000";
pub const DEFAULT_CONNECTIONS_MAX_PER_ROUTE: &str = "2";
pub const DEFAULT_CONNECTIONS_MAX_TOTAL: &str = "20";
pub const DEFAULT_CHARACTER_SET: &str = "UTF-8";

const X509_VERIFIERS: [&str; 3] = ["strict", "browser_compatible", "allow_all"];

/// Hostname verification policy for TLS connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostnameVerifier {
    Strict,
    BrowserCompatible,
    AllowAll,
}

impl HostnameVerifier {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "allow_all" => Self::AllowAll,
            "browser_compatible" => Self::BrowserCompatible,
            _ => Self::Strict,
        }
    }
}

/// Inputs shared by every HTTP-backed action.
///
/// Timeouts are in milliseconds; `0` means no timeout.
#[derive(Clone)]
pub struct HttpClientInputs {
    pub proxy_host: String,
    pub proxy_port: String,
    pub proxy_username: String,
    pub proxy_password: String,
    pub trust_all_roots: String,
    pub x509_hostname_verifier: String,
    pub trust_keystore: String,
    pub trust_password: String,
    pub connect_timeout: String,
    pub socket_timeout: String,
    pub execution_timeout: String,
    pub keep_alive: String,
    pub connections_max_per_route: String,
    pub connections_max_total: String,
    pub response_character_set: String,
}

impl std::fmt::Debug for HttpClientInputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClientInputs")
            .field("proxy_host", &self.proxy_host)
            .field("proxy_port", &self.proxy_port)
            .field("proxy_username", &self.proxy_username)
            .field("proxy_password", &"[REDACTED]")
            .field("trust_all_roots", &self.trust_all_roots)
            .field("x509_hostname_verifier", &self.x509_hostname_verifier)
            .field("trust_keystore", &self.trust_keystore)
            .field("trust_password", &"[REDACTED]")
            .field("connect_timeout", &self.connect_timeout)
            .field("socket_timeout", &self.socket_timeout)
            .field("execution_timeout", &self.execution_timeout)
            .field("keep_alive", &self.keep_alive)
            .field("connections_max_per_route", &self.connections_max_per_route)
            .field("connections_max_total", &self.connections_max_total)
            .field("response_character_set", &self.response_character_set)
            .finish()
    }
}

impl HttpClientInputs {
    /// Read the common inputs, applying defaults to empty values.
    pub fn from_inputs(inputs: &Inputs) -> Self {
        Self {
            proxy_host: inputs.get(PROXY_HOST).to_owned(),
            proxy_port: inputs.get_or(PROXY_PORT, "8080"),
            proxy_username: inputs.get(PROXY_USERNAME).to_owned(),
            proxy_password: inputs.get(PROXY_PASSWORD).to_owned(),
            trust_all_roots: inputs.get_or(TRUST_ALL_ROOTS, "false"),
            x509_hostname_verifier: inputs.get_or(X509_HOSTNAME_VERIFIER, "strict"),
            trust_keystore: inputs.get(TRUST_KEYSTORE).to_owned(),
            trust_password: inputs.get(TRUST_PASSWORD).to_owned(),
            connect_timeout: inputs.get_or(CONNECT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT),
            socket_timeout: inputs.get_or(SOCKET_TIMEOUT, DEFAULT_SOCKET_TIMEOUT),
            execution_timeout: inputs.get_or(EXECUTION_TIMEOUT, DEFAULT_EXECUTION_TIMEOUT),
            keep_alive: inputs.get_or(KEEP_ALIVE, "true"),
            connections_max_per_route: inputs
                .get_or(CONNECTIONS_MAX_PER_ROUTE, DEFAULT_CONNECTIONS_MAX_PER_ROUTE),
            connections_max_total: inputs
                .get_or(CONNECTIONS_MAX_TOTAL, DEFAULT_CONNECTIONS_MAX_TOTAL),
            response_character_set: inputs.get_or(RESPONSE_CHARACTER_SET, DEFAULT_CHARACTER_SET),
        }
    }

    /// Input declarations for action specs.
    pub fn input_specs() -> Vec<InputSpec> {
        vec![
            InputSpec::new(PROXY_HOST).describe("Proxy server used to access the web site."),
            InputSpec::new(PROXY_PORT)
                .describe("Proxy server port.")
                .default_value("8080"),
            InputSpec::new(PROXY_USERNAME).describe("User name used when connecting to the proxy."),
            InputSpec::new(PROXY_PASSWORD)
                .encrypted()
                .describe("Proxy server password associated with the proxyUsername input value."),
            InputSpec::new(TRUST_ALL_ROOTS)
                .describe("Whether to trust certificates not issued by a trusted authority.")
                .default_value("false"),
            InputSpec::new(X509_HOSTNAME_VERIFIER)
                .describe("Hostname verification: strict, browser_compatible or allow_all.")
                .default_value("strict"),
            InputSpec::new(TRUST_KEYSTORE)
                .describe("PEM file with additional trusted CA certificates."),
            InputSpec::new(TRUST_PASSWORD)
                .encrypted()
                .describe("Password of the trust keystore. Unused for PEM files."),
            InputSpec::new(CONNECT_TIMEOUT)
                .describe("Milliseconds to wait for a connection. 0 means no timeout.")
                .default_value(DEFAULT_CONNECT_TIMEOUT),
            InputSpec::new(SOCKET_TIMEOUT)
                .describe("Milliseconds to wait for data between packets. 0 means no timeout.")
                .default_value(DEFAULT_SOCKET_TIMEOUT),
            InputSpec::new(EXECUTION_TIMEOUT)
                .describe("Milliseconds the whole request may take. 0 means no timeout.")
                .default_value(DEFAULT_EXECUTION_TIMEOUT),
            InputSpec::new(KEEP_ALIVE)
                .describe("Whether connections are kept alive for reuse.")
                .default_value("true"),
            InputSpec::new(CONNECTIONS_MAX_PER_ROUTE)
                .describe("Maximum idle connections kept per host.")
                .default_value(DEFAULT_CONNECTIONS_MAX_PER_ROUTE),
            InputSpec::new(CONNECTIONS_MAX_TOTAL)
                .describe("Maximum connections overall.")
                .default_value(DEFAULT_CONNECTIONS_MAX_TOTAL),
            InputSpec::new(RESPONSE_CHARACTER_SET)
                .describe("Character set used when the response does not declare one.")
                .default_value(DEFAULT_CHARACTER_SET),
        ]
    }

    /// Validation messages for the common inputs.
    pub fn verify(&self) -> Vec<String> {
        let mut validation = Validation::new()
            .port(PROXY_PORT, &self.proxy_port)
            .boolean(TRUST_ALL_ROOTS, &self.trust_all_roots)
            .one_of(X509_HOSTNAME_VERIFIER, &self.x509_hostname_verifier, &X509_VERIFIERS)
            .non_negative_integer(CONNECT_TIMEOUT, &self.connect_timeout)
            .non_negative_integer(SOCKET_TIMEOUT, &self.socket_timeout)
            .non_negative_integer(EXECUTION_TIMEOUT, &self.execution_timeout)
            .boolean(KEEP_ALIVE, &self.keep_alive)
            .positive_integer(CONNECTIONS_MAX_PER_ROUTE, &self.connections_max_per_route)
            .positive_integer(CONNECTIONS_MAX_TOTAL, &self.connections_max_total);
        if !self.trust_keystore.is_empty() && !std::path::Path::new(&self.trust_keystore).is_file() {
            validation = validation.error(format!(
                "The {TRUST_KEYSTORE} input does not point to an existing file."
            ));
        }
        validation.into_messages()
    }

    fn request_config(&self) -> Result<RequestConfig, HttpError> {
        RequestConfigBuilder::new()
            .connection_timeout(&self.connect_timeout)
            .socket_timeout(&self.socket_timeout)
            .proxy_host(&self.proxy_host)
            .proxy_port(&self.proxy_port)
            .build()
    }

    fn execution_timeout(&self) -> Result<Timeout, HttpError> {
        Timeout::from_millis_input(EXECUTION_TIMEOUT, &self.execution_timeout)
    }

    /// Build a `reqwest::Client` honoring proxy, TLS, timeout and pool inputs.
    pub fn build_client(&self) -> Result<Client, HttpError> {
        let config = self.request_config()?;
        let mut builder = Client::builder().redirect(if config.follow_redirects {
            redirect::Policy::default()
        } else {
            redirect::Policy::none()
        });

        if let Some(timeout) = config.connect_timeout.duration() {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.socket_timeout.duration() {
            builder = builder.read_timeout(timeout);
        }
        if let Some(timeout) = self.execution_timeout()?.duration() {
            builder = builder.timeout(timeout);
        }

        if let Some(proxy) = &config.proxy {
            let mut reqwest_proxy = Proxy::all(proxy.url())?;
            if !self.proxy_username.is_empty() {
                reqwest_proxy = reqwest_proxy.basic_auth(&self.proxy_username, &self.proxy_password);
            }
            debug!(proxy = %proxy.url(), "using proxy");
            builder = builder.proxy(reqwest_proxy);
        }

        let trust_all = self.trust_all_roots.eq_ignore_ascii_case("true");
        let verifier = HostnameVerifier::parse(&self.x509_hostname_verifier);
        if trust_all || verifier == HostnameVerifier::AllowAll {
            warn!("TLS certificate verification is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if !self.trust_keystore.is_empty() {
            for certificate in load_pem_certificates(&self.trust_keystore)? {
                builder = builder.add_root_certificate(certificate);
            }
        }

        let keep_alive = self.keep_alive.eq_ignore_ascii_case("true");
        let max_idle = if keep_alive {
            parse_count(CONNECTIONS_MAX_PER_ROUTE, &self.connections_max_per_route)?
        } else {
            0
        };
        builder = builder.pool_max_idle_per_host(max_idle);

        Ok(builder.build()?)
    }
}

fn parse_count(name: &str, value: &str) -> Result<usize, HttpError> {
    value
        .trim()
        .parse()
        .map_err(|e| HttpError::InvalidConfig(format!("Could not parse '{name}' input: {e}")))
}

/// Read every certificate from a PEM bundle.
fn load_pem_certificates(path: &str) -> Result<Vec<Certificate>, HttpError> {
    const END: &str = "-----END CERTIFICATE-----";

    let text = std::fs::read_to_string(path).map_err(|source| HttpError::TrustStore {
        path: path.to_owned(),
        source,
    })?;

    let mut certificates = Vec::new();
    let mut rest = text.as_str();
    while let Some(start) = rest.find("-----BEGIN CERTIFICATE-----") {
        let Some(end) = rest[start..].find(END) else {
            break;
        };
        let block_end = start + end + END.len();
        certificates.push(Certificate::from_pem(rest[start..block_end].as_bytes())?);
        rest = &rest[block_end..];
    }

    if certificates.is_empty() {
        return Err(HttpError::InvalidConfig(format!(
            "The {TRUST_KEYSTORE} file {path} contains no PEM certificates."
        )));
    }
    Ok(certificates)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_applied() {
        let inputs = HttpClientInputs::from_inputs(&Inputs::new());
        assert_eq!(inputs.proxy_port, "8080");
        assert_eq!(inputs.trust_all_roots, "false");
        assert_eq!(inputs.x509_hostname_verifier, "strict");
        assert_eq!(inputs.connect_timeout, "10000");
        assert_eq!(inputs.socket_timeout, "0");
        assert_eq!(inputs.keep_alive, "true");
        assert_eq!(inputs.response_character_set, "UTF-8");
        assert!(inputs.verify().is_empty());
    }

    #[test]
    fn verify_reports_every_bad_input() {
        let raw = Inputs::new()
            .with(PROXY_PORT, "x")
            .with(TRUST_ALL_ROOTS, "maybe")
            .with(X509_HOSTNAME_VERIFIER, "loose")
            .with(CONNECT_TIMEOUT, "-5")
            .with(KEEP_ALIVE, "sometimes")
            .with(CONNECTIONS_MAX_PER_ROUTE, "0")
            .with(TRUST_KEYSTORE, "/definitely/not/here.pem");
        let messages = HttpClientInputs::from_inputs(&raw).verify();
        assert_eq!(messages.len(), 7);
    }

    #[test]
    fn builds_client_with_proxy_and_timeouts() {
        let raw = Inputs::new()
            .with(PROXY_HOST, "proxy.local")
            .with(PROXY_USERNAME, "user")
            .with(PROXY_PASSWORD, "pass")
            .with(SOCKET_TIMEOUT, "500")
            .with(TRUST_ALL_ROOTS, "true");
        assert!(HttpClientInputs::from_inputs(&raw).build_client().is_ok());
    }

    #[test]
    fn build_client_rejects_bad_port() {
        let raw = Inputs::new()
            .with(PROXY_HOST, "proxy.local")
            .with(PROXY_PORT, "abc");
        let err = HttpClientInputs::from_inputs(&raw).build_client().unwrap_err();
        assert!(err.to_string().contains("proxyPort"));
    }

    #[test]
    fn trust_keystore_without_certificates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not a certificate").unwrap();
        let raw = Inputs::new().with(TRUST_KEYSTORE, file.path().to_str().unwrap());
        let err = HttpClientInputs::from_inputs(&raw).build_client().unwrap_err();
        assert!(err.to_string().contains("contains no PEM certificates"));
    }

    #[test]
    fn debug_redacts_passwords() {
        let raw = Inputs::new().with(PROXY_PASSWORD, "hunter2");
        let debug = format!("{:?}", HttpClientInputs::from_inputs(&raw));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn hostname_verifier_parsing() {
        assert_eq!(HostnameVerifier::parse("ALLOW_ALL"), HostnameVerifier::AllowAll);
        assert_eq!(
            HostnameVerifier::parse("browser_compatible"),
            HostnameVerifier::BrowserCompatible
        );
        assert_eq!(HostnameVerifier::parse("strict"), HostnameVerifier::Strict);
    }
}
