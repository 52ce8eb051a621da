use std::time::Duration;

use actionpack_core::strings::{split_list, to_boolean_lenient};
use actionpack_core::{CoreError, InputSpec, Inputs, Validation};

use crate::cipher::{SUPPORTED_CIPHER_SUITES, validate_cipher_suites};

pub const HOSTNAME: &str = "hostname";
pub const PORT: &str = "port";
pub const FROM: &str = "from";
pub const TO: &str = "to";
pub const CC: &str = "cc";
pub const BCC: &str = "bcc";
pub const SUBJECT: &str = "subject";
pub const BODY: &str = "body";
pub const HTML_EMAIL: &str = "htmlEmail";
pub const USERNAME: &str = "username";
pub const PASSWORD: &str = "password";
pub const ENABLE_TLS: &str = "enableTLS";
pub const TLS_VERSION: &str = "tlsVersion";
pub const ENCRYPTION_ALGORITHM: &str = "encryptionAlgorithm";
pub const TRUST_ALL_ROOTS: &str = "trustAllRoots";
pub const TIMEOUT: &str = "timeout";

pub const DEFAULT_PORT: &str = "25";
pub const DEFAULT_HTML_EMAIL: &str = "true";
pub const DEFAULT_ENABLE_TLS: &str = "false";
pub const DEFAULT_TLS_VERSION: &str = "TLSv1.2";
pub const DEFAULT_TRUST_ALL_ROOTS: &str = "false";
pub const DEFAULT_TIMEOUT: &str = "30";

const TLS_VERSIONS: &[&str] = &["TLSv1.2", "TLSv1.3"];

/// Minimum TLS protocol version for the STARTTLS upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinTlsVersion {
    Tls12,
    Tls13,
}

/// Resolved inputs of the send-mail action.
#[derive(Clone)]
pub struct SendMailConfig {
    pub hostname: String,
    pub port: u16,
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,
    pub html: bool,
    pub username: String,
    pub password: String,
    pub enable_tls: bool,
    pub tls_version: MinTlsVersion,
    pub cipher_suites: Vec<String>,
    pub trust_all_roots: bool,
    pub timeout: Duration,
}

impl std::fmt::Debug for SendMailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendMailConfig")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("subject", &self.subject)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("enable_tls", &self.enable_tls)
            .field("tls_version", &self.tls_version)
            .field("trust_all_roots", &self.trust_all_roots)
            .finish_non_exhaustive()
    }
}

pub fn input_specs() -> Vec<InputSpec> {
    vec![
        InputSpec::new(HOSTNAME).required().describe("SMTP server host."),
        InputSpec::new(PORT).default_value(DEFAULT_PORT),
        InputSpec::new(FROM).required().describe("Sender address."),
        InputSpec::new(TO)
            .required()
            .describe("Comma separated recipient addresses."),
        InputSpec::new(CC).describe("Comma separated CC addresses."),
        InputSpec::new(BCC).describe("Comma separated BCC addresses."),
        InputSpec::new(SUBJECT).required(),
        InputSpec::new(BODY).required(),
        InputSpec::new(HTML_EMAIL)
            .describe("true to send the body as HTML.")
            .default_value(DEFAULT_HTML_EMAIL),
        InputSpec::new(USERNAME),
        InputSpec::new(PASSWORD).encrypted(),
        InputSpec::new(ENABLE_TLS)
            .describe("true to upgrade the connection with STARTTLS.")
            .default_value(DEFAULT_ENABLE_TLS),
        InputSpec::new(TLS_VERSION)
            .describe("Minimum TLS version: TLSv1.2 or TLSv1.3.")
            .default_value(DEFAULT_TLS_VERSION),
        InputSpec::new(ENCRYPTION_ALGORITHM)
            .describe("Comma separated cipher suites. Defaults to every supported suite."),
        InputSpec::new(TRUST_ALL_ROOTS).default_value(DEFAULT_TRUST_ALL_ROOTS),
        InputSpec::new(TIMEOUT)
            .describe("Connection timeout in seconds.")
            .default_value(DEFAULT_TIMEOUT),
    ]
}

fn owned_list(value: &str) -> Vec<String> {
    split_list(value).into_iter().map(str::to_owned).collect()
}

impl SendMailConfig {
    pub fn from_inputs(inputs: &Inputs) -> Result<Self, CoreError> {
        let port = inputs.get_or(PORT, DEFAULT_PORT);
        let html = inputs.get_or(HTML_EMAIL, DEFAULT_HTML_EMAIL);
        let enable_tls = inputs.get_or(ENABLE_TLS, DEFAULT_ENABLE_TLS);
        let tls_version = inputs.get_or(TLS_VERSION, DEFAULT_TLS_VERSION);
        let trust_all_roots = inputs.get_or(TRUST_ALL_ROOTS, DEFAULT_TRUST_ALL_ROOTS);
        let timeout = inputs.get_or(TIMEOUT, DEFAULT_TIMEOUT);
        let ciphers = inputs.get(ENCRYPTION_ALGORITHM);

        Validation::new()
            .required(HOSTNAME, inputs.get(HOSTNAME))
            .required(FROM, inputs.get(FROM))
            .required(TO, inputs.get(TO))
            .port(PORT, &port)
            .boolean(HTML_EMAIL, html.trim())
            .boolean(ENABLE_TLS, enable_tls.trim())
            .one_of(TLS_VERSION, tls_version.trim(), TLS_VERSIONS)
            .boolean(TRUST_ALL_ROOTS, trust_all_roots.trim())
            .positive_integer(TIMEOUT, &timeout)
            .extend(validate_cipher_suites(ciphers))
            .finish()?;

        let cipher_suites = if ciphers.trim().is_empty() {
            SUPPORTED_CIPHER_SUITES.iter().map(|c| (*c).to_owned()).collect()
        } else {
            owned_list(ciphers)
        };

        Ok(Self {
            hostname: inputs.get(HOSTNAME).trim().to_owned(),
            port: port.trim().parse().unwrap_or(25),
            from: inputs.get(FROM).trim().to_owned(),
            to: owned_list(inputs.get(TO)),
            cc: owned_list(inputs.get(CC)),
            bcc: owned_list(inputs.get(BCC)),
            subject: inputs.get(SUBJECT).to_owned(),
            body: inputs.get(BODY).to_owned(),
            html: to_boolean_lenient(&html),
            username: inputs.get(USERNAME).to_owned(),
            password: inputs.get(PASSWORD).to_owned(),
            enable_tls: to_boolean_lenient(&enable_tls),
            tls_version: if tls_version.trim().eq_ignore_ascii_case("TLSv1.3") {
                MinTlsVersion::Tls13
            } else {
                MinTlsVersion::Tls12
            },
            cipher_suites,
            trust_all_roots: to_boolean_lenient(&trust_all_roots),
            timeout: Duration::from_secs(timeout.trim().parse().unwrap_or(30)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Inputs {
        Inputs::new()
            .with(HOSTNAME, "smtp.example.com")
            .with(FROM, "ops@example.com")
            .with(TO, "a@example.com, b@example.com")
            .with(SUBJECT, "hi")
            .with(BODY, "<p>hello</p>")
    }

    #[test]
    fn defaults_apply() {
        let config = SendMailConfig::from_inputs(&base()).unwrap();
        assert_eq!(config.port, 25);
        assert!(config.html);
        assert!(!config.enable_tls);
        assert_eq!(config.tls_version, MinTlsVersion::Tls12);
        assert_eq!(config.to, vec!["a@example.com", "b@example.com"]);
        assert_eq!(config.cipher_suites.len(), 14);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn explicit_tls_settings() {
        let inputs = base()
            .with(ENABLE_TLS, "TRUE")
            .with(TLS_VERSION, "TLSv1.3")
            .with(ENCRYPTION_ALGORITHM, "TLS_RSA_WITH_AES_256_GCM_SHA384");
        let config = SendMailConfig::from_inputs(&inputs).unwrap();
        assert!(config.enable_tls);
        assert_eq!(config.tls_version, MinTlsVersion::Tls13);
        assert_eq!(config.cipher_suites, vec!["TLS_RSA_WITH_AES_256_GCM_SHA384"]);
    }

    #[test]
    fn invalid_values_are_collected() {
        let inputs = base()
            .with(PORT, "0")
            .with(TLS_VERSION, "SSLv3")
            .with(ENCRYPTION_ALGORITHM, "RC4");
        let CoreError::InvalidInputs(messages) = SendMailConfig::from_inputs(&inputs).unwrap_err()
        else {
            panic!("expected invalid inputs");
        };
        assert_eq!(messages.len(), 3);
        assert!(messages[2].contains("RC4"));
    }

    #[test]
    fn debug_redacts_password() {
        let config = SendMailConfig::from_inputs(&base().with(PASSWORD, "s3cret")).unwrap();
        assert!(!format!("{config:?}").contains("s3cret"));
    }
}
