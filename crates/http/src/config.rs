use std::time::Duration;

use crate::error::HttpError;

pub const DEFAULT_CONNECTION_TIMEOUT: &str = "-1";
pub const DEFAULT_SOCKET_TIMEOUT: &str = "-1";
pub const DEFAULT_FOLLOW_REDIRECTS: &str = "true";
pub const DEFAULT_PROXY_PORT: &str = "8080";

/// Timeout setting parsed from a millisecond input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// `-1` (or any negative value): keep the client's default.
    Default,
    /// `0`: wait forever.
    Infinite,
    /// Positive milliseconds.
    After(Duration),
}

impl Timeout {
    /// Parse a millisecond value. `-1` is the client default, `0` is infinite.
    pub fn from_millis_input(name: &str, value: &str) -> Result<Self, HttpError> {
        let millis: i64 = value.trim().parse().map_err(|e| {
            HttpError::InvalidConfig(format!("Could not parse '{name}' input: {e}"))
        })?;
        Ok(match millis {
            m if m < 0 => Self::Default,
            0 => Self::Infinite,
            m => Self::After(Duration::from_millis(m.unsigned_abs())),
        })
    }

    /// The duration to hand to the client, if any.
    pub fn duration(self) -> Option<Duration> {
        match self {
            Self::After(d) => Some(d),
            Self::Default | Self::Infinite => None,
        }
    }
}

/// Resolved proxy endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoint {
    pub host: String,
    pub port: u16,
}

impl ProxyEndpoint {
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Per-request configuration produced by [`RequestConfigBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    pub connect_timeout: Timeout,
    pub socket_timeout: Timeout,
    pub proxy: Option<ProxyEndpoint>,
    pub follow_redirects: bool,
}

/// Builds a [`RequestConfig`] from string inputs.
///
/// Empty setter arguments keep the current value, so callers can pass raw
/// action inputs straight through.
#[derive(Debug, Clone)]
pub struct RequestConfigBuilder {
    connection_timeout: String,
    socket_timeout: String,
    follow_redirects: String,
    proxy_host: String,
    proxy_port: String,
}

impl Default for RequestConfigBuilder {
    fn default() -> Self {
        Self {
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT.to_owned(),
            socket_timeout: DEFAULT_SOCKET_TIMEOUT.to_owned(),
            follow_redirects: DEFAULT_FOLLOW_REDIRECTS.to_owned(),
            proxy_host: String::new(),
            proxy_port: DEFAULT_PROXY_PORT.to_owned(),
        }
    }
}

fn set_if_not_empty(target: &mut String, value: &str) {
    if !value.is_empty() {
        value.clone_into(target);
    }
}

impl RequestConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn connection_timeout(mut self, value: &str) -> Self {
        set_if_not_empty(&mut self.connection_timeout, value);
        self
    }

    #[must_use]
    pub fn socket_timeout(mut self, value: &str) -> Self {
        set_if_not_empty(&mut self.socket_timeout, value);
        self
    }

    #[must_use]
    pub fn follow_redirects(mut self, value: &str) -> Self {
        set_if_not_empty(&mut self.follow_redirects, value);
        self
    }

    /// The proxy host is taken as given; an empty host disables the proxy.
    #[must_use]
    pub fn proxy_host(mut self, value: &str) -> Self {
        value.clone_into(&mut self.proxy_host);
        self
    }

    #[must_use]
    pub fn proxy_port(mut self, value: &str) -> Self {
        set_if_not_empty(&mut self.proxy_port, value);
        self
    }

    pub fn build(&self) -> Result<RequestConfig, HttpError> {
        let proxy = if self.proxy_host.is_empty() {
            None
        } else {
            let port = self.proxy_port.trim().parse::<u16>().map_err(|e| {
                HttpError::InvalidConfig(format!("Could not parse 'proxyPort' input: {e}"))
            })?;
            Some(ProxyEndpoint {
                host: self.proxy_host.clone(),
                port,
            })
        };

        Ok(RequestConfig {
            connect_timeout: Timeout::from_millis_input("connectTimeout", &self.connection_timeout)?,
            socket_timeout: Timeout::from_millis_input("socketTimeout", &self.socket_timeout)?,
            proxy,
            follow_redirects: self.follow_redirects.trim().eq_ignore_ascii_case("true"),
        })
    }
}
