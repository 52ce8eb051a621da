pub mod config;
pub mod error;
pub mod inputs;
pub mod response;

pub use config::{ProxyEndpoint, RequestConfig, RequestConfigBuilder, Timeout};
pub use error::HttpError;
pub use inputs::{HostnameVerifier, HttpClientInputs};
pub use response::{HttpResult, RESPONSE_HEADERS, send};
