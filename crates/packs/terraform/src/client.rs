use actionpack_http::{HttpResult, send};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, instrument};

use crate::error::TerraformError;

/// Media type of the Terraform Cloud API.
pub const JSON_API: &str = "application/vnd.api+json";

/// Path of the workspace variables endpoint.
pub const VARIABLES_PATH: &str = "/api/v2/vars";

/// Thin client for the Terraform Cloud REST API.
pub struct TerraformClient {
    client: Client,
    host_url: String,
    auth_token: String,
    charset: String,
}

impl std::fmt::Debug for TerraformClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerraformClient")
            .field("host_url", &self.host_url)
            .field("auth_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl TerraformClient {
    pub fn new(
        client: Client,
        host_url: &str,
        auth_token: impl Into<String>,
        charset: impl Into<String>,
    ) -> Self {
        Self {
            client,
            host_url: host_url.trim_end_matches('/').to_owned(),
            auth_token: auth_token.into(),
            charset: charset.into(),
        }
    }

    pub fn variables_url(&self) -> String {
        format!("{}{VARIABLES_PATH}", self.host_url)
    }

    /// POST a variable document and return the raw exchange.
    #[instrument(skip(self, body), fields(url = %self.variables_url()))]
    pub async fn create_variable(&self, body: String) -> Result<HttpResult, TerraformError> {
        let request = self
            .client
            .post(self.variables_url())
            .header(AUTHORIZATION, format!("Bearer {}", self.auth_token))
            .header(CONTENT_TYPE, JSON_API)
            .body(body);
        let result = send(request, &self.charset).await?;
        debug!(status = result.status_code, "variable request finished");
        Ok(result)
    }
}
