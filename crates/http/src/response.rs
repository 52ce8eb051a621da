use actionpack_core::{EXCEPTION, RETURN_CODE, RETURN_RESULT, ResultMap, ReturnCode, STATUS_CODE};
use reqwest::RequestBuilder;
use tracing::{debug, instrument};

use crate::error::HttpError;

/// Output key listing the response headers, one `name: value` per line.
pub const RESPONSE_HEADERS: &str = "responseHeaders";

/// Status, headers and decoded body of an HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResult {
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn headers_text(&self) -> String {
        self.headers
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Result map with the body as return result.
    ///
    /// Non-2xx responses carry return code `-1` and the body as exception.
    pub fn into_result_map(self) -> ResultMap {
        let code = if self.is_success() {
            ReturnCode::Success
        } else {
            ReturnCode::Failure
        };
        let mut map = ResultMap::new()
            .with(STATUS_CODE, self.status_code.to_string())
            .with(RESPONSE_HEADERS, self.headers_text())
            .with(RETURN_CODE, code.as_str());
        if code == ReturnCode::Failure {
            map.insert(EXCEPTION, self.body.clone());
        }
        map.insert(RETURN_RESULT, self.body);
        map
    }
}

/// Send a request and decode the body.
///
/// The body is decoded with the charset declared by the response, falling
/// back to `default_charset`.
#[instrument(skip(request))]
pub async fn send(request: RequestBuilder, default_charset: &str) -> Result<HttpResult, HttpError> {
    let response = request.send().await?;
    let status_code = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|val| (k.to_string(), val.to_owned())))
        .collect();
    let body = response.text_with_charset(default_charset).await?;
    debug!(status_code, body_len = body.len(), "received HTTP response");
    Ok(HttpResult {
        status_code,
        headers,
        body,
    })
}
