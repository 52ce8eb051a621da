use std::collections::BTreeMap;
use std::error::Error as StdError;

use serde::{Deserialize, Serialize};

/// Output key holding the primary result text.
pub const RETURN_RESULT: &str = "returnResult";
/// Output key holding `"0"` on success or `"-1"` on failure.
pub const RETURN_CODE: &str = "returnCode";
/// Output key holding the error detail of a failed action.
pub const EXCEPTION: &str = "exception";
/// Output key holding an HTTP status code.
pub const STATUS_CODE: &str = "statusCode";

/// Return code values written to [`RETURN_CODE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnCode {
    Success,
    Failure,
}

impl ReturnCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "0",
            Self::Failure => "-1",
        }
    }
}

/// Flat, string-keyed result of an action.
///
/// Every action returns one of these. The three well-known keys
/// ([`RETURN_RESULT`], [`RETURN_CODE`], [`EXCEPTION`]) follow a uniform
/// contract; actions may add their own keys next to them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultMap(BTreeMap<String, String>);

impl ResultMap {
    /// Create an empty result map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Successful result carrying `result` as the return result.
    #[must_use]
    pub fn success(result: impl Into<String>) -> Self {
        let mut map = Self::new();
        map.insert(RETURN_RESULT, result);
        map.insert(RETURN_CODE, ReturnCode::Success.as_str());
        map
    }

    /// Failed result. The message is used as both return result and exception.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let mut map = Self::new();
        map.insert(RETURN_RESULT, message.clone());
        map.insert(RETURN_CODE, ReturnCode::Failure.as_str());
        map.insert(EXCEPTION, message);
        map
    }

    /// Failed result built from an error and its chain of causes.
    ///
    /// The return result is the error's own message; the exception lists the
    /// error followed by each source, one per line.
    #[must_use]
    pub fn from_error(error: &(dyn StdError + 'static)) -> Self {
        let mut map = Self::new();
        map.insert(RETURN_RESULT, error.to_string());
        map.insert(RETURN_CODE, ReturnCode::Failure.as_str());
        map.insert(EXCEPTION, error_chain(error));
        map
    }

    /// Insert or replace a key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn return_result(&self) -> &str {
        self.get(RETURN_RESULT).unwrap_or_default()
    }

    pub fn return_code(&self) -> &str {
        self.get(RETURN_CODE).unwrap_or_default()
    }

    pub fn exception(&self) -> Option<&str> {
        self.get(EXCEPTION)
    }

    /// `true` when the return code is `"0"`.
    pub fn is_success(&self) -> bool {
        self.return_code() == ReturnCode::Success.as_str()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for ResultMap {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut lines = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        lines.push(format!("caused by: {cause}"));
        source = cause.source();
    }
    lines.join("\n")
}
