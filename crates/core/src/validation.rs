use crate::error::CoreError;
use crate::strings::{is_blank, is_valid_boolean};

/// Accumulates input validation messages.
///
/// Each check appends a human readable message when it fails, so all problems
/// with an action's inputs are reported together.
///
/// ```
/// use actionpack_core::Validation;
///
/// let result = Validation::new()
///     .required("host", "")
///     .port("port", "99999")
///     .finish();
/// assert_eq!(
///     result.unwrap_err().to_string(),
///     "The host input is required.\nThe port input is not a valid port number. Valid values: 1-65535."
/// );
/// ```
#[derive(Debug, Default, Clone)]
pub struct Validation {
    messages: Vec<String>,
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed check unconditionally.
    #[must_use]
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    /// Record `message` when `condition` is false.
    #[must_use]
    pub fn check(self, condition: bool, message: impl FnOnce() -> String) -> Self {
        if condition { self } else { self.error(message()) }
    }

    #[must_use]
    pub fn required(self, name: &str, value: &str) -> Self {
        self.check(!is_blank(value), || format!("The {name} input is required."))
    }

    #[must_use]
    pub fn boolean(self, name: &str, value: &str) -> Self {
        self.check(is_valid_boolean(value), || {
            format!("The {name} input is not a valid boolean value. Valid values: true, false.")
        })
    }

    /// Like [`boolean`](Self::boolean) but accepts an empty value.
    #[must_use]
    pub fn optional_boolean(self, name: &str, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.boolean(name, value)
        }
    }

    #[must_use]
    pub fn integer(self, name: &str, value: &str) -> Self {
        self.check(value.trim().parse::<i64>().is_ok(), || {
            format!("The {name} input is not a valid integer value.")
        })
    }

    #[must_use]
    pub fn non_negative_integer(self, name: &str, value: &str) -> Self {
        self.check(
            value.trim().parse::<i64>().is_ok_and(|v| v >= 0),
            || format!("The {name} input must be an integer greater than or equal to 0."),
        )
    }

    #[must_use]
    pub fn positive_integer(self, name: &str, value: &str) -> Self {
        self.check(
            value.trim().parse::<i64>().is_ok_and(|v| v > 0),
            || format!("The {name} input must be an integer greater than 0."),
        )
    }

    /// Integer greater than or equal to `-1`, the "use the default" sentinel.
    #[must_use]
    pub fn timeout(self, name: &str, value: &str) -> Self {
        self.check(
            value.trim().parse::<i64>().is_ok_and(|v| v >= -1),
            || format!("The {name} input must be an integer greater than or equal to -1."),
        )
    }

    #[must_use]
    pub fn port(self, name: &str, value: &str) -> Self {
        self.check(
            value.trim().parse::<u16>().is_ok_and(|v| v > 0),
            || format!("The {name} input is not a valid port number. Valid values: 1-65535."),
        )
    }

    /// The value must equal one of `allowed`, ignoring case.
    #[must_use]
    pub fn one_of(self, name: &str, value: &str, allowed: &[&str]) -> Self {
        self.check(
            allowed.iter().any(|a| a.eq_ignore_ascii_case(value)),
            || {
                format!(
                    "The {name} input is not valid. Valid values: {}.",
                    allowed.join(", ")
                )
            },
        )
    }

    /// Merge messages collected elsewhere.
    #[must_use]
    pub fn extend(mut self, messages: impl IntoIterator<Item = String>) -> Self {
        self.messages.extend(messages);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }

    /// `Ok(())` when every check passed.
    pub fn finish(self) -> Result<(), CoreError> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidInputs(self.messages))
        }
    }
}
