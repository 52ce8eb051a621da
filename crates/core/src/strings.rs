//! Small string helpers shared by the packs.

use crate::error::CoreError;

/// `true` when the value is empty or only whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn default_if_empty<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() { default } else { value }
}

pub fn default_if_blank<'a>(value: &'a str, default: &'a str) -> &'a str {
    if is_blank(value) { default } else { value }
}

/// `true` when the value is `true` or `false`, ignoring case.
pub fn is_valid_boolean(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
}

/// Strict boolean parsing: only `true`/`false`, ignoring case.
pub fn to_boolean(value: &str) -> Result<bool, CoreError> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(CoreError::InvalidInput(format!(
            "{value} is not a valid boolean. Valid values: true, false."
        )))
    }
}

/// Lenient boolean parsing: anything but `true` (ignoring case) is `false`.
pub fn to_boolean_lenient(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Split on a literal delimiter, dropping trailing empty fields.
///
/// An empty input yields a single empty field, and an empty delimiter yields
/// the whole value as one field.
pub fn split_fields<'a>(value: &'a str, delimiter: &str) -> Vec<&'a str> {
    if value.is_empty() || delimiter.is_empty() {
        return vec![value];
    }
    let mut fields: Vec<&str> = value.split(delimiter).collect();
    while fields.len() > 1 && fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    if fields.len() == 1 && fields[0].is_empty() && !value.is_empty() {
        // only delimiters
        fields.clear();
    }
    fields
}

/// Split on a comma, trim each item and skip empty ones.
pub fn split_list(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Remove characters that are not allowed in an XML 1.0 document.
pub fn replace_invalid_xml_characters(value: &str) -> String {
    value
        .chars()
        .filter(|&c| {
            matches!(c,
                '\u{9}' | '\u{A}' | '\u{D}'
                | '\u{20}'..='\u{D7FF}'
                | '\u{E000}'..='\u{FFFD}'
                | '\u{10000}'..='\u{10FFFF}')
        })
        .collect()
}
