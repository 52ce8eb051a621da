//! TLS cipher suites accepted by the mail actions.

pub const TLS_DHE_RSA_WITH_AES_256_GCM_SHA384: &str = "TLS_DHE_RSA_WITH_AES_256_GCM_SHA384";
pub const TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384: &str = "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384";
pub const TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256: &str = "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256";
pub const TLS_DHE_RSA_WITH_AES_256_CBC_SHA256: &str = "TLS_DHE_RSA_WITH_AES_256_CBC_SHA256";
pub const TLS_DHE_RSA_WITH_AES_128_CBC_SHA256: &str = "TLS_DHE_RSA_WITH_AES_128_CBC_SHA256";
pub const TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA384: &str = "TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA384";
pub const TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA256: &str = "TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA256";
pub const TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA256: &str = "TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA256";
pub const TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256: &str = "TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256";
pub const TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA384: &str = "TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA384";
pub const TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384: &str = "TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384";
pub const TLS_RSA_WITH_AES_256_GCM_SHA384: &str = "TLS_RSA_WITH_AES_256_GCM_SHA384";
pub const TLS_RSA_WITH_AES_256_CBC_SHA256: &str = "TLS_RSA_WITH_AES_256_CBC_SHA256";
pub const TLS_RSA_WITH_AES_128_CBC_SHA256: &str = "TLS_RSA_WITH_AES_128_CBC_SHA256";

pub const SUPPORTED_CIPHER_SUITES: [&str; 14] = [
    TLS_DHE_RSA_WITH_AES_256_GCM_SHA384,
    TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
    TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,
    TLS_DHE_RSA_WITH_AES_256_CBC_SHA256,
    TLS_DHE_RSA_WITH_AES_128_CBC_SHA256,
    TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA384,
    TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA256,
    TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA256,
    TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256,
    TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA384,
    TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384,
    TLS_RSA_WITH_AES_256_GCM_SHA384,
    TLS_RSA_WITH_AES_256_CBC_SHA256,
    TLS_RSA_WITH_AES_128_CBC_SHA256,
];

pub fn is_supported(cipher_suite: &str) -> bool {
    SUPPORTED_CIPHER_SUITES.contains(&cipher_suite)
}

/// Check a comma separated cipher list.
///
/// Returns the names that are not supported, in input order. Blank entries
/// are ignored.
pub fn unsupported_cipher_suites(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty() && !is_supported(name))
        .collect()
}

/// Validation message for a cipher list, `None` when every name is known.
pub fn validate_cipher_suites(list: &str) -> Option<String> {
    let unknown = unsupported_cipher_suites(list);
    if unknown.is_empty() {
        None
    } else {
        Some(format!(
            "The encryptionAlgorithm input contains unsupported cipher suites: {}.",
            unknown.join(", ")
        ))
    }
}
