//! Helpers for logging user-supplied and secret strings safely.

/// Truncates `s` to at most `max_bytes` without splitting a UTF-8 character.
///
/// ```
/// use tutor_relay::utils::string_utils::truncate_safe;
///
/// assert_eq!(truncate_safe("Olá, mundo", 3), "Ol");
/// ```
pub fn truncate_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    &s[..end]
}

/// Keeps a short prefix of a secret (authorization codes, access tokens) so
/// log lines can be correlated without leaking the value.
pub fn redact(secret: &str, visible: usize) -> String {
    let prefix = truncate_safe(secret, visible);
    if prefix.len() < secret.len() {
        format!("{}...", prefix)
    } else {
        "***".to_string()
    }
}
