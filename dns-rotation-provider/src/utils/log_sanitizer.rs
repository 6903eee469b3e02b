//! Keeps API tokens and oversized response bodies out of logs.

/// Characters of a response body kept in logs and error details.
const BODY_LOG_CHARS: usize = 256;

/// Trailing characters of a secret left visible.
const SECRET_VISIBLE_CHARS: usize = 4;

/// Shorten a response body for logging.
///
/// Bodies of at most `BODY_LOG_CHARS` characters are returned as is. Longer
/// ones are cut on a character boundary and suffixed with their byte length.
pub fn truncate_for_log(body: &str) -> String {
    match body.char_indices().nth(BODY_LOG_CHARS) {
        None => body.to_string(),
        Some((cut, _)) => format!(
            "{}... [truncated, total {} bytes]",
            &body[..cut],
            body.len()
        ),
    }
}

/// Mask a credential, keeping only its last few characters.
///
/// Short secrets are masked entirely.
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= SECRET_VISIBLE_CHARS * 2 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - SECRET_VISIBLE_CHARS).collect();
    format!("****{tail}")
}
