//! Content-Type detection for uploaded objects.

/// Used when the extension is unknown or missing.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Guess the MIME type of `key` from its extension.
pub fn content_type_for(key: &str) -> String {
    mime_guess::from_path(key)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}
