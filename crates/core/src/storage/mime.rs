//! Content type detection for stored files.

/// Fallback when neither the name nor the content identifies the type.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Determine the MIME type of an upload.
///
/// The original filename's extension wins; magic bytes are consulted only
/// when the extension is missing or unknown.
#[must_use]
pub fn detect_mime_type(original_name: &str, content: &[u8]) -> String {
    if let Some(guess) = mime_guess::from_path(original_name).first_raw() {
        return guess.to_string();
    }

    infer::get(content).map_or_else(
        || DEFAULT_MIME_TYPE.to_string(),
        |kind| kind.mime_type().to_string(),
    )
}
