//! Size and format helpers for uploaded résumé text.

use crate::resume::models::ResumeFormat;

/// Upper bound on stored résumé content, in UTF-8 bytes (50 KB).
pub const MAX_RESUME_BYTES: usize = 51_200;

/// Returns true when `content` fits within `MAX_RESUME_BYTES`.
pub fn validate_size(content: &str) -> bool {
    content.len() <= MAX_RESUME_BYTES
}

/// Renders the UTF-8 byte length of `content`: `"<n> B"` under 1 KB, else `"<n.n> KB"`.
pub fn format_size(content: &str) -> String {
    format_bytes(content.len())
}

pub fn format_bytes(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}

/// Maps a filename's extension (case-insensitive) to a format.
/// `.md` / `.markdown` → markdown; anything else, or no extension → text.
pub fn infer_format(filename: &str) -> ResumeFormat {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("md") | Some("markdown") => ResumeFormat::Markdown,
        _ => ResumeFormat::Text,
    }
}
