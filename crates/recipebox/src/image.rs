//! Image attachments.
//!
//! Recipes store their picture as a `data:` URL string. This module turns an
//! image file on disk into that form; the store itself never looks inside.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use crate::error::Result;

/// MIME type used when the file extension is not a known image type.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Guess an image MIME type from the file extension (case-insensitive).
#[must_use]
pub fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg" | "jfif") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",
        Some("tif" | "tiff") => "image/tiff",
        _ => FALLBACK_MIME_TYPE,
    }
}

/// Encode raw bytes as a base64 `data:` URL.
#[must_use]
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

/// Read an image file and encode it as a `data:` URL.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if the file cannot be read.
pub fn read_data_url(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let mime_type = mime_type_for(path);
    debug!(
        "Encoding {} ({} bytes, {})",
        path.display(),
        bytes.len(),
        mime_type
    );
    Ok(encode_data_url(mime_type, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_mime_type_for_known_extensions() {
        assert_eq!(mime_type_for(Path::new("cake.png")), "image/png");
        assert_eq!(mime_type_for(Path::new("cake.JPG")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("dir/cake.jpeg")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("cake.webp")), "image/webp");
        assert_eq!(mime_type_for(Path::new("logo.svg")), "image/svg+xml");
    }

    #[test]
    fn test_mime_type_for_unknown() {
        assert_eq!(mime_type_for(Path::new("notes.txt")), FALLBACK_MIME_TYPE);
        assert_eq!(mime_type_for(Path::new("no_extension")), FALLBACK_MIME_TYPE);
    }

    #[test]
    fn test_encode_data_url() {
        assert_eq!(
            encode_data_url("image/png", b"hello"),
            "data:image/png;base64,aGVsbG8="
        );
        assert_eq!(encode_data_url("image/gif", b""), "data:image/gif;base64,");
    }

    #[test]
    fn test_read_data_url_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flan.PNG");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let url = read_data_url(&path).unwrap();
        assert_eq!(url, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_read_data_url_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_data_url(dir.path().join("missing.jpg")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
