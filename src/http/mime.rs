//! MIME type detection based on file extensions.
//!
//! Only extensions in [`MEDIA_TYPES`] are servable; everything else is
//! answered with 415 Unsupported Media Type.

use std::path::Path;

/// Extension → content type. Extensions are matched ignoring ASCII case.
const MEDIA_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "text/javascript"),
    ("mjs", "text/javascript"),
    ("json", "application/json"),
    ("txt", "text/plain"),
    ("csv", "text/csv"),
    ("xml", "application/xml"),
    ("md", "text/markdown"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("pdf", "application/pdf"),
    ("wasm", "application/wasm"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaType(&'static str);

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Classifies `path` by its extension. `None` means the type is unsupported.
///
/// # Example
///
/// ```
/// # use lantern::http::mime::classify;
/// # use std::path::Path;
/// assert_eq!(classify(Path::new("www/index.HTML")).unwrap().as_str(), "text/html");
/// assert!(classify(Path::new("archive.tar.xz")).is_none());
/// assert!(classify(Path::new("Makefile")).is_none());
/// ```
pub fn classify(path: &Path) -> Option<MediaType> {
    let ext = path.extension()?.to_str()?;

    MEDIA_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, content_type)| MediaType(content_type))
}
