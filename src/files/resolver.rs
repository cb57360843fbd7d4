//! Maps request targets onto files beneath the document root.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use percent_encoding::percent_decode_str;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// Target is not an origin-form path or does not decode cleanly
    BadTarget,
    /// Target escapes the document root
    Forbidden,
    /// No regular file lives at the target
    NotFound,
}

/// A regular file inside the document root, with the metadata a response needs.
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    /// Canonical location, after symlinks
    pub path: PathBuf,
    /// The path as the client named it; its extension decides the media type
    pub requested: PathBuf,
    pub len: u64,
    pub modified: SystemTime,
}

/// The directory files are served from, canonicalized once at startup.
#[derive(Debug, Clone)]
pub struct DocumentRoot {
    root: PathBuf,
}

impl DocumentRoot {
    /// Opens an existing directory as the document root.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let root = std::fs::canonicalize(path.as_ref())?;

        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            ));
        }

        Ok(Self { root })
    }

    /// Like [`DocumentRoot::open`], creating the directory first if needed.
    pub fn open_or_create(path: impl AsRef<Path>) -> io::Result<Self> {
        std::fs::create_dir_all(path.as_ref())?;
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolves a raw request target to a regular file under the root.
    ///
    /// Lexical escapes (`/../x`) are rejected before the filesystem is
    /// touched, so they are Forbidden whether or not the target exists.
    /// Symlinks are followed and must still land inside the root.
    pub async fn resolve(&self, target: &str) -> Result<ResolvedFile, ResolveError> {
        let segments = normalize_target(target)?;

        let joined = segments
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment));

        let canonical = tokio::fs::canonicalize(&joined)
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::PermissionDenied => ResolveError::Forbidden,
                _ => ResolveError::NotFound,
            })?;

        if !canonical.starts_with(&self.root) {
            tracing::warn!(
                target_path = %target,
                resolved = %canonical.display(),
                "Symlink points outside the document root"
            );
            return Err(ResolveError::Forbidden);
        }

        let metadata = tokio::fs::metadata(&canonical)
            .await
            .map_err(|_| ResolveError::NotFound)?;

        // Directories are never listed or mapped to an index file.
        if !metadata.is_file() {
            return Err(ResolveError::NotFound);
        }

        Ok(ResolvedFile {
            path: canonical,
            requested: joined,
            len: metadata.len(),
            modified: metadata.modified().unwrap_or(UNIX_EPOCH),
        })
    }
}

/// Turns a raw target into root-relative path segments.
///
/// Strips the query and fragment, percent-decodes, drops empty and `.`
/// segments and applies `..`. Climbing above the root is Forbidden.
///
/// # Example
///
/// ```
/// # use lantern::files::resolver::{normalize_target, ResolveError};
/// assert_eq!(normalize_target("/a/./b/../c.html?x=1").unwrap(), vec!["a", "c.html"]);
/// assert_eq!(normalize_target("/../etc/passwd"), Err(ResolveError::Forbidden));
/// assert_eq!(normalize_target("index.html"), Err(ResolveError::BadTarget));
/// ```
pub fn normalize_target(target: &str) -> Result<Vec<String>, ResolveError> {
    if !target.starts_with('/') {
        return Err(ResolveError::BadTarget);
    }

    let path = target
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map_err(|_| ResolveError::BadTarget)?;

    if decoded.contains('\0') {
        return Err(ResolveError::BadTarget);
    }

    let mut segments: Vec<String> = Vec::new();

    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(ResolveError::Forbidden);
                }
            }
            name => segments.push(name.to_string()),
        }
    }

    Ok(segments)
}
