//! Blob store boundary for evidence attachments.
//!
//! # Responsibility
//! - Define the upload contract consumed by the evidence service.
//! - Provide a filesystem-backed implementation for local deployments.
//!
//! # Invariants
//! - `upload` returns an opaque URL string; callers never interpret it
//!   beyond storing and displaying it.
//! - The filesystem implementation confines writes to its root directory.

use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Component, Path, PathBuf};

pub type BlobResult<T> = Result<T, BlobError>;

/// Errors from blob store operations.
#[derive(Debug)]
pub enum BlobError {
    /// Relative path is empty, absolute, or escapes the store root.
    InvalidPath(String),
    Io(std::io::Error),
}

impl Display for BlobError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath(path) => write!(f, "invalid blob path `{path}`"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BlobError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::InvalidPath(_) => None,
        }
    }
}

impl From<std::io::Error> for BlobError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Storage interface for uploaded evidence files.
pub trait BlobStore {
    /// Stores `bytes` under `path` and returns a retrievable URL.
    fn upload(&self, bytes: &[u8], path: &str) -> BlobResult<String>;
}

/// Filesystem-backed blob store rooted at one directory.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl BlobStore for FsBlobStore {
    fn upload(&self, bytes: &[u8], path: &str) -> BlobResult<String> {
        let relative = validate_relative_path(path)?;
        let target = self.root.join(&relative);

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, bytes)?;

        info!(
            "event=blob_upload module=blob status=ok path={} size={}",
            path,
            bytes.len()
        );
        Ok(path.to_string())
    }
}

fn validate_relative_path(path: &str) -> BlobResult<PathBuf> {
    if path.trim().is_empty() {
        return Err(BlobError::InvalidPath(path.to_string()));
    }

    let candidate = Path::new(path);
    let mut relative = PathBuf::new();
    for component in candidate.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            _ => return Err(BlobError::InvalidPath(path.to_string())),
        }
    }
    Ok(relative)
}

#[cfg(test)]
mod tests {
    use super::validate_relative_path;

    #[test]
    fn accepts_nested_relative_paths() {
        let path = validate_relative_path("evidences/s1/i101/photo.jpg").unwrap();
        assert_eq!(path.iter().count(), 4);
    }

    #[test]
    fn rejects_traversal_and_absolute_paths() {
        assert!(validate_relative_path("../outside.jpg").is_err());
        assert!(validate_relative_path("/etc/passwd").is_err());
        assert!(validate_relative_path("").is_err());
        assert!(validate_relative_path("a/../b.jpg").is_err());
    }
}
