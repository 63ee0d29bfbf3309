//! Error taxonomy for firmware resolution
//!
//! Every failure is fatal to the current batch: there are no retries and
//! no partial results. The embedding caller decides how to present them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("missing device identity: no {0}")]
    MissingIdentity(&'static str),
    #[error("unknown version specifier: {0}")]
    UnknownVersionFormat(String),
    #[error("cannot fetch version catalog: {0}")]
    CatalogUnavailable(String),
    #[error("version catalog has no usable entries")]
    EmptyCatalog,
    #[error("version not found: {0}")]
    VersionNotFound(String),
    #[error("no firmware profile for hardware type: {0}")]
    ProfileNotFound(String),
    #[error("no upgrade image for hardware type: {0}")]
    ImageNotFound(String),
    #[error("cannot download {url}: {reason}")]
    DownloadFailed { url: String, reason: String },
    #[error("firmware checksum failed: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}
