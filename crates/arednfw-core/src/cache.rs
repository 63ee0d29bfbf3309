//! On-disk firmware image cache
//!
//! Filenames are a pure function of (specifier, device identity), so a
//! given request always lands on the same path. Writes go through a temp
//! file and rename so a concurrent reader never observes a partially
//! written image.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::ResolveError;
use crate::identity::DeviceIdentity;

/// Handle to the cache root directory.
///
/// Opened once by the host and passed into the resolver; nothing here
/// reaches for a global directory.
#[derive(Debug, Clone)]
pub struct FirmwareCache {
    root: PathBuf,
}

impl FirmwareCache {
    /// Open the cache root, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ResolveError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic cache filename for a request:
    /// `aredn-{specifier}-{board}-{hardware_type}-squashfs-sysupgrade.bin`
    /// with `/` and `,` replaced by `-` to keep the name path-safe.
    pub fn key(specifier: &str, identity: &DeviceIdentity) -> String {
        format!(
            "aredn-{}-{}-{}-squashfs-sysupgrade.bin",
            specifier, identity.board, identity.hardware_type
        )
        .replace('/', "-")
        .replace(',', "-")
    }

    /// Absolute path a cache key maps to.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    /// Persist verified image bytes, replacing any previous content at
    /// that key.
    pub fn store(&self, key: &str, bytes: &[u8]) -> Result<PathBuf, ResolveError> {
        let path = self.path_for(key);
        let staging = self.root.join(format!("{}.part", key));
        fs::write(&staging, bytes)?;
        fs::rename(&staging, &path)?;
        debug!(path = %path.display(), size = bytes.len(), "Stored firmware image");
        Ok(path)
    }

    /// SHA-256 and size of a cached image, recomputed from the stored
    /// file so the result reflects exactly what is on disk.
    pub fn digest(&self, key: &str) -> Result<(String, u64), ResolveError> {
        let data = fs::read(self.path_for(key))?;
        Ok((sha256_hex(&data), data.len() as u64))
    }
}

/// Compute SHA256 hash of data and return as hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
