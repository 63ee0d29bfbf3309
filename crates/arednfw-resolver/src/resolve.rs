//! Firmware resolution and the batch orchestrator
//!
//! A batch is resolved specifier by specifier, in input order, with
//! every remote fetch sequentially awaited. The first failure aborts the
//! whole batch; callers never see partial results.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use arednfw_core::{
    sha256_hex, DeviceIdentity, FirmwareCache, ResolveError, VersionCatalog, VersionSpec,
};

use crate::profile::{Overview, ProfileDetail};

/// One resolved firmware image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirmwareArtifact {
    /// Concrete version id the specifier resolved to
    pub version: String,
    /// Path of the verified image in the cache
    pub file: PathBuf,
    /// SHA-256 of the cached file
    pub sha256: String,
    /// Size of the cached file in bytes
    pub size: u64,
}

/// Firmware resolver over a downloads-site base URL.
///
/// Owns no state beyond the cache handle; the HTTP client carries the
/// caller's transport configuration (timeouts, TLS) and no retry policy
/// is imposed on top of it.
pub struct Resolver {
    client: reqwest::Client,
    base_url: String,
    cache: FirmwareCache,
}

impl Resolver {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, cache: FirmwareCache) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache,
        }
    }

    /// Resolve every specifier in `specs`, in order.
    ///
    /// All-or-nothing: the first failure aborts the batch and no partial
    /// results are returned.
    pub async fn resolve_batch(
        &self,
        identity: &DeviceIdentity,
        specs: &[String],
    ) -> Result<Vec<FirmwareArtifact>, ResolveError> {
        let mut artifacts = Vec::with_capacity(specs.len());
        for raw in specs {
            artifacts.push(self.resolve_one(identity, raw).await?);
        }
        Ok(artifacts)
    }

    /// Resolve a single specifier to a verified cached image.
    pub async fn resolve_one(
        &self,
        identity: &DeviceIdentity,
        raw_spec: &str,
    ) -> Result<FirmwareArtifact, ResolveError> {
        let spec = VersionSpec::parse(raw_spec)?;
        let key = FirmwareCache::key(spec.as_str(), identity);

        // Aliases always re-resolve against the live catalog; an
        // explicit version is trusted once its file exists.
        let version = if spec.is_alias() || !self.cache.contains(&key) {
            let catalog = self.fetch_catalog().await?;
            let version = catalog.select(&spec)?.to_string();
            info!(specifier = %raw_spec, version = %version, "Resolved firmware version");

            let (url, expected_sha) = self
                .locate_image(&version, &identity.hardware_type)
                .await?;
            let bytes = self.download_verified(&url, &expected_sha).await?;
            self.cache.store(&key, &bytes)?;
            version
        } else {
            debug!(specifier = %raw_spec, "Using cached firmware image");
            spec.as_str().to_string()
        };

        let file = self.cache.path_for(&key);
        let (sha256, size) = self.cache.digest(&key)?;
        Ok(FirmwareArtifact {
            version,
            file,
            sha256,
            size,
        })
    }

    /// Fetch and parse the published version catalog.
    ///
    /// Rebuilt from scratch on every call; alias resolution never trusts
    /// a previously fetched catalog.
    async fn fetch_catalog(&self) -> Result<VersionCatalog, ResolveError> {
        let url = format!("{}/config.js", self.base_url);
        debug!(url = %url, "Fetching version catalog");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ResolveError::CatalogUnavailable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ResolveError::CatalogUnavailable(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }
        let body = response
            .text()
            .await
            .map_err(|e| ResolveError::CatalogUnavailable(e.to_string()))?;

        let catalog = VersionCatalog::from_config_script(&body)?;
        debug!(versions = catalog.len(), "Parsed version catalog");
        Ok(catalog)
    }

    /// Locate the download URL and expected checksum for a version and
    /// hardware type.
    async fn locate_image(
        &self,
        version: &str,
        hardware_type: &str,
    ) -> Result<(String, String), ResolveError> {
        let overview_url = format!("{}/data/{}/overview.json", self.base_url, version);
        let overview: Overview = self.fetch_json(&overview_url).await?;

        let profile = overview
            .find_profile(hardware_type)
            .ok_or_else(|| ResolveError::ProfileNotFound(hardware_type.to_string()))?;
        let target_base = overview.image_url.replace("{target}", &profile.target);

        let detail_url = format!(
            "{}/data/{}/{}/{}.json",
            self.base_url, version, profile.target, profile.id
        );
        let detail: ProfileDetail = self.fetch_json(&detail_url).await?;

        let image = detail
            .select_image()
            .ok_or_else(|| ResolveError::ImageNotFound(hardware_type.to_string()))?;
        // An image the site publishes without a checksum cannot be
        // verified, so it is not an acceptable artifact either.
        let sha256 = image
            .sha256
            .clone()
            .ok_or_else(|| ResolveError::ImageNotFound(hardware_type.to_string()))?;

        debug!(image = %image.name, kind = %image.kind, "Selected firmware image");
        Ok((format!("{}/{}", target_base, image.name), sha256))
    }

    /// Download the image and enforce its checksum.
    ///
    /// Fails closed: on any mismatch the bytes are discarded and nothing
    /// reaches the cache.
    async fn download_verified(
        &self,
        url: &str,
        expected_sha: &str,
    ) -> Result<Vec<u8>, ResolveError> {
        info!(url = %url, "Downloading firmware image");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolveError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(ResolveError::DownloadFailed {
                url: url.to_string(),
                reason: format!("status {}", response.status()),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ResolveError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let computed = sha256_hex(&bytes);
        if !computed.eq_ignore_ascii_case(expected_sha) {
            return Err(ResolveError::ChecksumMismatch {
                expected: expected_sha.to_string(),
                actual: computed,
            });
        }

        info!(size = bytes.len(), sha = %&computed[..16], "Firmware download verified");
        Ok(bytes.to_vec())
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, ResolveError> {
        debug!(url = %url, "Fetching");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolveError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(ResolveError::DownloadFailed {
                url: url.to_string(),
                reason: format!("status {}", response.status()),
            });
        }
        response
            .json()
            .await
            .map_err(|e| ResolveError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}
