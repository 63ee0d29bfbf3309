//! AREDN Firmware Core - device identity, version catalog, and image cache
//!
//! This crate provides the foundational pieces for firmware resolution:
//! - Device identity with hardware-type normalization
//! - Version specifiers and catalog alias selection
//! - The deterministic on-disk firmware image cache
//! - The error taxonomy shared across the workspace

pub mod cache;
pub mod error;
pub mod identity;
pub mod version;

pub use cache::{sha256_hex, FirmwareCache};
pub use error::ResolveError;
pub use identity::{canonical_hardware_type, DeviceIdentity};
pub use version::{VersionCatalog, VersionSpec};
