//! AREDN Firmware Resolver - remote catalog, profile, and image fetching
//!
//! This crate turns version specifiers into verified cached images. The
//! resolution chain per specifier:
//! 1. Version catalog (`config.js`) and alias selection
//! 2. Version overview, matched against the canonical hardware type
//! 3. Per-profile image list, first acceptable upgrade variant wins
//! 4. Image download with SHA-256 verification, then cache persistence

pub mod profile;
pub mod resolve;

pub use profile::{ImageEntry, Overview, ProfileDetail, ProfileEntry, UPGRADE_IMAGE_TYPES};
pub use resolve::{FirmwareArtifact, Resolver};
