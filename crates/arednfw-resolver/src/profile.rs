//! Per-version firmware profile documents
//!
//! Each published version has an `overview.json` listing the hardware
//! profiles it was built for, and a per-profile document listing the
//! image variants. Only variants usable for an in-place upgrade are
//! acceptable artifacts.

use serde::Deserialize;

/// Image variants usable for an in-place device upgrade. Within a
/// profile the first declared match wins; the order here carries no
/// priority.
pub const UPGRADE_IMAGE_TYPES: [&str; 3] = ["sysupgrade", "nand-sysupgrade", "combined"];

/// Version overview document: `data/{version}/overview.json`
#[derive(Debug, Clone, Deserialize)]
pub struct Overview {
    /// Download URL template containing a `{target}` placeholder
    pub image_url: String,
    pub profiles: Vec<ProfileEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileEntry {
    /// Hardware-type id, matching canonical boardtypes
    pub id: String,
    /// Build target platform, e.g. "ath79/generic"
    pub target: String,
}

/// Per-profile document: `data/{version}/{target}/{id}.json`
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileDetail {
    pub images: Vec<ImageEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub sha256: Option<String>,
}

impl Overview {
    /// First profile whose id matches the canonical hardware type.
    pub fn find_profile(&self, hardware_type: &str) -> Option<&ProfileEntry> {
        self.profiles.iter().find(|p| p.id == hardware_type)
    }
}

impl ProfileDetail {
    /// First image of an acceptable upgrade variant, in declared order.
    pub fn select_image(&self) -> Option<&ImageEntry> {
        self.images
            .iter()
            .find(|image| UPGRADE_IMAGE_TYPES.contains(&image.kind.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_image_skips_factory() {
        let detail: ProfileDetail = serde_json::from_value(serde_json::json!({
            "images": [
                {"type": "factory", "name": "f.bin", "sha256": "000"},
                {"type": "sysupgrade", "name": "x.bin", "sha256": "abc"},
                {"type": "combined", "name": "c.bin", "sha256": "def"},
            ]
        }))
        .unwrap();

        let image = detail.select_image().unwrap();
        assert_eq!(image.kind, "sysupgrade");
        assert_eq!(image.name, "x.bin");
        assert_eq!(image.sha256.as_deref(), Some("abc"));
    }

    #[test]
    fn test_select_image_accepts_nand_variant() {
        let detail: ProfileDetail = serde_json::from_value(serde_json::json!({
            "images": [
                {"type": "kernel", "name": "k.bin"},
                {"type": "nand-sysupgrade", "name": "n.bin", "sha256": "abc"},
            ]
        }))
        .unwrap();

        assert_eq!(detail.select_image().unwrap().kind, "nand-sysupgrade");
    }

    #[test]
    fn test_select_image_none_acceptable() {
        let detail: ProfileDetail = serde_json::from_value(serde_json::json!({
            "images": [{"type": "factory", "name": "f.bin", "sha256": "000"}]
        }))
        .unwrap();

        assert!(detail.select_image().is_none());
    }

    #[test]
    fn test_find_profile() {
        let overview: Overview = serde_json::from_value(serde_json::json!({
            "image_url": "http://downloads.example.org/targets/{target}",
            "profiles": [
                {"id": "ubnt-rocket-m", "target": "ath79/generic"},
                {"id": "tplink,cpe510", "target": "ath79/generic"},
            ]
        }))
        .unwrap();

        assert_eq!(
            overview.find_profile("tplink,cpe510").unwrap().target,
            "ath79/generic"
        );
        assert!(overview.find_profile("unknown-board").is_none());
    }
}
