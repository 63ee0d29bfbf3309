//! Device identity and hardware-type normalization

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// Identity of the device firmware is being resolved for.
///
/// `hardware_type` is stored in canonical form: device-fact sources use
/// vendor-prefix conventions the firmware catalog does not, so the raw
/// boardtype is normalized once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// Board family reported by the device
    pub board: String,
    /// Canonical hardware-type id, matching catalog profile ids
    pub hardware_type: String,
}

impl DeviceIdentity {
    /// Build an identity from raw device facts.
    ///
    /// Both facts are required: they derive the cache key and match the
    /// catalog profiles, so an empty value is a fatal input error.
    pub fn from_facts(board: &str, boardtype: &str) -> Result<Self, ResolveError> {
        if board.is_empty() {
            return Err(ResolveError::MissingIdentity("board"));
        }
        if boardtype.is_empty() {
            return Err(ResolveError::MissingIdentity("hardware type"));
        }
        Ok(Self {
            board: board.to_string(),
            hardware_type: canonical_hardware_type(boardtype),
        })
    }
}

/// Map a raw boardtype to the id the firmware catalog uses.
///
/// Known boardtype naming inconsistencies:
/// - TP-Link CPE boards report without the vendor prefix
/// - Ubiquiti Rocket M XW boards report without the `ubnt-` prefix
/// - QEMU guests report the emulated machine name instead of `generic`
pub fn canonical_hardware_type(boardtype: &str) -> String {
    if boardtype.starts_with("cpe") {
        format!("tplink,{}", boardtype)
    } else if boardtype.starts_with("rocket-m-xw") {
        format!("ubnt-{}", boardtype)
    } else if boardtype == "qemu-standard-pc-i440fx-piix-1996" {
        "generic".to_string()
    } else {
        boardtype.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tplink_prefix() {
        assert_eq!(canonical_hardware_type("cpe510"), "tplink,cpe510");
        assert_eq!(canonical_hardware_type("cpe210-v3"), "tplink,cpe210-v3");
    }

    #[test]
    fn test_ubnt_prefix() {
        assert_eq!(
            canonical_hardware_type("rocket-m-xw"),
            "ubnt-rocket-m-xw"
        );
    }

    #[test]
    fn test_qemu_maps_to_generic() {
        assert_eq!(
            canonical_hardware_type("qemu-standard-pc-i440fx-piix-1996"),
            "generic"
        );
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(
            canonical_hardware_type("mikrotik-routerboard-lhg-5nd"),
            "mikrotik-routerboard-lhg-5nd"
        );
    }

    #[test]
    fn test_identity_normalizes_once() {
        let identity = DeviceIdentity::from_facts("hap-ac3", "cpe510").unwrap();
        assert_eq!(identity.board, "hap-ac3");
        assert_eq!(identity.hardware_type, "tplink,cpe510");
    }

    #[test]
    fn test_empty_facts_rejected() {
        assert!(matches!(
            DeviceIdentity::from_facts("", "cpe510"),
            Err(ResolveError::MissingIdentity("board"))
        ));
        assert!(matches!(
            DeviceIdentity::from_facts("hap-ac3", ""),
            Err(ResolveError::MissingIdentity(_))
        ));
    }
}
