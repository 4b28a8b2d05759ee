// Copyright (c) 2019-2022 Alibaba Cloud
// Copyright (c) 2019-2022 Ant Group
//
// SPDX-License-Identifier: Apache-2.0
//

use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::fs::{read_trimmed, trim_hex_prefix};
use crate::pcidb::{PciDatabase, PciEntry};

const PCI_VENDOR: &str = "vendor";
const PCI_DEVICE: &str = "device";
const PCI_SUBSYSTEM_VENDOR: &str = "subsystem_vendor";
const PCI_SUBSYSTEM_DEVICE: &str = "subsystem_device";

/// Hex identifiers of a PCI function, without the `0x` prefix.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PciIdentity {
    pub vendor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subsystem_vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subsystem_device: Option<String>,
}

impl PciIdentity {
    /// Reads the identifiers from `device_path`. The vendor is required, the
    /// other three are best effort and left empty when they can't be read.
    pub fn read<P: AsRef<Path>>(device_path: P) -> Result<Self> {
        let device_path = device_path.as_ref();
        let vendor = read_trimmed(device_path.join(PCI_VENDOR))?;
        let vendor = trim_hex_prefix(&vendor);
        if vendor.is_empty() {
            return Err(Error::MissingVendor(device_path.join(PCI_VENDOR)));
        }

        Ok(PciIdentity {
            vendor: vendor.to_string(),
            device: read_id(device_path, PCI_DEVICE),
            subsystem_vendor: read_id(device_path, PCI_SUBSYSTEM_VENDOR),
            subsystem_device: read_id(device_path, PCI_SUBSYSTEM_DEVICE),
        })
    }
}

fn read_id(device_path: &Path, attr: &str) -> Option<String> {
    match read_trimmed(device_path.join(attr)) {
        Ok(content) => {
            let id = trim_hex_prefix(&content);
            if id.is_empty() {
                None
            } else {
                Some(id.to_string())
            }
        }
        Err(e) => {
            debug!(sl!(), "skip pci {} of {:?}: {}", attr, device_path, e);
            None
        }
    }
}

/// Reads the PCI identity of the device at `device_path` and resolves it to
/// vendor and device names through `db`.
// TODO: the device and subsystem ids were historically read from a path
// that never held them, so lookups only ever matched on the vendor. Check
// whether callers depend on vendor-only matches before changing the path
// handed in here.
pub fn ids<P: AsRef<Path>>(device_path: P, db: &dyn PciDatabase) -> Result<PciEntry> {
    let identity = PciIdentity::read(device_path)?;
    db.get_device(&identity).ok_or_else(|| Error::PciNotFound {
        vendor: identity.vendor.clone(),
        device: identity.device.clone().unwrap_or_default(),
    })
}
