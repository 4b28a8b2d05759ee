// Copyright (c) 2019-2022 Alibaba Cloud
// Copyright (c) 2019-2022 Ant Group
//
// SPDX-License-Identifier: Apache-2.0
//

//! Resolution of PCI identifiers to vendor and device names.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::pci::PciIdentity;

/// Well known locations of the `pci.ids` file shipped by hwdata/pciutils.
pub const DEFAULT_PCI_IDS_PATHS: [&str; 3] = [
    "/usr/share/hwdata/pci.ids",
    "/usr/share/misc/pci.ids",
    "/usr/share/pci.ids",
];

/// Names resolved for a PCI identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PciEntry {
    pub vendor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subsystem: Option<String>,
}

pub trait PciDatabase: Send + Sync {
    /// Returns the best match for `identity`, or `None` if the vendor is
    /// unknown. Identifiers absent from `identity` are not matched on.
    fn get_device(&self, identity: &PciIdentity) -> Option<PciEntry>;
}

#[derive(Debug, Default)]
struct PciDevice {
    name: String,
    // (subsystem vendor, subsystem device) -> name
    subsystems: HashMap<(String, String), String>,
}

#[derive(Debug, Default)]
struct PciVendor {
    name: String,
    devices: HashMap<String, PciDevice>,
}

/// In memory copy of a `pci.ids` database.
#[derive(Debug, Default)]
pub struct PciIds {
    vendors: HashMap<String, PciVendor>,
}

impl PciIds {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| Error::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Returns `configured` or, if unset, the first existing default path.
    pub fn locate(configured: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = configured {
            return Some(path.to_path_buf());
        }
        DEFAULT_PCI_IDS_PATHS
            .iter()
            .map(|p| PathBuf::from(*p))
            .find(|p| p.is_file())
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut vendors: HashMap<String, PciVendor> = HashMap::new();
        let mut vendor: Option<String> = None;
        let mut device: Option<String> = None;

        for (idx, line) in reader.lines().enumerate() {
            let lineno = idx + 1;
            let line = line.map_err(|e| Error::PciIds {
                line: lineno,
                reason: e.to_string(),
            })?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let depth = line.chars().take_while(|c| *c == '\t').count();
            let body = &line[depth..];
            match depth {
                0 => {
                    // device classes follow the vendor list
                    if body.starts_with("C ") {
                        break;
                    }
                    let (id, name) = split_id(body, lineno)?;
                    vendors.insert(
                        id.clone(),
                        PciVendor {
                            name,
                            devices: HashMap::new(),
                        },
                    );
                    vendor = Some(id);
                    device = None;
                }
                1 => {
                    let entry = vendor
                        .as_ref()
                        .and_then(|v| vendors.get_mut(v))
                        .ok_or_else(|| Error::PciIds {
                            line: lineno,
                            reason: "device without vendor".to_string(),
                        })?;
                    let (id, name) = split_id(body, lineno)?;
                    entry.devices.insert(
                        id.clone(),
                        PciDevice {
                            name,
                            subsystems: HashMap::new(),
                        },
                    );
                    device = Some(id);
                }
                2 => {
                    let entry = match (vendor.as_ref(), device.as_ref()) {
                        (Some(v), Some(d)) => {
                            vendors.get_mut(v).and_then(|v| v.devices.get_mut(d))
                        }
                        _ => None,
                    };
                    let entry = entry.ok_or_else(|| Error::PciIds {
                        line: lineno,
                        reason: "subsystem without device".to_string(),
                    })?;
                    let (sub_vendor, rest) = split_id(body, lineno)?;
                    let (sub_device, name) = split_id(&rest, lineno)?;
                    entry.subsystems.insert((sub_vendor, sub_device), name);
                }
                _ => {
                    return Err(Error::PciIds {
                        line: lineno,
                        reason: format!("unexpected indentation {}", depth),
                    })
                }
            }
        }

        Ok(PciIds { vendors })
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }
}

// Splits "8086  Intel Corporation" into a lowercase id and the remainder.
fn split_id(body: &str, line: usize) -> Result<(String, String)> {
    let (id, rest) = body
        .split_once(char::is_whitespace)
        .ok_or_else(|| Error::PciIds {
            line,
            reason: format!("missing name in {:?}", body),
        })?;
    if id.len() != 4 || !id.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::PciIds {
            line,
            reason: format!("invalid id {:?}", id),
        });
    }
    Ok((id.to_ascii_lowercase(), rest.trim().to_string()))
}

impl PciDatabase for PciIds {
    fn get_device(&self, identity: &PciIdentity) -> Option<PciEntry> {
        let vendor = self.vendors.get(&identity.vendor.to_ascii_lowercase())?;
        let mut entry = PciEntry {
            vendor: vendor.name.clone(),
            ..Default::default()
        };

        let device = match identity
            .device
            .as_ref()
            .and_then(|d| vendor.devices.get(&d.to_ascii_lowercase()))
        {
            Some(device) => device,
            None => return Some(entry),
        };
        entry.device = Some(device.name.clone());

        if let (Some(sv), Some(sd)) = (&identity.subsystem_vendor, &identity.subsystem_device) {
            let key = (sv.to_ascii_lowercase(), sd.to_ascii_lowercase());
            entry.subsystem = device.subsystems.get(&key).cloned();
        }

        Some(entry)
    }
}
