// Copyright (c) 2019-2022 Alibaba Cloud
// Copyright (c) 2019-2022 Ant Group
//
// SPDX-License-Identifier: Apache-2.0
//

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::config::SysfsConfig;
use crate::error::{Error, Result};
use crate::fs::resolve_link;
use crate::link::{is_virtual_path, realpath};
use crate::numa::numa_node;
use crate::pci::{ids, PciIdentity};
use crate::pcidb::{PciDatabase, PciEntry};
use crate::sriov::SriovCapacity;

// The link from an interface node to its parent (PCI) device.
const DEVICE_LINK: &str = "device";

/// Hardware facts gathered for one network interface.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NetdevInfo {
    pub name: String,
    #[serde(rename = "virtual")]
    pub virtual_device: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pci_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numa_node: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pci_identity: Option<PciIdentity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pci_entry: Option<PciEntry>,
    pub sriov: SriovCapacity,
}

pub struct Inventory {
    config: SysfsConfig,
    pcidb: Option<Arc<dyn PciDatabase>>,
}

impl Inventory {
    pub fn new(config: SysfsConfig, pcidb: Option<Arc<dyn PciDatabase>>) -> Self {
        Inventory { config, pcidb }
    }

    /// Names of the interfaces visible in the network namespace, sorted.
    pub fn interfaces(&self) -> Result<Vec<String>> {
        let dir = &self.config.sys_class_net;
        let read_err = |e: std::io::Error| Error::Read {
            path: dir.clone(),
            source: e,
        };

        let mut names = vec![];
        for entry in fs::read_dir(dir).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            // skip regular files such as bonding_masters
            if !entry.file_type().map_err(read_err)?.is_symlink() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Gathers what is known about interface `name`. Only a failure to
    /// classify the interface is an error, the remaining attributes are
    /// dropped with a warning when they can't be read.
    pub fn discover(&self, name: &str) -> Result<NetdevInfo> {
        let iface_path = realpath(name, &self.config.sys_class_net)?;
        let mut info = NetdevInfo {
            name: name.to_string(),
            virtual_device: is_virtual_path(&iface_path, &self.config),
            ..Default::default()
        };
        if info.virtual_device {
            return Ok(info);
        }

        info.sriov = SriovCapacity::read(name, &self.config).unwrap_or_else(|e| {
            warn!(sl!(), "failed to get sriov capacity of {}: {}", name, e);
            SriovCapacity::default()
        });
        if info.sriov.is_supported() {
            debug!(sl!(), "{} supports sriov", name;
                "total_vfs" => info.sriov.total_vfs, "num_vfs" => info.sriov.num_vfs);
        }

        let device_path = match resolve_link(iface_path.join(DEVICE_LINK)) {
            Ok(path) => path,
            Err(e) => {
                warn!(sl!(), "failed to resolve device of {}: {}", name, e);
                return Ok(info);
            }
        };
        info.pci_address = device_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from);

        info.numa_node = numa_node(&device_path)
            .map_err(|e| warn!(sl!(), "failed to get numa node of {}: {}", name, e))
            .ok();

        match PciIdentity::read(&device_path) {
            Ok(identity) => info.pci_identity = Some(identity),
            Err(e) => {
                warn!(sl!(), "failed to get pci ids of {}: {}", name, e);
                return Ok(info);
            }
        }

        if let Some(db) = self.pcidb.as_ref() {
            info.pci_entry = match ids(&device_path, db.as_ref()) {
                Ok(entry) => Some(entry),
                Err(e @ Error::PciNotFound { .. }) => {
                    debug!(sl!(), "no pci database entry for {}: {}", name, e);
                    None
                }
                Err(e) => {
                    warn!(sl!(), "failed to resolve pci ids of {}: {}", name, e);
                    None
                }
            };
        }

        Ok(info)
    }

    /// Resolves the parent device directory of interface `name`, e.g.
    /// `/sys/devices/pci0000:00/0000:00:01.0` for a PCI NIC.
    pub fn device_path(&self, name: &str) -> Result<PathBuf> {
        let iface_path = realpath(name, &self.config.sys_class_net)?;
        resolve_link(iface_path.join(DEVICE_LINK))
    }

    /// Runs [`Inventory::discover`] on every interface, skipping the ones
    /// that can't be classified.
    pub fn discover_all(&self) -> Result<Vec<NetdevInfo>> {
        let mut devices = vec![];
        for name in self.interfaces()? {
            match self.discover(&name) {
                Ok(info) => devices.push(info),
                Err(e) => warn!(sl!(), "skip interface {}: {}", name, e),
            }
        }
        Ok(devices)
    }
}
