// Copyright (c) 2019-2022 Alibaba Cloud
// Copyright (c) 2019-2022 Ant Group
//
// SPDX-License-Identifier: Apache-2.0
//

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::fs::absolute_path;

// https://www.kernel.org/doc/Documentation/ABI/testing/sysfs-class-net
//
// Each of the entries in this directory is a symbolic link representing one
// of the real or virtual networking devices that are visible in the network
// namespace of the process that is accessing the directory.
pub const SYS_CLASS_NET: &str = "/sys/class/net";
// The targets of the /sys/class/net links, see sysfs(5).
pub const SYS_DEVICES: &str = "/sys/devices";
// Software defined devices (bridges, veth, tunnels, lo) hang below this node:
// $ realpath /sys/class/net/cilium_host
// /sys/devices/virtual/net/cilium_host
pub const VIRTUAL_DEVICES_DIR: &str = "virtual";

/// Location of the sysfs trees read by the discovery primitives.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SysfsConfig {
    pub sys_class_net: PathBuf,
    pub sys_devices: PathBuf,
    /// Path of a `pci.ids` database, if not at a well known location.
    pub pci_ids: Option<PathBuf>,
}

impl Default for SysfsConfig {
    fn default() -> Self {
        SysfsConfig {
            sys_class_net: PathBuf::from(SYS_CLASS_NET),
            sys_devices: PathBuf::from(SYS_DEVICES),
            pci_ids: None,
        }
    }
}

impl SysfsConfig {
    /// Places both trees below `root` as `<root>/class/net` and
    /// `<root>/devices`, the layout of a sysfs mount.
    pub fn with_root<P: AsRef<Path>>(root: P) -> Self {
        let root = absolute_path(root);
        SysfsConfig {
            sys_class_net: root.join("class").join("net"),
            sys_devices: root.join("devices"),
            pci_ids: None,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SysfsConfig = toml::from_str(content)?;
        Ok(config.normalized())
    }

    /// Returns the config with absolute sysfs roots free of `.` and `..`
    /// components, so that resolved links can be compared against them.
    pub fn normalized(self) -> Self {
        SysfsConfig {
            sys_class_net: absolute_path(&self.sys_class_net),
            sys_devices: absolute_path(&self.sys_devices),
            pci_ids: self.pci_ids,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn virtual_devices(&self) -> PathBuf {
        absolute_path(self.sys_devices.join(VIRTUAL_DEVICES_DIR))
    }
}
