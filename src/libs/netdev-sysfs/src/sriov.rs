// Copyright (c) 2019-2022 Alibaba Cloud
// Copyright (c) 2019-2022 Ant Group
//
// SPDX-License-Identifier: Apache-2.0
//

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::SysfsConfig;
use crate::error::Result;
use crate::fs::{parse_decimal, read_optional};

const SRIOV_TOTALVFS: &str = "sriov_totalvfs";
const SRIOV_NUMVFS: &str = "sriov_numvfs";

/// A virtual function counter read from sysfs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VfCount {
    Present(u32),
    /// The device does not expose the counter, it has no SR-IOV capability.
    Absent,
}

impl VfCount {
    pub fn value(&self) -> u32 {
        match self {
            VfCount::Present(n) => *n,
            VfCount::Absent => 0,
        }
    }
}

/// Maximum supported and currently enabled virtual functions of a device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SriovCapacity {
    pub total_vfs: u32,
    pub num_vfs: u32,
}

impl SriovCapacity {
    /// Reads both counters of interface `name`. A missing counter counts as
    /// zero; unreadable or malformed counters are errors.
    pub fn read(name: &str, config: &SysfsConfig) -> Result<Self> {
        Ok(SriovCapacity {
            total_vfs: sriov_total_vfs(name, config)?.value(),
            num_vfs: sriov_num_vfs(name, config)?.value(),
        })
    }

    pub fn is_supported(&self) -> bool {
        self.total_vfs > 0
    }
}

fn counter_path(name: &str, config: &SysfsConfig, counter: &str) -> PathBuf {
    config
        .sys_class_net
        .join(name)
        .join("device")
        .join(counter)
}

fn read_vf_counter(path: &Path) -> Result<VfCount> {
    match read_optional(path)? {
        Some(content) => Ok(VfCount::Present(parse_decimal(path, &content)?)),
        None => {
            debug!(sl!(), "no sriov counter at {:?}", path);
            Ok(VfCount::Absent)
        }
    }
}

/// Maximum number of virtual functions the device of `name` supports.
pub fn sriov_total_vfs(name: &str, config: &SysfsConfig) -> Result<VfCount> {
    read_vf_counter(&counter_path(name, config, SRIOV_TOTALVFS))
}

/// Number of virtual functions currently enabled on the device of `name`.
pub fn sriov_num_vfs(name: &str, config: &SysfsConfig) -> Result<VfCount> {
    read_vf_counter(&counter_path(name, config, SRIOV_NUMVFS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn setup_device(root: &Path, name: &str) -> (SysfsConfig, PathBuf) {
        let config = SysfsConfig::with_root(root);
        let device = config.sys_class_net.join(name).join("device");
        fs::create_dir_all(&device).unwrap();
        (config, device)
    }

    #[test]
    fn test_sriov_absent() {
        let dir = tempfile::tempdir().unwrap();
        let (config, _) = setup_device(dir.path(), "eth0");

        assert_eq!(sriov_total_vfs("eth0", &config).unwrap(), VfCount::Absent);
        assert_eq!(sriov_num_vfs("eth0", &config).unwrap(), VfCount::Absent);
        let capacity = SriovCapacity::read("eth0", &config).unwrap();
        assert_eq!(capacity, SriovCapacity::default());
        assert!(!capacity.is_supported());

        // an interface without a device directory behaves the same way
        assert_eq!(
            SriovCapacity::read("veth0", &config).unwrap(),
            SriovCapacity::default()
        );
    }

    #[test]
    fn test_sriov_present() {
        let dir = tempfile::tempdir().unwrap();
        let (config, device) = setup_device(dir.path(), "eth0");
        fs::write(device.join(SRIOV_TOTALVFS), "64\n").unwrap();
        fs::write(device.join(SRIOV_NUMVFS), " 4 \n").unwrap();

        assert_eq!(
            sriov_total_vfs("eth0", &config).unwrap(),
            VfCount::Present(64)
        );
        let capacity = SriovCapacity::read("eth0", &config).unwrap();
        assert_eq!(
            capacity,
            SriovCapacity {
                total_vfs: 64,
                num_vfs: 4
            }
        );
        assert!(capacity.is_supported());
    }

    #[test]
    fn test_sriov_counters_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let (config, device) = setup_device(dir.path(), "eth0");
        fs::write(device.join(SRIOV_TOTALVFS), "8\n").unwrap();

        assert_eq!(
            SriovCapacity::read("eth0", &config).unwrap(),
            SriovCapacity {
                total_vfs: 8,
                num_vfs: 0
            }
        );
    }

    #[test]
    fn test_sriov_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let (config, device) = setup_device(dir.path(), "eth0");
        fs::write(device.join(SRIOV_TOTALVFS), "many\n").unwrap();
        fs::write(device.join(SRIOV_NUMVFS), "-1\n").unwrap();

        assert!(sriov_total_vfs("eth0", &config).is_err());
        assert!(sriov_num_vfs("eth0", &config).is_err());
        assert!(SriovCapacity::read("eth0", &config).is_err());
    }
}
