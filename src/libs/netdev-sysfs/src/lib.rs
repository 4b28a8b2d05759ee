// Copyright (c) 2019-2022 Alibaba Cloud
// Copyright (c) 2019-2022 Ant Group
//
// SPDX-License-Identifier: Apache-2.0
//

//! Discovery of network device hardware through sysfs.
//!
//! Every entry in `/sys/class/net` is a symbolic link into the `/sys/devices`
//! tree. Following that link tells whether the interface is software defined
//! (it lives below `/sys/devices/virtual`) or backed by hardware, in which
//! case the device directory exposes its NUMA locality, PCI identity and
//! SR-IOV capacity as small text files.
//!
//! Nothing here is cached: each call reads the files again.

#[macro_use]
extern crate slog;

// Convenience macro to obtain the scoped logger
#[macro_export]
macro_rules! sl {
    () => {
        slog_scope::logger().new(slog::o!("subsystem" => "netdev-sysfs"))
    };
}

pub mod config;
pub mod error;
pub mod fs;
pub mod inventory;
pub mod link;
pub mod numa;
pub mod pci;
pub mod pcidb;
pub mod sriov;

pub use config::SysfsConfig;
pub use error::{Error, Result};
pub use inventory::{Inventory, NetdevInfo};
pub use link::{is_virtual, is_virtual_path, realpath};
pub use numa::numa_node;
pub use pci::{ids, PciIdentity};
pub use pcidb::{PciDatabase, PciEntry, PciIds};
pub use sriov::{SriovCapacity, VfCount};
