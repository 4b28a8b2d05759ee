// Copyright (c) 2019-2022 Alibaba Cloud
// Copyright (c) 2019-2022 Ant Group
//
// SPDX-License-Identifier: Apache-2.0
//

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum LogFormat {
    Term,
    Json,
}

/// Report the hardware behind the network interfaces of this host
#[derive(Parser, Debug)]
#[clap(name = "netdev-inventory", version, about)]
pub struct InventoryArgs {
    /// TOML file holding the sysfs and pci.ids locations
    #[clap(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Alternative sysfs mount point, e.g. /host/sys
    #[clap(long, value_name = "DIR")]
    pub sysfs_root: Option<PathBuf>,

    /// pci.ids database used to name vendors and devices
    #[clap(long, value_name = "FILE")]
    pub pci_ids: Option<PathBuf>,

    #[clap(long, default_value = "warn")]
    pub log_level: String,

    #[clap(long, value_enum, default_value = "term")]
    pub log_format: LogFormat,

    /// Indent the JSON output
    #[clap(long)]
    pub pretty: bool,

    /// Interfaces to report, all of them when empty
    pub interfaces: Vec<String>,
}
