// Copyright (c) 2019-2022 Alibaba Cloud
// Copyright (c) 2019-2022 Ant Group
//
// SPDX-License-Identifier: Apache-2.0
//

mod args;

use std::io;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use netdev_sysfs::{Inventory, NetdevInfo, PciDatabase, PciIds, SysfsConfig};
use slog::{info, warn, Logger};

use crate::args::{InventoryArgs, LogFormat};

const NAME: &str = "netdev-inventory";

fn load_config(args: &InventoryArgs) -> Result<SysfsConfig> {
    let mut config = match args.config.as_ref() {
        Some(path) => {
            SysfsConfig::load(path).with_context(|| format!("load config {:?}", path))?
        }
        None => SysfsConfig::default(),
    };

    if let Some(root) = args.sysfs_root.as_ref() {
        let pci_ids = config.pci_ids.take();
        config = SysfsConfig {
            pci_ids,
            ..SysfsConfig::with_root(root)
        };
    }
    if let Some(path) = args.pci_ids.as_ref() {
        config.pci_ids = Some(path.clone());
    }

    Ok(config)
}

fn open_pcidb(logger: &Logger, config: &SysfsConfig) -> Option<Arc<dyn PciDatabase>> {
    let path = match PciIds::locate(config.pci_ids.as_deref()) {
        Some(path) => path,
        None => {
            warn!(logger, "no pci.ids database found, device names are not resolved");
            return None;
        }
    };

    match PciIds::open(&path) {
        Ok(db) if db.is_empty() => {
            warn!(logger, "pci database {:?} holds no vendors", path);
            None
        }
        Ok(db) => {
            info!(logger, "loaded pci database"; "path" => path.display().to_string());
            Some(Arc::new(db))
        }
        Err(e) => {
            warn!(logger, "failed to load pci database {:?}: {}", path, e);
            None
        }
    }
}

fn run(logger: &Logger, args: &InventoryArgs) -> Result<Vec<NetdevInfo>> {
    let config = load_config(args)?;
    let pcidb = open_pcidb(logger, &config);
    let inventory = Inventory::new(config, pcidb);

    if args.interfaces.is_empty() {
        return inventory.discover_all().context("discover interfaces");
    }

    args.interfaces
        .iter()
        .map(|name| {
            inventory
                .discover(name)
                .with_context(|| format!("discover interface {}", name))
        })
        .collect()
}

fn real_main() -> Result<()> {
    let args = InventoryArgs::parse();

    let level = logging::slog_level_from_str(&args.log_level).map_err(|e| anyhow!(e))?;
    let (logger, _guard) = match args.log_format {
        LogFormat::Json => logging::create_logger(NAME, "cli", level, io::stderr()),
        LogFormat::Term => logging::create_term_logger(level),
    };
    // The library logs through the scoped logger.
    let _scope_guard = slog_scope::set_global_logger(logger.clone());
    info!(logger, "starting {}", NAME; "log_level" => logging::slog_level_to_str(level));

    let devices = run(&logger, &args)?;

    let stdout = io::stdout();
    if args.pretty {
        serde_json::to_writer_pretty(stdout.lock(), &devices)
    } else {
        serde_json::to_writer(stdout.lock(), &devices)
    }
    .context("write inventory")?;
    println!();

    Ok(())
}

fn main() {
    if let Err(e) = real_main() {
        eprintln!("ERROR: {:#}", e);
        std::process::exit(1);
    }
}
