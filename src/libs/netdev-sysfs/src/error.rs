// Copyright (c) 2019-2022 Alibaba Cloud
// Copyright (c) 2019-2022 Ant Group
//
// SPDX-License-Identifier: Apache-2.0
//

use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading device state out of sysfs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The interface entry could not be read as a symbolic link.
    #[error("failed to read link {path:?}")]
    ReadLink { path: PathBuf, source: io::Error },

    /// A sysfs attribute could not be read.
    #[error("failed to read {path:?}")]
    Read { path: PathBuf, source: io::Error },

    /// A sysfs attribute did not hold a decimal integer.
    #[error("failed to parse {content:?} from {path:?}")]
    Parse {
        path: PathBuf,
        content: String,
        source: ParseIntError,
    },

    /// The vendor file was present but empty.
    #[error("empty pci vendor id in {0:?}")]
    MissingVendor(PathBuf),

    /// The PCI database has no entry for the identity.
    #[error("pci device {vendor}:{device} not found in database")]
    PciNotFound { vendor: String, device: String },

    /// A `pci.ids` database could not be parsed.
    #[error("invalid pci.ids line {line}: {reason}")]
    PciIds { line: usize, reason: String },

    #[error("invalid configuration")]
    Config(#[from] toml::de::Error),
}

impl Error {
    /// Whether the underlying cause is a missing file, which sysfs uses to
    /// say a feature is not supported by the device.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::ReadLink { source, .. } | Error::Read { source, .. } => {
                source.kind() == io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}
