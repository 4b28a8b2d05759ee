// Copyright (c) 2019-2022 Alibaba Cloud
// Copyright (c) 2019-2022 Ant Group
//
// SPDX-License-Identifier: Apache-2.0
//

use std::path::Path;

use crate::error::Result;
use crate::fs::{parse_decimal, read_trimmed};

const NUMA_NODE: &str = "numa_node";

/// Returns the NUMA node of the device at `device_path`.
///
/// The kernel reports `-1` when the platform has no locality information.
/// A missing or malformed `numa_node` file is an error, never node 0.
pub fn numa_node<P: AsRef<Path>>(device_path: P) -> Result<i32> {
    let path = device_path.as_ref().join(NUMA_NODE);
    let content = read_trimmed(&path)?;
    parse_decimal(&path, &content)
}
