// Copyright (c) 2019-2022 Alibaba Cloud
// Copyright (c) 2019-2022 Ant Group
//
// SPDX-License-Identifier: Apache-2.0
//

use std::path::{Path, PathBuf};

use crate::config::SysfsConfig;
use crate::error::Result;
use crate::fs::resolve_link;

/// Resolves the `<syspath>/<name>` link to the device node it points to.
pub fn realpath<P: AsRef<Path>>(name: &str, syspath: P) -> Result<PathBuf> {
    resolve_link(syspath.as_ref().join(name))
}

/// Whether `name` is a software defined interface such as a bridge, a veth
/// pair, a tunnel or the loopback device.
///
/// The comparison is done on path components, so `devices/virtual2` is not
/// mistaken for a child of `devices/virtual`.
pub fn is_virtual(name: &str, config: &SysfsConfig) -> Result<bool> {
    let path = realpath(name, &config.sys_class_net)?;
    let is_virtual = is_virtual_path(&path, config);
    debug!(sl!(), "resolved interface {} to {:?}", name, path; "virtual" => is_virtual);
    Ok(is_virtual)
}

/// Whether an already resolved device node lies below the virtual devices
/// tree.
pub fn is_virtual_path(path: &Path, config: &SysfsConfig) -> bool {
    path.starts_with(config.virtual_devices())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::symlink;

    fn setup_sysfs(root: &Path, links: &[(&str, &str)]) -> SysfsConfig {
        let config = SysfsConfig::with_root(root);
        fs::create_dir_all(&config.sys_class_net).unwrap();
        for (name, target) in links {
            symlink(target, config.sys_class_net.join(name)).unwrap();
        }
        config
    }

    #[test]
    fn test_realpath() {
        let dir = tempfile::tempdir().unwrap();
        let config = setup_sysfs(
            dir.path(),
            &[
                ("eth0", "/sys/devices/pci0000:00/0000:00:01.0/net/eth0"),
                ("lo", "../../devices/virtual/net/lo"),
            ],
        );

        assert_eq!(
            realpath("eth0", &config.sys_class_net).unwrap(),
            PathBuf::from("/sys/devices/pci0000:00/0000:00:01.0/net/eth0")
        );
        assert_eq!(
            realpath("lo", &config.sys_class_net).unwrap(),
            dir.path().join("devices/virtual/net/lo")
        );
        assert!(realpath("missing", &config.sys_class_net).is_err());
    }

    #[test]
    fn test_is_virtual() {
        let dir = tempfile::tempdir().unwrap();
        let cilium_host = format!(
            "{}/devices/virtual/net/cilium_host",
            dir.path().to_str().unwrap()
        );
        let config = setup_sysfs(
            dir.path(),
            &[
                ("lo", "../../devices/virtual/net/lo"),
                ("cilium_host", cilium_host.as_str()),
                ("eth0", "../../devices/pci0000:00/0000:00:01.0/net/eth0"),
                ("bar", "../../devices/virtualfoo/net/bar"),
                ("baz", "../../devices/virtual2/net/baz"),
                // the virtual node itself is the subtree root
                ("odd", "../../devices/virtual"),
            ],
        );

        let data = vec![
            ("lo", true),
            ("cilium_host", true),
            ("eth0", false),
            ("bar", false),
            ("baz", false),
            ("odd", true),
        ];
        for (name, expected) in data.into_iter() {
            assert_eq!(is_virtual(name, &config).unwrap(), expected, "{}", name);
        }
    }

    #[test]
    fn test_is_virtual_unnormalized_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("x")).unwrap();
        let config = setup_sysfs(
            &dir.path().join("x/.."),
            &[
                ("lo", "../../devices/virtual/net/lo"),
                ("eth0", "../../devices/pci0000:00/0000:00:01.0/net/eth0"),
            ],
        );
        assert!(is_virtual("lo", &config).unwrap());
        assert!(!is_virtual("eth0", &config).unwrap());

        // the same tree reached through a path relative to the working directory
        let cwd = std::env::current_dir().unwrap();
        let mut relative = PathBuf::new();
        for _ in 1..cwd.components().count() {
            relative.push("..");
        }
        relative.push(dir.path().strip_prefix("/").unwrap());
        let config = SysfsConfig::with_root(&relative);
        let path = realpath("lo", &config.sys_class_net).unwrap();
        assert!(path.is_absolute());
        assert_eq!(path, dir.path().join("devices/virtual/net/lo"));
        assert!(is_virtual("lo", &config).unwrap());

        // hand built configs are compared in normalized form too
        let config = SysfsConfig {
            sys_class_net: dir.path().join("class/net"),
            sys_devices: dir.path().join("class/../devices"),
            pci_ids: None,
        };
        assert!(is_virtual("lo", &config).unwrap());
    }

    #[test]
    fn test_is_virtual_unresolved() {
        let dir = tempfile::tempdir().unwrap();
        let config = setup_sysfs(dir.path(), &[]);
        let err = is_virtual("eth9", &config).unwrap_err();
        assert!(err.is_not_found());
    }
}
