// Copyright (c) 2019-2022 Alibaba Cloud
// Copyright (c) 2019-2022 Ant Group
//
// SPDX-License-Identifier: Apache-2.0
//

//! Encoding conventions of sysfs attribute files.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use path_clean::PathClean;

use crate::error::{Error, Result};

const HEX_PREFIX: &str = "0x";

/// Trims whitespace and then a single leading `0x`, so that `" 0x8086\n"`
/// becomes `"8086"`.
pub fn trim_hex_prefix(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix(HEX_PREFIX).unwrap_or(s)
}

/// Reads an attribute and trims the trailing newline the kernel appends.
pub fn read_trimmed<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(content.trim().to_string())
}

/// Like [`read_trimmed`], but a missing file is `None`: sysfs omits the
/// attributes of features a device does not have.
pub fn read_optional<P: AsRef<Path>>(path: P) -> Result<Option<String>> {
    match read_trimmed(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn parse_decimal<T>(path: &Path, content: &str) -> Result<T>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    content.trim().parse::<T>().map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        content: content.to_string(),
        source: e,
    })
}

/// Makes `path` absolute against the working directory and removes `.` and
/// `..` components without touching the filesystem.
pub fn absolute_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        return path.clean();
    }
    match env::current_dir() {
        Ok(cwd) => cwd.join(path).clean(),
        Err(_) => path.clean(),
    }
}

/// Returns the absolute path `link` points to. Relative targets are taken
/// relative to the directory holding the link, not the working directory.
pub fn resolve_link<P: AsRef<Path>>(link: P) -> Result<PathBuf> {
    let link = link.as_ref();
    let target = fs::read_link(link).map_err(|e| Error::ReadLink {
        path: link.to_path_buf(),
        source: e,
    })?;
    if target.is_absolute() {
        return Ok(target.clean());
    }
    let link = absolute_path(link);
    let parent = link.parent().ok_or_else(|| Error::ReadLink {
        path: link.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "link has no parent"),
    })?;
    Ok(parent.join(target).clean())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;

    #[test]
    fn test_trim_hex_prefix() {
        let data = vec![
            ("0x8086", "8086"),
            ("  0x1521\n", "1521"),
            ("15b3", "15b3"),
            ("", ""),
            ("0x", ""),
            // only a single prefix is removed
            ("0x0x10", "0x10"),
        ];
        for (input, expected) in data.into_iter() {
            assert_eq!(trim_hex_prefix(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_read_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sriov_numvfs");
        assert_eq!(read_optional(&path).unwrap(), None);

        fs::write(&path, "8\n").unwrap();
        assert_eq!(read_optional(&path).unwrap(), Some("8".to_string()));

        // a directory is not a missing file
        assert!(read_optional(dir.path()).is_err());
    }

    #[test]
    fn test_parse_decimal() {
        let path = Path::new("numa_node");
        assert_eq!(parse_decimal::<i32>(path, "-1").unwrap(), -1);
        assert_eq!(parse_decimal::<u32>(path, " 64\n").unwrap(), 64);
        assert!(parse_decimal::<u32>(path, "0x40").is_err());
        assert!(parse_decimal::<i32>(path, "4294967296").is_err());
    }

    #[test]
    fn test_absolute_path() {
        assert_eq!(
            absolute_path("/host/x/../sys/./class"),
            PathBuf::from("/host/sys/class")
        );
        let cwd = env::current_dir().unwrap();
        let relative = absolute_path("./sys/devices");
        assert!(relative.is_absolute());
        assert_eq!(relative, cwd.join("sys/devices"));
    }

    #[test]
    fn test_resolve_link() {
        let dir = tempfile::tempdir().unwrap();
        let net = dir.path().join("class/net");
        fs::create_dir_all(&net).unwrap();

        let abs_link = net.join("eth0");
        symlink("/sys/devices/pci0000:00/0000:00:01.0/net/eth0", &abs_link).unwrap();
        assert_eq!(
            resolve_link(&abs_link).unwrap(),
            PathBuf::from("/sys/devices/pci0000:00/0000:00:01.0/net/eth0")
        );

        let rel_link = net.join("lo");
        symlink("../../devices/virtual/net/lo", &rel_link).unwrap();
        assert_eq!(
            resolve_link(&rel_link).unwrap(),
            dir.path().join("devices/virtual/net/lo")
        );

        let dotted_link = net.join("eth1");
        symlink("/sys/devices/./pci0000:00/../pci0000:00/net/eth1", &dotted_link).unwrap();
        assert_eq!(
            resolve_link(&dotted_link).unwrap(),
            PathBuf::from("/sys/devices/pci0000:00/net/eth1")
        );

        // the link itself is reached through a `..` component
        fs::create_dir_all(dir.path().join("class/x")).unwrap();
        let indirect = dir.path().join("class/x/../net/lo");
        assert_eq!(
            resolve_link(&indirect).unwrap(),
            dir.path().join("devices/virtual/net/lo")
        );

        let err = resolve_link(net.join("missing")).unwrap_err();
        assert!(matches!(err, Error::ReadLink { .. }));
        assert!(err.is_not_found());
    }
}
