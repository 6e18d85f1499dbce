//! Mount and unmount operations via gio.
//!
//! MTP devices are not block devices; gvfs mounts them in userspace under
//! the runtime directory. Mounting addresses the device by its USB node
//! path, unmounting by its `mtp://` token. Both calls block until the
//! external command finishes.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::device::Device;
use crate::error::{Error, IoResultExt, Result};

/// Returns whether the given mount directory currently exists.
///
/// gvfs creates the directory when a device is mounted and removes it on
/// unmount, so existence is the mount state. A missing path means "not
/// mounted", never an error.
pub fn is_mounted(mount_directory: &Path) -> bool {
    mount_directory.exists()
}

/// Mounts a device by its USB node path.
///
/// Runs `gio mount -d <node>`. The mount directory appears as a side effect
/// of gvfs and is observed on the next enumeration, not here.
pub fn mount_device(device: &Device) -> Result<()> {
    debug!("mounting {}", device.node_path.display());
    let output = Command::new("gio")
        .arg("mount")
        .arg("-d")
        .arg(&device.node_path)
        .output()
        .command_context("gio mount -d")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(Error::Mount {
            device: device.node_path.display().to_string(),
            message: stderr,
        });
    }

    Ok(())
}

/// Unmounts a device by its `mtp://` token.
///
/// Runs `gio mount -u <token>`.
pub fn unmount_device(device: &Device) -> Result<()> {
    let token = device.unmount_token();
    debug!("unmounting {token}");
    let output = Command::new("gio")
        .args(["mount", "-u", &token])
        .output()
        .command_context("gio mount -u")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(Error::Unmount {
            device: token,
            message: stderr,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_mounted_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_mounted(dir.path()));
    }

    #[test]
    fn test_is_mounted_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gvfs").join("mtp:host=SERIAL");
        assert!(!is_mounted(&missing));
    }

    #[test]
    fn test_is_mounted_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(is_mounted(dir.path()), is_mounted(dir.path()));

        let path = dir.path().to_path_buf();
        drop(dir);
        assert!(!is_mounted(&path));
        assert_eq!(is_mounted(&path), is_mounted(&path));
    }
}
