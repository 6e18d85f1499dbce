//! MTP device model and path derivation.
//!
//! A [`Device`] is an immutable snapshot taken during one enumeration pass.
//! Lists are rebuilt wholesale after every mount or unmount action, so no
//! record here ever goes stale by mutation.

use std::path::{Path, PathBuf};

/// An MTP-class device found on the USB bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// USB bus number (1-999).
    pub bus: u16,
    /// Device number on that bus (1-999).
    pub id: u16,
    /// Device node path (e.g., "/dev/bus/usb/003/012"), used for mounting.
    pub node_path: PathBuf,
    /// Human-readable model name, underscores replaced with spaces.
    /// Empty when the metadata lookup failed.
    pub model: String,
    /// USB serial identifier from udev. Empty when the lookup failed.
    pub serial: String,
    /// Expected gvfs mount directory for this device.
    pub mount_directory: PathBuf,
    /// Whether the mount directory existed when this snapshot was taken.
    pub mounted: bool,
}

impl Device {
    /// The URI gvfs derives the mount directory name from.
    pub fn mount_uri(&self) -> String {
        mount_uri_for(&self.serial)
    }

    /// The scheme identifier `gio mount -u` expects for unmounting.
    pub fn unmount_token(&self) -> String {
        format!("mtp://{}", self.serial)
    }

    /// Returns a name suitable for display.
    ///
    /// Falls back to the device node path when the metadata lookup left the
    /// model blank.
    pub fn display_name(&self) -> String {
        if self.model.is_empty() {
            self.node_path.display().to_string()
        } else {
            self.model.clone()
        }
    }
}

/// Returns the mount URI for a device serial.
pub fn mount_uri_for(serial: &str) -> String {
    format!("mtp:host={serial}")
}

/// Returns the USB device node path for a (bus, id) pair.
///
/// Bus and id are zero-padded to 3 digits, matching the `/dev/bus/usb`
/// hierarchy layout.
pub fn device_node_path(bus: u16, id: u16) -> PathBuf {
    PathBuf::from(format!("/dev/bus/usb/{bus:03}/{id:03}"))
}

/// Returns the expected mount directory for a mount URI under the given
/// runtime directory.
///
/// gvfs names the mount directory after the URI itself, so this is a pure
/// string join.
pub fn mount_directory_in(runtime_dir: &Path, mount_uri: &str) -> PathBuf {
    runtime_dir.join("gvfs").join(mount_uri)
}

/// Returns the expected mount directory for a mount URI for the current user.
pub fn mount_directory(mount_uri: &str) -> PathBuf {
    mount_directory_in(&user_runtime_dir(), mount_uri)
}

/// Returns the current user's runtime directory.
///
/// Prefers `$XDG_RUNTIME_DIR`; falls back to `/run/user/<uid>`, which is
/// where gvfs mounts live on systemd hosts.
pub fn user_runtime_dir() -> PathBuf {
    dirs::runtime_dir()
        .unwrap_or_else(|| PathBuf::from(format!("/run/user/{}", nix::unistd::getuid())))
}
