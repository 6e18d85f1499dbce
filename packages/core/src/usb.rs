//! USB bus scanning for MTP devices.
//!
//! Enumeration shells out to `lsusb` for the bus topology and to
//! `udevadm info` for per-device metadata, the same way each interactive
//! redraw re-derives truth from the OS instead of caching it. Enumeration
//! never fails outward: tool absence or garbled output degrades to an empty
//! list or blank fields.

use std::collections::HashSet;
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::device::{self, Device};
use crate::error::{Error, IoResultExt, Result};
use crate::mount;

/// Marker `lsusb` prints for devices reporting the MTP class.
const MTP_MARKER: &str = "MTP";

/// Columnar layout of an `lsusb` device line:
/// `Bus 003 Device 012: ID 18d1:4ee1 Google Inc. Pixel (MTP)`.
///
/// Bus and device numbers sit at fixed columns (4-6 and 15-17) in this
/// layout; the anchored match also rejects trailing artifact lines
/// outright. Known fragility: the layout is lsusb's, not ours, and may
/// drift across locales or versions.
static LSUSB_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Bus (\d{3}) Device (\d{3}): ID [0-9a-fA-F]{4}:[0-9a-fA-F]{4}")
        .expect("lsusb line regex is valid")
});

/// Lists all MTP devices currently on the USB bus.
///
/// Returns records in the order `lsusb` reports them, each with a freshly
/// probed mount state. An unreachable tool or unparseable output yields an
/// empty list, never an error.
pub fn list_devices() -> Vec<Device> {
    let listing = match run_lsusb() {
        Ok(listing) => listing,
        Err(e) => {
            warn!("USB bus listing failed: {e}");
            return Vec::new();
        }
    };

    parse_listing(&listing)
        .into_iter()
        .map(|(bus, id)| probe_device(bus, id))
        .collect()
}

/// Extracts (bus, id) pairs from `lsusb` output, keeping only well-formed
/// MTP-class lines. Duplicate pairs are dropped, preserving first position.
fn parse_listing(listing: &str) -> Vec<(u16, u16)> {
    let mut seen = HashSet::new();
    let mut pairs = Vec::new();

    for line in listing.lines() {
        if !line.contains(MTP_MARKER) {
            continue;
        }
        let Some(caps) = LSUSB_LINE.captures(line) else {
            debug!("skipping malformed lsusb line: {line:?}");
            continue;
        };
        // The regex guarantees 3-digit captures, so these parses cannot fail.
        let bus: u16 = caps[1].parse().unwrap_or(0);
        let id: u16 = caps[2].parse().unwrap_or(0);
        if seen.insert((bus, id)) {
            pairs.push((bus, id));
        }
    }

    pairs
}

/// Builds a full [`Device`] record for one (bus, id) pair.
///
/// Metadata lookup failures degrade to empty model/serial strings rather
/// than dropping the device.
fn probe_device(bus: u16, id: u16) -> Device {
    let node_path = device::device_node_path(bus, id);
    let properties = query_properties(&node_path).unwrap_or_else(|e| {
        warn!("udev metadata lookup failed for {}: {e}", node_path.display());
        String::new()
    });

    let model = extract_property(&properties, "ID_MODEL")
        .map(|value| value.replace('_', " "))
        .unwrap_or_default();
    let serial = extract_property(&properties, "ID_USB_SERIAL").unwrap_or_default();

    let mount_directory = device::mount_directory(&device::mount_uri_for(&serial));
    let mounted = mount::is_mounted(&mount_directory);

    Device {
        bus,
        id,
        node_path,
        model,
        serial,
        mount_directory,
        mounted,
    }
}

/// Runs `lsusb` and returns its stdout.
fn run_lsusb() -> Result<String> {
    let output = Command::new("lsusb").output().command_context("lsusb")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(Error::CommandExit {
            command: "lsusb".to_string(),
            code: output.status.code().unwrap_or(-1),
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Queries udev properties for a device node.
///
/// Returns the raw `KEY=value` property block from
/// `udevadm info --query=property --name=<node>`.
fn query_properties(node_path: &Path) -> Result<String> {
    let name_arg = format!("--name={}", node_path.display());
    let output = Command::new("udevadm")
        .args(["info", "--query=property", &name_arg])
        .output()
        .command_context("udevadm info")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(Error::CommandExit {
            command: "udevadm info".to_string(),
            code: output.status.code().unwrap_or(-1),
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Extracts the value of an exact property key from a `KEY=value` block.
///
/// Exact key comparison keeps `ID_MODEL` from matching `ID_MODEL_ID` or
/// `ID_MODEL_ENC`.
fn extract_property(properties: &str, key: &str) -> Option<String> {
    properties.lines().find_map(|line| {
        let (k, v) = line.split_once('=')?;
        (k == key).then(|| v.trim().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LSUSB: &str = "\
Bus 002 Device 003: ID 04e8:6860 Samsung Electronics Co., Ltd Galaxy series (MTP mode)
Bus 003 Device 002: ID 8087:0024 Intel Corp. Integrated Rate Matching Hub
Bus 003 Device 012: ID 18d1:4ee1 Google Inc. Nexus/Pixel Device (MTP)
Bus 001 Device 004: ID 046d:c52b Logitech, Inc. Unifying Receiver
";

    const SAMPLE_PROPERTIES: &str = "\
DEVNAME=/dev/bus/usb/003/012
ID_MODEL=Pixel_7
ID_MODEL_ENC=Pixel\\x207
ID_MODEL_ID=4ee1
ID_USB_SERIAL=Google_Pixel_7_ABC123
ID_VENDOR=Google
";

    #[test]
    fn test_parse_listing_keeps_only_mtp_lines() {
        let pairs = parse_listing(SAMPLE_LSUSB);
        assert_eq!(pairs, vec![(2, 3), (3, 12)]);
    }

    #[test]
    fn test_parse_listing_count_matches_well_formed_lines() {
        let listing = "\
Bus 001 Device 002: ID 04e8:6860 Samsung Galaxy (MTP)
Bus 001 Device 003: ID 04e8:6860 Samsung Galaxy (MTP)
";
        assert_eq!(parse_listing(listing).len(), 2);
    }

    #[test]
    fn test_parse_listing_drops_artifact_lines() {
        // Truncated pipelines and shell artifacts fail the anchored match
        // even when they mention MTP.
        let listing = "\
Bus 003 Device 012: ID 18d1:4ee1 Google Inc. Pixel (MTP)
MTP garbage trailer
'
";
        assert_eq!(parse_listing(listing), vec![(3, 12)]);
    }

    #[test]
    fn test_parse_listing_dedups_repeated_pairs() {
        let listing = "\
Bus 003 Device 012: ID 18d1:4ee1 Google Inc. Pixel (MTP)
Bus 003 Device 012: ID 18d1:4ee1 Google Inc. Pixel (MTP)
";
        assert_eq!(parse_listing(listing), vec![(3, 12)]);
    }

    #[test]
    fn test_parse_listing_empty_output() {
        assert!(parse_listing("").is_empty());
        assert!(parse_listing("Bus 001 Device 002: ID 0bda:0411 Realtek Hub\n").is_empty());
    }

    #[test]
    fn test_extract_property_exact_key() {
        assert_eq!(
            extract_property(SAMPLE_PROPERTIES, "ID_MODEL"),
            Some("Pixel_7".to_string())
        );
        assert_eq!(
            extract_property(SAMPLE_PROPERTIES, "ID_USB_SERIAL"),
            Some("Google_Pixel_7_ABC123".to_string())
        );
    }

    #[test]
    fn test_extract_property_does_not_prefix_match() {
        // ID_MODEL must not pick up ID_MODEL_ID or ID_MODEL_ENC.
        let block = "ID_MODEL_ID=4ee1\nID_MODEL_ENC=Pixel\n";
        assert_eq!(extract_property(block, "ID_MODEL"), None);
    }

    #[test]
    fn test_extract_property_missing_key() {
        assert_eq!(extract_property(SAMPLE_PROPERTIES, "ID_SERIAL_SHORT"), None);
    }
}
