//! mtp-menu-core: Core library for MTP device mounting.
//!
//! This library discovers MTP (Media Transfer Protocol) devices on the USB
//! bus, derives their gvfs mount locations, probes current mount state, and
//! drives mount/unmount operations through gio.
//!
//! # Modules
//!
//! - [`usb`]: Device enumeration via `lsusb` and `udevadm`
//! - [`device`]: The immutable device record and its path derivations
//! - [`mount`]: Mount-state probing and gio mount/unmount operations
//! - [`error`]: Error types
//!
//! # Example
//!
//! ```no_run
//! use mtp_menu_core::{mount, usb};
//!
//! // Scan the bus; each record carries a freshly probed mount state.
//! let devices = usb::list_devices();
//!
//! if let Some(device) = devices.first() {
//!     if !device.mounted {
//!         mount::mount_device(device).unwrap();
//!     }
//!     // Mount state is re-derived by re-enumerating, not patched in place:
//!     let devices = usb::list_devices();
//!     assert!(devices.first().is_some());
//! }
//! ```

pub mod device;
pub mod error;
pub mod mount;
pub mod usb;

// Re-export commonly used types
pub use device::Device;
pub use error::{Error, Result};
