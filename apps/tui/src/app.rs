//! Menu state machine.
//!
//! Owns the selection index and the current screen, dispatches actions, and
//! re-enumerates the device list after every mutating action so the display
//! always reflects what the OS reports. Nothing is patched in place: each
//! refresh replaces the whole list and clamps the selection back into
//! bounds.

use std::io;
use std::path::PathBuf;

use mtp_menu_core::{Device, mount, usb};
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tracing::warn;

use crate::events::Action;
use crate::ui;

/// Device backend the menu drives.
///
/// The shipped implementation shells out via mtp-menu-core; tests script it.
pub trait DeviceService {
    /// Enumerate all MTP devices with freshly probed mount state.
    fn list_devices(&mut self) -> Vec<Device>;

    /// Mount a device. Returns true iff the mount command succeeded.
    fn mount(&mut self, device: &Device) -> bool;

    /// Unmount a device. Returns true iff the unmount command succeeded.
    fn unmount(&mut self, device: &Device) -> bool;
}

/// The real backend: lsusb/udevadm enumeration and gio mount calls.
pub struct SystemDevices;

impl DeviceService for SystemDevices {
    fn list_devices(&mut self) -> Vec<Device> {
        usb::list_devices()
    }

    fn mount(&mut self, device: &Device) -> bool {
        match mount::mount_device(device) {
            Ok(()) => true,
            Err(e) => {
                warn!("{e}");
                false
            }
        }
    }

    fn unmount(&mut self, device: &Device) -> bool {
        match mount::unmount_device(device) {
            Ok(()) => true,
            Err(e) => {
                warn!("{e}");
                false
            }
        }
    }
}

/// What the menu is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// The device list with one row selected.
    Browsing,
    /// Result text of a mount/unmount action, waiting for any key.
    ActionResult { lines: Vec<String> },
}

/// Terminal outcome of a menu session, handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// User quit; nothing to do.
    Quit,
    /// Navigate into the selected device's mount directory.
    Navigate(PathBuf),
    /// User confirmed an unmounted device; the host should say so.
    NotMounted,
}

/// Menu controller state.
pub struct App<S: DeviceService> {
    service: S,
    devices: Vec<Device>,
    selected: usize,
    screen: Screen,
}

impl<S: DeviceService> App<S> {
    /// Creates the controller with an initial enumeration pass.
    pub fn new(mut service: S) -> Self {
        let devices = service.list_devices();
        Self {
            service,
            devices,
            selected: 0,
            screen: Screen::Browsing,
        }
    }

    /// The device list from the most recent enumeration.
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// The selected row, or None when the list is empty.
    pub fn selected(&self) -> Option<usize> {
        if self.devices.is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    /// The screen currently shown.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Applies one user action.
    ///
    /// Returns the session outcome when the action ends the menu, None while
    /// it keeps running.
    pub fn handle_action(&mut self, action: Action) -> Option<Outcome> {
        // Any key acknowledges an action result; the list is then rebuilt
        // so the rows reflect the action's effect.
        if matches!(self.screen, Screen::ActionResult { .. }) {
            self.refresh();
            self.screen = Screen::Browsing;
            return None;
        }

        match action {
            Action::Quit => Some(Outcome::Quit),
            Action::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
                None
            }
            Action::Down => {
                if self.selected + 1 < self.devices.len() {
                    self.selected += 1;
                }
                None
            }
            Action::ToggleMount => {
                self.toggle_mount();
                None
            }
            Action::Confirm => match self.devices.get(self.selected) {
                Some(device) if device.mounted => {
                    Some(Outcome::Navigate(device.mount_directory.clone()))
                }
                Some(_) => Some(Outcome::NotMounted),
                // Empty list: nothing to navigate into.
                None => None,
            },
            Action::None => None,
        }
    }

    /// Mounts or unmounts the selected device depending on its state and
    /// switches to the result screen.
    fn toggle_mount(&mut self) {
        let Some(device) = self.devices.get(self.selected).cloned() else {
            return;
        };
        let name = device.display_name();

        let result_line = if device.mounted {
            if self.service.unmount(&device) {
                format!("device {name} unmounted successfully")
            } else {
                format!("device {name} failed to unmount")
            }
        } else if self.service.mount(&device) {
            format!("device {name} mounted successfully")
        } else {
            format!("device {name} failed to mount")
        };

        self.screen = Screen::ActionResult {
            lines: vec![format!("Selected device: {name}"), result_line],
        };
    }

    /// Rebuilds the device list and clamps the selection into bounds.
    fn refresh(&mut self) {
        self.devices = self.service.list_devices();
        if self.devices.is_empty() {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(self.devices.len() - 1);
        }
    }
}

/// Runs the interactive loop until an outcome is reached.
///
/// Blocks on terminal input; every key press is mapped to an [`Action`] and
/// applied, and the screen is redrawn before each read.
pub fn run<S: DeviceService>(
    terminal: &mut DefaultTerminal,
    app: &mut App<S>,
) -> io::Result<Outcome> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(outcome) = app.handle_action(Action::from(key)) {
                return Ok(outcome);
            }
        }
    }
}
