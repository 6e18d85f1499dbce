//! mtp-menu: interactive menu for mounting MTP devices.
//!
//! Meant to be launched from a file-manager keybinding. With no argument it
//! owns the terminal for one selection session and prints the chosen mount
//! directory to stdout; with `help` it prints a usage notice instead.

mod app;
mod events;
mod host;
mod ui;

use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use app::{App, DeviceService, Outcome, SystemDevices};
use host::{Host, StdioHost};

const HELP_TEXT: &str = "Run mtp-menu with no argument to display the menu";

/// Interactive menu for mounting and unmounting MTP devices.
#[derive(Parser)]
#[command(name = "mtp-menu")]
#[command(about = "Mount, unmount and browse MTP devices", long_about = None)]
struct Cli {
    /// Only "help" is recognized; anything else is an error.
    argument: Option<String>,
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let mut host = StdioHost;

    if handle_argument(cli.argument.as_deref(), &mut host) {
        run_menu(SystemDevices, &mut host);
    }
}

/// Logs to stderr, defaulting to warnings so nothing scribbles over the menu.
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Handles the argument surface. Returns true when the menu should run.
fn handle_argument(argument: Option<&str>, host: &mut dyn Host) -> bool {
    match argument {
        None => true,
        Some("help") => {
            host.notify(HELP_TEXT, false);
            false
        }
        Some(_) => {
            host.notify("Type 'mtp-menu help' for help", true);
            false
        }
    }
}

/// Runs one interactive session and reports its outcome to the host.
///
/// When no devices are present the interactive loop is never entered; the
/// host is notified once and the action ends.
fn run_menu<S: DeviceService>(mut service: S, host: &mut dyn Host) {
    if service.list_devices().is_empty() {
        host.notify("No devices found", true);
        return;
    }

    let mut app = App::new(service);
    let mut terminal = ratatui::init();
    let result = app::run(&mut terminal, &mut app);
    ratatui::restore();
    host.redraw();

    dispatch_outcome(result, host);
}

/// Converts the session outcome into host callbacks.
fn dispatch_outcome(result: io::Result<Outcome>, host: &mut dyn Host) {
    match result {
        Ok(Outcome::Navigate(path)) => host.navigate_to(&path),
        Ok(Outcome::NotMounted) => host.notify("Sorry, not mounted", true),
        Ok(Outcome::Quit) => {}
        Err(e) => host.notify(&format!("terminal error: {e}"), true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtp_menu_core::Device;
    use std::path::{Path, PathBuf};

    #[derive(Default)]
    struct RecordingHost {
        navigations: Vec<PathBuf>,
        notices: Vec<(String, bool)>,
        redraws: usize,
    }

    impl Host for RecordingHost {
        fn navigate_to(&mut self, path: &Path) {
            self.navigations.push(path.to_path_buf());
        }

        fn notify(&mut self, message: &str, is_error: bool) {
            self.notices.push((message.to_string(), is_error));
        }

        fn redraw(&mut self) {
            self.redraws += 1;
        }
    }

    struct EmptyService;

    impl DeviceService for EmptyService {
        fn list_devices(&mut self) -> Vec<Device> {
            Vec::new()
        }

        fn mount(&mut self, _device: &Device) -> bool {
            false
        }

        fn unmount(&mut self, _device: &Device) -> bool {
            false
        }
    }

    #[test]
    fn test_no_argument_runs_menu() {
        let mut host = RecordingHost::default();
        assert!(handle_argument(None, &mut host));
        assert!(host.notices.is_empty());
    }

    #[test]
    fn test_help_argument_notifies_usage() {
        let mut host = RecordingHost::default();
        assert!(!handle_argument(Some("help"), &mut host));
        assert_eq!(host.notices, vec![(HELP_TEXT.to_string(), false)]);
    }

    #[test]
    fn test_unknown_argument_is_an_error() {
        let mut host = RecordingHost::default();
        assert!(!handle_argument(Some("bogus"), &mut host));
        assert_eq!(host.notices.len(), 1);
        assert!(host.notices[0].1);
    }

    #[test]
    fn test_no_devices_notifies_once_without_entering_menu() {
        let mut host = RecordingHost::default();
        run_menu(EmptyService, &mut host);
        assert_eq!(host.notices, vec![("No devices found".to_string(), true)]);
        assert!(host.navigations.is_empty());
        // Terminal was never acquired, so the host is not asked to repaint.
        assert_eq!(host.redraws, 0);
    }

    #[test]
    fn test_navigate_outcome_calls_navigate_only() {
        let mut host = RecordingHost::default();
        let path = PathBuf::from("/run/user/1000/gvfs/mtp:host=SERIAL");
        dispatch_outcome(Ok(Outcome::Navigate(path.clone())), &mut host);
        assert_eq!(host.navigations, vec![path]);
        assert!(host.notices.is_empty());
    }

    #[test]
    fn test_not_mounted_outcome_notifies_error() {
        let mut host = RecordingHost::default();
        dispatch_outcome(Ok(Outcome::NotMounted), &mut host);
        assert!(host.navigations.is_empty());
        assert_eq!(host.notices, vec![("Sorry, not mounted".to_string(), true)]);
    }

    #[test]
    fn test_quit_outcome_is_silent() {
        let mut host = RecordingHost::default();
        dispatch_outcome(Ok(Outcome::Quit), &mut host);
        assert!(host.navigations.is_empty());
        assert!(host.notices.is_empty());
    }
}
