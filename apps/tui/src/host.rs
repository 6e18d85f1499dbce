//! Host file-manager callbacks.
//!
//! The menu does not talk to the embedding file manager directly; it goes
//! through the [`Host`] trait so the embedding side only has to provide a
//! directory-change command and a notification channel.

use std::path::Path;

/// Callbacks the embedding file manager provides to the menu.
pub trait Host {
    /// Change the host's working context to the given directory.
    fn navigate_to(&mut self, path: &Path);

    /// Display a transient message to the user.
    fn notify(&mut self, message: &str, is_error: bool);

    /// Called once after terminal control is released so the host can
    /// repaint its own view.
    fn redraw(&mut self);
}

/// Host implementation over standard streams.
///
/// The chosen directory goes to stdout so a wrapper can consume it, e.g.
/// `cd "$(mtp-menu)"` from a file-manager keybinding. Notices go to stderr
/// to keep stdout clean for the navigation channel.
pub struct StdioHost;

impl Host for StdioHost {
    fn navigate_to(&mut self, path: &Path) {
        println!("{}", path.display());
    }

    fn notify(&mut self, message: &str, is_error: bool) {
        if is_error {
            eprintln!("mtp-menu: {message}");
        } else {
            eprintln!("{message}");
        }
    }

    fn redraw(&mut self) {
        // The shell repaints its own prompt once the terminal is restored.
    }
}
