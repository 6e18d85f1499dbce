//! Menu rendering with ratatui.
//!
//! One screen shows the device rows with the selection highlighted and a
//! help line pinned to the bottom; the other shows the result text of a
//! mount/unmount action.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::app::{App, DeviceService, Screen};

/// Fixed help line pinned to the bottom of the display.
const HELP_LINE: &str = "q: Quit | m: Select | enter: cd";

/// Renders the complete UI for the current screen.
pub fn render<S: DeviceService>(frame: &mut Frame, app: &App<S>) {
    match app.screen() {
        Screen::Browsing => render_device_list(frame, app),
        Screen::ActionResult { lines } => render_action_result(frame, lines),
    }
}

fn render_device_list<S: DeviceService>(frame: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    if app.devices().is_empty() {
        let placeholder = Paragraph::new("No devices connected");
        frame.render_widget(placeholder, chunks[0]);
    } else {
        let items: Vec<ListItem> = app
            .devices()
            .iter()
            .enumerate()
            .map(|(idx, device)| {
                let status = if device.mounted { "Mounted" } else { "Available" };
                ListItem::new(format!("{}. {} - {}", idx + 1, device.display_name(), status))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = ListState::default();
        state.select(app.selected());
        frame.render_stateful_widget(list, chunks[0], &mut state);
    }

    render_help_line(frame, chunks[1]);
}

fn render_action_result(frame: &mut Frame, lines: &[String]) {
    let mut text: Vec<Line> = lines.iter().map(|l| Line::from(l.as_str())).collect();
    text.push(Line::from(""));
    text.push(Line::from("Press any key to continue..."));

    frame.render_widget(Paragraph::new(text), frame.area());
}

fn render_help_line(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(HELP_LINE)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(help, area);
}
