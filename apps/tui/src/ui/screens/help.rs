use crate::app::state::AppScreen;
use crate::app::App;
use crate::cli::CliArgs;
use crate::ui::widgets::popup::render_popup;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::Frame;

/// Keys of the current screen followed by the command line usage.
pub fn render_help_popup(app: &App, f: &mut Frame<'_>) {
    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Yellow);

    let mut lines = vec![TextLine::from(Span::styled(
        format!("{} keys", app.screen.label()),
        heading,
    ))];
    for (key, action) in screen_keys(app.screen) {
        lines.push(TextLine::from(vec![
            Span::styled(format!("  {key:<12}"), key_style),
            Span::raw(*action),
        ]));
    }

    lines.push(TextLine::from(""));
    lines.push(TextLine::from(Span::styled("Command line", heading)));
    lines.extend(
        CliArgs::help_text()
            .lines()
            .map(|line| TextLine::from(line.to_string())),
    );
    lines.push(TextLine::from(""));
    lines.push(TextLine::from(Span::styled(
        "F1 or Esc closes this window",
        Style::default().fg(Color::Gray),
    )));

    render_popup(f, (70, 80), " Help ", lines, Color::Cyan);
}

fn screen_keys(screen: AppScreen) -> &'static [(&'static str, &'static str)] {
    match screen {
        AppScreen::Login => &[
            ("Tab", "Switch field"),
            ("Enter", "Sign in"),
            ("Esc", "Quit"),
        ],
        AppScreen::Main => &[
            ("Up/Down", "Move in menu"),
            ("Enter", "Open screen"),
            ("1-6", "Jump to screen"),
            ("o", "Sign out"),
            ("q", "Quit"),
        ],
        AppScreen::Students => &[
            ("/", "Search name, Aadhaar or phone"),
            ("c / b / s", "Cycle course, batch, status filter"),
            ("x", "Clear search and filters"),
            ("Enter", "Student details"),
            ("a", "Toggle active"),
            ("d", "Delete student"),
        ],
        AppScreen::Teachers => &[
            ("/", "Search"),
            ("f", "Cycle specialization filter"),
            ("x", "Clear search and filter"),
            ("d", "Delete teacher"),
        ],
        AppScreen::Batches => &[
            ("/", "Search"),
            ("t", "Cycle batch type filter"),
            ("x", "Clear search and filter"),
            ("Enter", "Take attendance for batch"),
            ("d", "Delete batch"),
        ],
        AppScreen::Attendance => &[
            ("Left/Right", "Previous or next day"),
            ("t", "Jump to today"),
            ("Tab / b", "Cycle batch"),
            ("p / a / l", "Mark present, absent, late"),
            ("c", "Clear the mark for the day"),
        ],
        AppScreen::Reports => &[
            ("n", "New report"),
            ("Enter / e", "Edit report"),
            ("d", "Delete report"),
        ],
        AppScreen::EditReport => &[
            ("Tab", "Next field"),
            ("Enter", "Save"),
            ("Esc", "Discard"),
        ],
        AppScreen::Transfer => &[
            ("i", "Edit import path"),
            ("Enter", "Import file"),
            ("x", "Export to .xlsx"),
            ("c", "Export to .csv"),
        ],
    }
}
