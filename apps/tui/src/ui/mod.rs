// UI module for literacy-desk
// Handles all UI rendering functions

pub mod screens;
pub mod widgets;

use crate::app::{App, AppScreen};
use ratatui::layout::{Alignment, Constraint, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    match app.screen {
        AppScreen::Login => screens::login::render_login(app, f),
        AppScreen::Main => screens::main::render_main(app, f),
        AppScreen::Students => screens::students::render_students(app, f),
        AppScreen::Teachers => screens::teachers::render_teachers(app, f),
        AppScreen::Batches => screens::batches::render_batches(app, f),
        AppScreen::Attendance => screens::attendance::render_attendance(app, f),
        AppScreen::Reports => screens::reports::render_reports(app, f),
        AppScreen::EditReport => screens::edit_report::render_edit_report(app, f),
        AppScreen::Transfer => screens::transfer::render_transfer(app, f),
    }

    if app.show_help {
        screens::help::render_help_popup(app, f);
    }
}

/// Title bar, body, status box and one line of shortcuts.
pub struct ScreenAreas {
    pub title: Rect,
    pub body: Rect,
    pub status: Rect,
    pub shortcuts: Rect,
}

pub fn screen_layout(f: &Frame<'_>) -> ScreenAreas {
    let [title, body, status, shortcuts] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(f.area().inner(Margin::new(1, 0)));

    ScreenAreas {
        title,
        body,
        status,
        shortcuts,
    }
}

pub fn render_title(app: &App, f: &mut Frame<'_>, area: Rect, detail: &str) {
    let mut spans = vec![
        Span::styled(
            "Literacy Desk ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            app.screen.label(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if !detail.is_empty() {
        spans.push(Span::styled(
            format!("  {detail}"),
            Style::default().fg(Color::Gray),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(TextLine::from(spans)).block(block), area);
}

pub fn render_status(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let style = if app.status_message.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };

    let status_paragraph = Paragraph::new(Text::from(Span::styled(
        app.status_message.as_str(),
        style,
    )))
    .block(status_block)
    .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, area);
}

/// `key: action` pairs on one centered line.
pub fn render_shortcuts(f: &mut Frame<'_>, area: Rect, pairs: &[(&str, &str)]) {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut spans = Vec::with_capacity(pairs.len() * 2);
    for (key, action) in pairs {
        spans.push(Span::styled((*key).to_string(), key_style));
        spans.push(Span::raw(format!(": {action}   ")));
    }

    f.render_widget(
        Paragraph::new(TextLine::from(spans)).alignment(Alignment::Center),
        area,
    );
}
