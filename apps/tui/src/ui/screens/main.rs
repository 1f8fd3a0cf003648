use crate::app::state::AppScreen;
use crate::app::App;
use crate::ui::widgets::charts::{render_batch_rates, render_status_barchart};
use crate::ui::{render_shortcuts, render_status, render_title, screen_layout};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

pub fn render_main(app: &App, f: &mut Frame<'_>) {
    let areas = screen_layout(f);

    let signed_in = format!("signed in as {}  |  {}", app.operator(), app.today);
    render_title(app, f, areas.title, &signed_in);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(30)])
        .split(areas.body);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(6)])
        .split(columns[0]);

    render_menu(app, f, left[0]);
    render_counts(app, f, left[1]);

    let charts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    render_status_barchart(f, charts[0], "Today", &app.today_stats());
    render_batch_rates(f, charts[1], &app.batch_rates());

    render_status(app, f, areas.status);
    render_shortcuts(
        f,
        areas.shortcuts,
        &[
            ("↑/↓", "Menu"),
            ("Enter", "Open"),
            ("1-6", "Jump"),
            ("o", "Sign out"),
            ("F1", "Help"),
            ("q", "Quit"),
        ],
    );
}

fn render_menu(app: &App, f: &mut Frame<'_>, area: Rect) {
    let items: Vec<ListItem<'_>> = AppScreen::MENU
        .iter()
        .enumerate()
        .map(|(i, screen)| {
            let style = if i == app.menu_index {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!(" {}. {}", i + 1, screen.label())).style(style)
        })
        .collect();

    let menu = List::new(items).block(
        Block::default()
            .title(" Menu ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(menu, area);
}

fn render_counts(app: &App, f: &mut Frame<'_>, area: Rect) {
    let label = Style::default().fg(Color::Gray);
    let value = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let overall = app.overall_stats();

    let mut lines = vec![
        TextLine::from(vec![
            Span::styled("Students  ", label),
            Span::styled(
                format!("{} ({} active)", app.students.len(), app.active_student_count()),
                value,
            ),
        ]),
        TextLine::from(vec![
            Span::styled("Teachers  ", label),
            Span::styled(app.teachers.len().to_string(), value),
        ]),
        TextLine::from(vec![
            Span::styled("Batches   ", label),
            Span::styled(app.batches.len().to_string(), value),
        ]),
        TextLine::from(vec![
            Span::styled("Overall   ", label),
            Span::styled(
                format!(
                    "{:.1}% of {} records",
                    overall.attendance_rate, overall.total_records
                ),
                value,
            ),
        ]),
    ];

    if let Some(refetch) = &app.last_refetch {
        let names: Vec<&str> = refetch.tables.iter().map(|table| table.as_str()).collect();
        lines.push(TextLine::from(""));
        lines.push(TextLine::from(Span::styled(
            format!(
                "Synced {} {}s ago ({} changes, {} ms stale)",
                names.join(", "),
                refetch.at.elapsed().as_secs(),
                refetch.task_count,
                refetch.staleness.as_millis()
            ),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let counts = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .title(" Overview ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    f.render_widget(counts, area);
}
