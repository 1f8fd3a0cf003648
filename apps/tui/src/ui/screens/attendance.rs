use crate::app::App;
use crate::ui::widgets::charts::{render_status_barchart, status_color};
use crate::ui::widgets::tables::{
    header_row, render_empty, scroll_offset, selected_style, visible_rows,
};
use crate::ui::{render_shortcuts, render_status, render_title, screen_layout};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

pub fn render_attendance(app: &App, f: &mut Frame<'_>) {
    let areas = screen_layout(f);
    let date = app.attendance_date_string();
    let batch = app
        .attendance_batch()
        .map_or("All batches", |batch| batch.name.as_str());

    let weekday = app.attendance_date.format("%A");
    render_title(app, f, areas.title, &format!("{batch}  |  {date} ({weekday})"));

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(areas.body);

    let roster = app.attendance_roster();
    if roster.is_empty() {
        render_empty(f, columns[0], "Roster", "No active students in this batch.");
    } else {
        let max_rows = visible_rows(columns[0]);
        let selected = app.attendance_selected;
        let offset = scroll_offset(roster.len(), max_rows, selected);
        let rates = app.attendance_student_rates();

        let rows = roster
            .iter()
            .enumerate()
            .skip(offset)
            .take(max_rows)
            .map(|(i, student)| {
                let record = app.status_on(student.id, &date);
                let status_style = record
                    .and_then(|record| record.parsed_status())
                    .map_or_else(Style::default, |status| {
                        Style::default().fg(status_color(status))
                    });
                let row_style = if i == selected {
                    selected_style()
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(student.name.clone()),
                    Cell::from(app.batch_name(student.batch_id).to_string()),
                    Cell::from(App::status_label(record)).style(status_style),
                    Cell::from(rates.get(&student.id).map_or_else(
                        || "-".to_string(),
                        |stats| format!("{:.0}%", stats.attendance_rate),
                    )),
                    Cell::from(
                        record
                            .and_then(|record| record.marked_by.clone())
                            .unwrap_or_default(),
                    ),
                ])
                .style(row_style)
            });

        let marked = roster
            .iter()
            .filter(|student| app.status_on(student.id, &date).is_some())
            .count();

        let table = Table::new(
            rows,
            [
                Constraint::Min(18),
                Constraint::Length(16),
                Constraint::Length(9),
                Constraint::Length(5),
                Constraint::Length(10),
            ],
        )
        .header(header_row(&["Student", "Batch", "Status", "Rate", "Marked by"]))
        .block(
            Block::default()
                .title(format!("Roster ({marked} of {} marked)", roster.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .column_spacing(1);
        f.render_widget(table, columns[0]);
    }

    let charts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);
    render_status_barchart(f, charts[0], "Selected day", &app.attendance_day_stats());
    render_status_barchart(f, charts[1], "Last 7 days", &app.attendance_week_stats());

    render_status(app, f, areas.status);
    render_shortcuts(
        f,
        areas.shortcuts,
        &[
            ("p/a/l", "Present/Absent/Late"),
            ("c", "Clear"),
            ("←/→", "Day"),
            ("t", "Today"),
            ("Tab", "Batch"),
            ("Esc", "Back"),
        ],
    );
}
