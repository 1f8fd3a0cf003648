use crate::app::App;
use crate::ui::widgets::tables::{
    header_row, render_empty, scroll_offset, selected_style, visible_rows,
};
use crate::ui::{render_shortcuts, render_status, render_title, screen_layout};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

pub fn render_reports(app: &App, f: &mut Frame<'_>) {
    let areas = screen_layout(f);
    render_title(
        app,
        f,
        areas.title,
        &format!("{} reports", app.reports.len()),
    );

    let [table_area, preview_area] =
        Layout::vertical([Constraint::Min(5), Constraint::Length(6)]).areas(areas.body);

    if app.reports.is_empty() {
        render_empty(f, table_area, "Daily Reports", "No reports yet. Press n to write one.");
    } else {
        let max_rows = visible_rows(table_area);
        let selected = app.reports_view.selected;
        let offset = scroll_offset(app.reports.len(), max_rows, selected);

        let rows = app
            .reports
            .iter()
            .enumerate()
            .skip(offset)
            .take(max_rows)
            .map(|(i, report)| {
                Row::new(vec![
                    Cell::from(report.report_date.clone()),
                    Cell::from(report.title.clone()),
                    Cell::from(report.task_type.clone()),
                    Cell::from(report.created_by.clone()),
                ])
                .style(if i == selected {
                    selected_style()
                } else {
                    Style::default()
                })
            });

        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Min(24),
                Constraint::Length(16),
                Constraint::Length(12),
            ],
        )
        .header(header_row(&["Date", "Title", "Task", "By"]))
        .block(
            Block::default()
                .title(format!("Daily Reports ({} of {})", selected + 1, app.reports.len()))
                .borders(Borders::ALL),
        )
        .column_spacing(1);
        f.render_widget(table, table_area);
    }

    let description = app
        .reports
        .get(app.reports_view.selected)
        .map_or("", |report| report.description.as_str());
    let preview = Paragraph::new(description.to_string())
        .block(
            Block::default()
                .title(" Description ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(preview, preview_area);

    render_status(app, f, areas.status);
    render_shortcuts(
        f,
        areas.shortcuts,
        &[
            ("n", "New"),
            ("Enter/e", "Edit"),
            ("d", "Delete"),
            ("Esc", "Back"),
        ],
    );
}
