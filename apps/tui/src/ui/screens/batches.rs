use crate::app::App;
use crate::ui::widgets::tables::{
    header_row, render_empty, render_search_bar, scroll_offset, selected_style, visible_rows,
};
use crate::ui::{render_shortcuts, render_status, render_title, screen_layout};
use literacy_desk::domain::ALL;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

pub fn render_batches(app: &App, f: &mut Frame<'_>) {
    let areas = screen_layout(f);
    let batches = app.visible_batches();

    render_title(
        app,
        f,
        areas.title,
        &format!("{} of {} shown", batches.len(), app.batches.len()),
    );

    let kind = App::batch_type_options()
        .get(app.batch_type_filter)
        .copied()
        .unwrap_or(ALL);

    let [search_area, table_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(4)]).areas(areas.body);
    render_search_bar(
        f,
        search_area,
        &app.batches_view,
        &format!("type: {kind}"),
        app.animation_counter.sin() > 0.0,
    );

    if batches.is_empty() {
        render_empty(f, table_area, "Batches", "No batches match.");
    } else {
        let max_rows = visible_rows(table_area);
        let selected = app.batches_view.selected;
        let offset = scroll_offset(batches.len(), max_rows, selected);

        let rows = batches
            .iter()
            .enumerate()
            .skip(offset)
            .take(max_rows)
            .map(|(i, batch)| {
                let enrolled = app
                    .students
                    .iter()
                    .filter(|student| student.is_active && student.batch_id == Some(batch.id))
                    .count();
                let style = if i == selected {
                    selected_style()
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(batch.id.to_string()),
                    Cell::from(batch.name.clone()),
                    Cell::from(batch.batch_type.label()),
                    Cell::from(format!("{}-{}", batch.start_time, batch.end_time)),
                    Cell::from(app.teacher_name(batch.primary_teacher_id).to_string()),
                    Cell::from(app.teacher_name(batch.secondary_teacher_id).to_string()),
                    Cell::from(batch.room.clone().unwrap_or_default()),
                    Cell::from(enrolled.to_string()),
                ])
                .style(style)
            });

        let widths = [
            Constraint::Length(5),
            Constraint::Min(16),
            Constraint::Length(18),
            Constraint::Length(12),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Length(10),
            Constraint::Length(8),
        ];

        let table = Table::new(rows, widths)
            .header(header_row(&[
                "ID", "Name", "Type", "Time", "Primary", "Secondary", "Room", "Students",
            ]))
            .block(
                Block::default()
                    .title(format!("Batches ({} of {})", selected + 1, batches.len()))
                    .borders(Borders::ALL),
            )
            .column_spacing(1);
        f.render_widget(table, table_area);
    }

    render_status(app, f, areas.status);
    render_shortcuts(
        f,
        areas.shortcuts,
        &[
            ("/", "Search"),
            ("t", "Type"),
            ("x", "Clear"),
            ("Enter", "Attendance"),
            ("d", "Delete"),
            ("Esc", "Back"),
        ],
    );
}
