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

pub fn render_teachers(app: &App, f: &mut Frame<'_>) {
    let areas = screen_layout(f);
    let teachers = app.visible_teachers();

    render_title(
        app,
        f,
        areas.title,
        &format!("{} of {} shown", teachers.len(), app.teachers.len()),
    );

    let specialization = app
        .specialization_options()
        .get(app.teacher_specialization_filter)
        .cloned()
        .unwrap_or_else(|| ALL.to_string());

    let [search_area, table_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(4)]).areas(areas.body);
    render_search_bar(
        f,
        search_area,
        &app.teachers_view,
        &format!("specialization: {specialization}"),
        app.animation_counter.sin() > 0.0,
    );

    if teachers.is_empty() {
        render_empty(f, table_area, "Teachers", "No teachers match.");
    } else {
        let max_rows = visible_rows(table_area);
        let selected = app.teachers_view.selected;
        let offset = scroll_offset(teachers.len(), max_rows, selected);

        // Batches each teacher leads or assists
        let rows = teachers
            .iter()
            .enumerate()
            .skip(offset)
            .take(max_rows)
            .map(|(i, teacher)| {
                let batches: Vec<&str> = app
                    .batches
                    .iter()
                    .filter(|batch| {
                        batch.primary_teacher_id == Some(teacher.id)
                            || batch.secondary_teacher_id == Some(teacher.id)
                    })
                    .map(|batch| batch.name.as_str())
                    .collect();
                let style = if i == selected {
                    selected_style()
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(teacher.id.to_string()),
                    Cell::from(teacher.name.clone()),
                    Cell::from(teacher.contact_phone.clone().unwrap_or_default()),
                    Cell::from(teacher.specializations().collect::<Vec<_>>().join(", ")),
                    Cell::from(batches.join(", ")),
                ])
                .style(style)
            });

        let widths = [
            Constraint::Length(5),
            Constraint::Min(18),
            Constraint::Length(14),
            Constraint::Length(30),
            Constraint::Min(20),
        ];

        let table = Table::new(rows, widths)
            .header(header_row(&["ID", "Name", "Phone", "Specializations", "Batches"]))
            .block(
                Block::default()
                    .title(format!("Teachers ({} of {})", selected + 1, teachers.len()))
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
            ("f", "Specialization"),
            ("x", "Clear"),
            ("d", "Delete"),
            ("Esc", "Back"),
        ],
    );
}
