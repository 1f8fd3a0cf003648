use crate::app::App;
use crate::ui::widgets::popup::render_popup;
use crate::ui::widgets::tables::{
    header_row, render_empty, render_search_bar, scroll_offset, selected_style, visible_rows,
};
use crate::ui::{render_shortcuts, render_status, render_title, screen_layout};
use literacy_desk::db::models::StudentRecord;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

pub fn render_students(app: &App, f: &mut Frame<'_>) {
    let areas = screen_layout(f);
    let students = app.visible_students();

    render_title(
        app,
        f,
        areas.title,
        &format!("{} of {} shown", students.len(), app.students.len()),
    );

    let [search_area, table_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(4)]).areas(areas.body);
    render_search_bar(
        f,
        search_area,
        &app.students_view,
        &app.student_filter_summary(),
        app.animation_counter.sin() > 0.0,
    );

    if students.is_empty() {
        render_empty(f, table_area, "Students", "No students match.");
    } else {
        let max_rows = visible_rows(table_area);
        let selected = app.students_view.selected;
        let offset = scroll_offset(students.len(), max_rows, selected);

        let rows = students
            .iter()
            .enumerate()
            .skip(offset)
            .take(max_rows)
            .map(|(i, student)| {
                let style = if i == selected {
                    selected_style()
                } else if student.is_active {
                    Style::default()
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Row::new(vec![
                    Cell::from(student.id.to_string()),
                    Cell::from(student.name.clone()),
                    Cell::from(student.aadhaar_number.clone()),
                    Cell::from(student.course_enrolled.clone()),
                    Cell::from(app.batch_name(student.batch_id).to_string()),
                    Cell::from(student.contact_phone.clone().unwrap_or_default()),
                    Cell::from(if student.is_active { "Active" } else { "Inactive" }),
                ])
                .style(style)
            });

        let widths = [
            Constraint::Length(5),
            Constraint::Min(18),
            Constraint::Length(16),
            Constraint::Length(18),
            Constraint::Length(16),
            Constraint::Length(14),
            Constraint::Length(9),
        ];

        let table = Table::new(rows, widths)
            .header(header_row(&[
                "ID", "Name", "Aadhaar", "Course", "Batch", "Phone", "Status",
            ]))
            .block(
                Block::default()
                    .title(format!("Students ({} of {})", selected + 1, students.len()))
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
            ("c/b/s", "Filters"),
            ("x", "Clear"),
            ("Enter", "Details"),
            ("a", "Active"),
            ("d", "Delete"),
            ("Esc", "Back"),
        ],
    );

    if app.show_student_details {
        if let Some(student) = app.selected_student() {
            render_popup(
                f,
                (60, 60),
                &format!(" {} ", student.name),
                detail_lines(app, student),
                Color::Cyan,
            );
        }
    }
}

fn detail_lines(app: &App, student: &StudentRecord) -> Vec<TextLine<'static>> {
    let label = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    let fields = [
        ("Aadhaar", student.aadhaar_number.clone()),
        (
            "Age",
            student.age.map_or_else(|| "-".to_string(), |age| age.to_string()),
        ),
        ("Gender", optional(&student.gender)),
        ("Phone", optional(&student.contact_phone)),
        ("Guardian", optional(&student.guardian_name)),
        ("Guardian phone", optional(&student.guardian_phone)),
        ("Address", optional(&student.address)),
        ("Course", student.course_enrolled.clone()),
        ("Batch", app.batch_name(student.batch_id).to_string()),
        ("Admitted", student.admission_date.clone()),
        (
            "Status",
            if student.is_active { "Active" } else { "Inactive" }.to_string(),
        ),
    ];

    let mut lines: Vec<TextLine<'static>> = fields
        .into_iter()
        .map(|(name, value)| {
            TextLine::from(vec![
                Span::styled(format!("{name:<16}"), label),
                Span::raw(value),
            ])
        })
        .collect();
    lines.push(TextLine::from(""));
    lines.push(TextLine::from(Span::styled(
        "Enter or Esc to close",
        Style::default().fg(Color::Gray),
    )));
    lines
}
