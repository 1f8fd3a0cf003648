use crate::app::state::ReportField;
use crate::app::App;
use crate::ui::{render_shortcuts, render_status, render_title, screen_layout};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_edit_report(app: &App, f: &mut Frame<'_>) {
    let areas = screen_layout(f);
    let Some(form) = app.report_form.as_ref() else {
        return;
    };

    let mode = if form.editing_id.is_some() {
        "Editing"
    } else {
        "New"
    };
    render_title(
        app,
        f,
        areas.title,
        &format!("{mode} report for {}", form.report_date),
    );

    let [title_area, description_area, type_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(3),
    ])
    .areas(areas.body);

    let cursor = if app.animation_counter.sin() > 0.0 { "_" } else { " " };
    let fields = [
        (title_area, "Title", form.title.as_str(), ReportField::Title),
        (
            description_area,
            "Description",
            form.description.as_str(),
            ReportField::Description,
        ),
        (
            type_area,
            "Task type (e.g. teaching, outreach, maintenance)",
            form.task_type.as_str(),
            ReportField::TaskType,
        ),
    ];

    for (area, label, value, field) in fields {
        let active = form.field == field;
        let text = if active {
            format!("{value}{cursor}")
        } else {
            value.to_string()
        };
        let border = if active { Color::Yellow } else { Color::DarkGray };
        let input = Paragraph::new(text)
            .block(
                Block::default()
                    .title(label)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(input, area);
    }

    render_status(app, f, areas.status);
    render_shortcuts(
        f,
        areas.shortcuts,
        &[("Tab", "Next field"), ("Enter", "Save"), ("Esc", "Discard")],
    );
}
