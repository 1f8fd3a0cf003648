use crate::app::state::LoginField;
use crate::app::App;
use crate::ui::widgets::popup::centered_rect;
use crate::ui::render_shortcuts;
use ratatui::layout::{Alignment, Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render_login(app: &App, f: &mut Frame<'_>) {
    let area = centered_rect(50, 60, f.area());

    let [title_area, user_area, pass_area, error_area, _, help_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let title = Paragraph::new(vec![
        TextLine::from(Span::styled(
            "Literacy Desk",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(Span::styled(
            "Sign in to continue",
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(title, title_area);

    let cursor = if app.animation_counter.sin() > 0.0 { "_" } else { " " };
    let masked = "*".repeat(app.login.password.chars().count());

    let fields = [
        (user_area, "Username", app.login.username.as_str(), LoginField::Username),
        (pass_area, "Password", masked.as_str(), LoginField::Password),
    ];
    for (field_area, label, value, field) in fields {
        let active = app.login.field == field;
        let border = if active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let text = if active {
            format!("{value}{cursor}")
        } else {
            value.to_string()
        };
        let input = Paragraph::new(text).block(
            Block::default()
                .title(label)
                .borders(Borders::ALL)
                .border_style(border),
        );
        f.render_widget(input, field_area);
    }

    if let Some(error) = &app.login.error {
        let error = Paragraph::new(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        ))
        .alignment(Alignment::Center);
        f.render_widget(error, error_area);
    } else if !app.status_message.is_empty() {
        let status = Paragraph::new(Span::styled(
            app.status_message.as_str(),
            Style::default().fg(Color::Red),
        ))
        .alignment(Alignment::Center);
        f.render_widget(status, error_area);
    }

    render_shortcuts(
        f,
        help_area,
        &[("Tab", "Switch field"), ("Enter", "Sign in"), ("Esc", "Quit")],
    );
}
