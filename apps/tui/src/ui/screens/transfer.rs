use crate::app::{App, TransferOutcome};
use crate::ui::widgets::tables::{header_row, render_empty};
use crate::ui::{render_shortcuts, render_status, render_title, screen_layout};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, ThrobberState, WhichUse, BRAILLE_SIX};

/// Rejected rows listed under an import result.
const REJECTED_SHOWN: usize = 8;

pub fn render_transfer(app: &App, f: &mut Frame<'_>) {
    let areas = screen_layout(f);
    render_title(
        app,
        f,
        areas.title,
        &format!("exports go to {}", app.actions.export_dir.display()),
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(6),
        ])
        .split(areas.body);

    render_path_input(app, f, rows[0]);
    render_progress(app, f, rows[1]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);
    render_last_outcome(app, f, columns[0]);
    render_recent_transfers(app, f, columns[1]);

    render_status(app, f, areas.status);
    render_shortcuts(
        f,
        areas.shortcuts,
        &[
            ("i", "Edit path"),
            ("Enter", "Import"),
            ("x", "Export .xlsx"),
            ("c", "Export .csv"),
            ("Esc", "Back"),
        ],
    );
}

fn render_path_input(app: &App, f: &mut Frame<'_>, area: Rect) {
    let (border, text) = if app.transfer_editing {
        let cursor = if app.animation_counter.sin() > 0.0 { "_" } else { " " };
        (Color::Yellow, format!("{}{cursor}", app.transfer_path))
    } else if app.transfer_path.is_empty() {
        (
            Color::DarkGray,
            "press i and type a .xlsx, .xls, .ods or .csv path".to_string(),
        )
    } else {
        (Color::Green, app.transfer_path.clone())
    };

    let input = Paragraph::new(text).block(
        Block::default()
            .title(" Import file ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(input, area);
}

fn render_progress(app: &App, f: &mut Frame<'_>, area: Rect) {
    if !app.transfer_running {
        return;
    }

    // Step the spinner from the animation clock; a fresh state each frame.
    #[allow(clippy::cast_possible_truncation)]
    let step = (app.animation_counter * 4.0) as i8;
    let mut state = ThrobberState::default();
    state.calc_step(step);

    let throbber = Throbber::default()
        .label(app.status_message.clone())
        .style(Style::default().fg(Color::Cyan))
        .throbber_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .throbber_set(BRAILLE_SIX)
        .use_type(WhichUse::Spin);
    f.render_stateful_widget(throbber, area, &mut state);
}

fn render_last_outcome(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title = "Last transfer";
    let Some(outcome) = &app.last_transfer else {
        render_empty(f, area, title, "Nothing transferred this session.");
        return;
    };

    let ok = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD);
    let lines = match outcome {
        TransferOutcome::Imported(report) => {
            let mut lines = vec![TextLine::from(Span::styled(report.summary(), ok))];
            if !report.rejected.is_empty() {
                lines.push(TextLine::from(""));
                lines.push(TextLine::from(Span::styled(
                    "Rejected rows:",
                    Style::default().fg(Color::Yellow),
                )));
                lines.extend(report.rejected.iter().take(REJECTED_SHOWN).map(|rejected| {
                    TextLine::from(format!("  row {}: {}", rejected.row_number, rejected.reason))
                }));
                let hidden = report.rejected.len().saturating_sub(REJECTED_SHOWN);
                if hidden > 0 {
                    lines.push(TextLine::from(Span::styled(
                        format!("  ... and {hidden} more"),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
            lines
        }
        TransferOutcome::Exported(report) => vec![
            TextLine::from(Span::styled(report.summary(), ok)),
            TextLine::from(""),
            TextLine::from(report.path.display().to_string()),
        ],
        TransferOutcome::Failed(message) => vec![TextLine::from(Span::styled(
            format!("Failed: {message}"),
            Style::default().fg(Color::Red),
        ))],
    };

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_recent_transfers(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title = "Recent transfers";
    if app.export_logs.is_empty() {
        render_empty(f, area, title, "No imports or exports logged.");
        return;
    }

    let rows = app.export_logs.iter().map(|log| {
        Row::new(vec![
            Cell::from(log.kind.label()),
            Cell::from(log.file_name.clone()),
            Cell::from(log.record_count.to_string()),
            Cell::from(log.created_at.clone()),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Min(16),
            Constraint::Length(6),
            Constraint::Length(19),
        ],
    )
    .header(header_row(&["Kind", "File", "Rows", "When"]))
    .block(Block::default().title(title).borders(Borders::ALL))
    .column_spacing(1);
    f.render_widget(table, area);
}
