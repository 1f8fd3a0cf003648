use literacy_desk::attendance::AttendanceStats;
use literacy_desk::domain::AttendanceStatus;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line as TextLine;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders};
use ratatui::Frame;

use crate::ui::widgets::tables::render_empty;

pub const fn status_color(status: AttendanceStatus) -> Color {
    match status {
        AttendanceStatus::Present => Color::Green,
        AttendanceStatus::Absent => Color::Red,
        AttendanceStatus::Late => Color::Yellow,
    }
}

fn as_bar_value(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}

/// Present, absent and late counts side by side.
pub fn render_status_barchart(f: &mut Frame<'_>, area: Rect, title: &str, stats: &AttendanceStats) {
    if stats.total_records == 0 {
        render_empty(f, area, title, "No attendance recorded");
        return;
    }

    let bars: Vec<Bar<'_>> = AttendanceStatus::ALL
        .iter()
        .map(|status| {
            Bar::default()
                .value(as_bar_value(stats.count_for(*status)))
                .label(TextLine::from(status.label()))
                .style(Style::default().fg(status_color(*status)))
                .value_style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(status_color(*status))
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(format!("{title} ({:.1}%)", stats.attendance_rate))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .data(BarGroup::default().bars(&bars))
        .max(as_bar_value(stats.total_records).max(1))
        .bar_gap(1)
        .bar_width(8);

    f.render_widget(chart, area);
}

/// Attendance rate per batch, in whole percent.
pub fn render_batch_rates(f: &mut Frame<'_>, area: Rect, rates: &[(&str, AttendanceStats)]) {
    let title = "Attendance Rate by Batch";
    if rates.is_empty() {
        render_empty(f, area, title, "No batches yet");
        return;
    }

    let bars: Vec<Bar<'_>> = rates
        .iter()
        .map(|(name, stats)| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let rate = stats.attendance_rate.round().clamp(0.0, 100.0) as u64;
            Bar::default()
                .value(rate)
                .text_value(format!("{rate}%"))
                .label(TextLine::from(name.to_string()))
                .style(Style::default().fg(Color::Cyan))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .data(BarGroup::default().bars(&bars))
        .max(100)
        .bar_gap(2)
        .bar_width(10);

    f.render_widget(chart, area);
}
