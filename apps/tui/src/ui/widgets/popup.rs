use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line as TextLine, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

/// A rectangle of the given percentages centered in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

/// Clears the centered area and draws a bordered, wrapped paragraph on it.
pub fn render_popup(
    f: &mut Frame<'_>,
    (percent_x, percent_y): (u16, u16),
    title: &str,
    lines: Vec<TextLine<'_>>,
    accent: Color,
) {
    let area = centered_rect(percent_x, percent_y, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(title.to_string())
        .title_style(Style::default().fg(accent))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));
    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
