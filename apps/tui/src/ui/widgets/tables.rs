use crate::app::state::ListView;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row};
use ratatui::Frame;

pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    selected_index: usize,
) -> usize {
    if total_rows <= max_visible_rows {
        return 0;
    }

    if selected_index >= max_visible_rows {
        return selected_index.saturating_sub(max_visible_rows) + 1;
    }

    0
}

pub fn header_row<'a>(titles: &[&'a str]) -> Row<'a> {
    Row::new(titles.iter().map(|title| Cell::from(*title))).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(Color::Rgb(0, 0, 238))
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn render_empty(f: &mut Frame<'_>, area: Rect, title: &str, message: &str) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let paragraph = Paragraph::new(message.to_string())
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

/// Rows that fit in a bordered table with a header.
pub fn visible_rows(area: Rect) -> usize {
    usize::from(area.height.saturating_sub(3))
}

/// Search text on the left, active filters on the right.
pub fn render_search_bar(
    f: &mut Frame<'_>,
    area: Rect,
    view: &ListView,
    filters: &str,
    cursor_on: bool,
) {
    let (border, prompt) = if view.searching {
        let cursor = if cursor_on { "_" } else { " " };
        (Color::Yellow, format!("/{}{cursor}", view.search))
    } else if view.search.is_empty() {
        (Color::DarkGray, "/ to search".to_string())
    } else {
        (Color::Green, format!("/{}", view.search))
    };

    let mut spans = vec![Span::styled(prompt, Style::default().fg(Color::White))];
    if !filters.is_empty() {
        spans.push(Span::styled(
            format!("   {filters}"),
            Style::default().fg(Color::Gray),
        ));
    }

    let bar = Paragraph::new(TextLine::from(spans)).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_keeps_selection_visible() {
        assert_eq!(scroll_offset(5, 10, 4), 0);
        assert_eq!(scroll_offset(30, 10, 3), 0);
        assert_eq!(scroll_offset(30, 10, 10), 1);
        assert_eq!(scroll_offset(30, 10, 29), 20);
    }

    #[test]
    fn visible_rows_leave_room_for_borders_and_header() {
        assert_eq!(visible_rows(Rect::new(0, 0, 40, 13)), 10);
        assert_eq!(visible_rows(Rect::new(0, 0, 40, 2)), 0);
    }
}
