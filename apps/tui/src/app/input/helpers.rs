use crate::app::state::ListView;
use crossterm::event::KeyCode;

pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

/// Rows skipped by PageUp/PageDown.
pub const PAGE_STEP: usize = 5;

/// Shared list navigation: arrows, paging and Home/End. Returns whether
/// the key was consumed.
pub fn navigate_list(view: &mut ListView, key: KeyCode, total_rows: usize) -> bool {
    match key {
        KeyCode::Up => {
            view.selected = view.selected.saturating_sub(1);
        }
        KeyCode::Down => {
            if total_rows > 0 && view.selected + 1 < total_rows {
                view.selected += 1;
            }
        }
        KeyCode::PageUp => {
            view.selected = view.selected.saturating_sub(PAGE_STEP);
        }
        KeyCode::PageDown => {
            if total_rows > 0 {
                view.selected = (view.selected + PAGE_STEP).min(total_rows - 1);
            }
        }
        KeyCode::Home => {
            view.selected = 0;
        }
        KeyCode::End => {
            view.selected = total_rows.saturating_sub(1);
        }
        _ => return false,
    }
    true
}

/// Feeds a key into an active search box. Returns whether it was consumed.
pub fn edit_search(view: &mut ListView, key: KeyCode) -> bool {
    if !view.searching {
        return false;
    }

    match key {
        KeyCode::Esc => view.clear_search(),
        KeyCode::Enter => view.searching = false,
        KeyCode::Backspace => {
            view.search.pop();
            view.selected = 0;
        }
        KeyCode::Char(c) => {
            view.search.push(c);
            view.selected = 0;
        }
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_moves_around_both_ends() {
        assert_eq!(wrap_decrement(0, 3), 2);
        assert_eq!(wrap_increment(2, 3), 0);
        assert_eq!(wrap_increment(0, 0), 0);
    }

    #[test]
    fn paging_stops_at_last_row() {
        let mut view = ListView::default();
        assert!(navigate_list(&mut view, KeyCode::PageDown, 3));
        assert_eq!(view.selected, 2);
        assert!(navigate_list(&mut view, KeyCode::Down, 3));
        assert_eq!(view.selected, 2);
        assert!(!navigate_list(&mut view, KeyCode::Char('x'), 3));
    }

    #[test]
    fn search_typing_resets_selection() {
        let mut view = ListView {
            selected: 4,
            searching: true,
            ..ListView::default()
        };
        assert!(edit_search(&mut view, KeyCode::Char('a')));
        assert_eq!(view.search, "a");
        assert_eq!(view.selected, 0);
        assert!(edit_search(&mut view, KeyCode::Esc));
        assert!(!view.searching && view.search.is_empty());
        assert!(!edit_search(&mut view, KeyCode::Char('b')));
    }
}
