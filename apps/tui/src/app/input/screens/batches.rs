use crate::app::input::helpers::{edit_search, navigate_list};
use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

use super::handle_common_keys;

pub async fn handle_batches_input(app: &mut App, key: KeyCode) {
    if edit_search(&mut app.batches_view, key) {
        return;
    }

    let total_rows = app.visible_batches().len();
    if navigate_list(&mut app.batches_view, key, total_rows) {
        return;
    }

    match key {
        KeyCode::Char('/') => {
            app.batches_view.searching = true;
        }
        KeyCode::Char('t') => app.cycle_batch_type(),
        KeyCode::Char('x') => {
            app.batches_view.clear_search();
            app.batch_type_filter = 0;
        }
        KeyCode::Enter => {
            // Jump to attendance for the selected batch
            let Some(id) = app.selected_batch().map(|batch| batch.id) else {
                return;
            };
            if let Some(position) = app.batches.iter().position(|batch| batch.id == id) {
                app.attendance_batch_index = position + 1;
                app.attendance_selected = 0;
                app.screen = AppScreen::Attendance;
            }
        }
        KeyCode::Char('d') => {
            let Some((id, name)) = app
                .selected_batch()
                .map(|batch| (batch.id, batch.name.clone()))
            else {
                return;
            };
            match app.actions.delete_batch(id).await {
                Ok(()) => app.status_message = format!("Deleted {name}"),
                Err(e) => app.report_error("Failed to delete batch", &e),
            }
        }
        _ => {
            handle_common_keys(app, key);
        }
    }
}
