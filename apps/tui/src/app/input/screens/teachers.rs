use crate::app::input::helpers::{edit_search, navigate_list};
use crate::app::state::App;
use crossterm::event::KeyCode;

use super::handle_common_keys;

pub async fn handle_teachers_input(app: &mut App, key: KeyCode) {
    if edit_search(&mut app.teachers_view, key) {
        return;
    }

    let total_rows = app.visible_teachers().len();
    if navigate_list(&mut app.teachers_view, key, total_rows) {
        return;
    }

    match key {
        KeyCode::Char('/') => {
            app.teachers_view.searching = true;
        }
        KeyCode::Char('f') => app.cycle_teacher_specialization(),
        KeyCode::Char('x') => {
            app.teachers_view.clear_search();
            app.teacher_specialization_filter = 0;
        }
        KeyCode::Char('d') => {
            let Some((id, name)) = app
                .selected_teacher()
                .map(|teacher| (teacher.id, teacher.name.clone()))
            else {
                return;
            };
            match app.actions.delete_teacher(id).await {
                Ok(()) => app.status_message = format!("Deleted {name}"),
                Err(e) => app.report_error("Failed to delete teacher", &e),
            }
        }
        _ => {
            handle_common_keys(app, key);
        }
    }
}
