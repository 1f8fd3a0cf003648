use crate::app::input::helpers::{edit_search, navigate_list};
use crate::app::state::App;
use crossterm::event::KeyCode;

use super::handle_common_keys;

pub async fn handle_students_input(app: &mut App, key: KeyCode) {
    if edit_search(&mut app.students_view, key) {
        return;
    }

    if app.show_student_details {
        if matches!(key, KeyCode::Esc | KeyCode::Enter) {
            app.show_student_details = false;
        }
        return;
    }

    let total_rows = app.visible_students().len();
    if navigate_list(&mut app.students_view, key, total_rows) {
        return;
    }

    match key {
        KeyCode::Char('/') => {
            app.students_view.searching = true;
        }
        KeyCode::Char('c') => app.cycle_student_course(),
        KeyCode::Char('b') => app.cycle_student_batch(),
        KeyCode::Char('s') => app.cycle_student_status(),
        KeyCode::Char('x') => {
            app.students_view.clear_search();
            app.student_course_filter = 0;
            app.student_batch_filter = 0;
            app.student_status_filter = 0;
        }
        KeyCode::Enter => {
            app.show_student_details = app.selected_student().is_some();
        }
        KeyCode::Char('a') => toggle_active(app).await,
        KeyCode::Char('d') => delete_selected(app).await,
        _ => {
            handle_common_keys(app, key);
        }
    }
}

async fn toggle_active(app: &mut App) {
    let Some((id, name, is_active)) = app
        .selected_student()
        .map(|student| (student.id, student.name.clone(), student.is_active))
    else {
        return;
    };

    match app.actions.set_student_active(id, !is_active).await {
        Ok(()) => {
            let state = if is_active { "inactive" } else { "active" };
            app.status_message = format!("{name} marked {state}");
        }
        Err(e) => app.report_error("Failed to update student", &e),
    }
}

async fn delete_selected(app: &mut App) {
    let Some((id, name)) = app
        .selected_student()
        .map(|student| (student.id, student.name.clone()))
    else {
        return;
    };

    match app.actions.delete_student(id).await {
        Ok(()) => app.status_message = format!("Deleted {name}"),
        Err(e) => app.report_error("Failed to delete student", &e),
    }
}
