use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

pub async fn handle_edit_report_input(app: &mut App, key: KeyCode) {
    let Some(form) = app.report_form.as_mut() else {
        app.screen = AppScreen::Reports;
        return;
    };

    match key {
        KeyCode::Esc => {
            app.report_form = None;
            app.screen = AppScreen::Reports;
        }
        KeyCode::Tab | KeyCode::Down => form.field = form.field.next(),
        KeyCode::BackTab | KeyCode::Up => form.field = form.field.prev(),
        KeyCode::Backspace => {
            form.active_input().pop();
        }
        KeyCode::Char(c) => form.active_input().push(c),
        KeyCode::Enter => save(app).await,
        _ => {}
    }
}

async fn save(app: &mut App) {
    let Some(form) = app.report_form.as_ref() else {
        return;
    };
    if !form.is_complete() {
        app.status_message = "Error: Title and task type are required".to_string();
        return;
    }

    let params = form.to_params(app.operator());
    let result = match form.editing_id {
        Some(id) => app.actions.update_daily_report(id, &params).await,
        None => app.actions.insert_daily_report(&params).await.map(|_| ()),
    };

    match result {
        Ok(()) => {
            app.status_message = format!("Saved report \"{}\"", params.title);
            app.report_form = None;
            app.screen = AppScreen::Reports;
        }
        Err(e) => app.report_error("Failed to save report", &e),
    }
}
