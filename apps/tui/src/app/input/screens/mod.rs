use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

mod attendance;
mod batches;
mod edit_report;
mod help;
mod login;
mod main;
mod reports;
mod students;
mod teachers;
mod transfer;

pub async fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    match app.screen {
        AppScreen::Login => login::handle_login_input(app, key),
        AppScreen::Main => main::handle_main_input(app, key),
        AppScreen::Students => students::handle_students_input(app, key).await,
        AppScreen::Teachers => teachers::handle_teachers_input(app, key).await,
        AppScreen::Batches => batches::handle_batches_input(app, key).await,
        AppScreen::Attendance => attendance::handle_attendance_input(app, key).await,
        AppScreen::Reports => reports::handle_reports_input(app, key).await,
        AppScreen::EditReport => edit_report::handle_edit_report_input(app, key).await,
        AppScreen::Transfer => transfer::handle_transfer_input(app, key),
    }
}

/// Esc back to the dashboard and q to quit, shared by the list screens.
fn handle_common_keys(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Esc => {
            app.screen = AppScreen::Main;
            true
        }
        KeyCode::Char('q') => {
            app.running = false;
            true
        }
        _ => false,
    }
}
