use crate::app::state::App;
use chrono::Duration;
use crossterm::event::KeyCode;
use literacy_desk::domain::AttendanceStatus;

use super::handle_common_keys;

pub async fn handle_attendance_input(app: &mut App, key: KeyCode) {
    let roster_len = app.attendance_roster().len();

    match key {
        KeyCode::Up => {
            app.attendance_selected = app.attendance_selected.saturating_sub(1);
        }
        KeyCode::Down => {
            if app.attendance_selected + 1 < roster_len {
                app.attendance_selected += 1;
            }
        }
        KeyCode::Left => {
            app.attendance_date -= Duration::days(1);
        }
        KeyCode::Right => {
            app.attendance_date += Duration::days(1);
        }
        KeyCode::Char('t') => {
            app.attendance_date = app.today;
        }
        KeyCode::Tab | KeyCode::Char('b') => app.cycle_attendance_batch(),
        KeyCode::Char('p') => mark(app, AttendanceStatus::Present).await,
        KeyCode::Char('a') => mark(app, AttendanceStatus::Absent).await,
        KeyCode::Char('l') => mark(app, AttendanceStatus::Late).await,
        KeyCode::Char('c') => clear_mark(app).await,
        _ => {
            handle_common_keys(app, key);
        }
    }
}

/// Upserts the selected student's status for the selected day.
async fn mark(app: &mut App, status: AttendanceStatus) {
    let Some((params, name)) = app.attendance_params(status) else {
        app.status_message = "No student selected".to_string();
        return;
    };

    match app.actions.mark_attendance(&params).await {
        Ok(()) => {
            app.status_message = format!("{name}: {} on {}", status.label(), params.date);
            if app.attendance_selected + 1 < app.attendance_roster().len() {
                app.attendance_selected += 1;
            }
        }
        Err(e) => app.report_error("Failed to mark attendance", &e),
    }
}

/// Removes the selected student's mark for the selected day, if any.
async fn clear_mark(app: &mut App) {
    let date = app.attendance_date_string();
    let Some((record_id, name)) = app.selected_attendance_student().and_then(|student| {
        app.status_on(student.id, &date)
            .map(|record| (record.id, student.name.clone()))
    }) else {
        app.status_message = "Nothing marked to clear".to_string();
        return;
    };

    match app.actions.clear_attendance(record_id).await {
        Ok(()) => app.status_message = format!("{name}: cleared {date}"),
        Err(e) => app.report_error("Failed to clear attendance", &e),
    }
}
