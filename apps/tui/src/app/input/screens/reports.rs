use crate::app::input::helpers::navigate_list;
use crate::app::state::{App, AppScreen, ReportForm};
use crossterm::event::KeyCode;

use super::handle_common_keys;

pub async fn handle_reports_input(app: &mut App, key: KeyCode) {
    let total_rows = app.reports.len();
    if navigate_list(&mut app.reports_view, key, total_rows) {
        return;
    }

    match key {
        KeyCode::Char('n') => {
            app.report_form = Some(ReportForm::blank(app.today));
            app.screen = AppScreen::EditReport;
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(report) = app.reports.get(app.reports_view.selected) {
                app.report_form = Some(ReportForm::from_report(report));
                app.screen = AppScreen::EditReport;
            }
        }
        KeyCode::Char('d') => {
            let Some((id, title)) = app
                .reports
                .get(app.reports_view.selected)
                .map(|report| (report.id, report.title.clone()))
            else {
                return;
            };
            match app.actions.delete_daily_report(id).await {
                Ok(()) => app.status_message = format!("Deleted report \"{title}\""),
                Err(e) => app.report_error("Failed to delete report", &e),
            }
        }
        _ => {
            handle_common_keys(app, key);
        }
    }
}
