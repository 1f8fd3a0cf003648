use crate::app::state::{App, TransferRequest};
use crossterm::event::KeyCode;
use literacy_desk::spreadsheet::codec::SheetFormat;
use std::path::PathBuf;

use super::handle_common_keys;

/// Queues a transfer; the event loop runs it through the transfer machine.
pub fn handle_transfer_input(app: &mut App, key: KeyCode) {
    if app.transfer_running {
        return;
    }

    if app.transfer_editing {
        match key {
            KeyCode::Esc => app.transfer_editing = false,
            KeyCode::Backspace => {
                app.transfer_path.pop();
            }
            KeyCode::Char(c) => app.transfer_path.push(c),
            KeyCode::Enter => {
                app.transfer_editing = false;
                queue_import(app);
            }
            _ => {}
        }
        return;
    }

    match key {
        KeyCode::Char('i') => {
            app.transfer_editing = true;
        }
        KeyCode::Enter => queue_import(app),
        KeyCode::Char('x') => {
            app.pending_transfer = Some(TransferRequest::Export(SheetFormat::Workbook));
        }
        KeyCode::Char('c') => {
            app.pending_transfer = Some(TransferRequest::Export(SheetFormat::Csv));
        }
        _ => {
            handle_common_keys(app, key);
        }
    }
}

fn queue_import(app: &mut App) {
    let path = app.transfer_path.trim();
    if path.is_empty() {
        app.status_message = "Error: Enter a file path to import".to_string();
        app.transfer_editing = true;
        return;
    }
    app.pending_transfer = Some(TransferRequest::Import(PathBuf::from(path)));
}
