use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_login_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Tab | KeyCode::Up | KeyCode::Down | KeyCode::BackTab => {
            app.login.toggle_field();
        }
        KeyCode::Enter => {
            if app.login.field == crate::app::state::LoginField::Username {
                app.login.toggle_field();
            } else {
                app.submit_login();
            }
        }
        KeyCode::Backspace => {
            app.login.active_input().pop();
        }
        KeyCode::Char(c) => {
            app.login.error = None;
            app.login.active_input().push(c);
        }
        KeyCode::Esc => {
            app.running = false;
        }
        _ => {}
    }
}
