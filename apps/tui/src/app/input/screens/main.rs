use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

pub fn handle_main_input(app: &mut App, key: KeyCode) {
    let menu_len = AppScreen::MENU.len();

    match key {
        KeyCode::Up => {
            app.menu_index = wrap_decrement(app.menu_index, menu_len);
        }
        KeyCode::Down => {
            app.menu_index = wrap_increment(app.menu_index, menu_len);
        }
        KeyCode::Enter => {
            open_screen(app, app.menu_index);
        }
        KeyCode::Char(c @ '1'..='6') => {
            if let Some(digit) = c.to_digit(10).and_then(|d| usize::try_from(d).ok()) {
                app.menu_index = digit - 1;
                open_screen(app, digit - 1);
            }
        }
        KeyCode::Char('o') => {
            app.sign_out();
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            app.running = false;
        }
        _ => {}
    }
}

fn open_screen(app: &mut App, index: usize) {
    if let Some(screen) = AppScreen::MENU.get(index) {
        app.screen = *screen;
        app.status_message.clear();
    }
}
