// App module for literacy-desk
// Handles application state and store access

pub mod actions;
pub mod input;
pub mod state;

pub use input::handle_input;
pub use state::{App, AppScreen, TransferOutcome, TransferRequest};
