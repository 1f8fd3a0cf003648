mod headless;
mod loop_handler;

pub use headless::{run_command, run_headless};
pub use loop_handler::run;
