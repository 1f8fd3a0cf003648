mod app;
mod cli;
mod event;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use literacy_desk::config::init_app_config;
use literacy_desk::logging::init_logging;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let config = init_app_config()?;
    init_logging(&config.log_file, args.debug)?;

    if let Some(command) = args.command {
        return event::run_command(&config, command).await;
    }

    // Without a terminal there is nothing to draw on
    if args.headless || !is_terminal() {
        return event::run_headless(&config, args.json).await;
    }

    let mut app = App::new(config.credentials.clone());
    if let Err(e) = app.initialize_db(&config).await {
        error!(error = %e, "database initialization failed");
        app.status_message = format!("Error: Database unavailable: {e}");
    } else {
        info!(db = %config.database_path.display(), "database ready");
    }

    let mut terminal = terminal::setup()?;
    let result = event::run(&mut terminal, &mut app).await;
    terminal::cleanup(true, true);

    result
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
