use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::convert::TryFrom;
use std::fmt;
use std::io::Stdout;
use tracing::{debug, error, warn};

use crate::app::{handle_input, App, TransferOutcome, TransferRequest};
use crate::ui;

// States of a spreadsheet transfer
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum TransferState {
    Idle,
    Running,
    Success,
    Error,
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Running => write!(f, "Running"),
            Self::Success => write!(f, "Success"),
            Self::Error => write!(f, "Error"),
        }
    }
}

#[derive(Clone, Debug)]
enum TransferEvent {
    Start(TransferRequest),
    Finished(TransferOutcome),
    Failed(String),
    Reset,
}

impl fmt::Display for TransferEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start(TransferRequest::Import(path)) => {
                write!(f, "Start(import {})", path.display())
            }
            Self::Start(TransferRequest::Export(format)) => {
                write!(f, "Start(export {})", format.extension())
            }
            Self::Finished(_) => write!(f, "Finished"),
            Self::Failed(msg) => write!(f, "Failed({msg})"),
            Self::Reset => write!(f, "Reset"),
        }
    }
}

#[derive(Debug)]
struct StateTransitionError {
    from: TransferState,
    event: TransferEvent,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

/// Idle -> Running -> Success | Error -> Idle. One transfer at a time.
struct TransferMachine {
    state: TransferState,
}

impl TransferMachine {
    const fn new() -> Self {
        Self {
            state: TransferState::Idle,
        }
    }

    const fn state(&self) -> TransferState {
        self.state
    }

    fn process_event(
        &mut self,
        event: &TransferEvent,
        app: &mut App,
    ) -> std::result::Result<(), StateTransitionError> {
        let next_state = NextState::try_from((self.state, event, app))?;
        debug!(from = %self.state, to = %next_state.0, %event, "transfer transition");
        self.state = next_state.0;
        Ok(())
    }
}

struct NextState(TransferState);

impl TryFrom<(TransferState, &TransferEvent, &mut App)> for NextState {
    type Error = StateTransitionError;

    fn try_from(
        value: (TransferState, &TransferEvent, &mut App),
    ) -> std::result::Result<Self, Self::Error> {
        let (current_state, event, app) = value;

        match (current_state, event) {
            (TransferState::Idle, TransferEvent::Start(request)) => {
                app.transfer_running = true;
                app.status_message = match request {
                    TransferRequest::Import(path) => format!("Importing {}...", path.display()),
                    TransferRequest::Export(_) => "Exporting students...".to_string(),
                };
                Ok(Self(TransferState::Running))
            }
            (TransferState::Running, TransferEvent::Finished(outcome)) => {
                app.status_message = match outcome {
                    TransferOutcome::Imported(report) => report.summary(),
                    TransferOutcome::Exported(report) => report.summary(),
                    TransferOutcome::Failed(msg) => format!("Error: {msg}"),
                };
                app.last_transfer = Some(outcome.clone());
                Ok(Self(TransferState::Success))
            }
            (TransferState::Running, TransferEvent::Failed(msg)) => {
                app.status_message = format!("Error: {msg}");
                app.last_transfer = Some(TransferOutcome::Failed(msg.clone()));
                Ok(Self(TransferState::Error))
            }
            (TransferState::Success | TransferState::Error, TransferEvent::Reset) => {
                app.transfer_running = false;
                Ok(Self(TransferState::Idle))
            }
            _ => Err(StateTransitionError {
                from: current_state,
                event: event.clone(),
            }),
        }
    }
}

async fn run_transfer(app: &App, request: &TransferRequest) -> TransferEvent {
    let result = match request {
        TransferRequest::Import(path) => app
            .actions
            .import_students(path)
            .await
            .map(TransferOutcome::Imported),
        TransferRequest::Export(format) => app
            .actions
            .export_students(*format)
            .await
            .map(TransferOutcome::Exported),
    };

    match result {
        Ok(outcome) => TransferEvent::Finished(outcome),
        Err(e) => {
            error!(error = %e, "transfer failed");
            TransferEvent::Failed(e.to_string())
        }
    }
}

/// Run the main application event loop
pub async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let mut transfer_machine = TransferMachine::new();

    loop {
        app.update();

        // Reload whatever changed since the last tick
        app.apply_pending_refetches().await;

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    handle_input(app, key.code).await;
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "failed to read terminal event"),
            }
        }

        if transfer_machine.state() != TransferState::Idle {
            continue;
        }
        let Some(request) = app.pending_transfer.take() else {
            continue;
        };

        if let Err(e) = transfer_machine.process_event(&TransferEvent::Start(request.clone()), app) {
            warn!(error = %e, "transfer not started");
            continue;
        }

        // Show the running state before blocking on the transfer
        if terminal.draw(|f| ui::ui(app, f)).is_err() {
            // Non-fatal redraw error
        }

        let finished = run_transfer(app, &request).await;
        if let Err(e) = transfer_machine.process_event(&finished, app) {
            warn!(error = %e, "transfer result dropped");
        }

        if let Err(e) = transfer_machine.process_event(&TransferEvent::Reset, app) {
            warn!(error = %e, "transfer machine reset failed");
        }
    }
    Ok(())
}
