//! pgcheck - checks PostgreSQL connectivity with interactively supplied credentials.

mod app;

use app::{App, SessionEnd};
use pgcheck_core::logging::{init_logging, LogConfig};
use pgcheck_core::{PgConnector, ProbeError, ProbeOptions};
use pgcheck_ui::{banner, is_interactive, TerminalReader};
use std::io;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

fn main() -> ExitCode {
    // Records go to ./postgres.log for as long as this guard lives
    let _logging_guard = init_logging(LogConfig::default());

    match run() {
        Ok(SessionEnd::Completed(_)) => ExitCode::SUCCESS,
        Ok(SessionEnd::Interrupted) => {
            println!();
            println!("Bye..");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            if let Some(hint) = e.hint() {
                eprintln!("Hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<SessionEnd, ProbeError> {
    let options = ProbeOptions::from_env()?;
    let interactive = is_interactive();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .map_err(|e| ProbeError::internal(format!("Failed to create tokio runtime: {e}")))?;

    // Ctrl-C must be handled before the first prompt, or it kills the process
    let cancel = CancellationToken::new();
    listen_for_ctrl_c(&runtime, cancel.clone())?;

    print!("{}", banner(interactive));

    let reader = TerminalReader::new(cancel.clone());
    let mut app = App::new(reader, PgConnector, options, interactive);
    let request = match app.collect() {
        Ok(request) => request,
        Err(ProbeError::Interrupted) => return Ok(SessionEnd::Interrupted),
        Err(e) => return Err(e),
    };

    runtime.block_on(app.check(&request, &mut io::stdout(), &cancel))
}

/// Cancel `cancel` on Ctrl-C.
///
/// The handler is registered before this returns; the prompts run on the main
/// thread while the runtime's worker records the signal.
fn listen_for_ctrl_c(runtime: &Runtime, cancel: CancellationToken) -> Result<(), ProbeError> {
    let _enter = runtime.enter();

    #[cfg(unix)]
    let interrupts = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt());
    #[cfg(windows)]
    let interrupts = tokio::signal::windows::ctrl_c();

    let mut interrupts = interrupts
        .map_err(|e| ProbeError::internal(format!("Failed to listen for Ctrl-C: {e}")))?;

    runtime.spawn(async move {
        if interrupts.recv().await.is_some() {
            tracing::debug!("Ctrl-C received");
            cancel.cancel();
        }
    });
    Ok(())
}
