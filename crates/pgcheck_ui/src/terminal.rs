//! Terminal-backed line reader.

use dialoguer::{Input, Password};
use pgcheck_core::LineReader;
use std::io::{self, IsTerminal};
use tokio_util::sync::CancellationToken;

/// Checks if both stdin and stdout are connected to a terminal.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

/// Reads prompts from the terminal with dialoguer.
///
/// Ctrl-C surfaces as `io::ErrorKind::Interrupted`. At a visible prompt
/// dialoguer reports it directly. At the hidden prompt the terminal sends
/// SIGINT, which cancels `interrupt`; the read then ends as interrupted once
/// the line is submitted. Without a terminal every read fails with
/// `io::ErrorKind::NotConnected`.
#[derive(Debug, Clone)]
pub struct TerminalReader {
    interrupt: CancellationToken,
}

impl TerminalReader {
    /// Create a terminal reader that stops once `interrupt` is cancelled.
    ///
    /// Something must handle SIGINT before the first prompt, otherwise Ctrl-C
    /// kills the process instead of ending the read.
    pub fn new(interrupt: CancellationToken) -> Self {
        Self { interrupt }
    }
}

impl LineReader for TerminalReader {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        // Empty input is returned so the collector can explain what is missing
        let result = Input::<String>::new().with_prompt(prompt).allow_empty(true).interact_text();
        finish_read(result, &self.interrupt)
    }

    fn read_hidden(&mut self, prompt: &str) -> io::Result<String> {
        let result = Password::new().with_prompt(prompt).allow_empty_password(true).interact();
        finish_read(result, &self.interrupt)
    }

    fn notify(&mut self, message: &str) {
        println!("{message}");
    }
}

/// Turn a dialoguer result into a read result.
///
/// A cancelled `interrupt` wins over whatever was read.
fn finish_read(
    result: Result<String, dialoguer::Error>,
    interrupt: &CancellationToken,
) -> io::Result<String> {
    if interrupt.is_cancelled() {
        return Err(io::Error::new(io::ErrorKind::Interrupted, "read interrupted"));
    }
    result.map_err(|dialoguer::Error::IO(e)| e)
}
