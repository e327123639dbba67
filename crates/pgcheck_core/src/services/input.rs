//! Interactive input collection.
//!
//! Required fields are re-prompted until a value arrives. A user abort, or
//! input that can never arrive, ends collection immediately; any other read
//! error is logged and re-prompted.

use crate::error::ProbeError;
use crate::models::ConnectionRequest;
use std::io;

/// Shown when a required field is left empty and no specific message is given.
pub const EMPTY_INPUT_MESSAGE: &str = "Input must not be empty.";

/// Source of interactive lines.
pub trait LineReader {
    /// Read one visible line, without the trailing newline.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    /// Read one line without echoing it.
    fn read_hidden(&mut self, prompt: &str) -> io::Result<String>;

    /// Show a message to the user between prompts.
    fn notify(&mut self, message: &str);
}

/// Collects a [`ConnectionRequest`] through a [`LineReader`].
pub struct InputCollector<R> {
    reader: R,
}

impl<R: LineReader> InputCollector<R> {
    /// Create a collector over the given reader.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Get the underlying reader.
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Prompt until a non-empty line is entered.
    ///
    /// With a `default`, an empty line yields the default instead.
    pub fn prompt(
        &mut self,
        prompt: &str,
        default: Option<&str>,
        empty_message: Option<&str>,
    ) -> Result<String, ProbeError> {
        loop {
            match self.reader.read_line(prompt) {
                Ok(line) if !line.is_empty() => return Ok(line),
                Ok(_) => match default {
                    Some(value) => return Ok(value.to_string()),
                    None => self.reader.notify(empty_message.unwrap_or(EMPTY_INPUT_MESSAGE)),
                },
                Err(e) => self.recover(e)?,
            }
        }
    }

    /// Prompt for a password without echo. Empty passwords are accepted.
    pub fn prompt_password(&mut self, prompt: &str) -> Result<String, ProbeError> {
        loop {
            match self.reader.read_hidden(prompt) {
                Ok(password) => return Ok(password),
                Err(e) => self.recover(e)?,
            }
        }
    }

    /// Collect all connection parameters, in prompt order.
    pub fn collect_request(&mut self) -> Result<ConnectionRequest, ProbeError> {
        let host =
            self.prompt("Enter PostgreSQL host", None, Some("Host must not be empty."))?;
        let port =
            self.prompt("Enter PostgreSQL port", None, Some("Port must not be empty."))?;
        let database = self.prompt(
            "Enter PostgreSQL database name",
            None,
            Some("Database name must not be empty."),
        )?;
        let user =
            self.prompt("Enter PostgreSQL username", None, Some("Username must not be empty."))?;
        let password = self.prompt_password("Enter PostgreSQL password")?;

        let request = ConnectionRequest::new(host, port, database, user, password);
        tracing::debug!(url = %request.display_url(), "Connection parameters collected");
        Ok(request)
    }

    /// Turn a read error into either an abort or a logged retry.
    fn recover(&mut self, err: io::Error) -> Result<(), ProbeError> {
        match ProbeError::from(err) {
            ProbeError::Interrupted => Err(ProbeError::Interrupted),
            other => {
                let message = format!("An error occurred: {}", other.raw_message());
                self.reader.notify(&message);
                tracing::error!("{message}");
                Ok(())
            }
        }
    }
}
