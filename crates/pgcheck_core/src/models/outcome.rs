//! Probe outcome model.

use crate::error::ProbeError;

/// Message shown instead of the driver text when credentials are rejected.
pub const AUTH_FAILURE_MESSAGE: &str =
    "Error: Authentication failed. Check the username and password again.";

/// Facts read from the server after a successful connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerFacts {
    /// Result of `SELECT version()`
    pub server_version: String,
    /// Result of `SELECT current_user`
    pub current_user: String,
}

/// Result of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionOutcome {
    /// Connected and both diagnostic queries succeeded.
    Success {
        /// Server version string
        server_version: String,
        /// Authenticated user name
        current_user: String,
    },
    /// The server rejected the credentials.
    AuthFailure {
        /// Driver error text, kept for the log only
        raw_message: String,
    },
    /// Any other connection or query failure.
    OtherFailure {
        /// Driver error text
        raw_message: String,
    },
}

impl ConnectionOutcome {
    /// Classify a probe error.
    pub fn from_error(err: &ProbeError) -> Self {
        if err.is_authentication() {
            Self::AuthFailure { raw_message: err.raw_message() }
        } else {
            Self::OtherFailure { raw_message: err.raw_message() }
        }
    }

    /// Check if the probe succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Check if the credentials were rejected.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthFailure { .. })
    }

    /// Message shown to the user for a failed probe.
    ///
    /// Authentication failures never expose the driver text.
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::AuthFailure { .. } => Some(AUTH_FAILURE_MESSAGE.to_string()),
            Self::OtherFailure { raw_message } => Some(format!("An error occurred: {raw_message}")),
        }
    }
}

impl From<ServerFacts> for ConnectionOutcome {
    fn from(facts: ServerFacts) -> Self {
        Self::Success { server_version: facts.server_version, current_user: facts.current_user }
    }
}
