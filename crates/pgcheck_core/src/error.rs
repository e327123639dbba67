//! Error types for pgcheck.
//!
//! Every failure a probe can hit is classified here, so callers never have to
//! inspect driver error text themselves.

use thiserror::Error;

/// Substring PostgreSQL uses when it rejects credentials.
const AUTHENTICATION_FAILED: &str = "authentication failed";

/// Main error type for pgcheck.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The server could not be reached or the session broke.
    #[error("Connection error: {message}")]
    Connection {
        /// Raw error text as reported by the driver.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The server rejected the supplied credentials.
    #[error("Authentication error: {message}")]
    Authentication {
        /// Raw error text as reported by the driver.
        message: String,
        /// Actionable hint for the user.
        hint: Option<String>,
    },

    /// A diagnostic query failed after the connection was established.
    #[error("{message}")]
    Query {
        /// Raw error text as reported by the driver.
        message: String,
        /// PostgreSQL error code (e.g., "42P01").
        code: Option<String>,
        /// PostgreSQL hint.
        hint: Option<String>,
    },

    /// Reading interactive input failed.
    #[error("Input error: {message}")]
    Input {
        /// Human-readable error message.
        message: String,
    },

    /// The user aborted the run.
    #[error("Interrupted")]
    Interrupted,

    /// Invalid environment configuration.
    #[error("Config error: {message}")]
    Config {
        /// Human-readable error message.
        message: String,
    },

    /// Unexpected internal error.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
    },
}

impl ProbeError {
    // ========== Constructors ==========

    /// Create a new connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into(), source: None }
    }

    /// Create a new connection error with source.
    pub fn connection_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection { message: message.into(), source: Some(Box::new(source)) }
    }

    /// Create a new authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            hint: Some("Check username and password".to_string()),
        }
    }

    /// Create a new query error.
    pub fn query(message: impl Into<String>, code: Option<String>) -> Self {
        Self::Query { message: message.into(), code, hint: None }
    }

    /// Create a new input error.
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input { message: message.into() }
    }

    /// Create a new config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    // ========== Methods ==========

    /// Check if the server rejected the credentials.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Check if the user aborted the run.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, Self::Interrupted)
    }

    /// The error text without the category prefix.
    ///
    /// For driver errors this is the verbatim text the driver produced.
    pub fn raw_message(&self) -> String {
        match self {
            Self::Connection { message, .. }
            | Self::Authentication { message, .. }
            | Self::Query { message, .. }
            | Self::Input { message }
            | Self::Config { message }
            | Self::Internal { message } => message.clone(),
            Self::Interrupted => self.to_string(),
        }
    }

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection { .. } => "Connection",
            Self::Authentication { .. } => "Authentication",
            Self::Query { .. } => "Query",
            Self::Input { .. } => "Input",
            Self::Interrupted => "Interrupt",
            Self::Config { .. } => "Config",
            Self::Internal { .. } => "Internal",
        }
    }

    /// Get actionable hint for the user.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Connection { .. } => Some("Check that the database server is running"),
            Self::Authentication { hint, .. } => hint.as_deref(),
            Self::Query { hint, .. } => hint.as_deref(),
            Self::Config { .. } => Some("Check the PGCHECK_* environment variables"),
            Self::Internal { .. } => Some("Please report this issue"),
            Self::Input { .. } | Self::Interrupted => None,
        }
    }

    /// Get PostgreSQL error code (if applicable).
    pub fn pg_code(&self) -> Option<&str> {
        match self {
            Self::Query { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// Check whether driver error text describes rejected credentials.
///
/// Used when the driver gives no SQLSTATE, and to tell rejected
/// credentials apart from other `28000` refusals.
pub fn is_authentication_failure(message: &str) -> bool {
    message.contains(AUTHENTICATION_FAILED)
}

/// How a server-reported error is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ServerErrorKind {
    Authentication,
    Connection,
    Query,
}

/// Classify a server error by SQLSTATE and server message.
pub(crate) fn classify_sqlstate(code: &str, message: &str) -> ServerErrorKind {
    match code {
        // invalid_password
        "28P01" => ServerErrorKind::Authentication,
        // invalid_authorization_specification also covers pg_hba.conf
        // rejections and unknown roles, which keep their own text
        "28000" if is_authentication_failure(message) => ServerErrorKind::Authentication,
        "28000" => ServerErrorKind::Connection,
        // Connection exceptions (08xxx)
        _ if code.starts_with("08") => ServerErrorKind::Connection,
        _ => ServerErrorKind::Query,
    }
}

// ========== Error Conversions ==========

/// Convert from tokio_postgres::Error to ProbeError.
impl From<tokio_postgres::Error> for ProbeError {
    fn from(err: tokio_postgres::Error) -> Self {
        let message = err.to_string();

        if let Some(db_err) = err.as_db_error() {
            let code = db_err.code().code();
            return match classify_sqlstate(code, db_err.message()) {
                ServerErrorKind::Authentication => ProbeError::Authentication {
                    message,
                    hint: Some("Check username and password".to_string()),
                },
                ServerErrorKind::Connection => ProbeError::connection_with_source(message, err),
                ServerErrorKind::Query => {
                    let code = Some(code.to_string());
                    let hint = db_err.hint().map(String::from);
                    ProbeError::Query { message, code, hint }
                }
            };
        }

        if is_authentication_failure(&message) {
            return ProbeError::authentication(message);
        }

        ProbeError::connection_with_source(message, err)
    }
}

/// Convert from std::io::Error to ProbeError.
///
/// No more input (end of stream, no terminal, closed pipe) ends the run like Ctrl-C.
impl From<std::io::Error> for ProbeError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match err.kind() {
            ErrorKind::Interrupted
            | ErrorKind::UnexpectedEof
            | ErrorKind::NotConnected
            | ErrorKind::BrokenPipe => ProbeError::Interrupted,
            _ => ProbeError::input(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_authentication_failure_predicate() {
        assert!(is_authentication_failure(
            "FATAL:  password authentication failed for user \"postgres\""
        ));
        assert!(!is_authentication_failure("could not connect to server: Connection refused"));
        assert!(!is_authentication_failure("fe_sendauth: no password supplied"));
    }

    #[test]
    fn test_raw_message_has_no_category_prefix() {
        let err = ProbeError::connection("could not connect to server");
        assert_eq!(err.to_string(), "Connection error: could not connect to server");
        assert_eq!(err.raw_message(), "could not connect to server");
    }

    #[test]
    fn test_io_interrupt_maps_to_interrupted() {
        let err = ProbeError::from(io::Error::new(io::ErrorKind::Interrupted, "read interrupted"));
        assert!(err.is_interrupt());

        let err = ProbeError::from(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        assert!(err.is_interrupt());
    }

    #[test]
    fn test_missing_input_maps_to_interrupted() {
        let err = ProbeError::from(io::Error::new(io::ErrorKind::NotConnected, "not a terminal"));
        assert!(err.is_interrupt());

        let err = ProbeError::from(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"));
        assert!(err.is_interrupt());
    }

    #[test]
    fn test_invalid_password_is_authentication() {
        let message = "password authentication failed for user \"admin\"";
        assert_eq!(classify_sqlstate("28P01", message), ServerErrorKind::Authentication);
        assert_eq!(classify_sqlstate("28000", message), ServerErrorKind::Authentication);
    }

    #[test]
    fn test_other_authorization_refusals_keep_their_text() {
        let refusals = [
            "no pg_hba.conf entry for host \"10.0.0.7\", user \"admin\", database \"app\", no encryption",
            "pg_hba.conf rejects connection for host \"10.0.0.7\", user \"admin\", database \"app\"",
            "role \"ghost\" does not exist",
        ];
        for message in refusals {
            assert_eq!(classify_sqlstate("28000", message), ServerErrorKind::Connection, "{message}");
        }
    }

    #[test]
    fn test_sqlstate_classes() {
        assert_eq!(classify_sqlstate("08006", "connection failure"), ServerErrorKind::Connection);
        assert_eq!(classify_sqlstate("3D000", "database \"nope\" does not exist"), ServerErrorKind::Query);
        assert_eq!(classify_sqlstate("42501", "permission denied"), ServerErrorKind::Query);
    }

    #[test]
    fn test_pg_code_only_for_query_errors() {
        let err = ProbeError::query("permission denied for function version", Some("42501".into()));
        assert_eq!(err.pg_code(), Some("42501"));
        assert_eq!(ProbeError::connection("refused").pg_code(), None);
    }

    #[test]
    fn test_other_io_errors_map_to_input() {
        let err = ProbeError::from(io::Error::new(io::ErrorKind::InvalidData, "bad utf-8"));
        assert_eq!(err.category(), "Input");
        assert_eq!(err.raw_message(), "bad utf-8");
    }

    #[test]
    fn test_hints() {
        assert_eq!(ProbeError::authentication("x").hint(), Some("Check username and password"));
        assert!(ProbeError::connection("x").hint().is_some());
        assert!(ProbeError::Interrupted.hint().is_none());
    }
}
