//! Connection request model.

use std::fmt;

/// Parameters for one probe, collected interactively.
///
/// The port is kept as typed; it is only interpreted by the connector.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionRequest {
    /// Server hostname or IP
    pub host: String,
    /// Server port, as entered
    pub port: String,
    /// Database name
    pub database: String,
    /// Login username
    pub user: String,
    /// Login password (may be empty)
    pub password: String,
}

impl ConnectionRequest {
    /// Create a new connection request.
    pub fn new(
        host: impl Into<String>,
        port: impl Into<String>,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            database: database.into(),
            user: user.into(),
            password: password.into(),
        }
    }

    /// Get the display connection string (without password).
    pub fn display_url(&self) -> String {
        format!("postgresql://{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}

// Keeps the password out of debug logs.
impl fmt::Debug for ConnectionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionRequest")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let request = ConnectionRequest::new("db", "5432", "app", "admin", "hunter2");
        let debug = format!("{request:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_display_url() {
        let request = ConnectionRequest::new("db.local", "6543", "app", "admin", "secret");
        assert_eq!(request.display_url(), "postgresql://admin@db.local:6543/app");
    }
}
