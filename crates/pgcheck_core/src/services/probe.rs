//! The connection probe.
//!
//! One probe opens one session, reads the server version and the current
//! user, releases the session and writes exactly one access log record.
//! No retries are attempted.

use crate::error::ProbeError;
use crate::models::{ConnectionOutcome, ConnectionRequest, ProbeOptions, ServerFacts};
use crate::services::connection::{Connector, Session, SessionGuard};

/// Query returning the server version string.
pub const VERSION_QUERY: &str = "SELECT version()";

/// Query returning the authenticated user name.
pub const CURRENT_USER_QUERY: &str = "SELECT current_user";

/// Runs probes through a [`Connector`].
pub struct Prober<C> {
    connector: C,
    options: ProbeOptions,
}

impl<C: Connector> Prober<C> {
    /// Create a prober.
    pub fn new(connector: C, options: ProbeOptions) -> Self {
        Self { connector, options }
    }

    /// Get the probe options.
    pub fn options(&self) -> &ProbeOptions {
        &self.options
    }

    /// Get the connector.
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Probe the server described by `request`.
    ///
    /// Never fails: every error is classified into the returned outcome.
    pub async fn probe(&self, request: &ConnectionRequest) -> ConnectionOutcome {
        let outcome = match self.fetch_server_facts(request).await {
            Ok(facts) => ConnectionOutcome::from(facts),
            Err(err) => {
                tracing::debug!(
                    category = err.category(),
                    code = ?err.pg_code(),
                    error = %err,
                    "Probe failed"
                );
                ConnectionOutcome::from_error(&err)
            }
        };

        record_outcome(&outcome, request);
        outcome
    }

    async fn fetch_server_facts(&self, request: &ConnectionRequest) -> Result<ServerFacts, ProbeError> {
        let session = self.connector.connect(request, &self.options).await?;
        let mut session = SessionGuard::new(session);

        let server_version = session.query_text(VERSION_QUERY).await?;
        let current_user = session.query_text(CURRENT_USER_QUERY).await?;

        Ok(ServerFacts { server_version, current_user })
    }
}

/// Write the access log record for a finished probe.
fn record_outcome(outcome: &ConnectionOutcome, request: &ConnectionRequest) {
    match outcome {
        ConnectionOutcome::Success { current_user, .. } => {
            tracing::info!("Access - User: {}, Database: {}", current_user, request.database);
        }
        ConnectionOutcome::AuthFailure { .. } => {
            tracing::error!(
                "Authentication failed - User: {}, Database: {}",
                request.user,
                request.database
            );
        }
        ConnectionOutcome::OtherFailure { raw_message } => {
            tracing::error!("An error occurred: {raw_message}");
        }
    }
}
