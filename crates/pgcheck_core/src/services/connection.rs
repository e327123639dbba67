//! Single database connections for probing.
//!
//! Provides:
//! - `Connector`/`Session` seams so a probe can run against any backend
//! - `SessionGuard`, which closes a session exactly once on every exit path
//! - `PgConnector`, the tokio-postgres implementation
//!
//! Connections are never pooled or reused; each probe owns exactly one.

use crate::error::ProbeError;
use crate::models::{ConnectionRequest, ProbeOptions};

use std::future::Future;
use std::ops::{Deref, DerefMut};
use tokio_postgres::NoTls;

/// Opens sessions to a database server.
pub trait Connector {
    /// Session type produced by a successful connect.
    type Session: Session;

    /// Open one session with the request's parameters.
    fn connect(
        &self,
        request: &ConnectionRequest,
        options: &ProbeOptions,
    ) -> impl Future<Output = Result<Self::Session, ProbeError>>;
}

/// An open database session.
pub trait Session {
    /// Run a query returning a single text value.
    fn query_text(&mut self, sql: &str) -> impl Future<Output = Result<String, ProbeError>>;

    /// Release the session.
    fn close(&mut self);
}

/// Scoped ownership of a session.
///
/// The session is closed when the guard is dropped, whether the probe
/// finished, failed, or was cancelled mid-query.
pub struct SessionGuard<S: Session> {
    session: S,
}

impl<S: Session> SessionGuard<S> {
    /// Take ownership of an open session.
    pub fn new(session: S) -> Self {
        Self { session }
    }
}

impl<S: Session> Deref for SessionGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: Session> DerefMut for SessionGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: Session> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        self.session.close();
    }
}

/// Connects to PostgreSQL with tokio-postgres, without TLS.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgConnector;

impl PgConnector {
    /// Build the tokio-postgres config for a request.
    ///
    /// The port is only parsed here; a non-numeric port fails like any other
    /// connection error.
    pub fn pg_config(
        request: &ConnectionRequest,
        options: &ProbeOptions,
    ) -> Result<tokio_postgres::Config, ProbeError> {
        let port: u16 = request.port.parse().map_err(|_| {
            ProbeError::connection(format!(
                "invalid integer value \"{}\" for connection option \"port\"",
                request.port
            ))
        })?;

        let mut pg_config = tokio_postgres::Config::new();
        pg_config.host(&request.host);
        pg_config.port(port);
        pg_config.dbname(&request.database);
        pg_config.user(&request.user);
        pg_config.application_name(&options.application_name);
        // An empty password means "none", so servers that want one report it
        if !request.password.is_empty() {
            pg_config.password(&request.password);
        }
        if let Some(timeout) = options.connect_timeout {
            pg_config.connect_timeout(timeout);
        }

        Ok(pg_config)
    }
}

impl Connector for PgConnector {
    type Session = PgSession;

    async fn connect(
        &self,
        request: &ConnectionRequest,
        options: &ProbeOptions,
    ) -> Result<PgSession, ProbeError> {
        let pg_config = Self::pg_config(request, options)?;

        tracing::debug!(
            host = %request.host,
            port = %request.port,
            database = %request.database,
            timeout = ?options.connect_timeout,
            "Connecting"
        );

        let (client, connection) = pg_config.connect(NoTls).await?;

        // The connection future drives the socket; it ends once the client is dropped
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::debug!(error = %e, "Connection driver stopped with error");
            }
        });

        tracing::debug!(database = %request.database, "Connection established");

        Ok(PgSession { client: Some(client) })
    }
}

/// An open tokio-postgres session.
pub struct PgSession {
    client: Option<tokio_postgres::Client>,
}

impl Session for PgSession {
    async fn query_text(&mut self, sql: &str) -> Result<String, ProbeError> {
        let client =
            self.client.as_ref().ok_or_else(|| ProbeError::connection("connection already closed"))?;

        tracing::trace!(sql, "Executing query");
        let row = client.query_one(sql, &[]).await?;
        Ok(row.try_get::<_, String>(0)?)
    }

    fn close(&mut self) {
        if self.client.take().is_some() {
            tracing::debug!("Connection closed");
        }
    }
}
