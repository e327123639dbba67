//! One pgcheck session: collect parameters, probe, report.

use pgcheck_core::{
    ConnectionOutcome, ConnectionRequest, Connector, InputCollector, LineReader, ProbeError,
    ProbeOptions, Prober,
};
use pgcheck_ui::{render_outcome, Spinner};
use std::io::Write;
use tokio_util::sync::CancellationToken;

/// Shown while the spinner runs.
const CONNECTING_MESSAGE: &str = "Connecting to database... ";

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// The probe ran to completion, whatever its outcome.
    Completed(ConnectionOutcome),
    /// The user aborted the probe.
    Interrupted,
}

/// Drives a single session.
pub struct App<R, C> {
    collector: InputCollector<R>,
    prober: Prober<C>,
    interactive: bool,
}

impl<R: LineReader, C: Connector> App<R, C> {
    /// Create an app.
    ///
    /// `interactive` controls whether the spinner is drawn.
    pub fn new(reader: R, connector: C, options: ProbeOptions, interactive: bool) -> Self {
        Self {
            collector: InputCollector::new(reader),
            prober: Prober::new(connector, options),
            interactive,
        }
    }

    /// Prompt for the connection parameters.
    pub fn collect(&mut self) -> Result<ConnectionRequest, ProbeError> {
        self.collector.collect_request()
    }

    /// Probe the server and write the result to `out`.
    ///
    /// Cancelling `cancel` abandons the probe; an open session is still closed.
    pub async fn check(
        &self,
        request: &ConnectionRequest,
        out: &mut impl Write,
        cancel: &CancellationToken,
    ) -> Result<SessionEnd, ProbeError> {
        if !self.interactive {
            write_out(out, CONNECTING_MESSAGE)?;
        }

        let spinner = Spinner::from_options(self.prober.options()).visible(self.interactive);
        let probe = async {
            spinner.run(CONNECTING_MESSAGE).await;
            self.prober.probe(request).await
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Probe cancelled");
                return Ok(SessionEnd::Interrupted);
            }
            outcome = probe => outcome,
        };

        write_out(out, &render_outcome(&outcome, request))?;
        Ok(SessionEnd::Completed(outcome))
    }
}

fn write_out(out: &mut impl Write, text: &str) -> Result<(), ProbeError> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| ProbeError::internal(format!("Failed to write output: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgcheck_core::logging::{init_logging, LogConfig};
    use pgcheck_core::Session;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::tempdir;

    #[derive(Default)]
    struct ScriptedReader {
        lines: VecDeque<io::Result<String>>,
        password: Option<String>,
    }

    impl LineReader for ScriptedReader {
        fn read_line(&mut self, _prompt: &str) -> io::Result<String> {
            self.lines.pop_front().unwrap_or_else(|| Err(io::ErrorKind::UnexpectedEof.into()))
        }

        fn read_hidden(&mut self, _prompt: &str) -> io::Result<String> {
            self.password.take().ok_or_else(|| io::ErrorKind::UnexpectedEof.into())
        }

        fn notify(&mut self, _message: &str) {}
    }

    #[derive(Clone, Default)]
    struct FakeConnector {
        hang: bool,
        connects: Arc<AtomicUsize>,
        closes: Arc<AtomicUsize>,
        queries: Arc<Mutex<VecDeque<&'static str>>>,
    }

    struct FakeSession {
        hang: bool,
        closes: Arc<AtomicUsize>,
        queries: Arc<Mutex<VecDeque<&'static str>>>,
    }

    impl Connector for FakeConnector {
        type Session = FakeSession;

        async fn connect(
            &self,
            _request: &ConnectionRequest,
            _options: &ProbeOptions,
        ) -> Result<FakeSession, ProbeError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(FakeSession {
                hang: self.hang,
                closes: self.closes.clone(),
                queries: self.queries.clone(),
            })
        }
    }

    impl Session for FakeSession {
        async fn query_text(&mut self, _sql: &str) -> Result<String, ProbeError> {
            if self.hang {
                std::future::pending::<()>().await;
            }
            let reply = self.queries.lock().pop_front();
            reply.map(String::from).ok_or_else(|| ProbeError::internal("unexpected query"))
        }

        fn close(&mut self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn connector(replies: &[&'static str]) -> FakeConnector {
        let connector = FakeConnector::default();
        connector.queries.lock().extend(replies.iter().copied());
        connector
    }

    fn reader(lines: Vec<io::Result<String>>) -> ScriptedReader {
        ScriptedReader { lines: lines.into(), password: Some("s3cr3t".to_string()) }
    }

    fn options() -> ProbeOptions {
        ProbeOptions::default().without_spinner()
    }

    fn request() -> ConnectionRequest {
        ConnectionRequest::new("localhost", "5432", "app", "admin", "s3cr3t")
    }

    #[test]
    fn test_interrupt_during_input_skips_probe_and_log() {
        let dir = tempdir().unwrap();
        let config = LogConfig::new(dir.path()).with_filter("info");
        let connector = connector(&[]);
        let lines = vec![
            Ok("localhost".to_string()),
            Err(io::Error::new(io::ErrorKind::Interrupted, "read interrupted")),
        ];

        {
            let _guard = init_logging(config.clone());
            let mut app = App::new(reader(lines), connector.clone(), options(), false);
            assert!(app.collect().unwrap_err().is_interrupt());
        }

        assert_eq!(connector.connects.load(Ordering::SeqCst), 0);
        assert_eq!(std::fs::read_to_string(config.log_path()).unwrap(), "");
    }

    #[tokio::test]
    async fn test_check_prints_version_and_table() {
        let lines = Vec::from(["localhost", "5432", "app", "admin"].map(|l| Ok(l.to_string())));
        let connector = connector(&["PostgreSQL 16.2", "admin"]);
        let mut app = App::new(reader(lines), connector.clone(), options(), false);
        let mut out = Vec::new();

        let request = app.collect().unwrap();
        let end = app.check(&request, &mut out, &CancellationToken::new()).await.unwrap();

        assert_eq!(
            end,
            SessionEnd::Completed(ConnectionOutcome::Success {
                server_version: "PostgreSQL 16.2".to_string(),
                current_user: "admin".to_string(),
            })
        );
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(CONNECTING_MESSAGE));
        assert!(text.contains("Successfully connected to PostgreSQL 16.2"));
        assert!(text.contains("Password"));
        assert!(text.contains("s3cr3t"));
        assert_eq!(connector.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancel_before_probe_never_connects() {
        let connector = connector(&["PostgreSQL 16.2", "admin"]);
        let app = App::new(reader(Vec::new()), connector.clone(), options(), false);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let end = app.check(&request(), &mut Vec::<u8>::new(), &cancel).await.unwrap();

        assert_eq!(end, SessionEnd::Interrupted);
        assert_eq!(connector.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_mid_query_closes_session() {
        let connector = FakeConnector { hang: true, ..FakeConnector::default() };
        let app = App::new(reader(Vec::new()), connector.clone(), options(), false);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let end = app.check(&request(), &mut Vec::<u8>::new(), &cancel).await.unwrap();

        assert_eq!(end, SessionEnd::Interrupted);
        assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
        assert_eq!(connector.closes.load(Ordering::SeqCst), 1);
    }
}
