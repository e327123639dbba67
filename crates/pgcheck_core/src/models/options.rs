//! Probe options.

use crate::error::ProbeError;
use std::time::Duration;

/// Environment variable holding the connect timeout in seconds.
pub const CONNECT_TIMEOUT_VAR: &str = "PGCHECK_CONNECT_TIMEOUT";

/// Tunables for a probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Connection timeout (None = driver default, no limit)
    pub connect_timeout: Option<Duration>,
    /// Application name sent to PostgreSQL
    pub application_name: String,
    /// Spinner rotations shown before connecting
    pub spinner_cycles: u32,
    /// Delay between spinner frames
    pub frame_interval: Duration,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            application_name: "pgcheck".to_string(),
            spinner_cycles: 10,
            frame_interval: Duration::from_millis(100),
        }
    }
}

impl ProbeOptions {
    /// Read options from the process environment.
    pub fn from_env() -> Result<Self, ProbeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read options through a variable lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ProbeError> {
        let mut options = Self::default();

        if let Some(raw) = lookup(CONNECT_TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ProbeError::config(format!("{CONNECT_TIMEOUT_VAR} must be whole seconds, got {raw:?}"))
            })?;
            options.connect_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(options)
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Skip the spinner delay.
    pub fn without_spinner(mut self) -> Self {
        self.spinner_cycles = 0;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_have_no_timeout() {
        let options = ProbeOptions::from_lookup(|_| None).unwrap();
        assert_eq!(options, ProbeOptions::default());
        assert!(options.connect_timeout.is_none());
        assert_eq!(options.spinner_cycles, 10);
        assert_eq!(options.frame_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_connect_timeout_from_env() {
        let options =
            ProbeOptions::from_lookup(|key| (key == CONNECT_TIMEOUT_VAR).then(|| "15".into()))
                .unwrap();
        assert_eq!(options.connect_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let options = ProbeOptions::from_lookup(|_| Some("0".into())).unwrap();
        assert!(options.connect_timeout.is_none());
    }

    #[test]
    fn test_invalid_timeout_is_config_error() {
        let err = ProbeOptions::from_lookup(|_| Some("soon".into())).unwrap_err();
        assert_eq!(err.category(), "Config");
        assert!(err.raw_message().contains("soon"));
    }
}
