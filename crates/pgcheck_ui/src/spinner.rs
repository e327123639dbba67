//! Progress indicator shown before connecting.
//!
//! The spinner runs for a fixed number of frames and is purely cosmetic: it
//! does not bound the connection attempt that follows.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use pgcheck_core::ProbeOptions;
use std::time::Duration;

/// Animation frames; the trailing blank is drawn once finished.
const TICK_STRINGS: [&str; 5] = ["|", "/", "-", "\\", " "];

/// Frames per full rotation.
pub const FRAMES_PER_CYCLE: usize = TICK_STRINGS.len() - 1;

/// A fixed-length text spinner.
#[derive(Debug, Clone)]
pub struct Spinner {
    cycles: u32,
    interval: Duration,
    visible: bool,
}

impl Spinner {
    /// Create a spinner with `cycles` rotations, `interval` per frame.
    pub fn new(cycles: u32, interval: Duration) -> Self {
        Self { cycles, interval, visible: true }
    }

    /// Create a spinner from probe options.
    pub fn from_options(options: &ProbeOptions) -> Self {
        Self::new(options.spinner_cycles, options.frame_interval)
    }

    /// Draw to stdout when `visible`, otherwise only wait.
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Total number of frames drawn.
    pub fn frame_count(&self) -> usize {
        self.cycles as usize * FRAMES_PER_CYCLE
    }

    /// Total time the spinner runs.
    pub fn duration(&self) -> Duration {
        self.interval * self.frame_count() as u32
    }

    /// Show `message` followed by the spinner, then leave the message on screen.
    pub async fn run(&self, message: &str) {
        let target =
            if self.visible { ProgressDrawTarget::stdout() } else { ProgressDrawTarget::hidden() };
        let bar = ProgressBar::with_draw_target(None, target);
        let style = ProgressStyle::with_template("{msg}{spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&TICK_STRINGS);
        bar.set_style(style);
        bar.set_message(message.to_string());

        for _ in 0..self.frame_count() {
            bar.tick();
            tokio::time::sleep(self.interval).await;
        }

        bar.finish();
    }
}
