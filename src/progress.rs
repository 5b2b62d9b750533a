//! Progress reporting: a narrow collaborator interface so the core never
//! depends directly on a terminal-rendering crate.

use indicatif::{ProgressBar, ProgressStyle};

/// The interface the orchestrators (C8/C9) push byte counts through.
/// Rendering itself is external to the core.
pub trait Progress: Send + Sync {
    /// Advance the bar by `bytes_done` bytes of newly processed input.
    fn update(&self, bytes_done: u64);
    /// Mark the run complete.
    fn finish(&self);
}

/// Renders progress with an [`indicatif::ProgressBar`].
pub struct IndicatifProgress {
    bar: ProgressBar,
}

impl IndicatifProgress {
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        IndicatifProgress { bar }
    }
}

impl Progress for IndicatifProgress {
    fn update(&self, bytes_done: u64) {
        self.bar.inc(bytes_done);
    }

    fn finish(&self) {
        self.bar.finish();
    }
}

/// A no-op renderer, used in tests and whenever progress output would
/// otherwise pollute a non-interactive sink (e.g. stdout-as-sink).
#[derive(Default)]
pub struct NullProgress;

impl Progress for NullProgress {
    fn update(&self, _bytes_done: u64) {}
    fn finish(&self) {}
}
