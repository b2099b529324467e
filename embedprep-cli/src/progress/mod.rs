//! Progress reporting module

use embedprep_records::FetchProgress;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::OnceCell;
use std::time::Duration;

/// Progress reporter for product fetching
pub struct ProgressReporter {
    progress_bar: OnceCell<ProgressBar>,
    quiet: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool) -> Self {
        Self {
            progress_bar: OnceCell::new(),
            quiet,
        }
    }
}

impl FetchProgress for ProgressReporter {
    fn start(&self, total: usize) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} products {msg}")
        {
            pb.set_style(style.progress_chars("##-"));
        }
        pb.enable_steady_tick(Duration::from_millis(100));

        let _ = self.progress_bar.set(pb);
    }

    fn advance(&self, id: &str) {
        if let Some(pb) = self.progress_bar.get() {
            pb.set_message(format!("Fetched: {id}"));
            pb.inc(1);
        }
    }

    fn finish(&self) {
        if let Some(pb) = self.progress_bar.get() {
            pb.finish_with_message("Complete");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_reporter_has_no_bar() {
        let reporter = ProgressReporter::new(true);
        reporter.start(10);
        reporter.advance("rec1");
        reporter.finish();
        assert!(reporter.progress_bar.get().is_none());
    }

    #[test]
    fn test_reporter_tracks_position() {
        let reporter = ProgressReporter::new(false);
        reporter.start(2);
        reporter.advance("rec1");
        reporter.advance("rec2");
        reporter.finish();

        let pb = reporter.progress_bar.get().unwrap();
        assert_eq!(pb.position(), 2);
        assert!(pb.is_finished());
    }
}
