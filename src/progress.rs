//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche del batch.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` per feedback real-time
//! - Tracking statistiche del run (convertiti, skippati, falliti)
//! - Report finale con riepilogo aggregato
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:12] [====================>-------------------] 5/9 (55%) [OK] clip.mp4
//! ```

use crate::job::{ConversionResult, JobOutcome};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages progress reporting for the batch run
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Create a progress manager that draws nothing (JSON mode)
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Statistics tracker for batch results
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversionStats {
    pub jobs_run: usize,
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ConversionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished job
    pub fn record(&mut self, result: &ConversionResult) {
        self.jobs_run += 1;
        match result.outcome {
            JobOutcome::Converted => self.converted += 1,
            JobOutcome::Skipped { .. } => self.skipped += 1,
            JobOutcome::Failed { .. } | JobOutcome::TimedOut { .. } => self.failed += 1,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Jobs: {} | Converted: {} | Skipped: {} | Failed: {}",
            self.jobs_run, self.converted, self.skipped, self.failed
        )
    }
}
