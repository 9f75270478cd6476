//! # Progress Tracking Module
//!
//! Unifica progress bar, contatori e eventi JSON in un singolo tracker
//! thread-safe condiviso dall'orchestratore.

use crate::{
    config::Config,
    job::{ConversionResult, JobOutcome},
    json_output::JsonMessage,
    progress::{ConversionStats, ProgressManager},
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Tracker progress unificato per il run batch
#[derive(Clone)]
pub struct ProgressTracker {
    pub total_files: usize,
    stats: Arc<Mutex<ConversionStats>>,
    progress_manager: ProgressManager,
}

impl ProgressTracker {
    /// Crea un nuovo tracker; in JSON mode la barra non viene disegnata
    pub fn new(total_files: usize, json_output: bool) -> Self {
        let progress_manager = if json_output {
            ProgressManager::hidden()
        } else {
            ProgressManager::new(total_files as u64)
        };

        Self {
            total_files,
            stats: Arc::new(Mutex::new(ConversionStats::new())),
            progress_manager,
        }
    }

    /// Registra il completamento di un job: contatori, evento JSON, barra
    pub async fn handle_job_completion(&self, config: &Config, result: &ConversionResult) {
        {
            let mut stats = self.stats.lock().await;
            stats.record(result);
        }

        if config.json_output {
            JsonMessage::file_complete(result).emit();
        }

        let tag = match result.outcome {
            JobOutcome::Converted => "[OK]",
            JobOutcome::Skipped { .. } => "[SKIP]",
            JobOutcome::Failed { .. } | JobOutcome::TimedOut { .. } => "[ERROR]",
        };
        self.progress_manager
            .update(&format!("{} {}", tag, result.job.source_name()));
    }

    /// Snapshot delle statistiche correnti
    pub async fn stats(&self) -> ConversionStats {
        self.stats.lock().await.clone()
    }

    /// Finalizza la progress bar
    pub fn finish(&self, summary: &str) {
        self.progress_manager.finish(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConversionOptions;
    use crate::job::ConversionJob;
    use std::path::PathBuf;
    use std::time::Duration;

    #[tokio::test]
    async fn test_tracker_counts_outcomes() {
        let tracker = ProgressTracker::new(2, true);
        let config = Config::default();

        let job = ConversionJob::new(
            0,
            PathBuf::from("a.mp4"),
            PathBuf::from("a.apng"),
            ConversionOptions::default(),
        );
        tracker
            .handle_job_completion(
                &config,
                &ConversionResult::new(job.clone(), JobOutcome::Converted, Duration::ZERO),
            )
            .await;
        tracker
            .handle_job_completion(
                &config,
                &ConversionResult::new(
                    job,
                    JobOutcome::Failed {
                        exit_code: Some(1),
                        message: "bad".to_string(),
                    },
                    Duration::ZERO,
                ),
            )
            .await;

        let stats = tracker.stats().await;
        assert_eq!(stats.jobs_run, 2);
        assert_eq!(stats.converted, 1);
        assert_eq!(stats.failed, 1);
    }
}
