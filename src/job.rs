//! # Conversion Jobs and Results Module
//!
//! Questo modulo definisce le unità di lavoro del batch.
//!
//! ## Responsabilità:
//! - `ConversionJob`: una richiesta di conversione sorgente -> destinazione,
//!   immutabile una volta costruita, consumata esattamente una volta
//! - `JobOutcome`: l'esito di un singolo job (convertito, skippato, fallito, timeout)
//! - `ConversionResult`: il record finale per job, mai mutato dopo la creazione
//!
//! Un job che fallisce non interrompe il batch: l'esito viene catturato qui
//! e il run prosegue con i file successivi. L'exit code dell'encoder viene
//! sempre preservato nel risultato.

use crate::config::ConversionOptions;
use std::path::PathBuf;
use std::time::Duration;

/// One source-to-destination conversion request
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Submission order within the run, used as the log sequencing key
    pub index: usize,
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub options: ConversionOptions,
}

impl ConversionJob {
    pub fn new(
        index: usize,
        source_path: PathBuf,
        destination_path: PathBuf,
        options: ConversionOptions,
    ) -> Self {
        Self {
            index,
            source_path,
            destination_path,
            options,
        }
    }

    /// File name of the source, for display
    pub fn source_name(&self) -> String {
        self.source_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// File name of the destination, for display
    pub fn destination_name(&self) -> String {
        self.destination_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// How a single job ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The encoder exited 0 and the destination file exists
    Converted,
    /// The job was not run (existing destination with skip policy, dry run)
    Skipped { reason: String },
    /// The encoder failed, could not be spawned, or produced no output
    Failed {
        exit_code: Option<i32>,
        message: String,
    },
    /// The encoder exceeded the configured timeout and was killed
    TimedOut { limit_secs: u64 },
}

/// Final record for one job, appended to the run report and the log
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub job: ConversionJob,
    pub outcome: JobOutcome,
    pub duration: Duration,
}

impl ConversionResult {
    pub fn new(job: ConversionJob, outcome: JobOutcome, duration: Duration) -> Self {
        Self {
            job,
            outcome,
            duration,
        }
    }

    /// True unless the job failed or timed out
    pub fn success(&self) -> bool {
        !matches!(
            self.outcome,
            JobOutcome::Failed { .. } | JobOutcome::TimedOut { .. }
        )
    }

    /// The encoder's exit code, when one was observed
    pub fn exit_code(&self) -> Option<i32> {
        match &self.outcome {
            JobOutcome::Converted => Some(0),
            JobOutcome::Failed { exit_code, .. } => *exit_code,
            _ => None,
        }
    }

    /// Log level for the persistent conversion log
    pub fn log_level(&self) -> &'static str {
        if self.success() {
            "INFO"
        } else {
            "ERROR"
        }
    }

    /// One-line description for the persistent conversion log
    pub fn log_message(&self) -> String {
        let src = self.job.source_name();
        let dst = self.job.destination_name();
        let secs = self.duration.as_secs_f64();

        match &self.outcome {
            JobOutcome::Converted => {
                format!("converted {} -> {} (exit 0, {:.2}s)", src, dst, secs)
            }
            JobOutcome::Skipped { reason } => {
                format!("skipped {} -> {} ({})", src, dst, reason)
            }
            JobOutcome::Failed { exit_code, message } => {
                let code = exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "none".to_string());
                let detail = message.lines().next().unwrap_or("").trim();
                if detail.is_empty() {
                    format!("failed {} -> {} (exit {}, {:.2}s)", src, dst, code, secs)
                } else {
                    format!(
                        "failed {} -> {} (exit {}, {:.2}s): {}",
                        src, dst, code, secs, detail
                    )
                }
            }
            JobOutcome::TimedOut { limit_secs } => {
                format!("timed out {} -> {} (after {}s)", src, dst, limit_secs)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> ConversionJob {
        ConversionJob::new(
            0,
            PathBuf::from("/in/clip.mp4"),
            PathBuf::from("/out/clip.apng"),
            ConversionOptions::default(),
        )
    }

    #[test]
    fn test_exit_code_is_preserved() {
        let failed = ConversionResult::new(
            job(),
            JobOutcome::Failed {
                exit_code: Some(187),
                message: "boom".to_string(),
            },
            Duration::from_millis(10),
        );
        assert!(!failed.success());
        assert_eq!(failed.exit_code(), Some(187));

        let converted =
            ConversionResult::new(job(), JobOutcome::Converted, Duration::from_millis(10));
        assert!(converted.success());
        assert_eq!(converted.exit_code(), Some(0));
    }

    #[test]
    fn test_skipped_is_not_a_failure() {
        let skipped = ConversionResult::new(
            job(),
            JobOutcome::Skipped {
                reason: "destination exists".to_string(),
            },
            Duration::ZERO,
        );
        assert!(skipped.success());
        assert_eq!(skipped.exit_code(), None);
        assert_eq!(skipped.log_level(), "INFO");
    }

    #[test]
    fn test_log_message_names_both_files() {
        let result = ConversionResult::new(job(), JobOutcome::Converted, Duration::from_secs(2));
        let line = result.log_message();
        assert!(line.contains("clip.mp4"));
        assert!(line.contains("clip.apng"));
        assert!(line.contains("exit 0"));

        let timed_out = ConversionResult::new(
            job(),
            JobOutcome::TimedOut { limit_secs: 600 },
            Duration::from_secs(600),
        );
        assert_eq!(timed_out.log_level(), "ERROR");
        assert!(timed_out.log_message().contains("after 600s"));
    }
}
