//! # Job Runner Module
//!
//! Worker per l'esecuzione di un singolo ConversionJob.
//! Separato dall'orchestratore principale per maggiore modularità.
//!
//! Un job non ritorna mai `Err`: ogni modalità di fallimento (exit code
//! non-zero, timeout, binario scomparso, output mancante) viene catturata
//! nel `ConversionResult` e il batch prosegue.

use crate::{
    config::{CollisionPolicy, Config},
    encoder::Encoder,
    job::{ConversionJob, ConversionResult, JobOutcome},
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Worker per l'elaborazione di un singolo job
pub struct JobRunner {
    config: Config,
    encoder: Arc<dyn Encoder>,
}

impl JobRunner {
    pub fn new(config: Config, encoder: Arc<dyn Encoder>) -> Self {
        Self { config, encoder }
    }

    /// Run one job to completion and capture its outcome
    pub async fn run(&self, job: ConversionJob) -> ConversionResult {
        let started = Instant::now();

        if self.config.collision_policy == CollisionPolicy::Skip && job.destination_path.exists() {
            debug!(
                "Skipping {}, destination already exists: {}",
                job.source_name(),
                job.destination_path.display()
            );
            return ConversionResult::new(
                job,
                JobOutcome::Skipped {
                    reason: "destination exists".to_string(),
                },
                started.elapsed(),
            );
        }

        self.probe_source(&job).await;

        let outcome = self.encode(&job).await;
        ConversionResult::new(job, outcome, started.elapsed())
    }

    async fn encode(&self, job: &ConversionJob) -> JobOutcome {
        let encode_future = self.encoder.encode(job);

        let encode_result = if self.config.timeout_secs > 0 {
            match tokio::time::timeout(
                Duration::from_secs(self.config.timeout_secs),
                encode_future,
            )
            .await
            {
                Ok(result) => result,
                Err(_) => {
                    error!(
                        "Encoder timed out after {}s for {}",
                        self.config.timeout_secs,
                        job.source_name()
                    );
                    return JobOutcome::TimedOut {
                        limit_secs: self.config.timeout_secs,
                    };
                }
            }
        } else {
            encode_future.await
        };

        match encode_result {
            Ok(outcome) if outcome.is_success() => {
                if job.destination_path.exists() {
                    JobOutcome::Converted
                } else {
                    error!(
                        "Encoder reported success for {} but produced no output file",
                        job.source_name()
                    );
                    JobOutcome::Failed {
                        exit_code: Some(0),
                        message: "encoder reported success but produced no output file"
                            .to_string(),
                    }
                }
            }
            Ok(outcome) => {
                error!(
                    "Encoder exited with status {:?} for {}:\n{}",
                    outcome.exit_code,
                    job.source_name(),
                    outcome.stderr
                );
                // The interesting ffmpeg diagnostic is the last stderr line
                let message = outcome
                    .stderr
                    .lines()
                    .rev()
                    .find(|l| !l.trim().is_empty())
                    .unwrap_or("")
                    .trim()
                    .to_string();
                JobOutcome::Failed {
                    exit_code: outcome.exit_code,
                    message,
                }
            }
            Err(e) => {
                error!("Failed to invoke encoder for {}: {}", job.source_name(), e);
                JobOutcome::Failed {
                    exit_code: None,
                    message: e.to_string(),
                }
            }
        }
    }

    /// Best-effort source inspection for diagnostics. Never fails the job.
    async fn probe_source(&self, job: &ConversionJob) {
        match self.encoder.probe(&job.source_path).await {
            Ok(Some(info)) => {
                debug!(
                    "{}: {}x{} {} {:.2}s, ~{} output frames",
                    job.source_name(),
                    info.width,
                    info.height,
                    info.codec,
                    info.duration,
                    info.estimated_output_frames(job.options.frame_rate)
                );
                if info.width > 0 && job.options.scale_width > info.width {
                    warn!(
                        "{}: scale width {} exceeds source width {}, output will be upscaled",
                        job.source_name(),
                        job.options.scale_width,
                        info.width
                    );
                }
            }
            Ok(None) => {}
            Err(e) => debug!("Probe failed for {}: {}", job.source_name(), e),
        }
    }
}
