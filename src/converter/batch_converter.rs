//! # Batch Converter Main Orchestrator
//!
//! Orchestratore principale del batch: discovery, pianificazione dei job,
//! esecuzione con concorrenza limitata e logging in ordine di sottomissione.
//!
//! ## Semantica del run:
//! - Setup errors (directory, encoder mancante) falliscono PRIMA di
//!   qualsiasi job
//! - Un job fallito non interrompe i successivi (partial-failure)
//! - Il log persistente riceve esattamente una riga per job, nell'ordine
//!   di sottomissione, più gli avvisi di collisione prima dei risultati
//! - Con zero file eleggibili il run è un no-op valido e riuscito

use crate::{
    config::Config,
    converter::{job_runner::JobRunner, path_resolver::PathResolver, progress_tracker::ProgressTracker},
    encoder::Encoder,
    error::ConvertError,
    file_manager::FileManager,
    job::{ConversionJob, ConversionResult, JobOutcome},
    json_output::{JsonConfig, JsonMessage},
    log_sink::{format_entry, LogSink},
    progress::ConversionStats,
};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// Everything one run produced, in job submission order
#[derive(Debug)]
pub struct BatchReport {
    pub results: Vec<ConversionResult>,
    pub elapsed: Duration,
}

impl BatchReport {
    /// Aggregate counts over the results
    pub fn stats(&self) -> ConversionStats {
        let mut stats = ConversionStats::new();
        for result in &self.results {
            stats.record(result);
        }
        stats
    }

    pub fn has_failures(&self) -> bool {
        self.stats().has_failures()
    }
}

/// Orchestratore principale del batch
pub struct BatchConverter {
    config: Config,
    input_dir: PathBuf,
    output_dir: PathBuf,
    encoder: Arc<dyn Encoder>,
    log: Box<dyn LogSink>,
}

impl BatchConverter {
    /// Validate the setup and build a converter. Fails fast, before any
    /// job runs, on a bad input directory, an uncreatable output
    /// directory, or a missing encoder binary. The encoder check happens
    /// once here and is never repeated per job.
    pub async fn new(
        input_dir: &Path,
        output_dir: &Path,
        config: Config,
        encoder: Arc<dyn Encoder>,
        log: Box<dyn LogSink>,
    ) -> Result<Self> {
        config.validate()?;

        if !input_dir.is_dir() {
            return Err(ConvertError::InputDirectory(format!(
                "{} does not exist or is not a directory",
                input_dir.display()
            ))
            .into());
        }

        tokio::fs::create_dir_all(output_dir).await.map_err(|e| {
            ConvertError::OutputDirectory(format!(
                "failed to create {}: {}",
                output_dir.display(),
                e
            ))
        })?;

        if !encoder.is_available().await {
            return Err(ConvertError::MissingDependency(
                "ffmpeg not found in PATH, install it before converting".to_string(),
            )
            .into());
        }

        Ok(Self {
            config,
            input_dir: input_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            encoder,
            log,
        })
    }

    /// Esegue il batch: discovery, collision check, conversioni
    pub async fn run(&mut self) -> Result<BatchReport> {
        let started = Instant::now();

        let files = FileManager::find_video_files(&self.input_dir)?;
        self.emit_start(&files);

        if files.is_empty() {
            let message = format!("no MP4 files found in {}", self.input_dir.display());
            if !self.config.json_output {
                warn!("{}", message);
            }
            self.log.append(&format_entry("INFO", &message))?;

            let report = BatchReport {
                results: Vec::new(),
                elapsed: started.elapsed(),
            };
            self.emit_complete(&report.stats(), report.elapsed);
            return Ok(report);
        }

        let jobs = PathResolver::plan_jobs(&files, &self.output_dir, self.config.options)?;

        // Collision warnings are logged before any job result, so a later
        // overwrite is never unexplained
        for warning in PathResolver::detect_collisions(&jobs) {
            warn!("{}", warning.log_message());
            self.log
                .append(&format_entry("WARNING", &warning.log_message()))?;
        }

        let report = if self.config.dry_run {
            self.plan_only(jobs, started)?
        } else {
            self.execute(jobs, started).await?
        };

        self.emit_complete(&report.stats(), report.elapsed);
        Ok(report)
    }

    /// Dry run: record what would happen, invoke nothing
    fn plan_only(&mut self, jobs: Vec<ConversionJob>, started: Instant) -> Result<BatchReport> {
        let mut results = Vec::with_capacity(jobs.len());

        for job in jobs {
            let message = format!(
                "dry run: would convert {} -> {}",
                job.source_name(),
                job.destination_name()
            );
            if !self.config.json_output {
                info!("{}", message);
            }
            self.log.append(&format_entry("INFO", &message))?;

            results.push(ConversionResult::new(
                job,
                JobOutcome::Skipped {
                    reason: "dry run".to_string(),
                },
                Duration::ZERO,
            ));
        }

        Ok(BatchReport {
            results,
            elapsed: started.elapsed(),
        })
    }

    /// Run all jobs through a bounded worker pool. Handles are awaited in
    /// submission order, so results and log lines keep discovery order no
    /// matter which subprocess finishes first.
    async fn execute(&mut self, jobs: Vec<ConversionJob>, started: Instant) -> Result<BatchReport> {
        let total = jobs.len();
        let tracker = ProgressTracker::new(total, self.config.json_output);
        let semaphore = Arc::new(Semaphore::new(self.config.workers));

        let mut handles = Vec::with_capacity(total);
        for job in jobs {
            let permit = semaphore.clone().acquire_owned().await?;
            let runner = JobRunner::new(self.config.clone(), Arc::clone(&self.encoder));
            let json_output = self.config.json_output;

            handles.push(tokio::spawn(async move {
                let _permit = permit;

                if json_output {
                    JsonMessage::file_start(
                        job.source_path.clone(),
                        job.destination_path.clone(),
                        job.index,
                        total,
                    )
                    .emit();
                }

                runner.run(job).await
            }));
        }

        let mut results = Vec::with_capacity(total);
        for handle in handles {
            let result = handle.await?;
            self.log
                .append(&format_entry(result.log_level(), &result.log_message()))?;
            tracker.handle_job_completion(&self.config, &result).await;
            results.push(result);
        }

        let stats = tracker.stats().await;
        tracker.finish(&stats.format_summary());

        Ok(BatchReport {
            results,
            elapsed: started.elapsed(),
        })
    }

    /// Invia messaggio di inizio e logga la configurazione
    fn emit_start(&self, files: &[PathBuf]) {
        if self.config.json_output {
            JsonMessage::start(
                self.input_dir.clone(),
                self.output_dir.clone(),
                files.len(),
                JsonConfig::from(&self.config),
            )
            .emit();
            return;
        }

        info!("Starting batch conversion in: {}", self.input_dir.display());
        info!("Output directory: {}", self.output_dir.display());
        info!(
            "Options: {} fps, width {}, {} plays",
            self.config.options.frame_rate,
            self.config.options.scale_width,
            self.config.options.loop_count
        );
        info!(
            "Collision policy: {:?} | workers: {} | timeout: {}s",
            self.config.collision_policy, self.config.workers, self.config.timeout_secs
        );
        if self.config.dry_run {
            info!("Dry run mode: no conversions will be executed");
        }
        info!("Found {} MP4 file(s) to convert", files.len());
    }

    /// Stampa statistiche finali
    fn emit_complete(&self, stats: &ConversionStats, elapsed: Duration) {
        if self.config.json_output {
            JsonMessage::complete(
                stats.jobs_run,
                stats.converted,
                stats.skipped,
                stats.failed,
                elapsed.as_secs_f64(),
            )
            .emit();
            return;
        }

        info!("=== Conversion Complete ===");
        info!("Jobs run: {}", stats.jobs_run);
        info!("Converted: {}", stats.converted);
        info!("Skipped: {}", stats.skipped);
        info!("Failed: {}", stats.failed);
        info!("Total time: {:.2}s", elapsed.as_secs_f64());
    }
}
