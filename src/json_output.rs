//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per uso programmatico.
//!
//! ## Responsabilità:
//! - Emette messaggi JSON strutturati per gli eventi del batch
//! - Fornisce un'interfaccia standardizzata per pilotare il converter
//!   da un altro processo (`--json`)
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio del batch
//! - `file_start`: Inizio conversione di un file
//! - `file_complete`: Fine conversione di un file (esito e exit code)
//! - `complete`: Fine batch con statistiche finali
//! - `error`: Errore fatale

use crate::config::{CollisionPolicy, Config};
use crate::job::{ConversionResult, JobOutcome};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsonMessage {
    /// Inizio del batch
    #[serde(rename = "start")]
    Start {
        input_dir: PathBuf,
        output_dir: PathBuf,
        total_files: usize,
        config: JsonConfig,
    },

    /// Inizio conversione di un file specifico
    #[serde(rename = "file_start")]
    FileStart {
        source: PathBuf,
        destination: PathBuf,
        index: usize,
        total: usize,
    },

    /// Fine conversione di un file specifico
    #[serde(rename = "file_complete")]
    FileComplete {
        source: PathBuf,
        destination: PathBuf,
        outcome: String,
        exit_code: Option<i32>,
        duration_seconds: f64,
        error: Option<String>,
    },

    /// Batch completato
    #[serde(rename = "complete")]
    Complete {
        jobs_run: usize,
        converted: usize,
        skipped: usize,
        failed: usize,
        duration_seconds: f64,
    },

    /// Errore fatale
    #[serde(rename = "error")]
    Error {
        message: String,
        details: Option<String>,
    },
}

/// Configurazione riportata nel messaggio di start
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonConfig {
    pub frame_rate: u32,
    pub scale_width: u32,
    pub loop_count: u32,
    pub collision_policy: CollisionPolicy,
    pub workers: usize,
    pub dry_run: bool,
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    /// Crea un messaggio di inizio batch
    pub fn start(
        input_dir: PathBuf,
        output_dir: PathBuf,
        total_files: usize,
        config: JsonConfig,
    ) -> Self {
        Self::Start {
            input_dir,
            output_dir,
            total_files,
            config,
        }
    }

    /// Crea un messaggio di inizio file
    pub fn file_start(source: PathBuf, destination: PathBuf, index: usize, total: usize) -> Self {
        Self::FileStart {
            source,
            destination,
            index,
            total,
        }
    }

    /// Crea un messaggio di completamento file da un risultato
    pub fn file_complete(result: &ConversionResult) -> Self {
        let (outcome, error) = match &result.outcome {
            JobOutcome::Converted => ("converted", None),
            JobOutcome::Skipped { reason } => ("skipped", Some(reason.clone())),
            JobOutcome::Failed { message, .. } => ("failed", Some(message.clone())),
            JobOutcome::TimedOut { limit_secs } => (
                "timed_out",
                Some(format!("timed out after {}s", limit_secs)),
            ),
        };

        Self::FileComplete {
            source: result.job.source_path.clone(),
            destination: result.job.destination_path.clone(),
            outcome: outcome.to_string(),
            exit_code: result.exit_code(),
            duration_seconds: result.duration.as_secs_f64(),
            error,
        }
    }

    /// Crea un messaggio di completamento batch
    pub fn complete(
        jobs_run: usize,
        converted: usize,
        skipped: usize,
        failed: usize,
        duration_seconds: f64,
    ) -> Self {
        Self::Complete {
            jobs_run,
            converted,
            skipped,
            failed,
            duration_seconds,
        }
    }

    /// Crea un messaggio di errore
    pub fn error(message: String, details: Option<String>) -> Self {
        Self::Error { message, details }
    }
}

/// Converti la Config del run in JsonConfig
impl From<&Config> for JsonConfig {
    fn from(config: &Config) -> Self {
        Self {
            frame_rate: config.options.frame_rate,
            scale_width: config.options.scale_width,
            loop_count: config.options.loop_count,
            collision_policy: config.collision_policy,
            workers: config.workers,
            dry_run: config.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConversionOptions;
    use crate::job::ConversionJob;
    use std::time::Duration;

    #[test]
    fn test_file_complete_serializes_outcome_and_exit_code() {
        let job = ConversionJob::new(
            0,
            PathBuf::from("a.mp4"),
            PathBuf::from("a.apng"),
            ConversionOptions::default(),
        );
        let result = ConversionResult::new(
            job,
            JobOutcome::Failed {
                exit_code: Some(1),
                message: "bad input".to_string(),
            },
            Duration::from_millis(310),
        );

        let message = JsonMessage::file_complete(&result);
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains("\"type\":\"file_complete\""));
        assert!(json.contains("\"outcome\":\"failed\""));
        assert!(json.contains("\"exit_code\":1"));
        assert!(json.contains("bad input"));
    }

    #[test]
    fn test_json_config_mirrors_run_config() {
        let config = Config::default();
        let json_config = JsonConfig::from(&config);
        assert_eq!(json_config.frame_rate, 15);
        assert_eq!(json_config.scale_width, 320);
        assert_eq!(json_config.workers, 1);
    }
}
