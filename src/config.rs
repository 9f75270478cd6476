//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `ConversionOptions` (parametri di encoding, globali per il run)
//! - Definisce la struct `Config` con tutti i parametri del batch
//! - Fornisce validazione robusta dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `frame_rate`: Frame rate dell'animazione in output (default: 15)
//! - `scale_width`: Larghezza in pixel dell'output, altezza auto (default: 320, 0 = nessun resize)
//! - `loop_count`: Numero di ripetizioni, 0 = loop infinito (default: 0)
//! - `collision_policy`: Comportamento quando la destinazione esiste già (default: overwrite)
//! - `workers`: Numero di conversioni parallele (default: 1 = sequenziale)
//! - `timeout_secs`: Timeout per singola conversione, 0 = disabilitato (default: 600)
//!
//! ## Validazione:
//! - Controlla che frame_rate sia 1-120
//! - Controlla che workers sia > 0
//! - scale_width e loop_count sono unsigned, quindi >= 0 per costruzione

use crate::error::ConvertError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Encoding options applied to every job in a run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversionOptions {
    /// Output animation frame rate
    pub frame_rate: u32,
    /// Output pixel width, height auto-scaled (0 = keep source size)
    pub scale_width: u32,
    /// Number of plays (0 = loop forever)
    pub loop_count: u32,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            frame_rate: 15,
            scale_width: 320,
            loop_count: 0,
        }
    }
}

/// What to do when a destination file already exists
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the existing file (the encoder runs with `-y`)
    Overwrite,
    /// Leave the existing file untouched and record the job as skipped
    Skip,
}

/// Configuration for a batch conversion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Encoding options (shared by every job)
    #[serde(flatten)]
    pub options: ConversionOptions,
    /// Behavior when a destination file already exists
    pub collision_policy: CollisionPolicy,
    /// Number of parallel conversions (1 = one subprocess at a time)
    pub workers: usize,
    /// Per-job timeout in seconds (0 = no timeout)
    pub timeout_secs: u64,
    /// Dry run - enumerate jobs without invoking the encoder
    pub dry_run: bool,
    /// Output progress and status as JSON for programmatic use
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            options: ConversionOptions::default(),
            collision_policy: CollisionPolicy::Overwrite,
            workers: 1,
            timeout_secs: 600,
            dry_run: false,
            json_output: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.options.frame_rate == 0 || self.options.frame_rate > 120 {
            return Err(ConvertError::Validation(
                "frame rate must be between 1 and 120".to_string(),
            )
            .into());
        }

        if self.workers == 0 {
            return Err(ConvertError::Validation(
                "number of workers must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }

    /// Load configuration from file
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.options.frame_rate = 0;
        assert!(config.validate().is_err());

        config.options.frame_rate = 121;
        assert!(config.validate().is_err());

        config.options.frame_rate = 15;
        config.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.options.frame_rate, 15);
        assert_eq!(config.options.scale_width, 320);
        assert_eq!(config.options.loop_count, 0);
        assert_eq!(config.collision_policy, CollisionPolicy::Overwrite);
        assert_eq!(config.workers, 1);
        assert_eq!(config.timeout_secs, 600);
        assert!(!config.dry_run);
        assert!(!config.json_output);
    }

    #[tokio::test]
    async fn test_config_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let original_config = Config {
            options: ConversionOptions {
                frame_rate: 24,
                scale_width: 640,
                loop_count: 3,
            },
            collision_policy: CollisionPolicy::Skip,
            workers: 4,
            timeout_secs: 120,
            dry_run: true,
            json_output: false,
        };

        // Save config
        original_config.save_to_file(&config_path).await.unwrap();

        // Load config
        let loaded_config = Config::from_file(&config_path).await.unwrap();

        assert_eq!(loaded_config.options.frame_rate, 24);
        assert_eq!(loaded_config.options.scale_width, 640);
        assert_eq!(loaded_config.options.loop_count, 3);
        assert_eq!(loaded_config.collision_policy, CollisionPolicy::Skip);
        assert_eq!(loaded_config.workers, 4);
        assert_eq!(loaded_config.timeout_secs, 120);
        assert!(loaded_config.dry_run);
    }

    #[tokio::test]
    async fn test_config_missing_file_falls_back_to_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::from_file(&temp_dir.path().join("nope.json"))
            .await
            .unwrap();
        assert_eq!(config.options.frame_rate, 15);
    }
}
