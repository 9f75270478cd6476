//! # MP4 to APNG Converter Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom per le diverse operazioni
//! - `job`: Unità di lavoro (ConversionJob) e risultati (ConversionResult)
//! - `file_manager`: Discovery dei file MP4 sorgente
//! - `encoder`: Interfaccia Encoder e implementazione FFmpeg
//! - `log_sink`: Log persistente append-only delle conversioni
//! - `converter`: Orchestratore principale del processo batch
//! - `progress`: Progress tracking e statistiche

pub mod config;
pub mod error;
pub mod job;
pub mod file_manager;
pub mod encoder;
pub mod log_sink;
pub mod platform;
pub mod progress;
pub mod converter;
pub mod json_output;

pub use config::{CollisionPolicy, Config, ConversionOptions};
pub use converter::{BatchConverter, BatchReport};
pub use encoder::{EncodeOutcome, Encoder, FfmpegEncoder, VideoInfo};
pub use error::ConvertError;
pub use job::{ConversionJob, ConversionResult, JobOutcome};
pub use log_sink::{FileLogSink, LogSink, MemoryLogSink};
