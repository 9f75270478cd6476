//! # Converter Module
//!
//! Modulo batch che separa le responsabilità in sottomoduli:
//! - `batch_converter`: Orchestratore principale
//! - `job_runner`: Worker per singoli job
//! - `progress_tracker`: Gestione progress unificata
//! - `path_resolver`: Derivazione dei nomi di destinazione e collision detection

pub mod batch_converter;
pub mod job_runner;
pub mod progress_tracker;
pub mod path_resolver;

// Re-export delle struct principali
pub use batch_converter::{BatchConverter, BatchReport};
pub use job_runner::JobRunner;
pub use path_resolver::{CollisionWarning, PathResolver};
pub use progress_tracker::ProgressTracker;
