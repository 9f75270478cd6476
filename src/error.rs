//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `ConvertError` enum per categorizzare gli errori fatali
//! - Fornisce messaggi di errore descrittivi e strutturati
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (file non trovati, permessi, etc.)
//! - `InputDirectory`: Directory sorgente mancante o non leggibile
//! - `OutputDirectory`: Directory di output non creabile
//! - `MissingDependency`: Tool esterno mancante (ffmpeg)
//! - `Encoder`: Errore nell'invocazione dell'encoder esterno
//! - `Validation`: Errori di validazione della configurazione
//!
//! I fallimenti dei singoli job NON passano da qui: vengono catturati in
//! `JobOutcome` e il batch continua con i file successivi.

/// Custom error types for batch conversion
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input directory error: {0}")]
    InputDirectory(String),

    #[error("Output directory error: {0}")]
    OutputDirectory(String),

    #[error("Dependency missing: {0}")]
    MissingDependency(String),

    #[error("Encoder error: {0}")]
    Encoder(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}
