//! # Conversion Log Module
//!
//! Questo modulo gestisce il log persistente delle conversioni.
//!
//! ## Responsabilità:
//! - Definisce il trait `LogSink`: una capability di append costruita dal
//!   chiamante e passata al driver (niente handle globale di processo)
//! - `FileLogSink`: log su file append-only, una riga per evento
//! - `MemoryLogSink`: sink in memoria condivisibile, usato nei test
//!
//! ## Formato delle righe:
//! ```text
//! 2026-08-08 14:03:21 - INFO - converted clip.mp4 -> clip.apng (exit 0, 1.84s)
//! 2026-08-08 14:03:22 - ERROR - failed bad.mp4 -> bad.apng (exit 1, 0.31s)
//! ```
//!
//! Il file non viene mai troncato: ogni run aggiunge il proprio blocco di
//! righe in coda, così la storia delle conversioni resta consultabile.

use anyhow::Result;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Render a log entry with the timestamp prefix
pub fn format_entry(level: &str, message: &str) -> String {
    format!(
        "{} - {} - {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        level,
        message
    )
}

/// Append-only destination for conversion log entries
pub trait LogSink: Send {
    /// Append one entry. Entries arrive in job submission order.
    fn append(&mut self, line: &str) -> Result<()>;
}

/// Log sink backed by an append-only file
pub struct FileLogSink {
    path: PathBuf,
    file: File,
}

impl FileLogSink {
    /// Open the log file for appending, creating it if missing
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileLogSink {
    fn append(&mut self, line: &str) -> Result<()> {
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        Ok(())
    }
}

/// In-memory log sink, cloneable so tests can inspect what the driver wrote
#[derive(Clone, Default)]
pub struct MemoryLogSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|l| l.clone())
            .unwrap_or_default()
    }
}

impl LogSink for MemoryLogSink {
    fn append(&mut self, line: &str) -> Result<()> {
        self.lines
            .lock()
            .map_err(|_| anyhow::anyhow!("log sink mutex poisoned"))?
            .push(line.to_string());
        Ok(())
    }
}
