//! # File Management Module
//!
//! Questo modulo gestisce la discovery dei file sorgente.
//!
//! ## Responsabilità:
//! - Discovery dei file MP4 nella directory di input (solo primo livello)
//! - Determinazione formato file tramite estensione (case-insensitive)
//! - Formattazione human-readable delle dimensioni
//!
//! ## Ordinamento:
//! L'ordine di enumerazione di una directory dipende dal filesystem, quindi
//! la discovery ordina per nome file: il log registra i job in ordine di
//! sottomissione e l'ordine deve essere riproducibile tra run successivi.

use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions accepted as conversion input
const SOURCE_EXTENSIONS: &[&str] = &["mp4"];

/// Manages source file discovery
pub struct FileManager;

impl FileManager {
    /// Find all eligible source files directly inside `input_dir`, in
    /// deterministic file-name order. Zero matches is a valid empty result.
    pub fn find_video_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(input_dir)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if Self::is_video_source(path) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// Check if a file is an eligible conversion source
    pub fn is_video_source(path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            SOURCE_EXTENSIONS.contains(&ext_lower.as_str())
        } else {
            false
        }
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_is_video_source_case_insensitive() {
        assert!(FileManager::is_video_source(Path::new("a.mp4")));
        assert!(FileManager::is_video_source(Path::new("a.MP4")));
        assert!(FileManager::is_video_source(Path::new("a.Mp4")));
        assert!(!FileManager::is_video_source(Path::new("a.mov")));
        assert!(!FileManager::is_video_source(Path::new("a.apng")));
        assert!(!FileManager::is_video_source(Path::new("mp4")));
    }

    #[test]
    fn test_find_video_files_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();

        touch(dir, "zebra.mp4");
        touch(dir, "alpha.MP4");
        touch(dir, "notes.txt");
        touch(dir, "middle.mp4");

        // Files in subdirectories are not eligible, discovery is flat
        std::fs::create_dir(dir.join("nested")).unwrap();
        touch(&dir.join("nested"), "hidden.mp4");

        let files = FileManager::find_video_files(dir).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["alpha.MP4", "middle.mp4", "zebra.mp4"]);
    }

    #[test]
    fn test_find_video_files_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let files = FileManager::find_video_files(temp_dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(2048), "2.00 KB");
        assert_eq!(FileManager::format_size(5 * 1024 * 1024), "5.00 MB");
    }
}
