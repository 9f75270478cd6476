//! # Path Resolution Module
//!
//! Centralizza la derivazione dei nomi di destinazione e la rilevazione
//! delle collisioni tra job dello stesso run.

use crate::config::ConversionOptions;
use crate::job::ConversionJob;
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Extension of every produced file
const OUTPUT_EXTENSION: &str = "apng";

/// Utility per calcolare i path di destinazione in modo centralizzato
pub struct PathResolver;

impl PathResolver {
    /// Destination path for a source: same base name, extension replaced,
    /// placed flat inside the output directory.
    pub fn destination_for(source: &Path, output_dir: &Path) -> Result<PathBuf> {
        let file_stem = source
            .file_stem()
            .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", source.display()))?
            .to_string_lossy();

        Ok(output_dir.join(format!("{}.{}", file_stem, OUTPUT_EXTENSION)))
    }

    /// Build one job per discovered source, in discovery order
    pub fn plan_jobs(
        sources: &[PathBuf],
        output_dir: &Path,
        options: ConversionOptions,
    ) -> Result<Vec<ConversionJob>> {
        sources
            .iter()
            .enumerate()
            .map(|(index, source)| {
                let destination = Self::destination_for(source, output_dir)?;
                Ok(ConversionJob::new(
                    index,
                    source.clone(),
                    destination,
                    options,
                ))
            })
            .collect()
    }

    /// Find groups of jobs whose destinations collide. Comparison is
    /// case-insensitive: `a.mp4` and `A.mp4` both map to `a.apng` on a
    /// case-insensitive filesystem, and that data loss must never go
    /// unexplained.
    pub fn detect_collisions(jobs: &[ConversionJob]) -> Vec<CollisionWarning> {
        let mut by_destination: BTreeMap<String, Vec<&ConversionJob>> = BTreeMap::new();

        for job in jobs {
            let key = job.destination_name().to_lowercase();
            by_destination.entry(key).or_default().push(job);
        }

        by_destination
            .into_values()
            .filter(|group| group.len() > 1)
            .map(|group| CollisionWarning {
                destination: group[0].destination_name(),
                sources: group.iter().map(|j| j.source_path.clone()).collect(),
            })
            .collect()
    }
}

/// Two or more inputs resolved to the same destination name
#[derive(Debug, Clone)]
pub struct CollisionWarning {
    pub destination: String,
    pub sources: Vec<PathBuf>,
}

impl CollisionWarning {
    /// One-line description for the persistent conversion log
    pub fn log_message(&self) -> String {
        let sources: Vec<String> = self
            .sources
            .iter()
            .map(|p| {
                p.file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string()
            })
            .collect();

        format!(
            "destination collision: \"{}\" produced by {}",
            self.destination,
            sources.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_replaces_extension() {
        let destination =
            PathResolver::destination_for(Path::new("/in/holiday clip.mp4"), Path::new("/out"))
                .unwrap();
        assert_eq!(destination, PathBuf::from("/out/holiday clip.apng"));
    }

    #[test]
    fn test_plan_jobs_preserves_order_and_options() {
        let sources = vec![PathBuf::from("/in/a.mp4"), PathBuf::from("/in/b.mp4")];
        let options = ConversionOptions {
            frame_rate: 24,
            scale_width: 640,
            loop_count: 1,
        };

        let jobs = PathResolver::plan_jobs(&sources, Path::new("/out"), options).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].index, 0);
        assert_eq!(jobs[1].index, 1);
        assert_eq!(jobs[0].destination_path, PathBuf::from("/out/a.apng"));
        assert_eq!(jobs[1].options.frame_rate, 24);
    }

    #[test]
    fn test_detect_collisions_is_case_insensitive() {
        let sources = vec![
            PathBuf::from("/in/A.mp4"),
            PathBuf::from("/in/a.mp4"),
            PathBuf::from("/in/b.mp4"),
        ];
        let jobs =
            PathResolver::plan_jobs(&sources, Path::new("/out"), ConversionOptions::default())
                .unwrap();

        let warnings = PathResolver::detect_collisions(&jobs);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].sources.len(), 2);

        let message = warnings[0].log_message();
        assert!(message.contains("A.mp4"));
        assert!(message.contains("a.mp4"));
        assert!(!message.contains("b.mp4"));
    }

    #[test]
    fn test_no_collisions_for_distinct_names() {
        let sources = vec![PathBuf::from("/in/a.mp4"), PathBuf::from("/in/b.mp4")];
        let jobs =
            PathResolver::plan_jobs(&sources, Path::new("/out"), ConversionOptions::default())
                .unwrap();
        assert!(PathResolver::detect_collisions(&jobs).is_empty());
    }
}
