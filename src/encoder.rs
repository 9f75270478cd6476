//! # Encoder Module
//!
//! Questo modulo gestisce l'invocazione dell'encoder esterno.
//!
//! ## Responsabilità:
//! - Definisce il trait `Encoder`, l'unica superficie con cui il driver
//!   parla con il tool esterno (testabile con un'implementazione fake)
//! - `FfmpegEncoder`: implementazione reale via subprocess FFmpeg
//! - Costruzione deterministica della command line di conversione
//! - Analisi best-effort del sorgente con ffprobe (`VideoInfo`)
//! - Verifica disponibilità del binario nel PATH
//!
//! ## Command line generata:
//! ```text
//! ffmpeg -i input.mp4 -vf "fps=15,scale=320:-1:flags=lanczos" -plays 0 -f apng -y output.apng
//! ```
//! - `fps=15`: frame rate dell'animazione
//! - `scale=320:-1`: larghezza 320px, altezza automatica (omesso con width 0)
//! - `flags=lanczos`: algoritmo di scaling lanczos (buona qualità)
//! - `-plays 0`: loop infinito (N = riproduci N volte)
//! - `-f apng -y`: formato APNG, sovrascrivi senza chiedere
//!
//! Il driver dipende solo dall'exit code e dalla presenza del file di
//! destinazione: non ispeziona il comportamento interno dell'encoder.

use crate::config::ConversionOptions;
use crate::error::ConvertError;
use crate::job::ConversionJob;
use crate::platform::PlatformCommands;
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, warn};

/// What the encoder subprocess reported back
#[derive(Debug, Clone)]
pub struct EncodeOutcome {
    /// Exit code, None when the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Captured stderr, for diagnostics
    pub stderr: String,
}

impl EncodeOutcome {
    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Narrow capability interface over the external encoder.
///
/// The batch driver only ever calls this trait, so tests can substitute a
/// fake implementation and never spawn a real subprocess.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Run one conversion to completion and report the exit status.
    /// An `Err` means the subprocess could not be run at all.
    async fn encode(&self, job: &ConversionJob) -> Result<EncodeOutcome>;

    /// Best-effort inspection of a source file. `None` when no probing
    /// backend is available; never fails a job.
    async fn probe(&self, _source: &Path) -> Result<Option<VideoInfo>> {
        Ok(None)
    }

    /// Whether the encoder binary can be invoked at all
    async fn is_available(&self) -> bool;
}

/// Real encoder backed by the `ffmpeg` command line tool
#[derive(Debug, Default)]
pub struct FfmpegEncoder;

impl FfmpegEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Build the `-vf` filter chain for the given options.
    /// Width 0 keeps the source size, so the scale clause is omitted.
    pub fn filter_spec(options: &ConversionOptions) -> String {
        if options.scale_width == 0 {
            format!("fps={}", options.frame_rate)
        } else {
            format!(
                "fps={},scale={}:-1:flags=lanczos",
                options.frame_rate, options.scale_width
            )
        }
    }

    /// Build the full ffmpeg argument list for a job
    pub fn build_args(job: &ConversionJob) -> Vec<String> {
        vec![
            "-i".to_string(),
            job.source_path.to_string_lossy().to_string(),
            "-vf".to_string(),
            Self::filter_spec(&job.options),
            "-plays".to_string(),
            job.options.loop_count.to_string(),
            "-f".to_string(),
            "apng".to_string(),
            "-y".to_string(),
            job.destination_path.to_string_lossy().to_string(),
        ]
    }
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    async fn encode(&self, job: &ConversionJob) -> Result<EncodeOutcome> {
        let platform = PlatformCommands::instance();
        let ffmpeg_cmd = platform.get_command("ffmpeg");
        let args = Self::build_args(job);

        debug!("Executing command: {} {}", ffmpeg_cmd, args.join(" "));

        let mut cmd = tokio::process::Command::new(ffmpeg_cmd);
        cmd.args(&args);
        // A timed-out job drops this future; the child must not outlive it
        cmd.kill_on_drop(true);

        let output = cmd.output().await.map_err(|e| -> anyhow::Error {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConvertError::MissingDependency(format!("{} not found in PATH", ffmpeg_cmd)).into()
            } else {
                ConvertError::Encoder(format!("failed to execute {}: {}", ffmpeg_cmd, e)).into()
            }
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if output.status.success() {
            // ffmpeg logs its progress to stderr even on success
            debug!("ffmpeg stderr for {}:\n{}", job.source_name(), stderr);
        }

        Ok(EncodeOutcome {
            exit_code: output.status.code(),
            stderr,
        })
    }

    async fn probe(&self, source: &Path) -> Result<Option<VideoInfo>> {
        let platform = PlatformCommands::instance();

        if !platform.is_command_available("ffprobe").await {
            debug!("ffprobe not available, skipping input probe");
            return Ok(None);
        }

        let output = tokio::process::Command::new(platform.get_command("ffprobe"))
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(source)
            .output()
            .await
            .map_err(|e| ConvertError::Encoder(format!("failed to execute ffprobe: {}", e)))?;

        if !output.status.success() {
            warn!(
                "ffprobe failed for {}: {}",
                source.display(),
                String::from_utf8_lossy(&output.stderr)
            );
            return Ok(None);
        }

        let info_str = String::from_utf8_lossy(&output.stdout);
        let info: serde_json::Value = serde_json::from_str(&info_str)?;

        let duration = info["format"]["duration"]
            .as_str()
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(0.0);

        // Find video stream
        let empty_vec = vec![];
        let streams = info["streams"].as_array().unwrap_or(&empty_vec);
        let video_stream = streams
            .iter()
            .find(|s| s["codec_type"] == "video")
            .unwrap_or(&serde_json::Value::Null);

        let width = video_stream["width"].as_u64().unwrap_or(0) as u32;
        let height = video_stream["height"].as_u64().unwrap_or(0) as u32;
        let codec = video_stream["codec_name"]
            .as_str()
            .unwrap_or("unknown")
            .to_string();

        Ok(Some(VideoInfo {
            duration,
            width,
            height,
            codec,
        }))
    }

    async fn is_available(&self) -> bool {
        PlatformCommands::instance()
            .is_command_available("ffmpeg")
            .await
    }
}

/// Source video information reported by ffprobe
#[derive(Debug, Clone)]
pub struct VideoInfo {
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub codec: String,
}

impl VideoInfo {
    /// Number of frames the output animation will roughly contain
    pub fn estimated_output_frames(&self, frame_rate: u32) -> u64 {
        (self.duration * frame_rate as f64).round() as u64
    }
}
