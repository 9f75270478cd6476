//! # MP4 to APNG Converter - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Costruzione della configurazione (file di config + override da flag)
//! - Creazione di log sink ed encoder e avvio del batch converter
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (directory, fps, width, plays, etc.)
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose)
//! 3. Carica l'eventuale file di configurazione e applica gli override
//! 4. Istanzia BatchConverter e avvia il run
//! 5. Exit code 1 se almeno un job è fallito, 0 altrimenti
//!
//! ## Esempio di utilizzo:
//! ```bash
//! mp4-to-apng ./mp4 --output ./export --fps 15 --width 320 --plays 0
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use mp4_apng_converter::platform::PlatformCommands;
use mp4_apng_converter::{BatchConverter, CollisionPolicy, Config, FfmpegEncoder, FileLogSink};

#[derive(Parser)]
#[command(name = "mp4-to-apng")]
#[command(about = "Batch convert MP4 videos to looping animated PNGs with FFmpeg")]
struct Args {
    /// Directory containing the MP4 files to convert
    input_dir: PathBuf,

    /// Output directory for the APNG files
    #[arg(short, long, default_value = "export")]
    output: PathBuf,

    /// Output animation frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// Output pixel width, height auto-scaled (0 = keep source size)
    #[arg(long)]
    width: Option<u32>,

    /// Number of plays (0 = loop forever)
    #[arg(long)]
    plays: Option<u32>,

    /// Behavior when a destination file already exists
    #[arg(long, value_enum)]
    on_collision: Option<CollisionPolicy>,

    /// Number of parallel conversions
    #[arg(short, long)]
    workers: Option<usize>,

    /// Per-job timeout in seconds (0 = no timeout)
    #[arg(long)]
    timeout: Option<u64>,

    /// Conversion log file (appended, never truncated)
    #[arg(long, default_value = "conversion.log")]
    log_file: PathBuf,

    /// Load base configuration from a JSON file (flags still override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dry run - list the planned conversions without running the encoder
    #[arg(long)]
    dry_run: bool,

    /// Output progress and status as JSON for programmatic use
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Platform: {}", PlatformCommands::system_info());

    // Config file (when given) is the base, explicit flags win
    let mut config = match &args.config {
        Some(path) => Config::from_file(path).await?,
        None => Config::default(),
    };

    if let Some(fps) = args.fps {
        config.options.frame_rate = fps;
    }
    if let Some(width) = args.width {
        config.options.scale_width = width;
    }
    if let Some(plays) = args.plays {
        config.options.loop_count = plays;
    }
    if let Some(policy) = args.on_collision {
        config.collision_policy = policy;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    config.dry_run = config.dry_run || args.dry_run;
    config.json_output = config.json_output || args.json;
    config.validate()?;

    let log = Box::new(FileLogSink::create(&args.log_file)?);
    let encoder = Arc::new(FfmpegEncoder::new());

    let mut converter =
        BatchConverter::new(&args.input_dir, &args.output, config, encoder, log).await?;
    let report = converter.run().await?;

    if report.has_failures() {
        // Scripted callers detect partial failure from the exit status
        std::process::exit(1);
    }

    Ok(())
}
