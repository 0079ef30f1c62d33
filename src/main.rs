use clap::Parser;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

use docscan::io::output_path_for;
use docscan::{DebugDirObserver, InteractiveObserver, ScanConfig, ScanPipeline};

#[derive(Parser)]
#[command(name = "docscan")]
#[command(about = "Flatten a photographed document into a black-and-white scan")]
struct Cli {
    /// Path to the image to be scanned
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Where to write the scan (default: <IMAGE stem>_transformed.jpg in the current directory)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// JSON file with scan settings; missing fields keep their defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show each step and wait for Enter before continuing (off by default; previews are
    /// written as PNG files under the system temp directory)
    #[arg(long)]
    show_steps: bool,

    /// Save intermediate images to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Number of largest contours tried as the document outline
    #[arg(long, value_name = "N")]
    max_candidates: Option<usize>,

    /// Height of the downsampled copy used for detection
    #[arg(long, value_name = "PIXELS")]
    detection_height: Option<u32>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => ScanConfig::from_json_file(path)?,
        None => ScanConfig::default(),
    };
    if let Some(n) = args.max_candidates {
        config.max_candidates = n;
    }
    if let Some(h) = args.detection_height {
        config.detection_height = h;
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| output_path_for(&args.image_path, std::path::Path::new(".")));
    let preview_height = config.preview_height;

    let mut pipeline = ScanPipeline::new(config)?;
    if let Some(debug_dir) = args.debug_out {
        pipeline = pipeline.with_observer(Box::new(DebugDirObserver::new(debug_dir)?));
    }
    if args.show_steps {
        let preview_dir = std::env::temp_dir().join("docscan-preview");
        pipeline = pipeline.with_observer(Box::new(InteractiveObserver::stdio(
            preview_dir,
            preview_height,
        )));
    }

    match pipeline.run(&args.image_path, &output) {
        Ok(scan) => {
            println!(
                "Scanned {} -> {} ({}x{})",
                args.image_path.display(),
                output.display(),
                scan.binarized.width(),
                scan.binarized.height()
            );
            Ok(())
        }
        Err(failure) => {
            error!(stage = %failure.stage, reason = %failure.reason, "scan aborted");
            Err(failure.into())
        }
    }
}
