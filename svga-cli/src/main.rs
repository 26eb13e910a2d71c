//! png2svga CLI Tool
//!
//! Command-line interface for converting PNG frame sequences to SVGA 2.0
//! animations and inspecting the result.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use svga_core::DocumentSummary;
use svga_encoder::{EncodeMode, EncodeReport, EncoderConfig};
use tracing::Level;

#[derive(Parser)]
#[command(name = "png2svga")]
#[command(about = "Convert numbered PNG frame sequences to SVGA 2.0 animations")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a directory of PNG frames to SVGA
    Encode {
        /// Directory containing the PNG frames
        #[arg(short, long, default_value = "assets")]
        input: PathBuf,

        /// Output SVGA file path
        #[arg(short, long, default_value = "animation.svga")]
        output: PathBuf,

        /// Frame rate, snapped to the nearest rate SVGA players accept
        #[arg(short, long, default_value = "30", allow_negative_numbers = true)]
        fps: i64,

        /// single: one image on every frame (smallest file), multi: flipbook of up to --max-frames images
        #[arg(short, long, value_enum, default_value = "single")]
        mode: Mode,

        /// Maximum number of distinct images in multi mode
        #[arg(long, default_value = "10")]
        max_frames: usize,

        /// Worker threads for re-encoding in multi mode (0 = one per CPU)
        #[arg(long, default_value = "1")]
        threads: usize,
    },

    /// Show information about an SVGA file
    Inspect {
        /// Input SVGA file path
        input: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Single,
    Multi,
}

impl From<Mode> for EncodeMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Single => EncodeMode::Single,
            Mode::Multi => EncodeMode::Multi,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Encode {
            input,
            output,
            fps,
            mode,
            max_frames,
            threads,
        } => {
            let config = EncoderConfig {
                fps,
                mode: mode.into(),
                max_frames,
                threads,
            };
            encode_frames(input, output, config)?
        }

        Commands::Inspect { input, json } => inspect_file(input, json)?,
    }

    Ok(())
}

fn encode_frames(input: PathBuf, output: PathBuf, config: EncoderConfig) -> Result<()> {
    println!("Encoding PNG sequence: {}", input.display());
    println!("Output: {}", output.display());
    match config.mode {
        EncodeMode::Single => println!("Mode: single (smallest file)"),
        EncodeMode::Multi => println!("Mode: multi (up to {} frames)", config.max_frames),
    }

    let report = svga_encoder::convert_directory(&input, &output, &config)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    print_report(&report);

    // Read the file back to make sure it is a valid SVGA container
    let written = std::fs::read(&output).context("Failed to read back output file")?;
    if written.is_empty() {
        bail!("Output file {} is empty", output.display());
    }
    let doc = svga_core::decode(&written).context("Output file is not a valid SVGA file")?;
    println!(
        "Verified: {} images, {} sprites, {} frames",
        doc.images.len(),
        doc.sprites.len(),
        doc.params.frame_count
    );

    Ok(())
}

fn print_report(report: &EncodeReport) {
    println!(
        "Found {} frames, size: {}x{}",
        report.source_frames, report.width, report.height
    );
    println!(
        "Encoded {} frames ({} images) at {} fps",
        report.encoded_frames, report.images, report.fps
    );
    println!(
        "File size: {} bytes ({:.2} MB)",
        report.output_size,
        report.output_size as f64 / 1024.0 / 1024.0
    );
    println!(
        "Original size: {:.2} MB",
        report.original_size as f64 / 1024.0 / 1024.0
    );
    println!("Compression: {:.1}%", report.compression_ratio());
    println!("Successfully encoded to {}", report.output_path.display());
}

fn inspect_file(input: PathBuf, json: bool) -> Result<()> {
    let data = std::fs::read(&input).context("Failed to open SVGA file")?;
    let doc = svga_core::decode(&data).context("Failed to read SVGA container")?;
    let summary = doc.summary();

    if json {
        println!("{}", summary.to_json().context("Failed to serialize summary")?);
        return Ok(());
    }

    print_info(&input, data.len(), &summary);

    println!("\n=== Images ===");
    for (key, image) in &doc.images {
        println!("  {}: {} bytes", key, image.len());
    }

    println!("\n=== Sprites (first 10) ===");
    for (i, sprite) in doc.sprites.iter().take(10).enumerate() {
        println!(
            "  [{}] {} visible at {:?}",
            i,
            sprite.image_key,
            sprite.visible_positions()
        );
    }
    if doc.sprites.len() > 10 {
        println!("  ... and {} more sprites", doc.sprites.len() - 10);
    }

    Ok(())
}

fn print_info(input: &std::path::Path, file_size: usize, summary: &DocumentSummary) {
    println!("\n=== SVGA File Information ===");
    println!("File: {} ({} bytes)", input.display(), file_size);
    println!("Version: {}", summary.version);
    println!(
        "View box: {}x{}",
        summary.view_box_width, summary.view_box_height
    );
    println!("Frame rate: {} fps", summary.fps);
    println!(
        "Frames: {} ({:.2} seconds)",
        summary.frame_count,
        summary.duration_ms as f64 / 1000.0
    );
    println!(
        "Images: {} ({:.2} KB)",
        summary.image_count,
        summary.image_bytes as f64 / 1024.0
    );
    println!("Sprites: {}", summary.sprite_count);
    println!("Visible entries: {}", summary.visible_entries);
}
