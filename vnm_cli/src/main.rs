mod export;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use lib_vnm::{DecodeError, VnmReader};
use log::{error, info, warn, LevelFilter};
use thiserror::Error;

use crate::export::ExportError;

#[derive(Parser)]
#[command(name = "vnm", version, about = "Viacom New Media Graphics File Exporter")]
struct Cli {
    /// Log more (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the file's size, color and image counts, or one image's details
    Info {
        /// The image number to inspect (1-based)
        #[arg(long)]
        image: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        input: PathBuf,
    },
    /// Write every image, or just one, as img-NNN.png
    Extract {
        /// The image number to extract (1-based)
        #[arg(long)]
        image: Option<usize>,

        /// Write 8-bit indexed PNGs with the file palette instead of RGBA
        #[arg(long)]
        indexed: bool,

        input: PathBuf,
        output_dir: PathBuf,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("could not export image: {0}")]
    Export(#[from] ExportError),

    #[error("could not format JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{failed} of {total} images could not be extracted")]
    Incomplete { failed: usize, total: usize },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    lib_vnm::init_logging(level);

    let result = match cli.command {
        Commands::Info { image, json, input } => info(&input, image, json),
        Commands::Extract {
            image,
            indexed,
            input,
            output_dir,
        } => extract(&input, image, &output_dir, indexed),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                error!("  caused by: {}", cause);
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}

fn info(input: &Path, image: Option<usize>, json: bool) -> Result<(), CliError> {
    let mut reader = VnmReader::open(input)?;

    if let Some(number) = image {
        let summary = reader.image_summary(number)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!(
                "Type: {}\nWidth: {}px\nHeight: {}px",
                summary.kind, summary.width, summary.height
            );
        }
        return Ok(());
    }

    let summary = reader.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Size: {}\nColors: {}\nImages: {}",
            summary.size, summary.palette_colors, summary.images
        );
    }
    Ok(())
}

fn extract(
    input: &Path,
    image: Option<usize>,
    output_dir: &Path,
    indexed: bool,
) -> Result<(), CliError> {
    let mut reader = VnmReader::open(input)?;

    if let Some(number) = image {
        let image = reader.decode_one(number)?;
        let path = export::save_image(&image, output_dir, indexed)?;
        info!("Wrote {}", path.display());
        return Ok(());
    }

    let file = reader.decode_all()?;
    let total = file.images.len();
    let mut failed = 0;
    for image in &file.images {
        let image = match image {
            Ok(image) => image,
            Err(err) => {
                warn!("{}", err);
                failed += 1;
                continue;
            }
        };
        match export::save_image(image, output_dir, indexed) {
            Ok(path) => info!("Wrote {}", path.display()),
            Err(err) => {
                warn!("could not export image #{}: {}", image.number, err);
                failed += 1;
            }
        }
    }

    info!("Extracted {} of {} images", total - failed, total);
    if failed > 0 {
        return Err(CliError::Incomplete { failed, total });
    }
    Ok(())
}
