use clap::{Parser, Subcommand};
use focalmill::geometry::OperationKind;
use focalmill::pipeline::{PipelineInput, UploadEdits, generate_variants};
use focalmill::raster::{ImageCrateBackend, RasterBackend};
use focalmill::{FocalPoint, config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "focalmill")]
#[command(about = "Generate image variants with fit-aware resizing and focal-point crops")]
#[command(long_about = "\
Generate image variants with fit-aware resizing and focal-point crops

Reads a source image and a JSON list of variant specs, decides per variant
whether to skip, resize, or focal-crop, and writes the results.

Variant config (see 'focalmill gen-config'):

  [
    { \"name\": \"thumbnail\", \"width\": 400, \"height\": 300 },
    { \"name\": \"card\", \"width\": 768, \"fit\": \"inside\",
      \"format\": { \"format\": \"webp\", \"quality\": 80 } }
  ]

Variants smaller than their target box are omitted unless the spec sets
withoutEnlargement explicitly. A focal point (--focal-x/--focal-y) switches
aspect-changing variants from plain resizing to focal-point crops.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate all configured variants of a source image
    Generate {
        /// Source image file
        source: PathBuf,
        /// JSON variant config
        #[arg(long, default_value = "variants.json")]
        config: PathBuf,
        /// Directory to write variant files into
        #[arg(long, default_value = "variants")]
        output: PathBuf,
        /// Focal point x in percent
        #[arg(long, requires = "focal_y")]
        focal_x: Option<f64>,
        /// Focal point y in percent
        #[arg(long, requires = "focal_x")]
        focal_y: Option<f64>,
        /// Print the result map as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Print a source image's probed dimensions
    Probe {
        /// Source image file
        source: PathBuf,
    },
    /// Print a documented starter variants.json
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        Command::Generate { source, config, output, focal_x, focal_y, json } => {
            let specs = config::load_variants(&config)?;
            let bytes = std::fs::read(&source)?;
            let original_name = source
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or("source path has no usable filename")?;

            let focal_point = match (focal_x, focal_y) {
                (Some(x), Some(y)) => Some(FocalPoint::new(x, y)),
                _ => None,
            };

            let backend = ImageCrateBackend::new();
            let generated = generate_variants(
                &backend,
                &PipelineInput {
                    source: &bytes,
                    original_name,
                    specs: &specs,
                    edits: UploadEdits { focal_point, ..UploadEdits::default() },
                    stored_focal_point: None,
                    operation: OperationKind::Create,
                },
            )?;

            std::fs::create_dir_all(&output)?;
            for file in &generated.files {
                std::fs::write(output.join(&file.filename), &file.bytes)?;
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&generated.sizes)?);
            } else {
                for (name, result) in &generated.sizes {
                    match (&result.filename, result.width, result.height) {
                        (Some(filename), Some(w), Some(h)) => {
                            println!("{name}: {w}x{h} -> {}", output.join(filename).display());
                        }
                        _ => println!("{name}: omitted (source too small)"),
                    }
                }
            }
        }
        Command::Probe { source } => {
            let bytes = std::fs::read(&source)?;
            let backend = ImageCrateBackend::new();
            let probed = backend.probe(&bytes)?;
            println!("{}x{}", probed.width, probed.height);
        }
        Command::GenConfig => print!("{}", config::stock_config()),
    }
    Ok(())
}
