use barcode_bridge::formats::tables::{mlkit, vision, zxing};
use barcode_bridge::models::{Frame, Orientation, PixelFormat};
use barcode_bridge::{
    BarcodeResult, BridgeError, CoordinateSpace, FrameProcessorPlugin, ScanError, Scanner,
    ScannerConfig, Symbology, negotiate,
};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::info;

const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff"];

#[derive(Parser)]
#[command(name = "barcodetool", version, about = "Barcode scanning CLI tools")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan still images for barcodes
    Scan {
        /// Image path or file:// URI (repeatable)
        #[arg(long)]
        image: Vec<String>,
        /// Scan every image under this directory
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Comma-separated format tags, e.g. qr,ean_13
        #[arg(long, value_delimiter = ',')]
        formats: Vec<String>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
        /// Report bounds as fractions of the image size
        #[arg(long)]
        normalized: bool,
    },
    /// List supported formats and their vendor names
    Formats,
    /// Run the frame processor on a raw pixel dump
    Frame {
        /// File holding the raw frame bytes
        #[arg(long)]
        raw: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        /// luma8, rgb8, rgba8, bgra8, nv21 or yuv420
        #[arg(long, value_parser = parse_pixel_format)]
        pixel_format: PixelFormat,
        /// Clockwise rotation to upright: 0, 90, 180, 270 or up/right/down/left
        #[arg(long, value_parser = parse_orientation, default_value = "0")]
        orientation: Orientation,
        /// Comma-separated format tags
        #[arg(long, value_delimiter = ',')]
        formats: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Scan {
            image,
            dir,
            formats,
            json,
            normalized,
        } => scan_cmd(image, dir.as_deref(), &formats, json, normalized),
        Command::Formats => formats_cmd(),
        Command::Frame {
            raw,
            width,
            height,
            pixel_format,
            orientation,
            formats,
        } => frame_cmd(&raw, width, height, pixel_format, orientation, &formats),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn parse_pixel_format(value: &str) -> Result<PixelFormat, String> {
    PixelFormat::parse(value).ok_or_else(|| format!("unknown pixel format `{value}`"))
}

fn parse_orientation(value: &str) -> Result<Orientation, String> {
    Orientation::parse(value).ok_or_else(|| format!("unknown orientation `{value}`"))
}

fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "skipping unreadable directory");
                continue;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
                    images.push(path);
                }
            }
        }
    }

    images.sort();
    images
}

fn scan_cmd(
    mut uris: Vec<String>,
    dir: Option<&Path>,
    formats: &[String],
    json: bool,
    normalized: bool,
) -> ExitCode {
    if let Some(dir) = dir {
        uris.extend(
            collect_images(dir)
                .into_iter()
                .map(|p| p.to_string_lossy().into_owned()),
        );
    }
    if uris.is_empty() {
        eprintln!("Nothing to scan: pass --image or --dir");
        return ExitCode::FAILURE;
    }

    let mut config = ScannerConfig::from_env();
    if normalized {
        config = config.with_coordinates(CoordinateSpace::Normalized);
    }
    let scanner = Scanner::new(config);
    let request = (!formats.is_empty()).then_some(formats);
    info!(images = uris.len(), formats = ?negotiate(request), "scanning");

    let start = Instant::now();
    let outcomes: Vec<(String, Result<Vec<BarcodeResult>, ScanError>)> = uris
        .par_iter()
        .map(|uri| (uri.clone(), scanner.scan_uri(uri, request)))
        .collect();
    let elapsed = start.elapsed();

    let failures = outcomes.iter().filter(|(_, r)| r.is_err()).count();
    let found: usize = outcomes
        .iter()
        .filter_map(|(_, r)| r.as_ref().ok())
        .map(Vec::len)
        .sum();

    if json {
        let entries: Vec<serde_json::Value> = outcomes
            .into_iter()
            .map(|(uri, outcome)| match outcome {
                Ok(results) => json!({ "image": uri, "results": results }),
                Err(err) => json!({ "image": uri, "error": BridgeError::from(err) }),
            })
            .collect();
        match serde_json::to_string_pretty(&entries) {
            Ok(text) => println!("{text}"),
            Err(err) => {
                eprintln!("Failed to serialize results: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        for (uri, outcome) in &outcomes {
            match outcome {
                Ok(results) => {
                    println!("{}: {} barcode(s)", uri, results.len());
                    for (i, r) in results.iter().enumerate() {
                        let b = &r.bounds;
                        println!(
                            "  {}: [{}] {} @ ({:.2}, {:.2})-({:.2}, {:.2})",
                            i, r.format, r.raw_value, b.left, b.top, b.right, b.bottom
                        );
                    }
                }
                Err(err) => println!("{}: {} {}", uri, err.code(), err),
            }
        }
        println!(
            "Scanned {} image(s) in {:.1?}: {} barcode(s), {} failure(s)",
            outcomes.len(),
            elapsed,
            found,
            failures
        );
    }

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn formats_cmd() -> ExitCode {
    println!(
        "{:<12} {:<7} {:<14} {:>6}  {}",
        "tag", "kind", "zxing", "mlkit", "vision"
    );
    for symbology in Symbology::ALL {
        let kind = if symbology.is_linear() { "1D" } else { "2D" };
        println!(
            "{:<12} {:<7} {:<14} {:>6}  {}",
            symbology.tag(),
            kind,
            format!("{:?}", zxing::to_vendor(symbology)),
            mlkit::to_vendor(symbology),
            vision::to_vendor(symbology)
        );
    }
    ExitCode::SUCCESS
}

fn frame_cmd(
    raw: &Path,
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
    orientation: Orientation,
    formats: &[String],
) -> ExitCode {
    let data = match fs::read(raw) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("Failed to read frame {}: {}", raw.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let frame = Frame::new(&data, width, height, pixel_format).with_orientation(orientation);
    if let Err(err) = frame.validate() {
        eprintln!("Invalid frame: {err}");
        return ExitCode::FAILURE;
    }

    let options = if formats.is_empty() {
        json!({})
    } else {
        json!({ "formats": formats })
    };
    let plugin = FrameProcessorPlugin::new(&options);

    let start = Instant::now();
    let results = plugin.callback_json(&frame);
    info!(elapsed = ?start.elapsed(), "frame processed");

    match serde_json::to_string_pretty(&results) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Failed to serialize results: {err}");
            ExitCode::FAILURE
        }
    }
}
