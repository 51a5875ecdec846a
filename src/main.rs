//! # Papelito CLI
//!
//! Command-line interface for printing notes and photos on an ESC/POS
//! thermal receipt printer.
//!
//! ## Usage
//!
//! ```bash
//! # Is the printer plugged in?
//! papelito status
//!
//! # Print a photo, rotated, with Atkinson dithering, then cut
//! papelito image cat.jpg --rotation 90 --dither atkinson --cut
//!
//! # Preview the halftone without printing
//! papelito image cat.jpg --contrast 40 --preview cat.png
//!
//! # Print a Markdown note
//! papelito document groceries.md --cut
//!
//! # Print an HTML fragment from a rich-text editor
//! papelito document note.html --cut
//!
//! # Write the job bytes to a file instead of the device
//! papelito --output job.bin test-page
//! ```
//!
//! Exits with status 75 when the printer is unavailable, so callers can
//! retry later.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use papelito::{
    DocumentNode, Encoder, PapelitoError, PrinterConfig,
    document::{html, markdown},
    render::{
        DitherMode, Pipeline, PipelineSettings,
        pipeline::{Orientation, Rotation},
    },
    transport::{DeviceTransport, Transport, device::DEFAULT_DEVICE},
};

/// Exit status for a transient failure (`EX_TEMPFAIL`).
const EXIT_TEMPFAIL: i32 = 75;

/// Papelito - ESC/POS thermal receipt printer utility
#[derive(Parser, Debug)]
#[command(name = "papelito")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Printer device path
    #[arg(long, global = true, env = "PAPELITO_DEVICE", default_value = DEFAULT_DEVICE)]
    device: PathBuf,

    /// Print width in dots
    #[arg(long, global = true, default_value_t = PrinterConfig::USB_80MM.width_dots)]
    width: u32,

    /// Write job bytes to this file instead of the device
    #[arg(long, global = true, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report whether the printer device is writable
    Status,

    /// Print a photo as a halftone
    Image {
        /// Image file (PNG, JPEG, ...)
        file: PathBuf,

        /// Clockwise rotation in degrees: 0, 90, 180 or 270
        #[arg(long)]
        rotation: Option<Rotation>,

        /// portrait (fit width) or landscape (fit height)
        #[arg(long)]
        orientation: Option<Orientation>,

        /// Contrast, -255 to 255
        #[arg(long, allow_negative_numbers = true)]
        contrast: Option<i32>,

        /// Brightness offset added after contrast
        #[arg(long, allow_negative_numbers = true)]
        white_point: Option<i32>,

        /// Print a negative
        #[arg(long)]
        invert: bool,

        /// threshold, floyd-steinberg, atkinson, bayer4 or bayer8
        #[arg(long)]
        dither: Option<DitherMode>,

        /// JSON file with pipeline settings; flags override it
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,

        /// Save the halftone as PNG
        #[arg(long, value_name = "PNG")]
        preview: Option<PathBuf>,

        /// Only write the preview, do not print
        #[arg(long, requires = "preview")]
        preview_only: bool,

        /// Feed and cut after printing
        #[arg(long)]
        cut: bool,
    },

    /// Print a rich-text document
    Document {
        /// Markdown, HTML or JSON document file
        file: PathBuf,

        /// Input format (default: from the file extension)
        #[arg(long, value_enum)]
        format: Option<DocumentFormat>,

        /// Feed and cut after printing
        #[arg(long)]
        cut: bool,
    },

    /// Print the 1x-8x character size ladder
    TestPage {
        /// Feed and cut after printing
        #[arg(long)]
        cut: bool,
    },

    /// Feed and cut the paper
    Cut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DocumentFormat {
    Markdown,
    Html,
    Json,
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            Some(ext) if ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm") => {
                DocumentFormat::Html
            }
            _ => DocumentFormat::Markdown,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("papelito=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        let code = if e.is_transient() { EXIT_TEMPFAIL } else { 1 };
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<(), PapelitoError> {
    let config = PrinterConfig::default().with_width(cli.width);
    config.validate()?;
    let mut printer = DeviceTransport::new(&cli.device);

    match cli.command {
        Commands::Status => {
            let state = if printer.is_available() {
                "available"
            } else {
                "not available"
            };
            println!(
                "{}: {} ({}, {} dots, {:.0} mm)",
                printer.name(),
                state,
                config.name,
                config.width_dots,
                config.width_mm()
            );
            Ok(())
        }

        Commands::Image {
            file,
            rotation,
            orientation,
            contrast,
            white_point,
            invert,
            dither,
            settings,
            preview,
            preview_only,
            cut,
        } => {
            let mut pipeline_settings = match settings {
                Some(path) => PipelineSettings::from_json(&std::fs::read_to_string(path)?)?,
                None => PipelineSettings::default(),
            };
            if let Some(rotation) = rotation {
                pipeline_settings.rotation = rotation;
            }
            if let Some(orientation) = orientation {
                pipeline_settings.orientation = orientation;
            }
            if let Some(contrast) = contrast {
                pipeline_settings.contrast = contrast;
            }
            if let Some(white_point) = white_point {
                pipeline_settings.white_point = white_point;
            }
            if invert {
                pipeline_settings.invert = true;
            }
            if let Some(dither) = dither {
                pipeline_settings.dither = dither;
            }
            pipeline_settings.validate()?;

            let source = image::open(&file).map_err(|e| {
                PapelitoError::Image(format!("Failed to load {}: {}", file.display(), e))
            })?;
            let mut pipeline = Pipeline::new(source, config.width_dots);
            let bitmap = pipeline.render(&pipeline_settings);
            info!(
                width = bitmap.width(),
                height = bitmap.height(),
                dither = %pipeline_settings.dither,
                "image ready"
            );

            if let Some(path) = &preview {
                bitmap.save_png(path)?;
                println!("Saved preview to {}", path.display());
            }
            if preview_only {
                return Ok(());
            }

            let mut job = Encoder::new();
            job.initialize().raster_image(&bitmap);
            send(job, cut, &mut printer, cli.output.as_deref())
        }

        Commands::Document { file, format, cut } => {
            let content = std::fs::read_to_string(&file)?;
            let doc = match format.unwrap_or_else(|| DocumentFormat::from_path(&file)) {
                DocumentFormat::Markdown => markdown::parse(&content),
                DocumentFormat::Html => html::parse(&content),
                DocumentFormat::Json => DocumentNode::from_json(&content)?,
            };

            let mut job = Encoder::new();
            job.initialize().document(&doc);
            send(job, cut, &mut printer, cli.output.as_deref())
        }

        Commands::TestPage { cut } => {
            let mut job = Encoder::new();
            job.initialize().size_test_page();
            send(job, cut, &mut printer, cli.output.as_deref())
        }

        Commands::Cut => {
            let mut job = Encoder::new();
            job.initialize();
            send(job, true, &mut printer, cli.output.as_deref())
        }
    }
}

/// Deliver a finished job to the output file or the printer.
fn send(
    mut job: Encoder,
    cut: bool,
    printer: &mut DeviceTransport,
    output: Option<&Path>,
) -> Result<(), PapelitoError> {
    match output {
        Some(path) => {
            if cut {
                job.raw(&papelito::protocol::commands::cut_partial_feed());
            }
            let bytes = job.take();
            std::fs::write(path, &bytes)?;
            println!("Wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            let written = if cut {
                job.cut(printer)?
            } else {
                job.flush(printer)?
            };
            println!("Printed {} bytes", written);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STARTUP: &[u8] = b"\x1B\x40\x1C\x2E\x1B\x74\x06";

    fn parse_cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("papelito").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.JSON")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("a.html")), DocumentFormat::Html);
        assert_eq!(DocumentFormat::from_path(Path::new("a.htm")), DocumentFormat::Html);
        assert_eq!(DocumentFormat::from_path(Path::new("a.md")), DocumentFormat::Markdown);
        assert_eq!(DocumentFormat::from_path(Path::new("notes")), DocumentFormat::Markdown);
    }

    #[test]
    fn test_cut_job_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("job.bin");
        let mut printer = DeviceTransport::new(dir.path().join("lp0"));

        let mut job = Encoder::new();
        job.initialize();
        send(job, true, &mut printer, Some(&out)).unwrap();

        let expected = [STARTUP, b"\n\n\n\n\n\x1B\x69"].concat();
        assert_eq!(std::fs::read(&out).unwrap(), expected);
    }

    #[test]
    fn test_cut_subcommand_writes_startup_then_cut() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("cut.bin");
        let out_arg = out.to_string_lossy().into_owned();

        let cli = parse_cli(&["--output", &out_arg, "cut"]);
        assert!(matches!(cli.command, Commands::Cut));
        run(cli).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(STARTUP));
        assert!(bytes.ends_with(b"\x1B\x69"));
    }

    #[test]
    fn test_zero_width_is_rejected() {
        let cli = parse_cli(&["--width", "0", "test-page"]);
        let err = run(cli).unwrap_err();
        assert!(matches!(err, PapelitoError::InvalidSetting(_)));
        assert!(!err.is_transient());
    }
}
