//! Command-line front end: turn a list of image files into one PDF.

use anyhow::Context;
use clap::Parser;
use images_to_pdf::{config, Converter, DirectorySink, FileHandle};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Assemble images into a single PDF, one image per A4 page
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image files, in page order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Directory to write the PDF into
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// File name of the PDF
    #[arg(short, long)]
    name: Option<String>,

    /// Settings file to use instead of the one in the user's config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How long to wait for each image to decode, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Document title
    #[arg(long)]
    title: Option<String>,

    /// Document subject
    #[arg(long)]
    subject: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "images_to_pdf=debug"
    } else {
        "images_to_pdf=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => config::load_from_path(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => config::load().context("failed to load settings")?,
    };
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(name) = args.name {
        config.output_name = name;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.decode_timeout_ms = timeout_ms;
    }
    if let Some(title) = args.title {
        config.title = Some(title);
    }
    if let Some(subject) = args.subject {
        config.subject = Some(subject);
    }

    let output = Arc::new(DirectorySink::new(config.output_dir.clone()));
    let converter = Converter::new(config, output);

    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let file = FileHandle::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        files.push(file);
    }

    let intake = converter.intake(files).await?;
    if intake.rejected > 0 {
        tracing::warn!(skipped = intake.rejected, "skipped files that aren't images");
    }

    let report = converter.convert().await?;
    println!("{}", report.location.display());

    Ok(())
}
