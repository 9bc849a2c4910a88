use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use pagemark::document::RasterEngine;
use pagemark::script::{ScriptRunner, load_script};
use pagemark::{Viewer, ViewerConfig};

#[derive(Debug, Parser)]
#[command(name = "pagemark")]
#[command(about = "Annotate document pages and export them as images")]
struct Cli {
    /// Document to open
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// JSON script of interactions to replay
    #[arg(long, value_name = "STEPS")]
    script: Option<PathBuf>,
    /// Directory for captured pages (defaults to the configured save location)
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
    /// Override the configured watermark text
    #[arg(long)]
    watermark: Option<String>,
    /// Capture the current page after the script has run
    #[arg(long)]
    capture: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = ViewerConfig::load();
    if let Some(watermark) = cli.watermark {
        config.watermark = watermark;
    }
    let out_dir = match cli.out {
        Some(dir) => dir,
        None => config
            .save_location
            .export_dir()
            .context("No default export directory; pass --out")?,
    };

    let bytes = std::fs::read(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;
    let name = cli
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    let mut viewer = Viewer::new(config, Arc::new(RasterEngine));
    viewer.open(bytes, name).await?;

    let mut saved = Vec::new();
    if let Some(script) = &cli.script {
        let steps = load_script(script)?;
        saved.extend(ScriptRunner::new(&mut viewer, &out_dir).run(&steps).await?);
    }
    if cli.capture {
        let artifact = viewer.capture().await?;
        saved.push(artifact.save_in(&out_dir)?);
    }

    for path in saved {
        println!("{}", path.display());
    }
    Ok(())
}
