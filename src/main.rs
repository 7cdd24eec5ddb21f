mod animation;
mod app;
mod chart;
mod color;
mod config;
mod data;
mod export;
mod pipeline;
mod render;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use config::Config;
use data::error::{LoadError, LoadErrorKind};

/// Render an animated chart of global temperature anomalies and glacier
/// cumulative mass balance.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Input table (.xlsx, .xls, .ods, .csv or .parquet)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output GIF
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON config file; command line options take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Play the animation in a window before exporting
    #[arg(long)]
    preview: bool,

    /// Frames per second of the exported GIF
    #[arg(long)]
    fps: Option<u32>,

    /// Output resolution in dots per inch
    #[arg(long)]
    dpi: Option<u32>,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if self.preview {
            config.animation.preview = true;
        }
        if let Some(fps) = self.fps {
            config.animation.fps = fps;
        }
        if let Some(dpi) = self.dpi {
            config.animation.dpi = dpi;
        }
        Ok(config)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = Cli::parse()
        .into_config()
        .and_then(|config| pipeline::run(&config));

    match result {
        Ok(summary) => info!(
            "Done: {} frames written to {}",
            summary.frames,
            summary.output.display()
        ),
        Err(err) => {
            // Printed directly so the message survives RUST_LOG=off.
            eprintln!("{}", failure_message(&err));
            std::process::exit(1);
        }
    }
}

fn failure_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<LoadError>().map(LoadError::kind) {
        Some(LoadErrorKind::FileNotFound) => format!("Error: {err}"),
        Some(LoadErrorKind::Schema) => format!("Error in input data: {err:#}"),
        None => format!("Error: {err:#}"),
    }
}
