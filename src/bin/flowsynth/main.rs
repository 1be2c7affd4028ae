//! flowsynth - particles in a Perlin flow field, each one a sine voice
//!
//! Run with: cargo run -- [--headless] [--config flowsynth.toml]

mod app;
mod ui;

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use std::{fs::File, path::PathBuf, sync::Mutex};
use tracing::Level;

use flowsynth::EngineConfig;

#[derive(Parser)]
#[command(name = "flowsynth")]
#[command(about = "Flow field particle synthesizer", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of voices audible at start
    #[arg(long)]
    voices: Option<usize>,

    /// Simulation frame rate
    #[arg(long)]
    fps: Option<f32>,

    /// Seed for every random draw
    #[arg(long)]
    seed: Option<u64>,

    /// Run without the terminal UI
    #[arg(long)]
    headless: bool,

    /// Seconds to render offline (headless only; plays forever without it)
    #[arg(short, long)]
    duration: Option<f32>,

    /// Log destination while the terminal UI is up
    #[arg(long, default_value = "flowsynth.log")]
    log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn engine_config(&self) -> EyreResult<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)
                .wrap_err_with(|| format!("failed to load config {}", path.display()))?,
            None => EngineConfig::default(),
        };

        if let Some(voices) = self.voices {
            config.initial_voices = voices;
        }
        if let Some(fps) = self.fps {
            config.flow.frame_rate = fps;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config.sanitized())
    }

    fn init_logging(&self) -> EyreResult<()> {
        let level = if self.verbose { Level::DEBUG } else { Level::INFO };
        let builder = tracing_subscriber::fmt().with_max_level(level);

        if self.headless {
            builder.with_writer(std::io::stderr).init();
        } else {
            // The terminal belongs to the UI.
            let file = File::create(&self.log_file).wrap_err_with(|| {
                format!("failed to create log file {}", self.log_file.display())
            })?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        Ok(())
    }
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    cli.init_logging()?;
    let config = cli.engine_config()?;

    match (cli.headless, cli.duration) {
        (true, Some(seconds)) => app::render_offline(config, seconds),
        (true, None) => app::play_headless(config),
        (false, _) => app::play_tui(config),
    }
}
