use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tools::{RenderOptions, describe_dataset, load_config, load_dataset, render};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "globe", about = "Render the rotating globe offline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render composited frames at the given times (ms after start) to PNG.
    Render {
        /// GeoJSON world dataset holding the land collection.
        #[arg(long)]
        land: PathBuf,
        /// Frame times in milliseconds; repeat for several frames.
        #[arg(long = "time", required = true)]
        times: Vec<f64>,
        #[arg(long)]
        out: PathBuf,
        /// JSON globe config; missing fields keep their defaults.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Also write each layer on its own.
        #[arg(long)]
        layers: bool,
    },
    /// Print the default config as JSON.
    Config,
    /// Summarize a dataset and check that its land collection resolves.
    Inspect {
        #[arg(long)]
        land: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main(Cli::parse()) {
        error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Render {
            land,
            times,
            out,
            config,
            layers,
        } => {
            let config = load_config(config.as_deref())?;
            let dataset = load_dataset(&land)?;
            let opts = RenderOptions {
                out_dir: out,
                times,
                write_layers: layers,
            };
            let report = render(config, dataset, &opts)?;
            for frame in &report.frames {
                println!("{}  {}", frame.blake3, frame.file);
                for layer in &frame.layers {
                    println!("{}  {}", layer.blake3, layer.file);
                }
            }
            Ok(())
        }
        Command::Config => {
            let json = serde_json::to_string_pretty(&globe::GlobeConfig::default())
                .map_err(|e| format!("encode config: {e}"))?;
            println!("{json}");
            Ok(())
        }
        Command::Inspect { land, config } => {
            let config = load_config(config.as_deref())?;
            let dataset = load_dataset(&land)?;
            print!("{}", describe_dataset(&dataset, &config.land_object));
            Ok(())
        }
    }
}
