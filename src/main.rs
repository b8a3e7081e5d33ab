use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use storefinder::{
    classify,
    nominatim::Nominatim,
    overpass::Overpass,
    shell,
    terminal::{TerminalList, TerminalMap},
    Config, Controller,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about = "Find shops around an address using OpenStreetMap data")]
struct Cli {
    /// Settings file, defaults to ./storefinder.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Search once and print the results
    Search {
        address: String,
        /// Radius in km
        #[arg(long)]
        radius: Option<f64>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Print the category label for raw shop codes
    Classify { tags: Vec<String> },
    /// Search interactively
    Shell,
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn build_controller(
    config: Config,
    quiet: bool,
) -> Controller<Nominatim, Overpass, TerminalMap, TerminalList> {
    let geo = Nominatim::new(&config);
    let features = Overpass::new(&config);
    Controller::new(
        config,
        geo,
        features,
        TerminalMap::default(),
        TerminalList::new(quiet),
    )
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;
    let config_path = cli.config;

    match cli.command {
        Command::Search {
            address,
            radius,
            category,
            json,
        } => {
            // with a category the unfiltered list is not worth printing
            let quiet = json || category.is_some();
            let mut controller = build_controller(Config::load(config_path.as_deref())?, quiet);
            if let Some(x) = radius {
                controller.on_radius_changed(x);
            }
            // the notice has already been printed
            if controller.on_search_submitted(&address).is_err() {
                return Ok(ExitCode::FAILURE);
            }
            if category.is_some() {
                controller.list_mut().quiet = json;
                controller.on_category_selected(category.as_deref());
            }
            if json {
                let mut output = serde_json::to_string_pretty(&controller.cards())?;
                output.push('\n');
                print!("{output}");
            }
        }
        Command::Classify { tags } => {
            for x in &tags {
                println!("{x}\t{}", classify(Some(x.as_str())));
            }
        }
        Command::Shell => {
            let mut controller = build_controller(Config::load(config_path.as_deref())?, false);
            shell::run(&mut controller)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
