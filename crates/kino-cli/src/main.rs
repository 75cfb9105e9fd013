mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kino_router::Config;
use tracing::Level;

#[derive(Parser)]
#[command(name = "kino")]
#[command(version, about = "Kino CLI - inspect and exercise the site's route table", long_about = None)]
struct Cli {
    /// Route configuration file (falls back to the built-in table when missing)
    #[arg(short, long, global = true, default_value = "kino.toml")]
    config: PathBuf,

    /// Show router logs (-v for info, -vv for debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the route table in declaration order
    Routes,

    /// Resolve a location to its route
    Resolve {
        /// Location such as /movie/42?t=90
        location: String,
    },

    /// Generate the path of a named route
    Url {
        /// Route name
        name: String,

        /// Parameter as key=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },

    /// Replay a navigation session and print each committed title
    Navigate {
        /// Locations visited in order
        #[arg(required = true)]
        locations: Vec<String>,

        /// Step back this many times after the last location
        #[arg(short, long, default_value = "0")]
        back: usize,
    },
}

fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{}`", s))
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(&cli.config)?;

    // Execute command
    match cli.command {
        Commands::Routes => {
            commands::routes::execute(&config)?;
        }
        Commands::Resolve { location } => {
            commands::resolve::execute(&config, &location)?;
        }
        Commands::Url { name, params } => {
            commands::url::execute(&config, &name, params)?;
        }
        Commands::Navigate { locations, back } => {
            commands::navigate::execute(&config, &locations, back)?;
        }
    }

    Ok(())
}
