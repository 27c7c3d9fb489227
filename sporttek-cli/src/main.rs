mod bracket;
mod config;
mod logger;
mod rate;
mod utils;

use std::io;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use log::SetLoggerError;
use thiserror::Error;

use config::{Config, ConfigError};

#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct Args {
    /// Path to the config file. A missing file uses the defaults.
    #[clap(short, long, default_value = "sporttek.toml")]
    config: PathBuf,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Calculates the new ratings of both competitors of a match.
    Rate(rate::Command),
    Bracket {
        #[clap(subcommand)]
        command: bracket::Command,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Logger(#[from] SetLoggerError),
    #[error("{0}")]
    Bracket(#[from] sporttek_core::Error),
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(args) {
        eprintln!("{}", err);

        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let config = Config::load(&args.config)?;
    logger::init(config.loglevel)?;

    log::debug!("Using config: {:?}", config);

    match args.command {
        Command::Rate(command) => command.run(&config),
        Command::Bracket { command } => command.run(),
    }
}
