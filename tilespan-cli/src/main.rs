//! Tilespan CLI - Command-line interface
//!
//! This binary provides a command-line interface to the Tilespan library:
//! encoding coverage inventories into availability maps, querying them,
//! and inspecting their contents.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use error::CliError;

#[derive(Parser)]
#[command(name = "tilespan")]
#[command(version = tilespan::VERSION)]
#[command(about = "Zoom coverage maps for web-mercator tile pyramids", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build an availability map from a coverage inventory
    Encode {
        /// Inventory JSON file (a list of coverage rectangles)
        #[arg(long)]
        inventory: PathBuf,

        /// Output path for the availability map JSON
        #[arg(long)]
        output: PathBuf,

        /// Override the base zoom instead of deriving it from the
        /// inventory
        #[arg(long)]
        base_zoom: Option<u8>,
    },
    /// Query the most detailed coverage at a geographic point
    Query {
        /// Availability map JSON file
        #[arg(long)]
        map: PathBuf,

        /// Latitude in decimal degrees
        #[arg(long)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long)]
        lon: f64,
    },
    /// Show the contents of an availability map
    Inspect {
        /// Availability map JSON file
        #[arg(long)]
        map: PathBuf,
    },
}

fn main() {
    let args = Args::parse();

    let _logging_guard = match tilespan::logging::init_logging(
        tilespan::logging::default_log_dir(),
        tilespan::logging::default_log_file(),
    ) {
        Ok(guard) => guard,
        Err(e) => CliError::LoggingInit(e).exit(),
    };

    let result = match args.command {
        Command::Encode {
            inventory,
            output,
            base_zoom,
        } => commands::encode::run(&inventory, &output, base_zoom),
        Command::Query { map, lat, lon } => commands::query::run(&map, lat, lon),
        Command::Inspect { map } => commands::inspect::run(&map),
    };

    if let Err(e) = result {
        e.exit();
    }
}
