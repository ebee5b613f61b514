mod analytics;
mod catalog;
mod cli;
mod enrich;
mod error;
mod fmt;
mod models;
mod parser;
mod reader;
mod report;
mod settings;
mod validator;

use std::io::stderr;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use cli::{Cli, Commands};

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{level}', defaulting to 'warn'");
            LevelFilter::WARN
        }
    }
}

fn setup_logging(level: LevelFilter) {
    // stdout carries progress output; diagnostics go to stderr
    let terminal_log = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry().with(terminal_log).init();
}

fn main() {
    let cli = Cli::parse();
    setup_logging(parse_log_level(&cli.log_level));

    let result = match cli.command {
        Commands::Init => cli::init::run(),
        Commands::Run {
            input,
            filters,
            interactive,
            offline,
            output_dir,
        } => cli::run::run(
            &input,
            cli::run::RunOptions {
                filters,
                interactive,
                offline,
                output_dir,
            },
        ),
        Commands::Validate { input, filters } => cli::validate::run(&input, filters),
        Commands::Products { limit } => cli::products::run(limit),
    };

    // Failures are reported, not turned into a failing exit status.
    if let Err(e) = result {
        eprintln!("Error: {e}");
    }
}
