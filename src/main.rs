use clap::Parser;

use symdex::cli::commands::{check, init, keys, lookup};
use symdex::cli::{Cli, Commands};
use symdex::io::ExitCode;
use symdex::{Settings, logging};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Load configuration; an explicit --config must be readable
    let settings = match &cli.config {
        Some(path) => match Settings::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Configuration error in {}: {e}", path.display());
                return ExitCode::ConfigError.into();
            }
        },
        None => Settings::load().unwrap_or_else(|e| {
            eprintln!("Configuration error: {e}");
            eprintln!("Using default configuration for now.");
            Settings::default()
        }),
    };

    logging::init_with_config(&settings.logging);

    let code = match &cli.command {
        Commands::Init { force } => init::run_init(*force),
        Commands::Config => init::run_config(&settings).unwrap_or_else(|e| {
            eprintln!("Error: {e:#}");
            ExitCode::GeneralError
        }),
        Commands::Lookup {
            key,
            label,
            json,
            source,
        } => lookup::run(key, *label, *json, source, &settings),
        Commands::Keys {
            prefix,
            limit,
            json,
            source,
        } => keys::run(prefix.as_deref(), *limit, *json, source, &settings),
        Commands::Check { json, source } => check::run(*json, source, &settings),
    };

    code.into()
}
