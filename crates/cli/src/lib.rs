pub mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use shamba_core::config::LoggingConfig;

#[derive(Debug, Parser)]
#[command(
    name = "shamba",
    about = "Fertilizer recommendation CLI",
    long_about = "Match a crop, soil type, and farm size to ranked fertilizer \
                  recommendations drawn from the reference catalog.",
    after_help = "Examples:\n  shamba seed\n  shamba recommend --crop Maize --soil Loam --acres 2 --budget 10000\n  shamba doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Recommend fertilizers for a crop, soil type, and farm size")]
    Recommend {
        #[arg(long, help = "Crop name as listed in the catalog")]
        crop: String,
        #[arg(long, help = "Soil type as listed in the catalog")]
        soil: String,
        #[arg(long, help = "Farm size in acres")]
        acres: Decimal,
        #[arg(long, help = "Optional total budget")]
        budget: Option<Decimal>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "List catalog crops, soil types, and fertilizer products")]
    Catalog {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the reference catalog dataset and verify the seed contract")]
    Seed,
    #[command(about = "Validate config, database connectivity, and catalog readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Recommend { crop, soil, acres, budget, json } => {
            commands::recommend::run(&crop, &soil, acres, budget, json)
        }
        Command::Catalog { json } => commands::catalog::run(json),
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Install the tracing subscriber once per process, writing to stderr so
/// command output on stdout stays machine-parseable.
pub fn init_logging(config: &LoggingConfig) {
    use shamba_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    // A second call in the same process (tests) is a harmless no-op.
    let _ = match config.format {
        Compact => builder.compact().try_init(),
        Pretty => builder.pretty().try_init(),
        Json => builder.json().try_init(),
    };
}
