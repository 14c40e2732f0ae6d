use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use trackgate::access::{self, expand_named};
use trackgate::config::Config;

#[derive(Parser)]
#[command(name = "trackgate")]
#[command(about = "Tracking-script access gate CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the access decision for a client address
    Check {
        /// Client address as it would arrive from the transport layer
        address: String,
        /// Evaluate as if the admin plugin were active
        #[arg(long)]
        admin: bool,
        /// Evaluate as if the blocking cookie were present
        #[arg(long)]
        cookie: bool,
        /// Read the configuration snapshot from a JSON file instead of
        /// the environment
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the decision as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the literal expansion of a named range
    Expand {
        /// Range name (private, loopback, link-local)
        name: String,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            address,
            admin,
            cookie,
            config,
            json,
        } => {
            let config = match config {
                Some(path) => Config::from_json_file(&path)?,
                None => Config::from_env()?,
            };

            let ctx = config.context(admin, cookie);
            let decision = access::evaluate(&address, &ctx);

            if json {
                println!("{}", serde_json::to_string_pretty(&decision)?);
            } else {
                println!("{decision}");
            }

            // Deny exits non-zero so the command composes in scripts
            if decision.is_allow() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(2))
            }
        }
        Commands::Expand { name } => match expand_named(&name) {
            Some(expansion) => {
                for literal in expansion {
                    println!("{literal}");
                }
                Ok(ExitCode::SUCCESS)
            }
            None => {
                eprintln!("unknown named range '{name}' (expected private, loopback, link-local)");
                Ok(ExitCode::FAILURE)
            }
        },
    }
}
