use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod lawyers;
pub mod schedule;
pub mod serve;
pub mod slots;

use crate::scheduling::parse_instant;

#[derive(Subcommand)]
enum Command {
    /// Choose a slot for a booking request and print the meeting draft
    Schedule {
        /// Path to a booking request JSON file, or `-` for stdin
        #[arg(long, default_value = "-")]
        request: String,
        /// Schedule as if it were this local time
        #[arg(long)]
        now: Option<String>,
    },
    /// List available slots for a lawyer at a location
    Slots {
        #[arg(long)]
        lawyer: String,
        #[arg(long, default_value = "office")]
        location: String,
        /// Schedule as if it were this local time
        #[arg(long)]
        now: Option<String>,
    },
    /// Print the loaded lawyer profiles
    Lawyers {},
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2323")]
        port: String,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

/// Logs go to stderr so command output on stdout stays valid JSON.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve_now(now: Option<String>) -> Result<NaiveDateTime> {
    match now {
        Some(value) => parse_instant(&value).with_context(|| format!("Invalid --now: {}", value)),
        None => Ok(chrono::Local::now().naive_local()),
    }
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Schedule { request, now }) => {
            init_tracing();
            schedule::run(&request, resolve_now(now)?).await?;
        }
        Some(Command::Slots {
            lawyer,
            location,
            now,
        }) => {
            init_tracing();
            slots::run(&lawyer, &location, resolve_now(now)?).await?;
        }
        Some(Command::Lawyers {}) => {
            init_tracing();
            lawyers::run().await?;
        }
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await?;
        }
        None => {}
    }

    Ok(())
}
