//! Command-line interface definitions.

pub mod output;
pub mod provision;
pub mod verify;

use clap::{Args, Parser, Subcommand};
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

use crate::api::ApiClient;
use crate::error::Result;

/// Environment variable consulted when `--token` is not given.
pub const TOKEN_ENV: &str = "ADMIN_API_TOKEN";

/// seedctl - idempotent seeding and verification for the platform API.
#[derive(Parser, Debug)]
#[command(name = "seedctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision the built-in seed data (safe to re-run)
    Provision(ProvisionArgs),

    /// Verify previously provisioned data (read-only)
    Verify(VerifyArgs),
}

impl Cli {
    pub fn connection(&self) -> &ConnectionArgs {
        match &self.command {
            Commands::Provision(args) => &args.connection,
            Commands::Verify(args) => &args.connection,
        }
    }
}

/// Connection options shared by every subcommand.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Base URL of the platform API
    #[arg(short = 'u', long, default_value = "http://localhost:8080")]
    pub api_url: String,

    /// Admin bearer token (falls back to the ADMIN_API_TOKEN env var)
    #[arg(short, long)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,
}

impl ConnectionArgs {
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| std::env::var(TOKEN_ENV).ok())
    }

    pub fn client(&self, token: Option<String>) -> Result<ApiClient> {
        ApiClient::new(&self.api_url, token, Duration::from_secs(self.timeout))
    }
}

/// Arguments for the `provision` subcommand.
#[derive(Args, Debug)]
pub struct ProvisionArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Only check API health, do not create anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Only check API health, skip entity verification
    #[arg(long)]
    pub health_only: bool,
}

/// Initialize the tracing subscriber from the connection flags.
pub fn init_logging(connection: &ConnectionArgs) {
    let default = if connection.verbose {
        "seedctl=debug"
    } else {
        "seedctl=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    if connection.json_logs {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }
}
