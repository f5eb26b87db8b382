use clap::Parser;
use seedctl::cli::{self, Cli, Commands};
use tokio::signal;
use tracing::warn;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    cli::init_logging(cli.connection());

    // No mid-operation cancellation: an interrupt stops the run where it
    // is, and a creation that already succeeded is not retracted. The next
    // run picks up idempotently.
    tokio::select! {
        result = run(cli) => {
            if let Err(e) = result {
                eprintln!("✗ {e}");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            warn!("interrupt received, stopping");
            std::process::exit(130);
        }
    }
}

async fn run(cli: Cli) -> seedctl::error::Result<()> {
    match cli.command {
        Commands::Provision(args) => cli::provision::execute(args).await,
        Commands::Verify(args) => cli::verify::execute(args).await,
    }
}
