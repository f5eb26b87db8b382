//! The `verify` command: read-only cross-check of provisioned data.

use owo_colors::OwoColorize;

use crate::error::Result;
use crate::provision::SeedData;
use crate::verify::{all_passed, Verifier};

use super::{output, VerifyArgs};

pub async fn execute(args: VerifyArgs) -> Result<()> {
    let token = args.connection.resolve_token();
    if token.is_none() && !args.health_only {
        output::error("admin token is required: pass --token or set ADMIN_API_TOKEN");
        std::process::exit(1);
    }

    let api = args.connection.client(token)?;

    if args.health_only {
        output::progress("Checking API health");
        let healthy = api.health().await;
        output::progress_done(healthy);
        if !healthy {
            std::process::exit(1);
        }
        output::ok("API is healthy");
        return Ok(());
    }

    let expected = SeedData::builtin();
    let results = Verifier::new(&api, &expected).run().await;

    output::section("Verification results");
    for result in &results {
        let icon = if result.passed {
            "✓".green().to_string()
        } else {
            "✗".red().to_string()
        };
        println!("  {icon} {}: {}", result.name, result.detail);
    }

    let failed = results.iter().filter(|r| !r.passed).count();
    println!();
    output::key_value("checks", results.len());
    output::key_value("failed", failed);

    if !all_passed(&results) {
        output::error("verification failed");
        std::process::exit(1);
    }
    output::ok("all checks passed");
    Ok(())
}
