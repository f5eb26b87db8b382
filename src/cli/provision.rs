//! The `provision` command: run the idempotent seeding pipeline.

use owo_colors::OwoColorize;

use crate::error::Result;
use crate::provision::{Ledger, Orchestrator, Outcome, RunReport, SeedData};

use super::{output, ProvisionArgs};

pub async fn execute(args: ProvisionArgs) -> Result<()> {
    let token = args.connection.resolve_token();
    if token.is_none() && !args.dry_run {
        output::error("admin token is required: pass --token or set ADMIN_API_TOKEN");
        std::process::exit(1);
    }

    let api = args.connection.client(token)?;

    output::progress("Checking API health");
    let healthy = api.health().await;
    output::progress_done(healthy);
    if !healthy {
        output::error(&format!(
            "API at {} did not answer the health check",
            args.connection.api_url
        ));
        std::process::exit(1);
    }

    if args.dry_run {
        output::ok("API is healthy; dry-run requested, nothing created");
        return Ok(());
    }

    let seed = SeedData::builtin();
    let ledger = Orchestrator::new(&api, &seed).run().await;
    let report = RunReport::from_ledger(&ledger);

    print_report(&report, &ledger);

    // Completion is the terminal state for provisioning: per-item failures
    // are reported above but do not fail the process, so a partial run can
    // be inspected and re-run.
    if report.success() {
        output::ok("all entities resolved; safe to run again any time");
    } else {
        output::warn(&format!(
            "run completed with {} failure(s); re-run after fixing the data above",
            report.failures().len()
        ));
    }
    Ok(())
}

fn print_report(report: &RunReport, ledger: &Ledger) {
    for (category, counts) in report.counts() {
        output::section(&format!("{} ({} processed)", category.title(), counts.total()));

        for entry in ledger.in_category(*category) {
            let icon = match entry.outcome {
                Outcome::Created => "✓".green().to_string(),
                Outcome::AlreadyExists => "•".blue().to_string(),
                Outcome::Updated => "↻".yellow().to_string(),
                Outcome::Failed => "✗".red().to_string(),
            };
            match (&entry.id, &entry.error) {
                (Some(id), _) => {
                    println!("  {icon} {} ({}, id {id})", entry.key, entry.outcome.label())
                }
                (None, Some(error)) => {
                    println!("  {icon} {} ({})", entry.key, entry.outcome.label());
                    println!("      {error}");
                }
                (None, None) => {
                    println!("  {icon} {} ({})", entry.key, entry.outcome.label())
                }
            }
        }

        output::key_value("  created", counts.created);
        output::key_value("  already existed", counts.already_exists);
        if counts.updated > 0 {
            output::key_value("  updated", counts.updated);
        }
        output::key_value("  failed", counts.failed);
    }
    println!();
}
