use clap::Parser;
use standings_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Writes are per-file atomic, so stopping between them leaves a consistent store
        tokio::select! {
            result = commands::run(args) => result,
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    eprintln!("Failed to listen for CTRL+C: {}", e);
                }
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(standings_processor::Error::processing_interrupted(
                    "Processing interrupted by user",
                ))
            }
        }
    });

    match result {
        Ok(_stats) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Standings Processor - session results and championship standings");
    println!("=================================================================");
    println!();
    println!("Normalizes scraped session classifications into result rows and");
    println!("recomputes season driver and team standings from them.");
    println!();
    println!("USAGE:");
    println!("    standings-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    ingest       Normalize one session's table and store its rows");
    println!("    standings    Recompute and print a season's standings");
    println!("    help         Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Store a race result, then recompute standings:");
    println!("    standings-processor ingest --season 2024 --race-id race-1 \\");
    println!("                               --session race --event 1229/bahrain");
    println!();
    println!("    # Store all three qualifying segments from one table:");
    println!("    standings-processor ingest -s 2024 -r q3-1 -k qualifying-3 -e 1229/bahrain \\");
    println!("                               --q1-id q1-1 --q2-id q2-1");
    println!();
    println!("    # Preview standings as JSON without writing them:");
    println!("    standings-processor standings --season 2024 --dry-run --format json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    standings-processor <COMMAND> --help");
}
